//! Playback control.
//!
//! The [`Controller`] owns the current [`PlaybackSession`] and talks to an
//! [`AudioHost`]. Hosts only ever receive ready-made renderers and scalar
//! updates; all synthesis and planning happens on the caller's thread.
//!
//! ```ignore
//! use shatter_dsp::{patch::BuiltinPreset, runtime::{Controller, OfflineHost}};
//!
//! let mut controller = Controller::new(OfflineHost::new(), BuiltinPreset::Intense.params(), 48_000.0);
//! controller.start()?;
//!
//! let mut block = vec![0.0f32; 512];
//! controller.host_mut().render(&mut block);
//! ```

mod controller;
mod host;
#[cfg(feature = "rtrb")]
mod scope;
mod session;

pub use controller::Controller;
#[cfg(feature = "rtrb")]
pub use host::{ring_host, RingHost};
pub use host::{AudioHost, OfflineHost};
#[cfg(feature = "rtrb")]
pub use scope::{scope_ring, ScopeTap};
pub use session::PlaybackSession;
