//! Signal graph description.
//!
//! [`topology`] is the data: stages, connections and ordering queries.
//! [`planner`] decides which topology a [`ParameterSet`](crate::patch::ParameterSet)
//! gets. Neither touches audio; the engine instantiates the result.

pub mod planner;
pub mod topology;

pub use planner::plan;
pub use topology::{Connection, GraphTopology, Param, Stage, StageId, StageKind, Target};
