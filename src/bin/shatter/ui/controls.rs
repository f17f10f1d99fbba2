//! The control list: one row per parameter, adjusted with left/right.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use shatter_dsp::{
    dsp::{FilterType, NoiseKind, Oversample},
    patch::ModType,
    ParameterSet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Volume,
    Noise,
    DistortionAmount,
    Oversample,
    FilterType,
    FilterFrequency,
    FilterQ,
    ModType,
    ModSpeed,
    ModDepth,
}

impl Control {
    pub const ALL: [Control; 10] = [
        Control::Volume,
        Control::Noise,
        Control::DistortionAmount,
        Control::Oversample,
        Control::FilterType,
        Control::FilterFrequency,
        Control::FilterQ,
        Control::ModType,
        Control::ModSpeed,
        Control::ModDepth,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Control::Volume => "Volume",
            Control::Noise => "Noise",
            Control::DistortionAmount => "Distortion",
            Control::Oversample => "Oversample",
            Control::FilterType => "Filter",
            Control::FilterFrequency => "Frequency",
            Control::FilterQ => "Q",
            Control::ModType => "Modulation",
            Control::ModSpeed => "Mod speed",
            Control::ModDepth => "Mod depth",
        }
    }

    /// Current value formatted the way the control shows it.
    pub fn display(self, params: &ParameterSet) -> String {
        match self {
            Control::Volume => format!("{:.2}", params.volume),
            Control::Noise => params.noise_kind.name().to_string(),
            Control::DistortionAmount => params.distortion_amount.to_string(),
            Control::Oversample => params.distortion_oversample.name().to_string(),
            Control::FilterType => params.filter_type.name().to_string(),
            Control::FilterFrequency => format!("{:.0} Hz", params.filter_frequency),
            Control::FilterQ => format!("{:.1}", params.filter_q),
            Control::ModType => params.mod_type.name().to_string(),
            Control::ModSpeed => format!("{:.1} Hz", params.mod_speed),
            Control::ModDepth => format!("{:.2}", params.mod_depth),
        }
    }

    /// `params` with this control moved one step (`up` or down).
    pub fn adjust(self, params: &ParameterSet, up: bool) -> ParameterSet {
        let mut next = params.clone();
        let dir = if up { 1.0f32 } else { -1.0 };

        match self {
            Control::Volume => next.volume = step(params.volume, 0.01 * dir, 0.0, 1.0),
            Control::Noise => next.noise_kind = cycle(&NoiseKind::ALL, params.noise_kind, up),
            Control::DistortionAmount => {
                next.distortion_amount = step(params.distortion_amount as f32, 10.0 * dir, 0.0, 1000.0) as u32
            }
            Control::Oversample => {
                next.distortion_oversample = cycle(&Oversample::ALL, params.distortion_oversample, up)
            }
            Control::FilterType => next.filter_type = cycle(&FilterType::ALL, params.filter_type, up),
            Control::FilterFrequency => {
                // Multiplicative steps so the low end stays usable
                let factor = if up { 1.06 } else { 1.0 / 1.06 };
                next.filter_frequency = (params.filter_frequency * factor).clamp(20.0, 20_000.0).round()
            }
            Control::FilterQ => next.filter_q = step(params.filter_q, 0.5 * dir, 0.1, 30.0),
            Control::ModType => next.mod_type = cycle(&ModType::ALL, params.mod_type, up),
            Control::ModSpeed => next.mod_speed = step(params.mod_speed, 0.5 * dir, 0.1, 30.0),
            Control::ModDepth => next.mod_depth = step(params.mod_depth, 0.05 * dir, 0.0, 1.0),
        }

        next
    }
}

fn step(value: f32, delta: f32, min: f32, max: f32) -> f32 {
    // Round to kill accumulated float drift from repeated steps
    ((value + delta).clamp(min, max) * 1000.0).round() / 1000.0
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let n = all.len();
    let i = all.iter().position(|&v| v == current).unwrap_or(0);
    if forward {
        all[(i + 1) % n]
    } else {
        all[(i + n - 1) % n]
    }
}

pub fn render_controls(frame: &mut Frame, area: Rect, params: &ParameterSet, selected: usize) {
    let items: Vec<ListItem> = Control::ALL
        .iter()
        .enumerate()
        .map(|(i, control)| {
            let style = if i == selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<11}", control.label()), style.add_modifier(Modifier::BOLD)),
                Span::styled(format!(" {:>10} ", control.display(params)), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(Block::default().title(" Controls ").borders(Borders::ALL));
    frame.render_widget(list, area);
}
