//! Waveform oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Render byte-scaled time-domain data (128 = silence).
pub fn render_waveform(frame: &mut Frame, area: Rect, bytes: &[u8], color: Color) {
    let block = Block::default().title(" Waveform ").borders(Borders::ALL);

    // One point per column is plenty
    let target_w = area.width.max(1) as usize;
    let step = bytes.len().div_ceil(target_w).max(1);
    let data: Vec<(f64, f64)> = bytes
        .iter()
        .enumerate()
        .step_by(step)
        .map(|(i, &b)| {
            let x = i as f64 / bytes.len().max(1) as f64;
            let y = (b as f64 - 128.0) / 128.0;
            (x, y)
        })
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
