//! Spectrum analyzer widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Render `(frequency_hz, magnitude_db)` points on a log-frequency axis.
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let data: Vec<(f64, f64)> = spectrum
        .iter()
        .map(|&(freq, db)| (freq.max(1.0).log10(), db))
        .collect();

    let min_x = data.first().map(|(x, _)| *x).unwrap_or(0.0);
    let max_x = data.iter().map(|(x, _)| *x).fold(min_x + 1.0, f64::max);
    let max_db = data.iter().map(|(_, db)| *db).fold(-100.0, f64::max);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-100.0, max_db.max(0.0) + 10.0])
                .labels(vec!["-100", "-60", "-20", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
