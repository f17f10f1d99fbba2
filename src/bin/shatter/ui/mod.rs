//! TUI for shatter
//!
//! Controls on the left, presets and visualisers on the right. Everything
//! the keys do goes through the [`Controller`]; the UI only keeps what is
//! selected and what is being typed.

mod controls;
mod spectrum;
mod waveform;

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use tracing::warn;

use shatter_dsp::{
    patch::{BuiltinPreset, FileStore, Preset, PresetStore},
    runtime::{AudioHost, Controller, ScopeTap},
};

use controls::{render_controls, Control};
use spectrum::render_spectrum;
use waveform::render_waveform;

const WAVE_COLOR: Color = Color::Rgb(187, 134, 252);

/// What the keyboard is currently doing.
enum Mode {
    Normal,
    /// Typing a name for the preset being saved
    Naming(String),
    /// Waiting for y/n on deleting the named preset
    ConfirmDelete(String),
}

pub struct UiApp<H: AudioHost> {
    controller: Controller<H>,
    store: PresetStore<FileStore>,
    scope: ScopeTap,
    presets: Vec<Preset>,
    /// Selected row of the control list
    selected: usize,
    /// Selected custom preset, as an index into the custom part of `presets`
    custom_selected: usize,
    /// Name of the last applied preset
    active: Option<String>,
    mode: Mode,
    status: String,
    wave: Vec<u8>,
    should_quit: bool,
}

impl<H: AudioHost> UiApp<H> {
    pub fn new(controller: Controller<H>, store: PresetStore<FileStore>, scope: ScopeTap) -> Self {
        let presets = store.list();
        Self {
            controller,
            store,
            scope,
            presets,
            selected: 0,
            custom_selected: 0,
            active: None,
            mode: Mode::Normal,
            status: String::from("Space to play"),
            wave: Vec::new(),
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(mut self, mut terminal: DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.scope.poll();
            self.scope.analyser().byte_time_domain(&mut self.wave);
            self.scope.analyser_mut().frequency_db();

            terminal.draw(|frame| self.render(frame))?;

            // Non-blocking, ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        if let Err(err) = self.controller.stop() {
            warn!(error = %err, "failed to stop playback on exit");
        }
        Ok(())
    }

    fn customs(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter().filter(|p| p.is_custom())
    }

    fn selected_custom(&self) -> Option<&Preset> {
        self.customs().nth(self.custom_selected)
    }

    fn refresh_presets(&mut self) {
        self.presets = self.store.list();
        let count = self.customs().count();
        self.custom_selected = self.custom_selected.min(count.saturating_sub(1));
    }

    fn handle_key(&mut self, key: KeyCode) {
        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => self.handle_normal(key),
            Mode::Naming(name) => self.handle_naming(key, name),
            Mode::ConfirmDelete(name) => self.handle_confirm(key, name),
        }
    }

    fn handle_normal(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => self.toggle_playback(),
            KeyCode::Up => self.selected = (self.selected + Control::ALL.len() - 1) % Control::ALL.len(),
            KeyCode::Down => self.selected = (self.selected + 1) % Control::ALL.len(),
            KeyCode::Left => self.adjust(false),
            KeyCode::Right => self.adjust(true),
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.apply(Preset::builtin(BuiltinPreset::ALL[index]));
            }
            KeyCode::Char('[') => self.custom_selected = self.custom_selected.saturating_sub(1),
            KeyCode::Char(']') => {
                let count = self.customs().count();
                if self.custom_selected + 1 < count {
                    self.custom_selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(preset) = self.selected_custom().cloned() {
                    self.apply(preset);
                }
            }
            KeyCode::Char('s') => self.mode = Mode::Naming(String::new()),
            KeyCode::Char('d') => {
                if let Some(name) = self.selected_custom().map(|p| p.name.clone()) {
                    self.mode = Mode::ConfirmDelete(name);
                }
            }
            _ => {}
        }
    }

    fn handle_naming(&mut self, key: KeyCode, mut name: String) {
        match key {
            KeyCode::Enter => {
                let params = self.controller.params().clone();
                match self.store.save(&name, &params) {
                    Ok(saved) => {
                        self.status = format!("Preset \"{saved}\" saved");
                        self.refresh_presets();
                    }
                    Err(err) => self.status = format!("Not saved: {err}"),
                }
            }
            KeyCode::Esc => self.status = String::from("Save cancelled"),
            KeyCode::Backspace => {
                name.pop();
                self.mode = Mode::Naming(name);
            }
            KeyCode::Char(c) => {
                name.push(c);
                self.mode = Mode::Naming(name);
            }
            _ => self.mode = Mode::Naming(name),
        }
    }

    fn handle_confirm(&mut self, key: KeyCode, name: String) {
        let confirmed = matches!(key, KeyCode::Char('y') | KeyCode::Char('Y'));
        match self.store.delete(&name, |_| confirmed) {
            Ok(true) => {
                self.status = format!("Preset \"{name}\" deleted");
                if self.active.as_deref() == Some(name.as_str()) {
                    self.active = None;
                }
                self.refresh_presets();
            }
            Ok(false) => self.status = String::from("Nothing deleted"),
            Err(err) => self.status = format!("Delete failed: {err}"),
        }
    }

    fn toggle_playback(&mut self) {
        let result = if self.controller.is_playing() {
            self.scope.stop();
            self.controller.stop()
        } else {
            self.scope.resume();
            self.controller.start()
        };

        match result {
            Ok(()) if self.controller.is_playing() => self.status = String::from("Playing"),
            Ok(()) => self.status = String::from("Stopped"),
            Err(err) => {
                warn!(error = %err, "playback toggle failed");
                self.status = format!("Audio error: {err}");
            }
        }
    }

    fn adjust(&mut self, up: bool) {
        let control = Control::ALL[self.selected];
        let next = control.adjust(self.controller.params(), up);
        if let Err(err) = self.controller.set_params(next) {
            warn!(error = %err, control = control.label(), "parameter change failed");
            self.status = format!("Audio error: {err}");
        }
    }

    fn apply(&mut self, preset: Preset) {
        match self.controller.apply_preset(&preset) {
            Ok(()) => {
                self.status = format!("Preset \"{}\"", preset.name);
                self.active = Some(preset.name);
            }
            Err(err) => {
                warn!(error = %err, preset = %preset.name, "preset failed");
                self.status = format!("Audio error: {err}");
            }
        }
    }

    fn render(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(12),   // Controls + visualisers
                Constraint::Length(3), // Status / prompt
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(28), Constraint::Min(30)])
            .split(rows[0]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(Control::ALL.len() as u16 + 2), Constraint::Min(4)])
            .split(columns[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        render_controls(frame, left[0], self.controller.params(), self.selected);
        self.render_presets(frame, left[1]);
        render_waveform(frame, right[0], &self.wave, WAVE_COLOR);
        render_spectrum(frame, right[1], self.scope.analyser().spectrum());
        self.render_status(frame, rows[1]);

        let help = Paragraph::new(
            " [Space] Play/Stop  [↑↓] Select  [←→] Adjust  [1-5] Presets  [[ ]] Pick saved  [Enter] Apply  [S] Save  [D] Delete  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[2]);
    }

    fn render_presets(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::with_capacity(self.presets.len());
        let mut custom_index = 0;

        for (i, preset) in self.presets.iter().enumerate() {
            let active = self.active.as_deref() == Some(preset.name.as_str());
            let mut style = if active {
                Style::default().fg(Color::Black).bg(WAVE_COLOR)
            } else {
                Style::default()
            };

            let label = if preset.is_custom() {
                if custom_index == self.custom_selected {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                custom_index += 1;
                format!(" *  {}", preset.name)
            } else {
                format!(" {}  {}", i + 1, preset.name)
            };
            lines.push(Line::from(Span::styled(label, style)));
        }

        let list = Paragraph::new(lines).block(Block::default().title(" Presets ").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let (title, text, color) = match &self.mode {
            Mode::Normal => {
                let state = if self.controller.is_playing() { "▶" } else { "■" };
                let text = format!(
                    " {state}  {}  | {:.1}kHz  Peak: {:.2}  RMS: {:.2}",
                    self.status,
                    self.controller.sample_rate() / 1000.0,
                    self.scope.analyser().peak(),
                    self.scope.analyser().rms(),
                );
                (" shatter ", text, Color::White)
            }
            Mode::Naming(name) => (" Save preset ", format!(" Name: {name}_  (Enter to save, Esc to cancel)"), Color::Yellow),
            Mode::ConfirmDelete(name) => (
                " Delete preset ",
                format!(" Delete \"{name}\"? (y/n)"),
                Color::LightRed,
            ),
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(color))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }
}
