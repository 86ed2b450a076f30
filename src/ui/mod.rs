//! Import progress reporting
//!
//! The import pipeline reports through the [`Ui`] trait:
//! - [`UiApp`]: full-screen terminal view (ratatui)
//! - [`LogUi`]: forwards everything to the `log` facade
//! - [`SilentUi`]: discards everything (tests, server uploads)

mod components;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::{Frame, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

use crate::parser::SkipReason;
use components::{LogPanel, ProgressPanel, SkipPanel, StatusPanel};

/// Steps of an import, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Reading,
    Parsing,
    Writing,
    Complete,
}

impl Phase {
    pub const STEPS: [Phase; 3] = [Phase::Reading, Phase::Parsing, Phase::Writing];
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::Reading => "Reading workbook",
            Phase::Parsing => "Parsing rows",
            Phase::Writing => "Writing database",
            Phase::Complete => "Complete",
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Progress {
    pub current: u64,
    pub total: u64,
    pub label: String,
}

impl Progress {
    pub fn new(current: u64, total: u64, label: impl Into<String>) -> Self {
        Self {
            current,
            total,
            label: label.into(),
        }
    }

    /// Fraction done, clamped to `0.0..=1.0`
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64).min(1.0)
        }
    }
}

pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_info(&mut self, info: impl Into<String>);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn clear_progress(&mut self);
    fn log(&mut self, message: impl Into<String>);

    /// A data row was left out of the import (1-based sheet row)
    fn row_skipped(&mut self, row: usize, reason: SkipReason) {
        self.log(format!("{} row {}: {}", components::SKIPPED, row, reason));
    }
}

/// Everything drawn on the import screen
struct Screen {
    status: StatusPanel,
    progress: ProgressPanel,
    skips: SkipPanel,
    log: LogPanel,
}

impl Screen {
    fn new() -> Self {
        Self {
            status: StatusPanel::new(),
            progress: ProgressPanel::default(),
            skips: SkipPanel::default(),
            log: LogPanel::new(500),
        }
    }

    fn render(&self, frame: &mut Frame) {
        let [status, progress, body] = Layout::vertical([
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Min(6),
        ])
        .areas(frame.area());
        let [log, skips] =
            Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).areas(body);

        self.status.render(frame, status);
        self.progress.render(frame, progress);
        self.log.render(frame, log);
        self.skips.render(frame, skips);
    }
}

/// Full-screen terminal view of an import
pub struct UiApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    screen: Screen,
    active: bool,
}

impl UiApp {
    /// Switch to the alternate screen
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

        Ok(Self {
            terminal,
            screen: Screen::new(),
            active: true,
        })
    }

    fn redraw(&mut self) {
        let screen = &self.screen;
        self.terminal.draw(|frame| screen.render(frame)).ok();
    }

    /// Show the summary and keep it up until `q`, Enter or Esc
    pub fn finish(mut self, summary: &str) -> Result<()> {
        self.screen.status.set_phase(Phase::Complete);
        self.screen.progress.clear();
        self.screen.log.push(summary);
        self.screen.log.push("press q to close");
        self.redraw();

        loop {
            if !event::poll(Duration::from_millis(200))? {
                continue;
            }
            if let Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            {
                if matches!(code, KeyCode::Char('q') | KeyCode::Enter | KeyCode::Esc) {
                    break;
                }
            }
        }

        self.restore()
    }

    /// Leave the alternate screen immediately
    pub fn restore(mut self) -> Result<()> {
        self.leave()
    }

    fn leave(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal::disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Ui for UiApp {
    fn set_phase(&mut self, phase: Phase) {
        self.screen.status.set_phase(phase);
        self.redraw();
    }

    fn set_info(&mut self, info: impl Into<String>) {
        self.screen.status.set_info(info);
        self.redraw();
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        self.screen.progress.set(Progress::new(current, total, label));
        self.redraw();
    }

    fn clear_progress(&mut self) {
        self.screen.progress.clear();
        self.redraw();
    }

    fn log(&mut self, message: impl Into<String>) {
        self.screen.log.push(message);
        self.redraw();
    }

    fn row_skipped(&mut self, row: usize, reason: SkipReason) {
        self.screen.skips.count(reason);
        self.log(format!("{} row {}: {}", components::SKIPPED, row, reason));
    }
}

impl Drop for UiApp {
    fn drop(&mut self) {
        self.leave().ok();
    }
}

/// Plain log output for non-interactive runs
#[derive(Debug, Default)]
pub struct LogUi;

impl LogUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for LogUi {
    fn set_phase(&mut self, phase: Phase) {
        log::info!("{}", phase);
    }

    fn set_info(&mut self, info: impl Into<String>) {
        log::info!("{}", info.into());
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        log::debug!("{}: {}/{}", label.into(), current, total);
    }

    fn clear_progress(&mut self) {}

    fn log(&mut self, message: impl Into<String>) {
        log::info!("{}", message.into());
    }

    fn row_skipped(&mut self, row: usize, reason: SkipReason) {
        log::warn!("row {} skipped: {}", row, reason);
    }
}

#[derive(Debug, Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_info(&mut self, _info: impl Into<String>) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
    fn row_skipped(&mut self, _row: usize, _reason: SkipReason) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Ui for Recorder {
        fn set_phase(&mut self, _phase: Phase) {}
        fn set_info(&mut self, _info: impl Into<String>) {}
        fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
        fn clear_progress(&mut self) {}
        fn log(&mut self, message: impl Into<String>) {
            self.0.push(message.into());
        }
    }

    #[test]
    fn test_progress_ratio() {
        assert_eq!(Progress::new(5, 0, "rows").ratio(), 0.0);
        assert_eq!(Progress::new(25, 100, "rows").ratio(), 0.25);
        assert_eq!(Progress::new(7, 5, "rows").ratio(), 1.0);
    }

    #[test]
    fn test_skipped_rows_are_logged_by_default() {
        let mut ui = Recorder::default();
        ui.row_skipped(12, SkipReason::UnknownDistrict);
        assert_eq!(ui.0, vec!["skipped row 12: unknown district"]);
    }

    #[test]
    fn test_screen_draws_phase_and_skips() {
        let mut screen = Screen::new();
        screen.status.set_phase(Phase::Parsing);
        screen.skips.count(SkipReason::UnknownDistrict);
        screen.log.push("skipped row 5: unknown district");

        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|frame| screen.render(frame)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Parsing rows"));
        assert!(text.contains("Skipped (1)"));
        assert!(text.contains("skipped row 5"));
    }

    #[test]
    fn test_phase_steps() {
        assert!(!Phase::STEPS.contains(&Phase::Complete));
        assert_eq!(Phase::Writing.to_string(), "Writing database");
    }
}
