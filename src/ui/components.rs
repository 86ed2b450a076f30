//! Panels of the import screen

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Gauge, List, ListItem, Paragraph};
use ratatui::Frame;
use std::collections::{BTreeMap, VecDeque};

use super::{Phase, Progress};
use crate::parser::SkipReason;

/// Log lines starting with this are drawn as warnings
pub const SKIPPED: &str = "skipped";

const ACCENT: Color = Color::Cyan;
const FRAME: Color = Color::Blue;

fn panel(title: &str) -> Block<'_> {
    Block::bordered()
        .title(title)
        .border_style(Style::default().fg(FRAME))
}

/// Step list with the current phase highlighted
pub struct StatusPanel {
    phase: Phase,
    info: String,
}

impl StatusPanel {
    pub fn new() -> Self {
        Self {
            phase: Phase::Reading,
            info: String::new(),
        }
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn set_info(&mut self, info: impl Into<String>) {
        self.info = info.into();
    }

    fn step_span(&self, step: Phase) -> Span<'static> {
        let current = Phase::STEPS.iter().position(|p| *p == self.phase);
        let this = Phase::STEPS.iter().position(|p| *p == step);
        let (marker, style) = match (current, this) {
            (None, _) => ("✓", Style::default().fg(Color::Green)),
            (Some(c), Some(t)) if t < c => ("✓", Style::default().fg(Color::Green)),
            (Some(c), Some(t)) if t == c => ("▶", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            _ => ("·", Style::default().fg(Color::DarkGray)),
        };
        Span::styled(format!(" {} {} ", marker, step), style)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let steps: Vec<Span> = Phase::STEPS.iter().map(|s| self.step_span(*s)).collect();
        let headline = if self.phase == Phase::Complete {
            Line::from(" Import complete".green().bold())
        } else {
            Line::from(format!(" {}", self.phase).fg(ACCENT).bold())
        };

        let lines = vec![
            headline,
            Line::from(steps),
            Line::from(""),
            Line::from(format!("   {}", self.info).gray()),
        ];

        frame.render_widget(Paragraph::new(lines).block(panel(" School Map Import ")), area);
    }
}

#[derive(Default)]
pub struct ProgressPanel {
    progress: Option<Progress>,
}

impl ProgressPanel {
    pub fn set(&mut self, progress: Progress) {
        self.progress = Some(progress);
    }

    pub fn clear(&mut self) {
        self.progress = None;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = panel(" Rows ");
        match &self.progress {
            Some(p) => {
                let gauge = Gauge::default()
                    .block(block)
                    .gauge_style(Style::default().fg(ACCENT).bg(Color::DarkGray))
                    .ratio(p.ratio())
                    .label(format!("{} {}/{}", p.label, p.current, p.total));
                frame.render_widget(gauge, area);
            }
            None => frame.render_widget(block, area),
        }
    }
}

/// Running count of skipped rows per reason
#[derive(Default)]
pub struct SkipPanel {
    counts: BTreeMap<SkipReason, usize>,
}

impl SkipPanel {
    pub fn count(&mut self, reason: SkipReason) {
        *self.counts.entry(reason).or_default() += 1;
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = if self.counts.is_empty() {
            vec![Line::from(" none".dark_gray())]
        } else {
            self.counts
                .iter()
                .map(|(reason, n)| Line::from(vec![format!(" {:>5} ", n).yellow().bold(), Span::raw(reason.to_string())]))
                .collect()
        };

        let title = format!(" Skipped ({}) ", self.total());
        frame.render_widget(Paragraph::new(lines).block(panel(&title)), area);
    }
}

/// Bounded activity log; only the tail that fits is drawn
pub struct LogPanel {
    entries: VecDeque<String>,
    capacity: usize,
}

impl LogPanel {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(message.into());
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let visible = usize::from(area.height.saturating_sub(2));
        let skip = self.entries.len().saturating_sub(visible);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .skip(skip)
            .map(|entry| {
                let style = if entry.starts_with(SKIPPED) {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(format!(" {}", entry)).style(style)
            })
            .collect();

        frame.render_widget(List::new(items).block(panel(" Activity ")), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_bounded() {
        let mut log = LogPanel::new(3);
        for i in 0..5 {
            log.push(format!("line {}", i));
        }
        assert_eq!(log.entries.len(), 3);
        assert_eq!(log.entries.front().map(String::as_str), Some("line 2"));
    }

    #[test]
    fn test_skip_counts() {
        let mut skips = SkipPanel::default();
        skips.count(SkipReason::TotalRow);
        skips.count(SkipReason::TotalRow);
        skips.count(SkipReason::EmptyRow);
        assert_eq!(skips.total(), 3);
        assert_eq!(skips.counts.get(&SkipReason::TotalRow), Some(&2));
    }
}
