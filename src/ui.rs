use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::clock::Clock;
use crate::session::{AdvanceMode, CharResult, TypingSession};
use crate::stats::{StatsSnapshot, Summary};

const HORIZONTAL_MARGIN: u16 = 5;
const SUMMARY_WIDTH: u16 = 44;
const SUMMARY_HEIGHT: u16 = 9;

/// Typing screen: live stats, the passage colored by result, and the
/// summary modal once the session is over.
pub struct SessionView<'a, C: Clock> {
    session: &'a TypingSession<C>,
    summary: Option<&'a Summary>,
}

impl<'a, C: Clock> SessionView<'a, C> {
    pub fn new(session: &'a TypingSession<C>) -> Self {
        Self {
            session,
            summary: None,
        }
    }

    /// Overlay a finished session's summary.
    pub fn with_summary(mut self, summary: Option<&'a Summary>) -> Self {
        self.summary = summary;
        self
    }
}

impl<C: Clock> Widget for SessionView<'_, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.session;
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let prompt_width = session.passage().text().width();
        let prompt_occupied_lines = if prompt_width <= max_chars_per_line as usize {
            1
        } else {
            ((prompt_width as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
        };
        let padding = area
            .height
            .saturating_sub(prompt_occupied_lines.saturating_add(4))
            / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(padding),
                Constraint::Length(2), // stats
                Constraint::Length(prompt_occupied_lines),
                Constraint::Length(1), // padding
                Constraint::Length(1), // legend
                Constraint::Min(0),
            ])
            .split(area);

        Paragraph::new(stats_line(&session.snapshot(), bold_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        Paragraph::new(Line::from(passage_spans(session)))
            .alignment(if prompt_occupied_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);

        let legend = match session.config().mode {
            AdvanceMode::Advance => "(tab) reset / (esc)ape",
            AdvanceMode::Strict => "strict / (tab) reset / (esc)ape",
        };
        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        if let Some(summary) = self.summary {
            SummaryPopup(summary).render(area, buf);
        }
    }
}

fn stats_line(snap: &StatsSnapshot, bold_style: Style) -> Line<'static> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    Line::from(vec![
        Span::styled(format!("{}", snap.time_left_secs), bold_style),
        Span::styled("s   ", dim),
        Span::styled(format!("{}", snap.net_wpm), bold_style),
        Span::styled(" wpm   ", dim),
        Span::styled(format!("{}", snap.accuracy_percent), bold_style),
        Span::styled("% acc   ", dim),
        Span::styled(format!("{}", snap.error_count), bold_style),
        Span::styled(" errors", dim),
    ])
}

fn passage_spans<C: Clock>(session: &TypingSession<C>) -> Vec<Span<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = bold_style.fg(Color::Green);
    let red_bold_style = bold_style.fg(Color::Red);
    let dim_bold_style = bold_style.add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = dim_bold_style.add_modifier(Modifier::UNDERLINED);
    let cursor = session.cursor();
    let running = !session.is_finished();

    session
        .passage()
        .chars()
        .iter()
        .zip(session.results())
        .enumerate()
        .map(|(idx, (&expected, result))| match result {
            CharResult::Correct => Span::styled(expected.to_string(), green_bold_style),
            // spaces would vanish when colored, so show a middle dot
            CharResult::Incorrect => Span::styled(
                match expected {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                red_bold_style,
            ),
            CharResult::Unattempted if running && idx == cursor => {
                Span::styled(expected.to_string(), underlined_dim_bold_style)
            }
            CharResult::Unattempted => Span::styled(expected.to_string(), dim_bold_style),
        })
        .collect()
}

/// Centered end-of-session modal
pub struct SummaryPopup<'a>(pub &'a Summary);

impl Widget for SummaryPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let summary = self.0;
        let popup = centered_rect(SUMMARY_WIDTH, SUMMARY_HEIGHT, area);
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let lines = vec![
            Line::from(format!(
                "WPM (net, excludes wrong presses): {}",
                summary.stats.net_wpm
            )),
            Line::from(format!(
                "WPM (gross, includes wrong presses): {}",
                summary.stats.gross_wpm
            )),
            Line::from(format!("Accuracy: {}%", summary.stats.accuracy_percent)),
            Line::from(format!("Errors: {}", summary.stats.error_count)),
            Line::from(format!("Time: {:.1}s", summary.elapsed_secs)),
            Line::from(""),
            Line::from(Span::styled(
                "(tab) retry / (esc)ape",
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ];

        Clear.render(popup, buf);
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(Span::styled(summary.reason.to_string(), bold_style))
                    .title_alignment(Alignment::Center),
            )
            .alignment(Alignment::Center)
            .render(popup, buf);
    }
}

/// A `width` x `height` rect centered in `area`, shrunk to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
