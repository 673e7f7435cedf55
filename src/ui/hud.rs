use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

const ELLIPSIS: char = '…';

/// Renders the one-line status row and returns the play area below it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, caption: &str) -> Rect {
    let [status_area, play_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    let text = clip_to_width(caption, usize::from(status_area.width));
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Left)
            .style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        status_area,
    );

    play_area
}

/// Shortens `text` to at most `width` display columns, marking the cut
/// with an ellipsis.
#[must_use]
pub fn clip_to_width(text: &str, width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return text.to_owned();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut clipped = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        clipped.push(c);
    }
    clipped.push(ELLIPSIS);
    clipped
}
