//! Main render/view function (View in TEA pattern)
//!
//! [`render`] is the pure text view of the record list; [`view`] paints it
//! (plus an optional status bar) into a ratatui frame.


use podwatch_app::state::{NoticeLevel, ViewSnapshot};
use podwatch_core::Record;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Marker in front of the selected row
pub const CURSOR_MARKER: char = '>';

/// Help line shown while running
pub const HELP_TEXT: &str = "Press 'q' to exit, 's' to stop, 'w' to watch";

/// Render the dashboard as text.
///
/// Header (`Pods`, or `Quitting`), a blank line, one row per record with the
/// cursor row marked, then the help line unless quitting.
pub fn render(quitting: bool, records: &[Record], cursor: usize) -> String {
    let mut s = String::new();

    s.push_str(if quitting { "Quitting" } else { "Pods" });
    s.push_str("\n\n");

    for (index, record) in records.iter().enumerate() {
        s.push(if index == cursor { CURSOR_MARKER } else { ' ' });
        s.push_str(&record.to_string());
        s.push('\n');
    }

    if quitting {
        s.push('\n');
    } else {
        s.push_str(HELP_TEXT);
    }

    s
}

/// One-line summary of feed state, counts and the last notice
pub fn status_line(snapshot: &ViewSnapshot) -> String {
    let mut parts = vec![format!("feed: {}", snapshot.feed_state.label())];

    if !snapshot.source_name.is_empty() {
        parts.push(format!("source: {}", snapshot.source_name));
    }

    let count = snapshot.records.len();
    parts.push(format!("{} pod{}", count, if count == 1 { "" } else { "s" }));

    if snapshot.dropped_updates > 0 {
        parts.push(format!("{} dropped updates", snapshot.dropped_updates));
    }

    if let Some(notice) = &snapshot.notice {
        parts.push(notice.message.clone());
    }

    parts.join(" | ")
}

/// Render the complete UI (View function in TEA)
pub fn view(frame: &mut Frame, snapshot: &ViewSnapshot, show_status_bar: bool) {
    let area = frame.area();

    let text = render(snapshot.quitting, &snapshot.records, snapshot.cursor);
    let lines: Vec<Line> = text
        .lines()
        .map(|line| {
            if line.starts_with(CURSOR_MARKER) {
                Line::styled(
                    line.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )
            } else {
                Line::raw(line.to_string())
            }
        })
        .collect();
    let body = Paragraph::new(Text::from(lines));

    if !show_status_bar {
        frame.render_widget(body, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    frame.render_widget(body, chunks[0]);

    let style = match snapshot.notice.as_ref().map(|n| n.level) {
        Some(NoticeLevel::Error) => Style::default().fg(Color::Red),
        Some(NoticeLevel::Warning) => Style::default().fg(Color::Yellow),
        _ => Style::default().fg(Color::DarkGray),
    };
    frame.render_widget(
        Paragraph::new(status_line(snapshot)).style(style),
        chunks[1],
    );
}
