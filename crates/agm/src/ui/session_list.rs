//! Session list rendering for the AGM TUI.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use agm_core::{format_ago, ActivityState, SessionRecord};

use crate::app::{App, ConnState};
use crate::ui::theme;

/// Maximum length for a display name before truncation.
const MAX_NAME_LENGTH: usize = 16;

/// Renders the session list panel.
pub fn render_session_list(frame: &mut Frame, area: Rect, app: &App, now: DateTime<Utc>) {
    let block = Block::default()
        .title(" Sessions ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let sorted = app.sessions_sorted();
    if sorted.is_empty() {
        let placeholder = Paragraph::new(empty_message(&app.state))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = sorted
        .iter()
        .enumerate()
        .map(|(index, session)| {
            let activity = app.activity_of(session, now);
            let selected = index == app.selected_index;
            ListItem::new(session_row(
                session,
                activity,
                selected,
                app.blink_visible,
                now,
            ))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

/// Text shown in the list panel when there are no sessions to display.
fn empty_message(state: &ConnState) -> &'static str {
    match state {
        ConnState::Connecting => "Connecting to gateway...",
        ConnState::Disconnected { .. } => "Disconnected - press 'r' to reconnect",
        ConnState::Connected => "No active sessions",
        ConnState::Degraded { .. } => "No sessions (last poll failed)",
    }
}

/// Builds one list row for a session.
///
/// Layout: selection marker, activity icon, kind marker, context %,
/// display name, last-activity age.
fn session_row(
    session: &SessionRecord,
    activity: ActivityState,
    selected: bool,
    blink_visible: bool,
    now: DateTime<Utc>,
) -> Line<'static> {
    let marker = if selected { "> " } else { "  " };
    let icon = theme::activity_icon(activity, blink_visible);
    let context_pct = session.context_percentage();

    let age = match session.last_activity {
        Some(ts) => format_ago(ts, now),
        None => "never".to_string(),
    };

    let name_style = if selected {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut line = Line::from(vec![
        Span::styled(marker.to_string(), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("{icon} "),
            Style::default().fg(theme::activity_color(activity)),
        ),
        Span::styled(
            format!("[{}] ", session.kind.marker()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{context_pct:>3.0}% "),
            Style::default().fg(theme::context_color(context_pct)),
        ),
        Span::styled(
            format!(
                "{:<width$} ",
                truncate_string(session.display_name(), MAX_NAME_LENGTH),
                width = MAX_NAME_LENGTH
            ),
            name_style,
        ),
        Span::styled(age, Style::default().fg(Color::DarkGray)),
    ]);

    if let Some(bg) = theme::activity_background(activity) {
        line = line.style(Style::default().bg(bg));
    }
    line
}

/// Truncates a string to a maximum length, appending ".." when cut.
fn truncate_string(s: &str, max_length: usize) -> String {
    if s.chars().count() <= max_length {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_length.saturating_sub(2)).collect();
        format!("{truncated}..")
    }
}
