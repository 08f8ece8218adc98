//! Header and footer rendering for the AGM TUI.
//!
//! The header shows the title, connectivity, and summary stats; the
//! footer shows keybindings and the most recent notification.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use agm_core::format_ago;

use crate::app::{App, ConnState};

/// Renders the header bar with title, connectivity, and stats.
pub fn render_header(frame: &mut Frame, area: Rect, app: &App, now: DateTime<Utc>) {
    let (status_text, status_color) = connectivity_display(&app.state, now);

    let line = Line::from(vec![
        Span::styled(
            " AGM ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(stats_line(app, now), Style::default().fg(Color::Gray)),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(status_color)),
    );
    frame.render_widget(header, area);
}

/// Renders the footer with keybinding hints and the latest notification.
pub fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let refresh_hint = if app.is_disconnected() {
        "reconnect"
    } else {
        "refresh"
    };

    let mut spans = vec![
        Span::styled(" j/k", Style::default().fg(Color::Cyan)),
        Span::styled(" navigate  ", Style::default().fg(Color::DarkGray)),
        Span::styled("r", Style::default().fg(Color::Cyan)),
        Span::styled(format!(" {refresh_hint}  "), Style::default().fg(Color::DarkGray)),
        Span::styled("q", Style::default().fg(Color::Cyan)),
        Span::styled(" quit", Style::default().fg(Color::DarkGray)),
    ];

    if let Some(notification) = app.latest_notification() {
        spans.push(Span::styled("  | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            notification.to_string(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(footer, area);
}

/// Returns the display text and color for the connection state.
fn connectivity_display(state: &ConnState, now: DateTime<Utc>) -> (String, Color) {
    match state {
        ConnState::Connecting => ("Connecting...".to_string(), Color::Yellow),
        ConnState::Connected => ("Connected".to_string(), Color::Green),
        ConnState::Degraded { since } => (
            format!("Offline (since {})", format_ago(*since, now)),
            Color::Yellow,
        ),
        ConnState::Disconnected { reason } => match reason {
            Some(reason) => (format!("Disconnected: {reason}"), Color::Red),
            None => ("Disconnected".to_string(), Color::Red),
        },
    }
}

/// Builds the summary stats string: session count, working/waiting
/// counts, and total token usage.
fn stats_line(app: &App, now: DateTime<Utc>) -> String {
    format!(
        "{} sessions ({} working, {} waiting) | {} tok",
        app.session_count(),
        app.working_count(now),
        app.waiting_count(now),
        format_tokens(app.total_tokens())
    )
}

/// Formats a token count compactly: 950, 12.3k, 1.2M.
fn format_tokens(tokens: u64) -> String {
    if tokens >= 1_000_000 {
        format!("{:.1}M", tokens as f64 / 1_000_000.0)
    } else if tokens >= 1_000 {
        format!("{:.1}k", tokens as f64 / 1_000.0)
    } else {
        tokens.to_string()
    }
}
