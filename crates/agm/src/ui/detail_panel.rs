//! Detail panel rendering for the selected session.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use agm_core::{format_ago, ActivityState, SessionRecord};

use crate::app::App;
use crate::ui::theme;

/// Width of the context usage progress bar in characters.
const PROGRESS_BAR_WIDTH: usize = 20;

/// Renders the detail panel for the currently selected session.
pub fn render_detail_panel(frame: &mut Frame, area: Rect, app: &App, now: DateTime<Utc>) {
    let Some(session) = app.selected_session() else {
        let placeholder = Paragraph::new("No session selected")
            .style(Style::default().fg(Color::DarkGray))
            .block(detail_block(Color::DarkGray));
        frame.render_widget(placeholder, area);
        return;
    };

    let activity = app.activity_of(session, now);
    let border_color = if session.context_percentage() >= 90.0 {
        Color::Red
    } else {
        theme::activity_color(activity)
    };

    let lines = build_detail_lines(session, activity, now);
    let panel = Paragraph::new(lines).block(detail_block(border_color));
    frame.render_widget(panel, area);
}

fn detail_block(border_color: Color) -> Block<'static> {
    Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
}

/// Builds the detail lines for a session.
fn build_detail_lines(
    session: &SessionRecord,
    activity: ActivityState,
    now: DateTime<Utc>,
) -> Vec<Line<'static>> {
    let context_pct = session.context_percentage();
    let age = match session.last_activity {
        Some(ts) => format_ago(ts, now),
        None => "never".to_string(),
    };

    let mut lines = vec![
        detail_line("Session", session.id.to_string(), Color::White),
        detail_line("Name", session.display_name().to_string(), Color::White),
        detail_line("Kind", session.kind.label().to_string(), Color::Gray),
        Line::from(vec![
            label_span("Status"),
            Span::styled(
                activity.to_string(),
                Style::default()
                    .fg(theme::activity_color(activity))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" (last activity {age})"),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            label_span("Context"),
            Span::styled(
                build_progress_bar(context_pct, PROGRESS_BAR_WIDTH),
                Style::default().fg(theme::context_color(context_pct)),
            ),
            Span::styled(
                format!(" {context_pct:.0}%"),
                Style::default().fg(theme::context_color(context_pct)),
            ),
        ]),
        detail_line(
            "Tokens",
            format!("{} / {}", session.total_tokens, session.context_tokens),
            Color::Gray,
        ),
        detail_line("Messages", session.message_count.to_string(), Color::Gray),
    ];

    if let Some(model) = &session.model {
        lines.push(detail_line("Model", model.clone(), Color::Gray));
    }
    if let Some(channel) = &session.channel {
        lines.push(detail_line("Channel", channel.clone(), Color::Gray));
    }

    lines
}

fn label_span(label: &str) -> Span<'static> {
    Span::styled(
        format!("{label:<10}"),
        Style::default().fg(Color::DarkGray),
    )
}

fn detail_line(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        label_span(label),
        Span::styled(value, Style::default().fg(color)),
    ])
}

/// Builds an ASCII progress bar for a percentage.
///
/// The percentage is clamped to 0-100; NaN renders as empty.
fn build_progress_bar(percentage: f64, width: usize) -> String {
    let clamped = if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    };
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agm_core::SessionId;
    use chrono::Duration;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn lines_text(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_progress_bar_empty() {
        assert_eq!(build_progress_bar(0.0, 10), "[          ]");
    }

    #[test]
    fn test_progress_bar_half() {
        assert_eq!(build_progress_bar(50.0, 10), "[=====     ]");
    }

    #[test]
    fn test_progress_bar_full() {
        assert_eq!(build_progress_bar(100.0, 10), "[==========]");
    }

    #[test]
    fn test_progress_bar_clamps_overflow() {
        assert_eq!(build_progress_bar(150.0, 10), "[==========]");
    }

    #[test]
    fn test_progress_bar_nan_is_empty() {
        assert_eq!(build_progress_bar(f64::NAN, 10), "[          ]");
    }

    #[test]
    fn test_detail_lines_include_core_fields() {
        let mut session = SessionRecord::new(SessionId::new("agent:main:telegram"));
        session.label = Some("research".to_string());
        session.last_activity = Some(fixed_now() - Duration::minutes(2));
        session.total_tokens = 50_000;
        session.message_count = 17;
        session.model = Some("gpt-x".to_string());
        session.channel = Some("telegram".to_string());

        let text = lines_text(&build_detail_lines(
            &session,
            ActivityState::Working,
            fixed_now(),
        ));
        assert!(text.contains("agent:main:telegram"));
        assert!(text.contains("research"));
        assert!(text.contains("Working"));
        assert!(text.contains("2m ago"));
        assert!(text.contains("50000 / 200000"));
        assert!(text.contains("17"));
        assert!(text.contains("gpt-x"));
        assert!(text.contains("telegram"));
        assert!(text.contains("25%"));
    }

    #[test]
    fn test_detail_lines_omit_missing_optionals() {
        let session = SessionRecord::new(SessionId::new("agent:main"));
        let text = lines_text(&build_detail_lines(
            &session,
            ActivityState::Idle,
            fixed_now(),
        ));
        assert!(!text.contains("Model"));
        assert!(!text.contains("Channel"));
        assert!(text.contains("never"));
    }
}
