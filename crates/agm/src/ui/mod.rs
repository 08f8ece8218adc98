//! Terminal UI rendering for the AGM dashboard.
//!
//! The layout has three sections: a header with connectivity and stats,
//! a content area split between the session list and the detail panel,
//! and a footer with keybindings and notifications.
//!
//! Rendering is a pure function of the [`App`] state and a single `now`
//! captured at the top of the frame, so every widget agrees on elapsed
//! times within one draw.

mod detail_panel;
mod layout;
mod session_list;
mod status_bar;
mod theme;

use chrono::Utc;
use ratatui::Frame;

use crate::app::App;
use layout::AppLayout;

/// Renders the entire application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let now = Utc::now();
    let layout = AppLayout::new(frame.area());

    status_bar::render_header(frame, layout.header, app, now);
    session_list::render_session_list(frame, layout.list_area, app, now);
    detail_panel::render_detail_panel(frame, layout.detail_area, app, now);
    status_bar::render_footer(frame, layout.footer, app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use agm_core::{SessionId, SessionRecord};
    use chrono::Duration;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = match Terminal::new(backend) {
            Ok(t) => t,
            Err(e) => panic!("terminal init failed: {e}"),
        };
        terminal.draw(|frame| render(frame, app)).expect("draw");
        buffer_text(&terminal)
    }

    #[test]
    fn test_render_connecting_state() {
        let app = App::default();
        let text = draw(&app);
        assert!(text.contains("AGM"));
        assert!(text.contains("Connecting"));
        assert!(text.contains("quit"));
    }

    #[test]
    fn test_render_with_sessions() {
        let mut app = App::default();
        let mut session = SessionRecord::new(SessionId::new("agent:main"));
        session.label = Some("research".to_string());
        session.last_activity = Some(Utc::now() - Duration::minutes(1));
        app.apply_poll(vec![session]);

        let text = draw(&app);
        assert!(text.contains("Connected"));
        assert!(text.contains("research"));
        assert!(text.contains("1 sessions"));
    }

    #[test]
    fn test_render_disconnected_state() {
        let mut app = App::default();
        app.poll_failed("connection refused");

        let text = draw(&app);
        assert!(text.contains("Disconnected"));
        assert!(text.contains("reconnect"));
    }

    #[test]
    fn test_render_shows_notification() {
        let mut app = App::default();
        app.apply_poll(vec![]);
        app.apply_poll(vec![SessionRecord::new(SessionId::new("agent:new"))]);

        let text = draw(&app);
        assert!(text.contains("Session started"));
    }
}
