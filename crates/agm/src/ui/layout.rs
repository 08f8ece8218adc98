//! Layout helpers for the AGM TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main application layout areas.
///
/// The TUI is divided into three vertical sections:
/// - Header (3 lines): Title, connectivity, and summary stats
/// - Content (fills remaining): Split into list (35%) and detail (65%)
/// - Footer (3 lines): Keybinding help and the latest notification
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    /// Header area for title and connectivity
    pub header: Rect,
    /// Left panel for the session list (35% of content width)
    pub list_area: Rect,
    /// Right panel for session details (65% of content width)
    pub detail_area: Rect,
    /// Footer area for keybindings and notifications
    pub footer: Rect,
}

impl AppLayout {
    /// Creates a new AppLayout by splitting the given area.
    pub fn new(area: Rect) -> Self {
        let [header, content, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Content (minimum 10 lines)
                Constraint::Length(3), // Footer
            ])
            .areas(area);

        let [list_area, detail_area] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(35), // List panel
                Constraint::Percentage(65), // Detail panel
            ])
            .areas(content);

        Self {
            header,
            list_area,
            detail_area,
            footer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_layout_creation() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = AppLayout::new(area);

        // Header should be 3 lines at top
        assert_eq!(layout.header.y, 0);
        assert_eq!(layout.header.height, 3);

        // Footer should be 3 lines at bottom
        assert_eq!(layout.footer.height, 3);
        assert_eq!(layout.footer.y + layout.footer.height, 24);

        // List area should be 35% of content width (80 * 0.35 = 28)
        assert_eq!(layout.list_area.width, 28);
        assert_eq!(layout.list_area.y, 3); // Starts after header

        // Detail area takes the rest
        assert_eq!(layout.detail_area.width, 52);
    }
}
