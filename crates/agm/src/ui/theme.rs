//! Shared theme utilities for the AGM TUI.
//!
//! Provides consistent styling across all UI components.

use agm_core::ActivityState;
use ratatui::style::Color;

/// Returns the appropriate color for context usage display.
///
/// Color coding follows a traffic-light pattern:
/// - Green (< 50%): Normal usage, plenty of context remaining
/// - Yellow (50-89%): Elevated usage, may need attention soon
/// - Red (>= 90%): Critical usage, intervention needed
pub fn context_color(percentage: f64) -> Color {
    if percentage >= 90.0 {
        Color::Red
    } else if percentage >= 50.0 {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// Returns the appropriate color for an activity state.
///
/// Color coding:
/// - Green: Working (recent activity)
/// - DarkGray: Idle (quiet, nothing to do)
/// - Yellow: Waiting (long silence, probably blocked on the user)
pub fn activity_color(state: ActivityState) -> Color {
    match state {
        ActivityState::Working => Color::Green,
        ActivityState::Idle => Color::DarkGray,
        ActivityState::Waiting => Color::Yellow,
    }
}

/// Returns the icon for an activity state, respecting blink visibility.
///
/// Only Waiting blinks; it is the one state asking for attention.
pub fn activity_icon(state: ActivityState, blink_visible: bool) -> &'static str {
    if state == ActivityState::Waiting && !blink_visible {
        " "
    } else {
        state.icon()
    }
}

/// Returns the row background color for an activity state.
///
/// Only Waiting gets a background tint to draw attention.
pub fn activity_background(state: ActivityState) -> Option<Color> {
    match state {
        ActivityState::Waiting => Some(Color::Rgb(50, 40, 0)), // Subtle amber tint
        ActivityState::Working | ActivityState::Idle => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_color_thresholds() {
        assert_eq!(context_color(0.0), Color::Green);
        assert_eq!(context_color(49.9), Color::Green);
        assert_eq!(context_color(50.0), Color::Yellow);
        assert_eq!(context_color(89.9), Color::Yellow);
        assert_eq!(context_color(90.0), Color::Red);
        assert_eq!(context_color(120.0), Color::Red);
    }

    #[test]
    fn test_activity_colors() {
        assert_eq!(activity_color(ActivityState::Working), Color::Green);
        assert_eq!(activity_color(ActivityState::Idle), Color::DarkGray);
        assert_eq!(activity_color(ActivityState::Waiting), Color::Yellow);
    }

    #[test]
    fn test_working_icon_never_blinks() {
        assert_eq!(activity_icon(ActivityState::Working, true), ">");
        assert_eq!(activity_icon(ActivityState::Working, false), ">");
    }

    #[test]
    fn test_waiting_icon_blinks() {
        assert_eq!(activity_icon(ActivityState::Waiting, true), "z");
        assert_eq!(activity_icon(ActivityState::Waiting, false), " ");
    }

    #[test]
    fn test_idle_icon_never_blinks() {
        assert_eq!(activity_icon(ActivityState::Idle, true), "-");
        assert_eq!(activity_icon(ActivityState::Idle, false), "-");
    }

    #[test]
    fn test_only_waiting_gets_background() {
        assert!(activity_background(ActivityState::Waiting).is_some());
        assert!(activity_background(ActivityState::Working).is_none());
        assert!(activity_background(ActivityState::Idle).is_none());
    }
}
