//! Key handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Logical action bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Cursor
    MoveUp,
    MoveDown,
    JumpToTop,
    JumpToBottom,
    PageUp,
    PageDown,

    // Folder navigation
    DrillDown,
    NavigateBack,

    /// Toggle mark on the highlighted row.
    ToggleMark,

    Quit,

    // No action
    None,
}

impl KeyAction {
    /// Convert a key event to an action.
    pub fn from_key_event(event: KeyEvent) -> Self {
        match (event.code, event.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
            (KeyCode::Esc, _) => KeyAction::Quit,

            // Navigation - vim style
            (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::MoveDown,
            (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::MoveUp,
            (KeyCode::Char('h'), KeyModifiers::NONE) => KeyAction::NavigateBack,
            (KeyCode::Char('l'), KeyModifiers::NONE) => KeyAction::DrillDown,

            // Navigation - arrow keys
            (KeyCode::Down, _) => KeyAction::MoveDown,
            (KeyCode::Up, _) => KeyAction::MoveUp,
            (KeyCode::Left, _) => KeyAction::NavigateBack,
            (KeyCode::Right, _) => KeyAction::DrillDown,

            // Jump
            (KeyCode::Char('g'), KeyModifiers::NONE) => KeyAction::JumpToTop,
            (KeyCode::Char('G'), _) => KeyAction::JumpToBottom,
            (KeyCode::Home, _) => KeyAction::JumpToTop,
            (KeyCode::End, _) => KeyAction::JumpToBottom,

            // Page navigation
            (KeyCode::PageUp, _) => KeyAction::PageUp,
            (KeyCode::PageDown, _) => KeyAction::PageDown,
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => KeyAction::PageUp,
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => KeyAction::PageDown,

            (KeyCode::Char(' '), KeyModifiers::NONE) => KeyAction::ToggleMark,

            (KeyCode::Enter, _) => KeyAction::DrillDown,
            (KeyCode::Backspace, _) => KeyAction::NavigateBack,

            _ => KeyAction::None,
        }
    }
}

/// Key binding shown in the footer.
pub struct KeyBinding {
    pub keys: &'static str,
    pub description: &'static str,
}

/// Bindings listed in the footer, most useful first.
pub fn footer_hints() -> [KeyBinding; 5] {
    [
        KeyBinding { keys: "j/k", description: "move" },
        KeyBinding { keys: "Enter/l", description: "open" },
        KeyBinding { keys: "Bksp/h", description: "back" },
        KeyBinding { keys: "Space", description: "mark" },
        KeyBinding { keys: "q", description: "quit" },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Esc)), KeyAction::Quit);
        assert_eq!(KeyAction::from_key_event(ctrl('c')), KeyAction::Quit);
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Char('j'))), KeyAction::MoveDown);
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Up)), KeyAction::MoveUp);
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Enter)), KeyAction::DrillDown);
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Right)), KeyAction::DrillDown);
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Backspace)), KeyAction::NavigateBack);
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Char('h'))), KeyAction::NavigateBack);
        assert_eq!(
            KeyAction::from_key_event(KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            KeyAction::JumpToBottom
        );
        assert_eq!(KeyAction::from_key_event(ctrl('d')), KeyAction::PageDown);
    }

    #[test]
    fn test_mark_and_unbound_keys() {
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Char(' '))), KeyAction::ToggleMark);
        assert_eq!(KeyAction::from_key_event(key(KeyCode::Char('x'))), KeyAction::None);
        assert_eq!(KeyAction::from_key_event(ctrl('j')), KeyAction::None);
    }
}
