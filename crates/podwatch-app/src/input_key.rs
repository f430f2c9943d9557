//! Abstract input key event, independent of terminal library.
//!
//! The TUI converts crossterm key events into `InputKey` at its boundary so
//! podwatch-app can be driven (and tested) without a terminal.

/// Abstract input key event, independent of terminal library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKey {
    /// Regular character key
    Char(char),
    /// Character with Ctrl modifier (Ctrl+c)
    CharCtrl(char),

    /// Up arrow key
    Up,
    /// Down arrow key
    Down,
    /// Home key
    Home,
    /// End key
    End,

    /// Enter/Return key
    Enter,
    /// Escape key
    Esc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_key_equality() {
        assert_eq!(InputKey::Char('q'), InputKey::Char('q'));
        assert_ne!(InputKey::Char('q'), InputKey::Char('s'));
        assert_ne!(InputKey::CharCtrl('c'), InputKey::Char('c'));
    }
}
