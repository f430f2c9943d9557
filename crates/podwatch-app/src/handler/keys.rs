//! Key event handlers

use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::AppState;

/// Convert key events to messages
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Nothing but another quit request matters once we are on the way out
    if state.quitting() {
        return match key {
            InputKey::CharCtrl('c') => Some(Message::Quit),
            _ => None,
        };
    }

    match key {
        // Quit
        InputKey::Char('q') | InputKey::Esc => Some(Message::Quit),
        InputKey::CharCtrl('c') => Some(Message::Quit),

        // Feed control
        InputKey::Char('s') => Some(Message::StopFeed),
        InputKey::Char('w') => Some(Message::StartFeed),

        // Cursor (arrow keys and vim-style)
        InputKey::Up | InputKey::Char('k') => Some(Message::CursorUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::CursorDown),
        InputKey::Home | InputKey::Char('g') => Some(Message::CursorTop),
        InputKey::End | InputKey::Char('G') => Some(Message::CursorBottom),

        _ => None,
    }
}
