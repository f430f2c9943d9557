//! Terminal event polling

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use podwatch_app::message::Message;
use podwatch_app::InputKey;
use podwatch_core::prelude::*;

/// How long one poll waits before re-checking the shutdown flag
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Convert crossterm KeyEvent to InputKey
pub fn key_event_to_input(key: crossterm::event::KeyEvent) -> Option<InputKey> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputKey::CharCtrl(c))
        }
        KeyCode::Char(c) => Some(InputKey::Char(c)),
        KeyCode::Enter => Some(InputKey::Enter),
        KeyCode::Esc => Some(InputKey::Esc),
        KeyCode::Up => Some(InputKey::Up),
        KeyCode::Down => Some(InputKey::Down),
        KeyCode::Home => Some(InputKey::Home),
        KeyCode::End => Some(InputKey::End),
        _ => None, // Unsupported keys ignored
    }
}

/// Convert a terminal event into a message, if it maps to one
pub fn event_to_message(event: Event) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            key_event_to_input(key).map(Message::Key)
        }
        Event::Resize(width, height) => Some(Message::Resize { width, height }),
        _ => None,
    }
}

/// Poll for terminal events with timeout
pub fn poll() -> Result<Option<Message>> {
    if event::poll(POLL_INTERVAL)? {
        Ok(event_to_message(event::read()?))
    } else {
        Ok(None)
    }
}

/// Spawn the blocking input pump.
///
/// Forwards key presses and resizes into the intake channel until
/// `shutdown_rx` flips or the channel closes. A terminal read error is
/// fatal: the pump asks the loop to quit and returns the error.
pub fn spawn_input_pump(
    tx: mpsc::Sender<Message>,
    shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<Result<()>> {
    tokio::task::spawn_blocking(move || {
        while !*shutdown_rx.borrow() {
            match poll() {
                Ok(Some(msg)) => {
                    if tx.blocking_send(msg).is_err() {
                        debug!("Intake closed, input pump exiting");
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    error!("Terminal input failed: {}", e);
                    let _ = tx.blocking_send(Message::Quit);
                    return Err(Error::terminal(format!("input failed: {}", e)));
                }
            }
        }
        Ok(())
    })
}
