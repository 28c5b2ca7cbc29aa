//! Key mapping from terminal events to pad inputs.

use crate::types::{Signal, SignalIndex};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press means to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadInput {
    Pick(SignalIndex),
    Abort,
}

/// Map keyboard input to pad inputs.
///
/// Digits `1`..=`9` pick by position, so signal sets larger than the classic
/// palette stay playable; letters pick classic pads by their initial.
pub fn handle_key_event(key: KeyEvent) -> Option<PadInput> {
    match key.code {
        KeyCode::Char(c @ '1'..='9') => Some(PadInput::Pick(c as usize - '1' as usize)),

        KeyCode::Char(c) if c.is_ascii_alphabetic() => match c.to_ascii_lowercase() {
            'x' => Some(PadInput::Abort),
            other => Signal::from_str(&other.to_string())
                .map(|signal| PadInput::Pick(signal.index())),
        },

        KeyCode::Esc => Some(PadInput::Abort),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_digit_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('1'))),
            Some(PadInput::Pick(0))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('4'))),
            Some(PadInput::Pick(3))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('9'))),
            Some(PadInput::Pick(8))
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('0'))), None);
    }

    #[test]
    fn test_letter_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('g'))),
            Some(PadInput::Pick(0))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('R'))),
            Some(PadInput::Pick(1))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('y'))),
            Some(PadInput::Pick(2))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('B'))),
            Some(PadInput::Pick(3))
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('k'))), None);
    }

    #[test]
    fn test_abort_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('x'))),
            Some(PadInput::Abort)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Esc)),
            Some(PadInput::Abort)
        );
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
