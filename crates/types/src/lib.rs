//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine logic, terminal rendering, runtime adapter).
//!
//! # Classic Palette
//!
//! The default game uses four pads. Index order is part of the game's identity
//! (it is what `submit` receives), not the on-screen order:
//!
//! | Index | Signal | Tone |
//! |-------|--------|------|
//! | 0 | green  | 192 Hz (G3) |
//! | 1 | red    | 262 Hz (C4) |
//! | 2 | yellow | 330 Hz (E4) |
//! | 3 | blue   | 392 Hz (G4) |
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `MAX_TONE_MS` | 300 | Signal duration in the first round |
//! | `MIN_TONE_MS` | 100 | Floor for the signal duration |
//! | `TONE_STEP_MS` | 10 | Duration lost per point of score |
//! | `INTER_SIGNAL_GAP_MS` | 50 | Dark gap between two played-back signals |
//! | `START_DELAY_MS` | 300 | Delay between the first pick and the first round |
//! | `ROUND_SETTLE_MS` | 200 | Delay after the level-up cue before the next round |
//!
//! # Examples
//!
//! ```
//! use simon_types::{Phase, Signal, tone_duration_ms};
//!
//! let red = Signal::from_str("RED").unwrap();
//! assert_eq!(red.index(), 1);
//! assert_eq!(red.tone_hz(), 262);
//!
//! assert_eq!(tone_duration_ms(0), 300);
//! assert_eq!(tone_duration_ms(25), 100);
//!
//! assert!(Phase::AwaitingInput.accepts_input());
//! ```

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Signal duration for a score of zero.
pub const MAX_TONE_MS: u32 = 300;

/// Shortest signal duration, reached at a score of 20.
pub const MIN_TONE_MS: u32 = 100;

/// Duration removed per point of score.
pub const TONE_STEP_MS: u32 = 10;

/// Gap after a highlight ends before the next signal of the playback starts.
pub const INTER_SIGNAL_GAP_MS: u32 = 50;

/// Delay between the starting pick and the first appended signal.
pub const START_DELAY_MS: u32 = 300;

/// Delay between the end of the level-up cue and the next appended signal.
pub const ROUND_SETTLE_MS: u32 = 200;

/// Number of signals in the classic palette.
pub const CLASSIC_SIGNAL_COUNT: usize = 4;

/// Position of a signal in the configured signal set.
pub type SignalIndex = usize;

/// Signal duration with the default timing: `max(MIN, MAX - score * STEP)`.
pub fn tone_duration_ms(score: u32) -> u32 {
    MAX_TONE_MS
        .saturating_sub(score.saturating_mul(TONE_STEP_MS))
        .max(MIN_TONE_MS)
}

/// The four pads of the classic palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Green,
    Red,
    Yellow,
    Blue,
}

impl Signal {
    /// All signals in index order
    pub const ALL: [Signal; CLASSIC_SIGNAL_COUNT] =
        [Signal::Green, Signal::Red, Signal::Yellow, Signal::Blue];

    pub fn index(&self) -> SignalIndex {
        match self {
            Signal::Green => 0,
            Signal::Red => 1,
            Signal::Yellow => 2,
            Signal::Blue => 3,
        }
    }

    pub fn from_index(index: SignalIndex) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Tone frequency in Hz
    pub fn tone_hz(&self) -> u32 {
        match self {
            Signal::Green => 192,  // G3
            Signal::Red => 262,    // C4
            Signal::Yellow => 330, // E4
            Signal::Blue => 392,   // G4
        }
    }

    /// Parse signal from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "green" | "g" => Some(Signal::Green),
            "red" | "r" => Some(Signal::Red),
            "yellow" | "y" => Some(Signal::Yellow),
            "blue" | "b" => Some(Signal::Blue),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Green => "green",
            Signal::Red => "red",
            Signal::Yellow => "yellow",
            Signal::Blue => "blue",
        }
    }
}

/// Engine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// No game is running.
    #[default]
    Idle,
    /// Waiting for the start or settle delay before the next signal is appended.
    Generating,
    /// The sequence is being played back.
    Playing,
    /// Waiting for the player to repeat the sequence.
    AwaitingInput,
    /// The full sequence was repeated; the level-up cue is playing.
    RoundComplete,
    /// A wrong pick ended the game; the game-over cue is playing.
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Generating => "generating",
            Phase::Playing => "playing",
            Phase::AwaitingInput => "awaitingInput",
            Phase::RoundComplete => "roundComplete",
            Phase::GameOver => "gameOver",
        }
    }

    pub fn accepts_input(&self) -> bool {
        matches!(self, Phase::AwaitingInput)
    }

    /// Whether a session is live in this phase.
    pub fn is_active(&self) -> bool {
        !matches!(self, Phase::Idle)
    }
}

/// Sound cues the engine waits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    LevelUp,
    GameOver,
}

impl Cue {
    /// Resource id handed to the sound player.
    pub fn resource(&self) -> &'static str {
        match self {
            Cue::LevelUp => "assets/sound/levelup.mp3",
            Cue::GameOver => "assets/sound/gameover.mp3",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::LevelUp => "levelUp",
            Cue::GameOver => "gameOver",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_index_roundtrip() {
        for (i, signal) in Signal::ALL.iter().enumerate() {
            assert_eq!(signal.index(), i);
            assert_eq!(Signal::from_index(i), Some(*signal));
        }
        assert_eq!(Signal::from_index(4), None);
    }

    #[test]
    fn test_signal_parse() {
        assert_eq!(Signal::from_str("Yellow"), Some(Signal::Yellow));
        assert_eq!(Signal::from_str("b"), Some(Signal::Blue));
        assert_eq!(Signal::from_str("purple"), None);
    }

    #[test]
    fn test_tone_duration_floor() {
        assert_eq!(tone_duration_ms(0), 300);
        assert_eq!(tone_duration_ms(1), 290);
        assert_eq!(tone_duration_ms(19), 110);
        assert_eq!(tone_duration_ms(20), 100);
        assert_eq!(tone_duration_ms(u32::MAX), 100);
    }

    #[test]
    fn test_phase_flags() {
        assert!(!Phase::Idle.is_active());
        assert!(Phase::GameOver.is_active());
        assert!(!Phase::Playing.accepts_input());
        assert!(Phase::AwaitingInput.accepts_input());
    }
}
