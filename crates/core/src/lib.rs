//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the sequence-memory game engine: it grows a sequence by
//! one random signal per round, plays it back with shrinking durations,
//! validates the player's replay pick by pick, and reports the final result.
//! It has **no dependencies** on rendering, audio, or persistence; those are
//! reached through the traits in [`ports`].
//!
//! - **Deterministic**: the clock only moves through [`SequenceGame::tick`],
//!   and seeded generators replay identical games
//! - **Single mutator**: all transitions happen on the caller's thread; timers
//!   carry the session generation and stale ones are dropped
//! - **Non-blocking collaborators**: sink and player failures are logged, never
//!   propagated
//!
//! # Module Structure
//!
//! - [`game_state`]: the state machine ([`SequenceGame`])
//! - [`session`]: per-game state (score, cursor, sequence, generation)
//! - [`playback`]: playback grid (start time and duration of each signal)
//! - [`rng`]: signal generation (seeded LCG, `rand`, scripted)
//! - [`scoring`]: duration curve and [`GameResult`]
//! - [`ports`]: collaborator traits
//! - [`config`]: signal set and timing table
//! - [`snapshot`]: mirrored state and renderer view
//!
//! # Example
//!
//! ```
//! use simon_core::{Phase, SequenceGame, SubmitOutcome};
//!
//! let mut game = SequenceGame::with_seed(12345);
//! game.start(1).unwrap();
//!
//! // Start delay, then one 300ms signal.
//! game.tick(300);
//! assert_eq!(game.phase(), Phase::Playing);
//! game.tick(300);
//! assert_eq!(game.phase(), Phase::AwaitingInput);
//!
//! let expected = game.sequence()[0];
//! assert_eq!(
//!     game.submit(expected).unwrap(),
//!     SubmitOutcome::RoundComplete { score: 1 }
//! );
//! ```

pub mod config;
pub mod error;
pub mod game_state;
pub mod playback;
pub mod ports;
pub mod recorder;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use simon_types as types;

// Re-export commonly used types for convenience
pub use config::{GameConfig, SignalSet, SignalSpec, TimingConfig};
pub use error::{CollaboratorError, ConfigError, EngineError};
pub use game_state::{SequenceGame, SubmitOutcome};
pub use playback::{PlaybackEvent, PlaybackPlan, PlaybackScheduler};
pub use ports::{
    Collaborators, CueCompletion, CuePlayer, CueToken, GameStateSink, ScoreSink, Silent,
};
pub use recorder::{Call, Recorder};
pub use rng::{ScriptedSignals, SequenceGenerator, SignalSource, SimpleRng, ThreadRngSource};
pub use scoring::{round_duration_ms, tone_duration_ms, GameResult};
pub use session::{GameSession, Verdict};
pub use snapshot::{EngineView, GameSnapshot};
pub use types::{Cue, Phase, Signal, SignalIndex};
