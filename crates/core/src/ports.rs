//! Collaborator ports.
//!
//! The engine only invokes these; sound decoding, persistence, and mirroring
//! live behind them. Every call is made from the engine's single thread of
//! control. Failures are reported back as [`CollaboratorError`] and logged by
//! the engine, never propagated.

use crate::error::CollaboratorError;
use crate::scoring::GameResult;
use crate::snapshot::GameSnapshot;
use crate::types::Cue;

/// Identifies one awaited cue of one session.
///
/// Players returning [`CueCompletion::Pending`] hand this back through
/// `SequenceGame::cue_finished`. Tokens from an earlier session or an
/// earlier cue are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CueToken {
    pub generation: u64,
    pub cue: Cue,
    /// Sequential id within the session.
    pub id: u32,
}

/// How a cue player reports that a cue has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueCompletion {
    /// Already done (or nothing to play).
    Finished,
    /// Done after a known length; the engine schedules the completion itself.
    AfterMs(u32),
    /// The player will call `cue_finished(token)` later.
    Pending,
}

/// Tone and cue playback.
pub trait CuePlayer: Send {
    /// Fire and forget.
    fn play_tone(&mut self, tone_hz: u32, duration_ms: u32);

    /// Start a cue the engine waits on.
    fn play_sound(&mut self, cue: Cue, token: CueToken) -> Result<CueCompletion, CollaboratorError>;
}

/// Receives the final result of every finished game.
pub trait ScoreSink: Send {
    fn publish_score(&mut self, result: &GameResult) -> Result<(), CollaboratorError>;
}

/// Receives a snapshot after every state-affecting operation.
pub trait GameStateSink: Send {
    fn update_game(&mut self, snapshot: &GameSnapshot) -> Result<(), CollaboratorError>;
}

/// Does nothing; cues finish immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl CuePlayer for Silent {
    fn play_tone(&mut self, _tone_hz: u32, _duration_ms: u32) {}

    fn play_sound(&mut self, _cue: Cue, _token: CueToken) -> Result<CueCompletion, CollaboratorError> {
        Ok(CueCompletion::Finished)
    }
}

impl ScoreSink for Silent {
    fn publish_score(&mut self, _result: &GameResult) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

impl GameStateSink for Silent {
    fn update_game(&mut self, _snapshot: &GameSnapshot) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// The engine's external collaborators.
pub struct Collaborators {
    pub cues: Box<dyn CuePlayer>,
    pub scores: Box<dyn ScoreSink>,
    pub state: Box<dyn GameStateSink>,
}

impl Collaborators {
    pub fn new(
        cues: Box<dyn CuePlayer>,
        scores: Box<dyn ScoreSink>,
        state: Box<dyn GameStateSink>,
    ) -> Self {
        Self {
            cues,
            scores,
            state,
        }
    }

    pub fn silent() -> Self {
        Self::new(Box::new(Silent), Box::new(Silent), Box::new(Silent))
    }

    pub fn with_cues(mut self, cues: Box<dyn CuePlayer>) -> Self {
        self.cues = cues;
        self
    }

    pub fn with_scores(mut self, scores: Box<dyn ScoreSink>) -> Self {
        self.scores = scores;
        self
    }

    pub fn with_state(mut self, state: Box<dyn GameStateSink>) -> Self {
        self.state = state;
        self
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
