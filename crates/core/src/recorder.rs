//! In-memory collaborator that records every call.
//!
//! Used by tests and headless runs to observe what the engine asked its
//! collaborators to do. Clones share the same log.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::CollaboratorError;
use crate::ports::{Collaborators, CuePlayer, CueCompletion, CueToken, GameStateSink, ScoreSink};
use crate::scoring::GameResult;
use crate::snapshot::GameSnapshot;
use crate::types::Cue;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Tone { tone_hz: u32, duration_ms: u32 },
    Sound(Cue),
    Score(GameResult),
    State(GameSnapshot),
}

#[derive(Debug, Clone)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    completion: CueCompletion,
    failing: bool,
}

impl Recorder {
    /// Cues finish immediately, sinks succeed.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            completion: CueCompletion::Finished,
            failing: false,
        }
    }

    pub fn with_cue_completion(mut self, completion: CueCompletion) -> Self {
        self.completion = completion;
        self
    }

    /// Every collaborator call still gets recorded, then reports an error.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Bundle clones of this recorder as all three collaborators.
    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(
            Box::new(self.clone()),
            Box::new(self.clone()),
            Box::new(self.clone()),
        )
    }

    fn log(&self) -> MutexGuard<'_, Vec<Call>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, call: Call) {
        self.log().push(call);
    }

    fn outcome(&self, collaborator: &'static str) -> Result<(), CollaboratorError> {
        if self.failing {
            Err(CollaboratorError::new(collaborator, "recorder configured to fail"))
        } else {
            Ok(())
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log().clone()
    }

    pub fn clear(&self) {
        self.log().clear();
    }

    pub fn tones(&self) -> Vec<(u32, u32)> {
        self.log()
            .iter()
            .filter_map(|call| match call {
                Call::Tone {
                    tone_hz,
                    duration_ms,
                } => Some((*tone_hz, *duration_ms)),
                _ => None,
            })
            .collect()
    }

    pub fn sounds(&self) -> Vec<Cue> {
        self.log()
            .iter()
            .filter_map(|call| match call {
                Call::Sound(cue) => Some(*cue),
                _ => None,
            })
            .collect()
    }

    pub fn scores(&self) -> Vec<GameResult> {
        self.log()
            .iter()
            .filter_map(|call| match call {
                Call::Score(result) => Some(result.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn states(&self) -> Vec<GameSnapshot> {
        self.log()
            .iter()
            .filter_map(|call| match call {
                Call::State(snapshot) => Some(snapshot.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl CuePlayer for Recorder {
    fn play_tone(&mut self, tone_hz: u32, duration_ms: u32) {
        self.push(Call::Tone {
            tone_hz,
            duration_ms,
        });
    }

    fn play_sound(&mut self, cue: Cue, _token: CueToken) -> Result<CueCompletion, CollaboratorError> {
        self.push(Call::Sound(cue));
        self.outcome("cue player").map(|_| self.completion)
    }
}

impl ScoreSink for Recorder {
    fn publish_score(&mut self, result: &GameResult) -> Result<(), CollaboratorError> {
        self.push(Call::Score(result.clone()));
        self.outcome("score sink")
    }
}

impl GameStateSink for Recorder {
    fn update_game(&mut self, snapshot: &GameSnapshot) -> Result<(), CollaboratorError> {
        self.push(Call::State(snapshot.clone()));
        self.outcome("state sink")
    }
}
