//! Cue player for the tokio runtime.
//!
//! Tones are fire-and-forget and only logged. Cues the engine waits on are
//! timed: a spawned task sleeps for the cue's length and then reports the
//! completion back through the engine's command channel.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::core::{CollaboratorError, CueCompletion, CuePlayer, CueToken};
use crate::runtime::EngineCommand;
use crate::types::Cue;

/// Length of the level-up cue in milliseconds.
pub const LEVEL_UP_CUE_MS: u32 = 450;

/// Length of the game-over cue in milliseconds.
pub const GAME_OVER_CUE_MS: u32 = 900;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueLengths {
    pub level_up_ms: u32,
    pub game_over_ms: u32,
}

impl CueLengths {
    pub fn of(&self, cue: Cue) -> u32 {
        match cue {
            Cue::LevelUp => self.level_up_ms,
            Cue::GameOver => self.game_over_ms,
        }
    }
}

impl Default for CueLengths {
    fn default() -> Self {
        Self {
            level_up_ms: LEVEL_UP_CUE_MS,
            game_over_ms: GAME_OVER_CUE_MS,
        }
    }
}

pub struct TimedCuePlayer {
    cmd_tx: mpsc::Sender<EngineCommand>,
    lengths: CueLengths,
}

impl TimedCuePlayer {
    pub fn new(cmd_tx: mpsc::Sender<EngineCommand>) -> Self {
        Self::with_lengths(cmd_tx, CueLengths::default())
    }

    pub fn with_lengths(cmd_tx: mpsc::Sender<EngineCommand>, lengths: CueLengths) -> Self {
        Self { cmd_tx, lengths }
    }
}

impl CuePlayer for TimedCuePlayer {
    fn play_tone(&mut self, tone_hz: u32, duration_ms: u32) {
        trace!(tone_hz, duration_ms, "tone");
    }

    fn play_sound(&mut self, cue: Cue, token: CueToken) -> Result<CueCompletion, CollaboratorError> {
        let length = self.lengths.of(cue);
        debug!(resource = cue.resource(), length_ms = length, "cue");

        // Outside a runtime the engine times the cue on its own clock.
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return Ok(CueCompletion::AfterMs(length));
        };

        let cmd_tx = self.cmd_tx.clone();
        runtime.spawn(async move {
            tokio::time::sleep(Duration::from_millis(length as u64)).await;
            // A closed channel means the engine is gone; nothing left to finish.
            let _ = cmd_tx.send(EngineCommand::CueFinished(token)).await;
        });
        Ok(CueCompletion::Pending)
    }
}
