//! Headless auto player.
//!
//! Watches the published view like a player watching the pads: during
//! playback it records which pad is lit at each sequence position, then
//! repeats the recording once input opens. Positions come from the view's
//! cursor, so a repeated pad is recorded twice even when the dark gap between
//! the two pulses was never observed. After `rounds` successful rounds it
//! picks a wrong pad on purpose so the game ends and the result gets reported.

use anyhow::{anyhow, Result};
use tracing::{debug, info, warn};

use crate::runtime::{EngineCommand, EngineHandle};
use crate::types::{Phase, SignalIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoPlayer {
    pub rounds: u32,
    pub color: SignalIndex,
}

impl AutoPlayer {
    pub fn new(rounds: u32, color: SignalIndex) -> Self {
        Self { rounds, color }
    }

    /// Play one game; returns the score at the moment of the deliberate miss.
    pub async fn play(&self, handle: &EngineHandle) -> Result<u32> {
        let mut views = handle.subscribe();
        let initial = views.borrow_and_update().clone();
        if initial.active {
            return Err(anyhow!("a game is already running"));
        }
        let signal_count = initial.highlights.len();
        if signal_count < 2 {
            return Err(anyhow!("need at least two signals to miss on purpose"));
        }

        handle.send(EngineCommand::Start(self.color)).await?;

        let mut observed: Vec<Option<SignalIndex>> = Vec::new();
        let mut prev_phase = initial.phase;
        let mut final_score = None;

        loop {
            views
                .changed()
                .await
                .map_err(|_| anyhow!("engine stopped mid-game"))?;
            let view = views.borrow_and_update().clone();

            match view.phase {
                Phase::Playing => {
                    if prev_phase != Phase::Playing {
                        observed.clear();
                    }
                    if let Some(pad) = view.highlights.iter().position(|&lit| lit) {
                        if observed.len() <= view.cursor {
                            observed.resize(view.cursor + 1, None);
                        }
                        observed[view.cursor] = Some(pad);
                    }
                }
                Phase::AwaitingInput if prev_phase == Phase::Playing => {
                    let picks: Vec<SignalIndex> = observed.iter().flatten().copied().collect();
                    if picks.len() != view.round as usize {
                        warn!(
                            round = view.round,
                            seen = picks.len(),
                            "missed part of the playback"
                        );
                    }
                    debug!(round = view.round, observed = picks.len(), "replaying");
                    if view.score >= self.rounds {
                        let wrong = picks
                            .first()
                            .map(|&first| (first + 1) % signal_count)
                            .unwrap_or(0);
                        final_score = Some(view.score);
                        handle.send(EngineCommand::Submit(wrong)).await?;
                    } else {
                        for pick in picks {
                            handle.send(EngineCommand::Submit(pick)).await?;
                        }
                    }
                }
                Phase::Idle => {
                    if let Some(score) = final_score {
                        info!(score, "auto player finished");
                        return Ok(score);
                    }
                    return Err(anyhow!("game ended before the planned miss"));
                }
                _ => {}
            }

            prev_phase = view.phase;
        }
    }
}
