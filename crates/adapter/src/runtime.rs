//! Adapter runtime integration.
//!
//! Runs the engine on a single tokio task: the task is the only mutator,
//! ticks the engine clock from a fixed-rate interval, applies commands from
//! an mpsc channel, and publishes the renderer view on a watch channel.

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::core::{CueToken, EngineView, SequenceGame, SubmitOutcome};
use crate::types::{SignalIndex, TICK_MS};

/// Command delivered to the engine task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    Start(SignalIndex),
    Submit(SignalIndex),
    Abort,
    CueFinished(CueToken),
    Shutdown,
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub tick_ms: u32,
    pub max_pending_commands: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            max_pending_commands: 64,
        }
    }
}

impl RuntimeConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let tick_ms = env::var("SIMON_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&ms: &u32| ms > 0)
            .unwrap_or(TICK_MS);

        let max_pending_commands = env::var("SIMON_MAX_PENDING")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(64);

        Self {
            tick_ms,
            max_pending_commands,
        }
    }
}

/// Command channel, created before the engine so collaborators can hold a sender.
pub struct EngineChannel {
    cmd_tx: mpsc::Sender<EngineCommand>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    config: RuntimeConfig,
}

impl EngineChannel {
    pub fn new(config: RuntimeConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(config.max_pending_commands.max(1));
        Self {
            cmd_tx,
            cmd_rx,
            config,
        }
    }

    pub fn sender(&self) -> mpsc::Sender<EngineCommand> {
        self.cmd_tx.clone()
    }

    /// Move the engine onto its own task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(self, game: SequenceGame) -> EngineHandle {
        let (view_tx, view_rx) = watch::channel(game.view());
        let task = tokio::spawn(run_engine(game, self.cmd_rx, view_tx, self.config.tick_ms));
        EngineHandle {
            cmd_tx: self.cmd_tx,
            view_rx,
            task,
        }
    }
}

/// Spawn `game` on a fresh channel; for engines whose collaborators need no sender.
pub fn spawn_engine(game: SequenceGame, config: RuntimeConfig) -> EngineHandle {
    EngineChannel::new(config).spawn(game)
}

/// Running engine instance.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    view_rx: watch::Receiver<EngineView>,
    task: JoinHandle<SequenceGame>,
}

impl EngineHandle {
    pub fn sender(&self) -> mpsc::Sender<EngineCommand> {
        self.cmd_tx.clone()
    }

    pub async fn send(&self, command: EngineCommand) -> Result<()> {
        self.cmd_tx
            .send(command)
            .await
            .map_err(|_| anyhow!("engine task stopped"))
    }

    /// Non-blocking send for callers outside the runtime (terminal loop).
    pub fn try_send(&self, command: EngineCommand) -> Result<()> {
        self.cmd_tx
            .try_send(command)
            .map_err(|e| anyhow!("engine command rejected: {}", e))
    }

    /// Latest published view.
    pub fn view(&self) -> EngineView {
        self.view_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<EngineView> {
        self.view_rx.clone()
    }

    /// Stop the engine task and hand the engine back.
    pub async fn shutdown(self) -> Result<SequenceGame> {
        // The task may already be gone; the join below reports that.
        let _ = self.cmd_tx.send(EngineCommand::Shutdown).await;
        self.task
            .await
            .map_err(|e| anyhow!("engine task failed: {}", e))
    }
}

async fn run_engine(
    mut game: SequenceGame,
    mut cmd_rx: mpsc::Receiver<EngineCommand>,
    view_tx: watch::Sender<EngineView>,
    tick_ms: u32,
) -> SequenceGame {
    let mut interval = tokio::time::interval(Duration::from_millis(tick_ms.max(1) as u64));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut clock = EngineClock::new();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                clock.catch_up(&mut game);
            }
            command = cmd_rx.recv() => {
                let Some(command) = command else {
                    break;
                };
                if command == EngineCommand::Shutdown {
                    break;
                }
                // Commands land at the current instant, not the last tick.
                clock.catch_up(&mut game);
                apply_command(&mut game, command);
            }
        }

        let view = game.view();
        view_tx.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }

    debug!("engine task stopped");
    game
}

/// Converts wall time into whole-millisecond engine ticks without drift.
struct EngineClock {
    last: Instant,
}

impl EngineClock {
    fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    fn catch_up(&mut self, game: &mut SequenceGame) {
        let elapsed_ms = self.last.elapsed().as_millis().min(u32::MAX as u128) as u32;
        if elapsed_ms == 0 {
            return;
        }
        // Keep the sub-millisecond remainder for the next tick.
        self.last += Duration::from_millis(elapsed_ms as u64);
        game.tick(elapsed_ms);
    }
}

fn apply_command(game: &mut SequenceGame, command: EngineCommand) {
    match command {
        EngineCommand::Start(color) => match game.start(color) {
            Ok(true) => {}
            Ok(false) => debug!(color, "start ignored, game already running"),
            Err(e) => warn!(error = %e, "start rejected"),
        },
        EngineCommand::Submit(pick) => match game.submit(pick) {
            Ok(SubmitOutcome::Ignored) => debug!(pick, "submit ignored"),
            Ok(outcome) => debug!(?outcome, "submit"),
            Err(e) => warn!(error = %e, "submit rejected"),
        },
        EngineCommand::Abort => {
            game.abort();
        }
        EngineCommand::CueFinished(token) => {
            game.cue_finished(token);
        }
        EngineCommand::Shutdown => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Phase, SequenceGame};

    #[test]
    fn test_runtime_config_default() {
        let config = RuntimeConfig::default();
        assert_eq!(config.tick_ms, 16);
        assert_eq!(config.max_pending_commands, 64);
    }

    #[test]
    fn test_apply_command_rejects_invalid_pick() {
        let mut game = SequenceGame::with_seed(1);
        apply_command(&mut game, EngineCommand::Start(9));
        assert_eq!(game.phase(), Phase::Idle);

        apply_command(&mut game, EngineCommand::Start(0));
        assert_eq!(game.phase(), Phase::Generating);

        apply_command(&mut game, EngineCommand::Abort);
        assert_eq!(game.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_engine_task_ticks_clock() {
        let channel = EngineChannel::new(RuntimeConfig::default());
        let handle = channel.spawn(SequenceGame::with_seed(3));
        let mut views = handle.subscribe();

        handle.send(EngineCommand::Start(1)).await.unwrap();
        loop {
            views.changed().await.unwrap();
            if views.borrow_and_update().phase == Phase::Playing {
                break;
            }
        }

        let game = handle.shutdown().await.unwrap();
        assert_eq!(game.phase(), Phase::Playing);
        assert!(game.now_ms() >= 300);
        assert_eq!(game.sequence().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_returns_engine() {
        let handle = spawn_engine(SequenceGame::with_seed(3), RuntimeConfig::default());
        tokio::time::sleep(Duration::from_millis(100)).await;

        let game = handle.shutdown().await.unwrap();
        assert_eq!(game.phase(), Phase::Idle);
        assert!(game.now_ms() >= 96);
    }
}
