//! Adapter module - runs the engine under tokio and connects its collaborators
//!
//! The core engine is synchronous and clock-driven. This crate supplies the
//! runtime around it:
//!
//! 1. **Engine task**: one tokio task owns the [`SequenceGame`](core::SequenceGame)
//!    and is its only mutator
//! 2. **Ticking**: a fixed-rate `tokio::time::interval` advances the engine clock
//!    by the measured elapsed time
//! 3. **Commands**: `Start`, `Submit`, `Abort`, and cue completions arrive over an
//!    mpsc channel and are applied in order
//! 4. **Observation**: the renderer view is published on a `watch` channel
//!    whenever it changes
//!
//! # Collaborators
//!
//! - [`TimedCuePlayer`]: logs tones, times cues on spawned tasks and reports
//!   completion back to the engine task
//! - [`JsonLinesScoreSink`]: one JSON object per finished game
//! - [`TracingScoreSink`], [`TracingStateSink`]: structured log events
//! - [`WatchStateSink`]: latest `GameSnapshot` for mirroring
//!
//! # Environment Variables
//!
//! - `SIMON_TICK_MS`: engine tick interval (default: 16)
//! - `SIMON_MAX_PENDING`: command channel capacity (default: 64)
//!
//! # Example
//!
//! ```no_run
//! use simon_adapter::{EngineChannel, EngineCommand, RuntimeConfig};
//! use simon_adapter::core::SequenceGame;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let channel = EngineChannel::new(RuntimeConfig::default());
//! let handle = channel.spawn(SequenceGame::with_seed(7));
//! handle.send(EngineCommand::Start(0)).await?;
//! let view = handle.view();
//! println!("phase: {}", view.phase.as_str());
//! handle.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod bot;
pub mod cues;
pub mod runtime;
pub mod sinks;

pub use simon_core as core;
pub use simon_types as types;

pub use bot::AutoPlayer;
pub use cues::{CueLengths, TimedCuePlayer, GAME_OVER_CUE_MS, LEVEL_UP_CUE_MS};
pub use runtime::{spawn_engine, EngineChannel, EngineCommand, EngineHandle, RuntimeConfig};
pub use sinks::{JsonLinesScoreSink, TracingScoreSink, TracingStateSink, WatchStateSink};
