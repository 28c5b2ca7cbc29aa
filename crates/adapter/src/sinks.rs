//! Score and state sinks.
//!
//! - [`JsonLinesScoreSink`]: one JSON object per finished game, appended to any writer
//! - [`TracingScoreSink`] / [`TracingStateSink`]: structured log events
//! - [`WatchStateSink`]: latest snapshot on a `watch` channel for mirroring

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::core::{CollaboratorError, GameResult, GameSnapshot, GameStateSink, ScoreSink};

/// Writes each result as a JSON line.
pub struct JsonLinesScoreSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesScoreSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, result: &GameResult) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, result)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl JsonLinesScoreSink<File> {
    /// Append to a score file, creating it if needed.
    pub fn append(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open score log {}", path.display()))?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> ScoreSink for JsonLinesScoreSink<W> {
    fn publish_score(&mut self, result: &GameResult) -> Result<(), CollaboratorError> {
        self.write_line(result)
            .map_err(|e| CollaboratorError::new("json score sink", e.to_string()))
    }
}

/// Logs each result at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingScoreSink;

impl ScoreSink for TracingScoreSink {
    fn publish_score(&mut self, result: &GameResult) -> Result<(), CollaboratorError> {
        info!(
            score = result.score,
            color = %result.color,
            playing_time_seconds = result.playing_time_seconds,
            "score published"
        );
        Ok(())
    }
}

/// Logs each snapshot at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStateSink;

impl GameStateSink for TracingStateSink {
    fn update_game(&mut self, snapshot: &GameSnapshot) -> Result<(), CollaboratorError> {
        debug!(
            score = snapshot.score,
            playing = snapshot.playing,
            cursor = snapshot.cursor,
            game_over = snapshot.game_over,
            chosen_color = snapshot.chosen_color.as_deref().unwrap_or(""),
            last_user_signal = snapshot.last_user_signal.as_deref().unwrap_or(""),
            "game state"
        );
        Ok(())
    }
}

/// Publishes the latest snapshot; receivers see only the newest value.
#[derive(Debug)]
pub struct WatchStateSink {
    tx: watch::Sender<GameSnapshot>,
}

impl WatchStateSink {
    pub fn channel() -> (Self, watch::Receiver<GameSnapshot>) {
        let (tx, rx) = watch::channel(GameSnapshot::default());
        (Self { tx }, rx)
    }
}

impl GameStateSink for WatchStateSink {
    fn update_game(&mut self, snapshot: &GameSnapshot) -> Result<(), CollaboratorError> {
        // send_replace keeps working when nobody is subscribed.
        self.tx.send_replace(snapshot.clone());
        Ok(())
    }
}
