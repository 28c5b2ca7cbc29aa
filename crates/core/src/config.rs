//! Game configuration: the signal set and the timing table.

use std::env;

use crate::error::ConfigError;
use crate::types::{
    Signal, SignalIndex, INTER_SIGNAL_GAP_MS, MAX_TONE_MS, MIN_TONE_MS, ROUND_SETTLE_MS,
    START_DELAY_MS, TONE_STEP_MS,
};

/// One selectable signal: a label (used as the reported color) and its tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalSpec {
    pub label: String,
    pub tone_hz: u32,
}

impl SignalSpec {
    pub fn new(label: impl Into<String>, tone_hz: u32) -> Self {
        Self {
            label: label.into(),
            tone_hz,
        }
    }
}

impl From<Signal> for SignalSpec {
    fn from(value: Signal) -> Self {
        Self::new(value.as_str(), value.tone_hz())
    }
}

/// Immutable, ordered set of signals fixed at configuration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalSet {
    signals: Vec<SignalSpec>,
}

impl SignalSet {
    pub fn new(signals: Vec<SignalSpec>) -> Self {
        Self { signals }
    }

    /// Green, red, yellow, blue.
    pub fn classic() -> Self {
        Self::new(Signal::ALL.iter().copied().map(SignalSpec::from).collect())
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn get(&self, index: SignalIndex) -> Option<&SignalSpec> {
        self.signals.get(index)
    }

    pub fn contains(&self, index: SignalIndex) -> bool {
        index < self.signals.len()
    }

    pub fn label(&self, index: SignalIndex) -> Option<&str> {
        self.get(index).map(|s| s.label.as_str())
    }

    pub fn tone_hz(&self, index: SignalIndex) -> Option<u32> {
        self.get(index).map(|s| s.tone_hz)
    }

    /// Find a signal by label (case-insensitive)
    pub fn position(&self, label: &str) -> Option<SignalIndex> {
        self.signals
            .iter()
            .position(|s| s.label.eq_ignore_ascii_case(label))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignalSpec> {
        self.signals.iter()
    }
}

impl Default for SignalSet {
    fn default() -> Self {
        Self::classic()
    }
}

/// Timing table (all values in milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    pub max_tone_ms: u32,
    pub min_tone_ms: u32,
    pub tone_step_ms: u32,
    pub inter_signal_gap_ms: u32,
    pub start_delay_ms: u32,
    pub round_settle_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            max_tone_ms: MAX_TONE_MS,
            min_tone_ms: MIN_TONE_MS,
            tone_step_ms: TONE_STEP_MS,
            inter_signal_gap_ms: INTER_SIGNAL_GAP_MS,
            start_delay_ms: START_DELAY_MS,
            round_settle_ms: ROUND_SETTLE_MS,
        }
    }
}

impl TimingConfig {
    /// Override defaults from `SIMON_*` environment variables.
    ///
    /// Missing or unparsable values keep their default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_tone_ms: env_ms("SIMON_MAX_TONE_MS", defaults.max_tone_ms),
            min_tone_ms: env_ms("SIMON_MIN_TONE_MS", defaults.min_tone_ms),
            tone_step_ms: env_ms("SIMON_TONE_STEP_MS", defaults.tone_step_ms),
            inter_signal_gap_ms: env_ms("SIMON_GAP_MS", defaults.inter_signal_gap_ms),
            start_delay_ms: env_ms("SIMON_START_DELAY_MS", defaults.start_delay_ms),
            round_settle_ms: env_ms("SIMON_SETTLE_MS", defaults.round_settle_ms),
        }
    }
}

fn env_ms(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameConfig {
    pub signals: SignalSet,
    pub timing: TimingConfig,
}

impl GameConfig {
    /// Classic signals with timing read from the environment.
    pub fn from_env() -> Self {
        Self {
            signals: SignalSet::classic(),
            timing: TimingConfig::from_env(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signals.is_empty() {
            return Err(ConfigError::NoSignals);
        }
        if self.timing.min_tone_ms == 0 {
            return Err(ConfigError::ZeroTone);
        }
        if self.timing.min_tone_ms > self.timing.max_tone_ms {
            return Err(ConfigError::ToneRange {
                min_ms: self.timing.min_tone_ms,
                max_ms: self.timing.max_tone_ms,
            });
        }
        Ok(())
    }
}
