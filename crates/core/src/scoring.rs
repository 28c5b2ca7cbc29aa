//! Scoring module - signal duration curve and final results
//!
//! The game speeds up as the score grows:
//! `duration = max(min_tone_ms, max_tone_ms - score * tone_step_ms)`.
//! With the default table (300/100/10) round `r` plays at
//! `max(100, 300 - 10 * (r - 1))`, reaching the floor in round 21.

use serde::{Deserialize, Serialize};

use crate::config::TimingConfig;

/// Signal duration for the given score.
pub fn tone_duration_ms(score: u32, timing: &TimingConfig) -> u32 {
    timing
        .max_tone_ms
        .saturating_sub(score.saturating_mul(timing.tone_step_ms))
        .max(timing.min_tone_ms)
}

/// Signal duration for a 1-based round number.
pub fn round_duration_ms(round: u32, timing: &TimingConfig) -> u32 {
    tone_duration_ms(round.saturating_sub(1), timing)
}

/// Immutable record handed to the score sink when a game ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub score: u32,
    /// Label of the color picked to start the game.
    pub color: String,
    pub playing_time_seconds: f64,
}

impl GameResult {
    pub fn new(score: u32, color: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            score,
            color: color.into(),
            playing_time_seconds: elapsed_ms as f64 / 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_shrinks_per_point() {
        let timing = TimingConfig::default();
        assert_eq!(tone_duration_ms(0, &timing), 300);
        assert_eq!(tone_duration_ms(5, &timing), 250);
        assert_eq!(tone_duration_ms(20, &timing), 100);
        assert_eq!(tone_duration_ms(40, &timing), 100);
    }

    #[test]
    fn test_round_duration_floors_at_round_21() {
        let timing = TimingConfig::default();
        assert_eq!(round_duration_ms(1, &timing), 300);
        assert_eq!(round_duration_ms(2, &timing), 290);
        assert_eq!(round_duration_ms(20, &timing), 110);
        assert_eq!(round_duration_ms(21, &timing), 100);
        assert_eq!(round_duration_ms(22, &timing), 100);
    }

    #[test]
    fn test_custom_table() {
        let timing = TimingConfig {
            max_tone_ms: 500,
            min_tone_ms: 250,
            tone_step_ms: 100,
            ..TimingConfig::default()
        };
        assert_eq!(tone_duration_ms(1, &timing), 400);
        assert_eq!(tone_duration_ms(3, &timing), 250);
    }

    #[test]
    fn test_result_json_shape() {
        let result = GameResult::new(1, "red", 2500);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["score"], 1);
        assert_eq!(json["color"], "red");
        assert_eq!(json["playingTimeSeconds"], 2.5);
    }
}
