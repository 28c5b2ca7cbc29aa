//! Per-game state.
//!
//! A [`GameSession`] exists from `start` until the game-over reset. The engine
//! owns at most one; dropping it is the reset.

use crate::types::SignalIndex;

/// Result of checking one pick against the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Correct pick, more to go. Holds the advanced cursor.
    Advance(usize),
    /// Correct pick completing the sequence.
    Complete,
    Mismatch {
        expected: SignalIndex,
        got: SignalIndex,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    /// Monotonic id; timers and cue tokens carry it to detect staleness.
    generation: u64,
    score: u32,
    chosen_color: SignalIndex,
    last_user_signal: SignalIndex,
    start_ms: u64,
    /// Position during playback or validation, always in `0..=sequence.len()`.
    cursor: usize,
    sequence: Vec<SignalIndex>,
}

impl GameSession {
    pub fn new(generation: u64, chosen_color: SignalIndex, start_ms: u64) -> Self {
        Self {
            generation,
            score: 0,
            chosen_color,
            last_user_signal: chosen_color,
            start_ms,
            cursor: 0,
            sequence: Vec::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn chosen_color(&self) -> SignalIndex {
        self.chosen_color
    }

    pub fn last_user_signal(&self) -> SignalIndex {
        self.last_user_signal
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn sequence(&self) -> &[SignalIndex] {
        &self.sequence
    }

    /// Current round number (1-based once the first signal is appended).
    pub fn round(&self) -> u32 {
        self.sequence.len() as u32
    }

    /// Append the next round's signal and rewind the cursor.
    pub fn extend(&mut self, signal: SignalIndex) {
        self.sequence.push(signal);
        self.cursor = 0;
    }

    /// Move the cursor one step during playback.
    pub fn advance_playback(&mut self) {
        if self.cursor < self.sequence.len() {
            self.cursor += 1;
        }
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Validate a pick at the cursor. Only a correct pick moves the cursor.
    pub fn check(&mut self, pick: SignalIndex) -> Verdict {
        self.last_user_signal = pick;

        let Some(&expected) = self.sequence.get(self.cursor) else {
            // Nothing left to match; treat like a wrong pick rather than overflow.
            return Verdict::Mismatch {
                expected: pick,
                got: pick,
            };
        };

        if pick != expected {
            return Verdict::Mismatch {
                expected,
                got: pick,
            };
        }

        self.cursor += 1;
        if self.cursor == self.sequence.len() {
            Verdict::Complete
        } else {
            Verdict::Advance(self.cursor)
        }
    }

    pub fn complete_round(&mut self) -> u32 {
        self.score += 1;
        self.score
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.start_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = GameSession::new(3, 1, 500);
        assert_eq!(session.generation(), 3);
        assert_eq!(session.score(), 0);
        assert_eq!(session.chosen_color(), 1);
        assert_eq!(session.last_user_signal(), 1);
        assert!(session.sequence().is_empty());
        assert_eq!(session.round(), 0);
    }

    #[test]
    fn test_check_walks_sequence() {
        let mut session = GameSession::new(1, 0, 0);
        session.extend(2);
        session.extend(0);
        session.extend(3);

        assert_eq!(session.check(2), Verdict::Advance(1));
        assert_eq!(session.check(0), Verdict::Advance(2));
        assert_eq!(session.check(3), Verdict::Complete);
        assert_eq!(session.cursor(), 3);
        assert_eq!(session.last_user_signal(), 3);
    }

    #[test]
    fn test_mismatch_keeps_cursor() {
        let mut session = GameSession::new(1, 0, 0);
        session.extend(2);
        session.extend(0);

        assert_eq!(session.check(2), Verdict::Advance(1));
        assert_eq!(
            session.check(3),
            Verdict::Mismatch {
                expected: 0,
                got: 3
            }
        );
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn test_extend_rewinds_cursor() {
        let mut session = GameSession::new(1, 0, 0);
        session.extend(1);
        assert_eq!(session.check(1), Verdict::Complete);
        assert_eq!(session.complete_round(), 1);

        session.extend(2);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.sequence(), &[1, 2]);
        assert_eq!(session.score() + 1, session.round());
    }

    #[test]
    fn test_playback_cursor_bounded() {
        let mut session = GameSession::new(1, 0, 0);
        session.extend(1);
        session.advance_playback();
        session.advance_playback();
        assert_eq!(session.cursor(), 1);
        session.rewind();
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_elapsed() {
        let session = GameSession::new(1, 0, 1_000);
        assert_eq!(session.elapsed_ms(3_500), 2_500);
        assert_eq!(session.elapsed_ms(10), 0);
    }
}
