//! RNG module - signal generation
//!
//! Every round appends one signal chosen uniformly from the signal set,
//! independent of earlier picks (repeats are allowed).
//!
//! Sources are pluggable through [`SignalSource`]:
//! - [`SimpleRng`]: seeded LCG, deterministic (tests, replays, `SIMON_SEED`)
//! - [`ThreadRngSource`]: OS-seeded `rand` generator for normal play
//! - [`ScriptedSignals`]: replays a fixed list

use std::collections::VecDeque;

use rand::Rng;

use crate::types::SignalIndex;

/// Something that can pick a signal index in `0..count`.
pub trait SignalSource: Send {
    /// `count` is always at least 1.
    fn next_signal(&mut self, count: usize) -> SignalIndex;
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales by the high bits; the low bits of a power-of-two LCG cycle with
    /// a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current state (for restarting with the same sequence)
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SignalSource for SimpleRng {
    fn next_signal(&mut self, count: usize) -> SignalIndex {
        self.next_range(count as u32) as SignalIndex
    }
}

/// `rand`'s thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl SignalSource for ThreadRngSource {
    fn next_signal(&mut self, count: usize) -> SignalIndex {
        rand::thread_rng().gen_range(0..count)
    }
}

/// Replays a fixed list of picks.
///
/// Values are reduced modulo the signal count. Once the script runs out it
/// starts over from the beginning; an empty script always yields 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSignals {
    script: Vec<SignalIndex>,
    pending: VecDeque<SignalIndex>,
}

impl ScriptedSignals {
    pub fn new(script: impl IntoIterator<Item = SignalIndex>) -> Self {
        let script: Vec<SignalIndex> = script.into_iter().collect();
        let pending = script.iter().copied().collect();
        Self { script, pending }
    }
}

impl SignalSource for ScriptedSignals {
    fn next_signal(&mut self, count: usize) -> SignalIndex {
        if self.pending.is_empty() {
            self.pending.extend(self.script.iter().copied());
        }
        self.pending.pop_front().unwrap_or(0) % count.max(1)
    }
}

/// Appends one signal per round.
pub struct SequenceGenerator {
    source: Box<dyn SignalSource>,
    count: usize,
}

impl SequenceGenerator {
    pub fn new(source: Box<dyn SignalSource>, count: usize) -> Self {
        Self {
            source,
            count: count.max(1),
        }
    }

    /// Next signal index, always in `0..count`.
    pub fn next(&mut self) -> SignalIndex {
        let picked = self.source.next_signal(self.count);
        // Sources may ignore `count`.
        picked % self.count
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl std::fmt::Debug for SequenceGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceGenerator")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed() {
        let mut rng = SimpleRng::new(0);
        assert_eq!(rng.seed(), 1);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_next_range_covers_all_signals() {
        let mut rng = SimpleRng::new(7);
        let mut seen = [0u32; 4];
        for _ in 0..4000 {
            let v = rng.next_range(4) as usize;
            seen[v] += 1;
        }

        // Roughly uniform: every bucket well above zero
        for (i, count) in seen.iter().enumerate() {
            assert!(*count > 800, "bucket {} only drew {}", i, count);
        }
    }

    #[test]
    fn test_next_range_does_not_cycle_with_period_four() {
        let mut rng = SimpleRng::new(99);
        let first: Vec<u32> = (0..4).map(|_| rng.next_range(4)).collect();
        let second: Vec<u32> = (0..4).map(|_| rng.next_range(4)).collect();
        let third: Vec<u32> = (0..4).map(|_| rng.next_range(4)).collect();
        assert!(first != second || second != third);
    }

    #[test]
    fn test_thread_rng_in_range() {
        let mut source = ThreadRngSource;
        for _ in 0..200 {
            assert!(source.next_signal(4) < 4);
        }
    }

    #[test]
    fn test_scripted_signals_repeat() {
        let mut source = ScriptedSignals::new([2, 0, 5]);
        assert_eq!(source.next_signal(4), 2);
        assert_eq!(source.next_signal(4), 0);
        assert_eq!(source.next_signal(4), 1);
        assert_eq!(source.next_signal(4), 2);

        let mut empty = ScriptedSignals::default();
        assert_eq!(empty.next_signal(4), 0);
    }

    #[test]
    fn test_generator_clamps() {
        struct Broken;
        impl SignalSource for Broken {
            fn next_signal(&mut self, _count: usize) -> SignalIndex {
                9
            }
        }

        let mut generator = SequenceGenerator::new(Box::new(Broken), 4);
        assert_eq!(generator.next(), 1);
        assert_eq!(generator.count(), 4);
    }
}
