//! Playback scheduler - timing of the sequence replay
//!
//! A round's playback is a fixed grid: event `i` starts at
//! `origin + i * (duration + gap)` and lasts `duration`. The grid is computed
//! lazily, so the engine only needs to remember the plan and a cursor.

use crate::types::SignalIndex;

/// One signal of a playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackEvent {
    /// Position in the sequence.
    pub index: usize,
    pub signal: SignalIndex,
    pub start_ms: u64,
    pub duration_ms: u32,
}

impl PlaybackEvent {
    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.duration_ms as u64
    }
}

/// Duration and spacing of one round's playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackScheduler {
    pub duration_ms: u32,
    pub gap_ms: u32,
}

impl PlaybackScheduler {
    pub fn new(duration_ms: u32, gap_ms: u32) -> Self {
        Self {
            duration_ms,
            gap_ms,
        }
    }

    /// Anchor the grid at `origin_ms`.
    pub fn plan(&self, origin_ms: u64) -> PlaybackPlan {
        PlaybackPlan {
            origin_ms,
            duration_ms: self.duration_ms,
            gap_ms: self.gap_ms,
        }
    }

    /// Time from the first highlight starting to the last one ending.
    ///
    /// There is no trailing gap after the last signal.
    pub fn total_ms(&self, len: usize) -> u64 {
        if len == 0 {
            return 0;
        }
        let len = len as u64;
        len * self.duration_ms as u64 + (len - 1) * self.gap_ms as u64
    }
}

/// A scheduler anchored in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackPlan {
    pub origin_ms: u64,
    pub duration_ms: u32,
    pub gap_ms: u32,
}

impl PlaybackPlan {
    fn stride_ms(&self) -> u64 {
        self.duration_ms as u64 + self.gap_ms as u64
    }

    /// Event for sequence position `index`, or `None` past the end.
    pub fn event(&self, sequence: &[SignalIndex], index: usize) -> Option<PlaybackEvent> {
        let signal = *sequence.get(index)?;
        Some(PlaybackEvent {
            index,
            signal,
            start_ms: self.origin_ms + index as u64 * self.stride_ms(),
            duration_ms: self.duration_ms,
        })
    }

    /// All events in order.
    pub fn events<'a>(&self, sequence: &'a [SignalIndex]) -> PlaybackEvents<'a> {
        PlaybackEvents {
            plan: *self,
            sequence,
            next: 0,
        }
    }
}

/// Lazy iterator over a plan's events.
#[derive(Debug, Clone)]
pub struct PlaybackEvents<'a> {
    plan: PlaybackPlan,
    sequence: &'a [SignalIndex],
    next: usize,
}

impl Iterator for PlaybackEvents<'_> {
    type Item = PlaybackEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.plan.event(self.sequence, self.next)?;
        self.next += 1;
        Some(event)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sequence.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PlaybackEvents<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_follow_grid() {
        let plan = PlaybackScheduler::new(300, 50).plan(1000);
        let events: Vec<_> = plan.events(&[2, 0, 3]).collect();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].start_ms, 1000);
        assert_eq!(events[0].end_ms(), 1300);
        assert_eq!(events[1].start_ms, 1350);
        assert_eq!(events[1].signal, 0);
        assert_eq!(events[2].start_ms, 1700);
        assert_eq!(events[2].index, 2);
    }

    #[test]
    fn test_event_past_end() {
        let plan = PlaybackScheduler::new(100, 50).plan(0);
        assert!(plan.event(&[1], 1).is_none());
        assert!(plan.event(&[], 0).is_none());
    }

    #[test]
    fn test_total_matches_last_event_end() {
        let scheduler = PlaybackScheduler::new(280, 50);
        let sequence = [0, 1, 2, 3, 0];
        let last = scheduler.plan(0).events(&sequence).last().unwrap();
        assert_eq!(scheduler.total_ms(sequence.len()), last.end_ms());
        assert_eq!(scheduler.total_ms(0), 0);
    }

    #[test]
    fn test_iterator_size_hint() {
        let plan = PlaybackScheduler::new(100, 0).plan(0);
        let mut events = plan.events(&[0, 0, 0]);
        assert_eq!(events.len(), 3);
        events.next();
        assert_eq!(events.len(), 2);
    }
}
