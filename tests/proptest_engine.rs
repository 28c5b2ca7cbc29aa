//! Property-based tests for the sequence engine.
//!
//! Covers the duration formula, generator range, and the score/sequence
//! invariants under random scripts, seeds and mistake positions.

use proptest::prelude::*;

use simon_says::core::{
    round_duration_ms, tone_duration_ms, GameConfig, PlaybackScheduler, Recorder,
    ScriptedSignals, SequenceGame, SequenceGenerator, SimpleRng, SubmitOutcome, TimingConfig,
};
use simon_says::types::Phase;

fn run_until(game: &mut SequenceGame, phase: Phase) -> bool {
    for _ in 0..20_000 {
        if game.phase() == phase {
            return true;
        }
        game.tick(16);
    }
    false
}

// ---------------------------------------------------------------------------
// Property: duration(round r) = max(100, 300 - 10 * (r - 1))
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn round_duration_matches_formula(round in 1u32..500) {
        let expected = 300i64 - 10 * (round as i64 - 1);
        let expected = expected.max(100) as u32;
        prop_assert_eq!(round_duration_ms(round, &TimingConfig::default()), expected);
    }

    #[test]
    fn tone_duration_never_leaves_bounds(score in any::<u32>()) {
        let timing = TimingConfig::default();
        let ms = tone_duration_ms(score, &timing);
        prop_assert!(ms >= timing.min_tone_ms);
        prop_assert!(ms <= timing.max_tone_ms);
    }

    #[test]
    fn playback_events_are_evenly_spaced(
        len in 1usize..30,
        duration in 1u32..400,
        gap in 0u32..100,
        origin in 0u64..100_000,
    ) {
        let sequence = vec![0usize; len];
        let scheduler = PlaybackScheduler::new(duration, gap);
        let plan = scheduler.plan(origin);
        let events: Vec<_> = plan.events(&sequence).collect();

        prop_assert_eq!(events.len(), len);
        for (i, event) in events.iter().enumerate() {
            prop_assert_eq!(event.start_ms, origin + i as u64 * (duration + gap) as u64);
            prop_assert_eq!(event.duration_ms, duration);
        }
        let last = events[len - 1];
        prop_assert_eq!(last.end_ms() - origin, scheduler.total_ms(len));
    }

    #[test]
    fn generator_stays_in_range(seed in any::<u32>(), count in 1usize..12) {
        let mut generator = SequenceGenerator::new(Box::new(SimpleRng::new(seed)), count);
        for _ in 0..64 {
            prop_assert!(generator.next() < count);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: correct play for k rounds gives score == k; a miss reports once
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn correct_play_then_miss(
        script in prop::collection::vec(0usize..4, 1..8),
        color in 0usize..4,
        rounds in 1u32..6,
        miss_at in 0usize..6,
    ) {
        let recorder = Recorder::new();
        let mut game = SequenceGame::new(
            GameConfig::default(),
            Box::new(ScriptedSignals::new(script)),
            recorder.collaborators(),
        )
        .unwrap();
        prop_assert!(game.start(color).unwrap());

        for round in 1..=rounds {
            prop_assert!(run_until(&mut game, Phase::AwaitingInput));
            prop_assert_eq!(game.sequence().len() as u32, round);
            let picks = game.sequence().to_vec();
            let mut last = SubmitOutcome::Ignored;
            for pick in picks {
                last = game.submit(pick).unwrap();
            }
            prop_assert_eq!(last, SubmitOutcome::RoundComplete { score: round });
        }
        prop_assert_eq!(game.score(), rounds);
        game.tick(round_duration_ms(rounds, &TimingConfig::default()));
        prop_assert_eq!(game.phase(), Phase::Generating);

        prop_assert!(run_until(&mut game, Phase::AwaitingInput));
        let sequence = game.sequence().to_vec();
        let cursor = miss_at.min(sequence.len() - 1);
        for &pick in &sequence[..cursor] {
            game.submit(pick).unwrap();
        }
        let wrong = (sequence[cursor] + 1) % 4;
        let outcome = game.submit(wrong).unwrap();
        let is_mismatch = matches!(outcome, SubmitOutcome::Mismatch { .. });
        prop_assert!(is_mismatch);

        let scores = recorder.scores();
        prop_assert_eq!(scores.len(), 1);
        prop_assert_eq!(scores[0].score, rounds);
        prop_assert_eq!(game.phase(), Phase::Idle);
        prop_assert!(game.sequence().is_empty());
    }

    #[test]
    fn same_seed_same_sequence(seed in any::<u32>()) {
        let mut a = SequenceGame::with_seed(seed);
        let mut b = SequenceGame::with_seed(seed);
        a.start(0).unwrap();
        b.start(0).unwrap();

        for _ in 0..4 {
            prop_assert!(run_until(&mut a, Phase::AwaitingInput));
            prop_assert!(run_until(&mut b, Phase::AwaitingInput));
            prop_assert_eq!(a.sequence(), b.sequence());
            for game in [&mut a, &mut b] {
                let picks = game.sequence().to_vec();
                for pick in picks {
                    game.submit(pick).unwrap();
                }
            }
        }
    }
}
