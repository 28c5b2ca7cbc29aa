//! Game state module - the sequence game state machine
//!
//! This module ties together the generator, playback scheduler, session, and
//! collaborator ports. It owns a millisecond clock that only moves when
//! [`SequenceGame::tick`] is called, so every transition is deterministic.
//!
//! ```text
//! Idle --start--> Generating --delay--> Playing --last signal ends--> AwaitingInput
//!                     ^                                                 |      |
//!                     |                                         full match   wrong pick
//!                     +--settle-- RoundComplete <--pulse, level-up---+      |
//!                                                                           v
//! Idle <--------------------------------------------game-over cue-- GameOver
//! ```
//!
//! Scheduled work is kept as timers tagged with the session generation
//! they were scheduled for. A timer whose generation no longer matches the
//! live session is dropped when it comes due.

use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::error::{ConfigError, EngineError};
use crate::playback::{PlaybackPlan, PlaybackScheduler};
use crate::ports::{Collaborators, CueCompletion, CueToken};
use crate::rng::{SequenceGenerator, SignalSource, SimpleRng};
use crate::scoring::{tone_duration_ms, GameResult};
use crate::session::{GameSession, Verdict};
use crate::snapshot::{EngineView, GameSnapshot};
use crate::types::{Cue, Phase, SignalIndex};

/// What a `submit` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Not awaiting input; nothing changed.
    Ignored,
    /// Correct pick, sequence not finished yet.
    Accepted { cursor: usize },
    /// Correct pick finishing the sequence.
    RoundComplete { score: u32 },
    /// Wrong pick; the game is over.
    Mismatch {
        expected: SignalIndex,
        got: SignalIndex,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    BeginRound,
    PlaybackStep,
    PlaybackSignalEnd,
    /// The last correct pick's pulse ended; the level-up cue starts here.
    FeedbackEnd,
    CueElapsed(CueToken),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timer {
    due_ms: u64,
    generation: u64,
    /// Insertion order, breaks ties between timers due at the same instant.
    order: u64,
    kind: TimerKind,
}

/// The sequence game engine
#[derive(Debug)]
pub struct SequenceGame {
    config: GameConfig,
    generator: SequenceGenerator,
    collaborators: Collaborators,
    phase: Phase,
    session: Option<GameSession>,
    /// Last generation handed out (increments on every start).
    generation: u64,
    now_ms: u64,
    timers: Vec<Timer>,
    timer_order: u64,
    playback: Option<PlaybackPlan>,
    pending_cue: Option<CueToken>,
    cue_id: u32,
    /// Per signal: clock value until which the pad is lit.
    lit_until: Vec<u64>,
}

impl SequenceGame {
    /// Create an engine after validating the configuration.
    pub fn new(
        config: GameConfig,
        source: Box<dyn SignalSource>,
        collaborators: Collaborators,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, source, collaborators))
    }

    /// Default configuration, seeded LCG, silent collaborators.
    pub fn with_seed(seed: u32) -> Self {
        Self::build(
            GameConfig::default(),
            Box::new(SimpleRng::new(seed)),
            Collaborators::silent(),
        )
    }

    fn build(config: GameConfig, source: Box<dyn SignalSource>, collaborators: Collaborators) -> Self {
        let count = config.signals.len();
        Self {
            generator: SequenceGenerator::new(source, count),
            config,
            collaborators,
            phase: Phase::Idle,
            session: None,
            generation: 0,
            now_ms: 0,
            timers: Vec::with_capacity(4),
            timer_order: 0,
            playback: None,
            pending_cue: None,
            cue_id: 0,
            lit_until: vec![0; count],
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn score(&self) -> u32 {
        self.session.as_ref().map_or(0, GameSession::score)
    }

    pub fn round(&self) -> u32 {
        self.session.as_ref().map_or(0, GameSession::round)
    }

    pub fn cursor(&self) -> usize {
        self.session.as_ref().map_or(0, GameSession::cursor)
    }

    pub fn sequence(&self) -> &[SignalIndex] {
        match &self.session {
            Some(session) => session.sequence(),
            None => &[],
        }
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_cue(&self) -> Option<CueToken> {
        self.pending_cue
    }

    /// Signal duration at the current score.
    pub fn current_tone_ms(&self) -> u32 {
        tone_duration_ms(self.score(), &self.config.timing)
    }

    pub fn is_lit(&self, index: SignalIndex) -> bool {
        self.lit_until
            .get(index)
            .is_some_and(|&until| self.now_ms < until)
    }

    pub fn highlights(&self) -> Vec<bool> {
        (0..self.lit_until.len()).map(|i| self.is_lit(i)).collect()
    }

    pub fn view(&self) -> EngineView {
        EngineView {
            phase: self.phase,
            highlights: self.highlights(),
            score: self.score(),
            active: self.is_active(),
            round: self.round(),
            cursor: self.cursor(),
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let labels = &self.config.signals;
        match &self.session {
            Some(session) => GameSnapshot {
                score: session.score(),
                playing: true,
                chosen_color: labels.label(session.chosen_color()).map(str::to_string),
                last_user_signal: labels.label(session.last_user_signal()).map(str::to_string),
                cursor: session.cursor(),
                game_over: self.phase == Phase::GameOver,
            },
            None => GameSnapshot::default(),
        }
    }

    /// Begin a game with `color` as the chosen color.
    ///
    /// Returns `Ok(false)` when a game is already running, including during
    /// the start delay; the pending delay is not restarted.
    pub fn start(&mut self, color: SignalIndex) -> Result<bool, EngineError> {
        self.check_signal(color)?;
        if self.phase != Phase::Idle {
            debug!(phase = self.phase.as_str(), "start ignored");
            return Ok(false);
        }

        self.generation += 1;
        self.session = Some(GameSession::new(self.generation, color, self.now_ms));
        self.cue_id = 0;
        self.phase = Phase::Generating;

        let due = self.now_ms + self.config.timing.start_delay_ms as u64;
        self.schedule(due, TimerKind::BeginRound);

        info!(
            generation = self.generation,
            color = self.config.signals.label(color).unwrap_or_default(),
            "game started"
        );
        self.publish_state();
        Ok(true)
    }

    /// Feed one user pick.
    pub fn submit(&mut self, pick: SignalIndex) -> Result<SubmitOutcome, EngineError> {
        self.check_signal(pick)?;
        if !self.phase.accepts_input() {
            debug!(pick, phase = self.phase.as_str(), "submit ignored");
            return Ok(SubmitOutcome::Ignored);
        }
        let Some(session) = self.session.as_mut() else {
            return Ok(SubmitOutcome::Ignored);
        };

        match session.check(pick) {
            Verdict::Advance(cursor) => {
                self.feedback(pick);
                self.publish_state();
                Ok(SubmitOutcome::Accepted { cursor })
            }
            Verdict::Complete => {
                let pulse_end = self.feedback(pick);
                let score = match self.session.as_mut() {
                    Some(session) => session.complete_round(),
                    None => 0,
                };
                // Input closes now; the next round waits until the pad is dark.
                self.phase = Phase::RoundComplete;
                debug!(score, "round complete");
                self.publish_state();
                self.schedule(pulse_end, TimerKind::FeedbackEnd);
                Ok(SubmitOutcome::RoundComplete { score })
            }
            Verdict::Mismatch { expected, got } => {
                debug!(expected, got, "sequence mismatch");
                self.game_over();
                Ok(SubmitOutcome::Mismatch { expected, got })
            }
        }
    }

    /// Advance the clock and run every timer that came due.
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.now_ms += elapsed_ms as u64;

        while let Some(timer) = self.pop_due() {
            if Some(timer.generation) != self.live_generation() {
                debug!(kind = ?timer.kind, generation = timer.generation, "discarding stale timer");
                continue;
            }
            match timer.kind {
                TimerKind::BeginRound => self.begin_round(timer.due_ms),
                TimerKind::PlaybackStep => self.play_step(),
                TimerKind::PlaybackSignalEnd => self.end_step(),
                TimerKind::FeedbackEnd => {
                    if self.phase == Phase::RoundComplete {
                        self.play_cue(Cue::LevelUp, timer.due_ms);
                    }
                }
                TimerKind::CueElapsed(token) => {
                    self.complete_cue(token, timer.due_ms);
                }
            }
        }
    }

    /// Completion callback for cues whose player returned `Pending`.
    ///
    /// Returns false when the token is not the cue currently awaited.
    pub fn cue_finished(&mut self, token: CueToken) -> bool {
        self.complete_cue(token, self.now_ms)
    }

    /// Drop the running game without reporting a score.
    pub fn abort(&mut self) -> bool {
        if self.session.is_none() {
            return false;
        }
        info!(generation = self.generation, "game aborted");
        self.reset();
        true
    }

    fn check_signal(&self, index: SignalIndex) -> Result<(), EngineError> {
        if self.config.signals.contains(index) {
            Ok(())
        } else {
            Err(EngineError::InvalidSignal {
                index,
                count: self.config.signals.len(),
            })
        }
    }

    fn live_generation(&self) -> Option<u64> {
        self.session.as_ref().map(GameSession::generation)
    }

    fn schedule(&mut self, due_ms: u64, kind: TimerKind) {
        let Some(generation) = self.live_generation() else {
            return;
        };
        self.timer_order += 1;
        self.timers.push(Timer {
            due_ms,
            generation,
            order: self.timer_order,
            kind,
        });
    }

    fn pop_due(&mut self) -> Option<Timer> {
        let now = self.now_ms;
        let (index, _) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now)
            .min_by_key(|(_, t)| (t.due_ms, t.order))?;
        Some(self.timers.remove(index))
    }

    fn begin_round(&mut self, at: u64) {
        if self.phase != Phase::Generating {
            return;
        }
        let signal = self.generator.next();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.extend(signal);
        let round = session.round();

        // Score does not change during playback, so one duration covers the round.
        let duration = tone_duration_ms(session.score(), &self.config.timing);
        let scheduler = PlaybackScheduler::new(duration, self.config.timing.inter_signal_gap_ms);
        self.playback = Some(scheduler.plan(at));
        self.phase = Phase::Playing;

        debug!(round, signal, duration_ms = duration, "round started");
        self.schedule(at, TimerKind::PlaybackStep);
        self.publish_state();
    }

    fn play_step(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        let (Some(plan), Some(session)) = (self.playback, self.session.as_ref()) else {
            return;
        };
        let Some(event) = plan.event(session.sequence(), session.cursor()) else {
            self.finish_playback();
            return;
        };

        self.light(event.signal, event.end_ms());
        let tone = self.config.signals.tone_hz(event.signal).unwrap_or_default();
        self.collaborators.cues.play_tone(tone, event.duration_ms);
        self.schedule(event.end_ms(), TimerKind::PlaybackSignalEnd);
    }

    fn end_step(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        let (Some(plan), Some(session)) = (self.playback, self.session.as_mut()) else {
            return;
        };
        session.advance_playback();

        match plan.event(session.sequence(), session.cursor()) {
            Some(next) => self.schedule(next.start_ms, TimerKind::PlaybackStep),
            None => self.finish_playback(),
        }
    }

    fn finish_playback(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.rewind();
        }
        self.playback = None;
        self.phase = Phase::AwaitingInput;
        debug!(round = self.round(), "awaiting input");
    }

    /// Light and sound the picked pad; returns when the pulse ends.
    fn feedback(&mut self, pick: SignalIndex) -> u64 {
        let duration = self.current_tone_ms();
        let until = self.now_ms + duration as u64;
        self.light(pick, until);
        let tone = self.config.signals.tone_hz(pick).unwrap_or_default();
        self.collaborators.cues.play_tone(tone, duration);
        until
    }

    fn light(&mut self, signal: SignalIndex, until_ms: u64) {
        if let Some(slot) = self.lit_until.get_mut(signal) {
            *slot = (*slot).max(until_ms);
        }
    }

    fn game_over(&mut self) {
        self.phase = Phase::GameOver;
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let color = self
            .config
            .signals
            .label(session.chosen_color())
            .unwrap_or_default();
        let result = GameResult::new(session.score(), color, session.elapsed_ms(self.now_ms));

        info!(
            score = result.score,
            color = %result.color,
            seconds = result.playing_time_seconds,
            "game over"
        );
        self.publish_state();
        if let Err(err) = self.collaborators.scores.publish_score(&result) {
            warn!(error = %err, "score sink failed");
        }
        self.play_cue(Cue::GameOver, self.now_ms);
    }

    /// Start `cue` at clock value `at`.
    fn play_cue(&mut self, cue: Cue, at: u64) {
        let Some(generation) = self.live_generation() else {
            return;
        };
        self.cue_id += 1;
        let token = CueToken {
            generation,
            cue,
            id: self.cue_id,
        };
        self.pending_cue = Some(token);

        match self.collaborators.cues.play_sound(cue, token) {
            Ok(CueCompletion::Finished) => {
                self.complete_cue(token, at);
            }
            Ok(CueCompletion::AfterMs(ms)) => {
                self.schedule(at + ms as u64, TimerKind::CueElapsed(token));
            }
            Ok(CueCompletion::Pending) => {}
            Err(err) => {
                warn!(error = %err, cue = cue.as_str(), "cue player failed");
                self.complete_cue(token, at);
            }
        }
    }

    fn complete_cue(&mut self, token: CueToken, at: u64) -> bool {
        if self.pending_cue != Some(token) {
            debug!(?token, "discarding stale cue completion");
            return false;
        }
        self.pending_cue = None;

        match token.cue {
            Cue::LevelUp => {
                self.phase = Phase::Generating;
                let due = at + self.config.timing.round_settle_ms as u64;
                self.schedule(due, TimerKind::BeginRound);
                self.publish_state();
            }
            Cue::GameOver => self.reset(),
        }
        true
    }

    fn reset(&mut self) {
        self.session = None;
        self.phase = Phase::Idle;
        self.playback = None;
        self.pending_cue = None;
        self.lit_until.iter_mut().for_each(|until| *until = 0);
        debug!("reset to idle");
        self.publish_state();
    }

    fn publish_state(&mut self) {
        let snapshot = self.snapshot();
        if let Err(err) = self.collaborators.state.update_game(&snapshot) {
            warn!(error = %err, "state sink failed");
        }
    }
}

impl Default for SequenceGame {
    fn default() -> Self {
        Self::with_seed(1)
    }
}
