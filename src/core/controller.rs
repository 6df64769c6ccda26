//! Round/Session controller: the state machine driving a session
//!
//! Phase flow:
//! - SETUP → (StartSession) → first round
//! - round start → PREMISE_MEMORIZE iff blind mode or the cipher key changed
//! - PREMISE_MEMORIZE → (Ready) → INTERFERENCE if enabled, else QUESTION
//! - INTERFERENCE → (matching Signal) → QUESTION
//! - QUESTION → (Answer | question timeout) → RESULT
//! - RESULT → (Ready) → next round
//! - any in-session phase → (session timeout | Abort) → SESSION_END
//!
//! Entering a phase cancels the question and interference timers before
//! arming new ones. A tick whose handle is no longer armed is a no-op.

use std::time::Instant;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};
use crate::core::adaptive;
use crate::core::cipher::CipherEngine;
use crate::core::generator::{RoundGenerator, RoundRequest};
use crate::core::interference::{InterferenceEpisode, SignalOutcome};
use crate::core::storage::HistoryRecorder;
use crate::core::timers::{TimerHandle, TimerKind, TimerSet};
use crate::types::{
    GameError, GameSettings, Legend, Phase, ReasonCode, RoundRecord, RoundState, SessionEndCause,
    SessionRecord, SessionState, Transition,
};

/// Input delivered to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StartSession,
    /// Leave PREMISE_MEMORIZE, or move on from RESULT
    Ready,
    /// Yes/no answer; None is a timeout
    Answer(Option<bool>),
    InterferenceSignal,
    Abort,
    SettingsChanged(GameSettings),
    Tick(TimerHandle),
}

/// Round/Session state machine
pub struct SessionController {
    rng: StdRng,
    /// Settings in force for the current round
    settings: GameSettings,
    /// Settings changed mid-round, applied when the next round is dealt
    pending_settings: Option<GameSettings>,
    phase: Phase,
    session: SessionState,
    round: Option<RoundState>,
    interference: Option<InterferenceEpisode>,
    timers: TimerSet,
    question_started: Option<Instant>,
    started_at: DateTime<Utc>,
    start_depth: usize,
    peak_depth: usize,
    records: Vec<RoundRecord>,
    recorder: Box<dyn HistoryRecorder + Send>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("phase", &self.phase)
            .field("session", &self.session)
            .field("round", &self.round.as_ref().map(|r| r.number))
            .field("timers", &self.timers)
            .finish()
    }
}

impl SessionController {
    /// Create a controller in SETUP with an entropy-seeded RNG
    pub fn new(
        settings: GameSettings,
        recorder: Box<dyn HistoryRecorder + Send>,
    ) -> Result<Self, GameError> {
        Self::with_rng(settings, recorder, StdRng::from_entropy())
    }

    /// Create a controller with a deterministic RNG
    pub fn with_seed(
        settings: GameSettings,
        recorder: Box<dyn HistoryRecorder + Send>,
        seed: u64,
    ) -> Result<Self, GameError> {
        Self::with_rng(settings, recorder, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        settings: GameSettings,
        recorder: Box<dyn HistoryRecorder + Send>,
        rng: StdRng,
    ) -> Result<Self, GameError> {
        settings.validate()?;
        let session = SessionState::new(settings.num_premises);
        Ok(Self {
            rng,
            start_depth: session.depth,
            peak_depth: session.depth,
            settings,
            pending_settings: None,
            phase: Phase::Setup,
            session,
            round: None,
            interference: None,
            timers: TimerSet::new(),
            question_started: None,
            started_at: Utc::now(),
            records: Vec::new(),
            recorder,
        })
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    /// Cipher tokens for the keywords the current round uses
    pub fn legend(&self) -> Legend {
        match (&self.round, &self.session.cipher) {
            (Some(round), Some(cipher)) if round.modifiers.cipher => {
                cipher.legend_for(&round.used_keywords)
            }
            _ => Legend::default(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn settings(&self) -> &GameSettings {
        self.pending_settings.as_ref().unwrap_or(&self.settings)
    }

    pub fn interference(&self) -> Option<&InterferenceEpisode> {
        self.interference.as_ref()
    }

    pub fn armed_timers(&self) -> Vec<TimerHandle> {
        self.timers.armed()
    }

    /// Rounds answered or timed out this session
    pub fn records(&self) -> &[RoundRecord] {
        &self.records
    }

    // =========================================================================
    // EVENT HANDLING
    // =========================================================================

    /// Feed one event; events that do not apply to the phase are no-ops
    pub fn handle(&mut self, event: Event) -> Result<Transition, GameError> {
        let from = self.phase;
        match (from, event) {
            (Phase::Setup | Phase::SessionEnd, Event::StartSession) => self.start_session(),

            (_, Event::SettingsChanged(settings)) => self.change_settings(settings),

            (Phase::PremiseMemorize, Event::Ready) => {
                let (to, reason) = self.leave_memorize();
                Ok(self.transition(from, to, reason))
            }

            (Phase::Result, Event::Ready) => {
                let (to, reason) = self.deal_round()?;
                Ok(self.transition(from, to, reason))
            }

            (Phase::Question, Event::Answer(answer)) => Ok(self.resolve(answer)),

            (Phase::Interference, Event::InterferenceSignal) => Ok(self.signal()),

            (phase, Event::Abort) if phase.in_session() => {
                Ok(self.end_session(SessionEndCause::Aborted, ReasonCode::R103_SESSION_ABORTED))
            }

            (_, Event::Tick(handle)) => Ok(self.tick(handle)),

            (_, event) => {
                debug!(phase = %from, ?event, "event ignored");
                Ok(self.transition(from, from, ReasonCode::R601_EVENT_IGNORED))
            }
        }
    }

    fn transition(&self, from: Phase, to: Phase, reason: ReasonCode) -> Transition {
        Transition::new(from, to, reason, self.session.score, self.session.depth)
    }

    fn start_session(&mut self) -> Result<Transition, GameError> {
        let from = self.phase;
        if let Some(pending) = self.pending_settings.take() {
            self.settings = pending;
        }
        self.settings.validate()?;
        ensure_frames(&self.settings)?;

        self.session = SessionState::new(self.settings.num_premises);
        self.start_depth = self.session.depth;
        self.peak_depth = self.session.depth;
        self.records.clear();
        self.started_at = Utc::now();
        self.timers.cancel_all();
        if !self.settings.disable_session_timer {
            self.timers.arm(TimerKind::Session);
            self.session.session_remaining = Some(self.settings.session_length_minutes * 60);
        }

        info!(depth = self.session.depth, timed = !self.settings.disable_session_timer, "session started");
        let (to, _) = self.deal_round()?;
        Ok(self.transition(from, to, ReasonCode::R101_SESSION_STARTED))
    }

    fn change_settings(&mut self, settings: GameSettings) -> Result<Transition, GameError> {
        settings.validate()?;
        if self.phase.in_session() {
            self.pending_settings = Some(settings);
        } else {
            self.apply_settings(settings);
        }
        debug!(phase = %self.phase, "settings updated");
        Ok(self.transition(self.phase, self.phase, ReasonCode::R602_SETTINGS_UPDATED))
    }

    fn apply_settings(&mut self, settings: GameSettings) {
        if settings.num_premises != self.settings.num_premises {
            self.session.depth = settings.num_premises.max(crate::MIN_DEPTH);
            self.session.progress_streak = 0;
            self.session.mistake_streak = 0;
            self.peak_depth = self.peak_depth.max(self.session.depth);
        }
        self.settings = settings;
    }

    // =========================================================================
    // PHASES
    // =========================================================================

    fn enter(&mut self, phase: Phase) {
        self.timers.cancel_phase_timers();
        self.session.question_remaining = None;
        self.phase = phase;
    }

    /// Generate the next round and enter its first phase
    fn deal_round(&mut self) -> Result<(Phase, ReasonCode), GameError> {
        if let Some(pending) = self.pending_settings.take() {
            self.apply_settings(pending);
        }
        ensure_frames(&self.settings)?;

        let first_round = self.session.rounds_played == 0;
        let update = CipherEngine::new().prepare_round(
            &mut self.session.cipher,
            self.settings.enable_cipher,
            first_round,
            &mut self.rng,
        );
        let number = self.session.rounds_played + 1;
        let cipher = if self.settings.enable_cipher {
            self.session.cipher.as_ref()
        } else {
            None
        };
        let round = RoundGenerator::new().generate(
            RoundRequest {
                settings: &self.settings,
                depth: self.session.depth,
                number,
                cipher,
                key_changed: update.key_changed,
            },
            &mut self.rng,
        )?;

        self.session.rounds_played = number;
        self.interference = None;
        let modifiers = round.modifiers;
        self.round = Some(round);

        if modifiers.key_changed {
            self.enter(Phase::PremiseMemorize);
            Ok((Phase::PremiseMemorize, ReasonCode::R202_MEMORIZE_KEY_CHANGED))
        } else if modifiers.blind {
            self.enter(Phase::PremiseMemorize);
            Ok((Phase::PremiseMemorize, ReasonCode::R201_MEMORIZE_BLIND))
        } else {
            Ok(self.leave_memorize())
        }
    }

    /// Interference if the round has it, else the question
    fn leave_memorize(&mut self) -> (Phase, ReasonCode) {
        let interference = self.round.as_ref().is_some_and(|r| r.modifiers.interference);
        if interference {
            self.enter(Phase::Interference);
            self.interference = Some(InterferenceEpisode::start(&mut self.rng));
            self.timers.arm(TimerKind::Interference);
            (Phase::Interference, ReasonCode::R203_INTERFERENCE_STARTED)
        } else {
            self.enter_question()
        }
    }

    fn enter_question(&mut self) -> (Phase, ReasonCode) {
        self.enter(Phase::Question);
        self.interference = None;
        self.question_started = Some(Instant::now());
        if self.settings.use_question_timer {
            self.timers.arm(TimerKind::Question);
            self.session.question_remaining = Some(self.settings.question_time_limit);
        }
        (Phase::Question, ReasonCode::R204_QUESTION_ASKED)
    }

    fn signal(&mut self) -> Transition {
        let from = self.phase;
        let outcome = self.interference.as_mut().map(InterferenceEpisode::signal);
        match outcome {
            Some(SignalOutcome::Match) => {
                let (to, _) = self.enter_question();
                self.transition(from, to, ReasonCode::R502_INTERFERENCE_MATCH)
            }
            Some(SignalOutcome::Miss) => self.transition(from, from, ReasonCode::R503_INTERFERENCE_MISS),
            None => self.transition(from, from, ReasonCode::R601_EVENT_IGNORED),
        }
    }

    /// Score an answer (None = timeout) and move to RESULT
    fn resolve(&mut self, answer: Option<bool>) -> Transition {
        let from = self.phase;
        let Some(round) = self.round.as_ref() else {
            return self.transition(from, from, ReasonCode::R601_EVENT_IGNORED);
        };
        let expected = round.query.expected;
        let correct = answer == Some(expected);
        let reaction_ms = self
            .question_started
            .take()
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);

        let (number, frame, spatial_mode, depth, night, key_changed) = (
            round.number,
            round.frame,
            round.spatial_mode(),
            round.depth,
            round.modifiers.night,
            round.modifiers.key_changed,
        );
        adaptive::record_answer(&mut self.session, correct, depth, self.settings.auto_progress);
        self.peak_depth = self.peak_depth.max(self.session.depth);

        let record = RoundRecord {
            timestamp: Utc::now(),
            round: number,
            frame,
            spatial_mode,
            depth,
            expected,
            answer,
            correct,
            reaction_ms,
            night,
            key_changed,
            score_after: self.session.score,
        };
        if let Err(e) = self.recorder.record_round(&record) {
            warn!(error = %e, "failed to record round");
        }
        self.records.push(record.clone());
        self.enter(Phase::Result);

        let reason = match (answer, correct) {
            (None, _) => ReasonCode::R303_ANSWER_TIMEOUT,
            (Some(_), true) => ReasonCode::R301_ANSWER_CORRECT,
            (Some(_), false) => ReasonCode::R302_ANSWER_WRONG,
        };
        debug!(round = number, correct, reaction_ms, score = self.session.score, "question resolved");
        self.transition(from, Phase::Result, reason).with_outcome(record)
    }

    fn tick(&mut self, handle: TimerHandle) -> Transition {
        let from = self.phase;
        if !self.timers.is_armed(handle) {
            debug!(?handle, "stale tick ignored");
            return self.transition(from, from, ReasonCode::R403_STALE_TICK_IGNORED);
        }
        match handle.kind {
            TimerKind::Session => {
                let remaining = self.session.session_remaining.unwrap_or(0).saturating_sub(1);
                self.session.session_remaining = Some(remaining);
                if remaining == 0 {
                    self.end_session(SessionEndCause::TimerExpired, ReasonCode::R102_SESSION_TIMER_EXPIRED)
                } else {
                    self.transition(from, from, ReasonCode::R401_SESSION_TICK)
                }
            }
            TimerKind::Question => {
                let remaining = self.session.question_remaining.unwrap_or(0).saturating_sub(1);
                self.session.question_remaining = Some(remaining);
                if remaining == 0 {
                    self.resolve(None)
                } else {
                    self.transition(from, from, ReasonCode::R402_QUESTION_TICK)
                }
            }
            TimerKind::Interference => {
                if let Some(episode) = self.interference.as_mut() {
                    episode.tick();
                }
                self.transition(from, from, ReasonCode::R501_INTERFERENCE_TICK)
            }
        }
    }

    fn end_session(&mut self, cause: SessionEndCause, reason: ReasonCode) -> Transition {
        let from = self.phase;
        self.timers.cancel_all();
        self.phase = Phase::SessionEnd;
        self.session.question_remaining = None;
        self.question_started = None;
        self.round = None;
        self.interference = None;

        let record = self.session_record(cause);
        if let Some(record) = &record {
            if let Err(e) = self.recorder.record_session(record) {
                warn!(error = %e, "failed to record session");
            }
        }
        if let Some(pending) = self.pending_settings.take() {
            self.apply_settings(pending);
        }
        info!(?cause, score = self.session.score, attempted = self.session.questions_attempted, "session ended");
        self.transition(from, Phase::SessionEnd, reason)
            .with_session_record(record)
    }

    /// Archival record; None when nothing was attempted
    fn session_record(&self, cause: SessionEndCause) -> Option<SessionRecord> {
        if self.session.questions_attempted == 0 {
            return None;
        }
        let total_ms: u64 = self.records.iter().map(|r| r.reaction_ms).sum();
        let ended_at = Utc::now();
        Some(SessionRecord {
            id: format!("session-{}", self.started_at.format("%Y%m%d-%H%M%S-%3f")),
            started_at: self.started_at,
            ended_at,
            end_cause: cause,
            score: self.session.score,
            questions_attempted: self.session.questions_attempted,
            correct: self.session.correct,
            accuracy: self.session.accuracy(),
            start_depth: self.start_depth,
            final_depth: self.session.depth,
            peak_depth: self.peak_depth,
            avg_reaction_ms: if self.records.is_empty() {
                0.0
            } else {
                total_ms as f64 / self.records.len() as f64
            },
            modifiers: self.settings.active_modifiers(),
            frames: self.records.iter().map(|r| r.frame).collect(),
        })
    }
}

fn ensure_frames(settings: &GameSettings) -> Result<(), GameError> {
    if settings.enabled_frames().is_empty() {
        return Err(GameError::configuration("no relational frame is enabled"));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
