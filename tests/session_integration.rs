//! Integration tests for the session controller
//!
//! Full path: events → SessionController → transitions → history recorder

use pretty_assertions::assert_eq;
use relframe::core::{Event, HistoryRecorder, MemoryStore, SessionController, TimerDriver, TimerKind};
use relframe::types::{GameSettings, Phase, ReasonCode, SessionEndCause};
use tokio::sync::mpsc;

fn untimed() -> GameSettings {
    GameSettings {
        disable_session_timer: true,
        ..Default::default()
    }
}

fn answer_correctly(c: &mut SessionController) -> ReasonCode {
    let expected = c.round().expect("round").query.expected;
    let t = c.handle(Event::Answer(Some(expected))).unwrap();
    c.handle(Event::Ready).unwrap();
    t.reason
}

#[test]
fn test_three_correct_answers_deepen_rounds() {
    let store = MemoryStore::new();
    let mut c = SessionController::with_seed(untimed(), Box::new(store.clone()), 1).unwrap();
    c.handle(Event::StartSession).unwrap();

    for _ in 0..3 {
        assert_eq!(answer_correctly(&mut c), ReasonCode::R301_ANSWER_CORRECT);
    }
    assert_eq!(c.session().depth, 3);
    assert_eq!(c.session().progress_streak, 0);
    assert_eq!(c.session().score, 60);
    assert_eq!(c.round().unwrap().depth, 3);
    assert_eq!(c.round().unwrap().premises.len(), 3);
}

#[test]
fn test_misses_lower_depth_to_floor_only() {
    let settings = GameSettings { num_premises: 3, ..untimed() };
    let mut c = SessionController::with_seed(settings, Box::new(MemoryStore::new()), 2).unwrap();
    c.handle(Event::StartSession).unwrap();

    for _ in 0..6 {
        let expected = c.round().unwrap().query.expected;
        c.handle(Event::Answer(Some(!expected))).unwrap();
        c.handle(Event::Ready).unwrap();
    }
    assert_eq!(c.session().depth, 2);
    assert_eq!(c.session().score, 0);
    assert_eq!(c.session().correct, 0);
}

#[test]
fn test_session_record_summarises_play() {
    let store = MemoryStore::new();
    let mut c = SessionController::with_seed(untimed(), Box::new(store.clone()), 3).unwrap();
    c.handle(Event::StartSession).unwrap();
    for _ in 0..4 {
        answer_correctly(&mut c);
    }
    let t = c.handle(Event::Abort).unwrap();
    assert_eq!(t.reason, ReasonCode::R103_SESSION_ABORTED);

    let record = t.session_record.expect("record");
    assert_eq!(record.end_cause, SessionEndCause::Aborted);
    assert_eq!(record.questions_attempted, 4);
    assert_eq!(record.correct, 4);
    assert_eq!(record.accuracy, 1.0);
    assert_eq!((record.start_depth, record.final_depth, record.peak_depth), (2, 3, 3));
    assert_eq!(record.frames.len(), 4);

    assert_eq!(store.load_history().unwrap(), vec![record]);
    assert_eq!(store.rounds().unwrap().len(), 4);
    assert!(c.round().is_none());
    assert!(c.armed_timers().is_empty());
}

#[test]
fn test_restart_after_session_end() {
    let mut c = SessionController::with_seed(untimed(), Box::new(MemoryStore::new()), 4).unwrap();
    c.handle(Event::StartSession).unwrap();
    answer_correctly(&mut c);
    c.handle(Event::Abort).unwrap();

    let t = c.handle(Event::StartSession).unwrap();
    assert_eq!((t.from, t.reason), (Phase::SessionEnd, ReasonCode::R101_SESSION_STARTED));
    assert_eq!(c.session().score, 0);
    assert_eq!(c.round().unwrap().number, 1);
}

#[test]
fn test_manual_difficulty_never_moves() {
    let settings = GameSettings { auto_progress: false, num_premises: 4, ..untimed() };
    let mut c = SessionController::with_seed(settings, Box::new(MemoryStore::new()), 5).unwrap();
    c.handle(Event::StartSession).unwrap();
    for _ in 0..7 {
        answer_correctly(&mut c);
    }
    assert_eq!(c.session().depth, 4);
    assert_eq!(c.session().score, 7 * 40);
}

#[test]
fn test_invalid_settings_event_is_rejected() {
    let mut c = SessionController::with_seed(untimed(), Box::new(MemoryStore::new()), 6).unwrap();
    let bad = GameSettings { num_premises: 1, ..untimed() };
    assert!(c.handle(Event::SettingsChanged(bad)).unwrap_err().is_configuration());
    assert_eq!(c.settings().num_premises, 2);
}

#[tokio::test(start_paused = true)]
async fn test_driver_ticks_time_out_question() {
    let settings = GameSettings {
        use_question_timer: true,
        question_time_limit: 3,
        ..untimed()
    };
    let mut c = SessionController::with_seed(settings, Box::new(MemoryStore::new()), 7).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = TimerDriver::new(tx);

    c.handle(Event::StartSession).unwrap();
    driver.sync(&c.armed_timers());
    assert_eq!(c.armed_timers()[0].kind, TimerKind::Question);

    let mut reasons = Vec::new();
    while c.phase() == Phase::Question {
        let event = rx.recv().await.expect("tick");
        let t = c.handle(event).unwrap();
        driver.sync(&c.armed_timers());
        reasons.push(t.reason);
    }
    assert_eq!(
        reasons,
        vec![
            ReasonCode::R402_QUESTION_TICK,
            ReasonCode::R402_QUESTION_TICK,
            ReasonCode::R303_ANSWER_TIMEOUT,
        ]
    );
    assert_eq!(driver.running(), 0);
    assert_eq!(c.records()[0].answer, None);
}

#[tokio::test(start_paused = true)]
async fn test_driver_session_clock_ends_session() {
    let settings = GameSettings {
        disable_session_timer: false,
        session_length_minutes: 1,
        ..Default::default()
    };
    let store = MemoryStore::new();
    let mut c = SessionController::with_seed(settings, Box::new(store.clone()), 8).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = TimerDriver::new(tx);

    c.handle(Event::StartSession).unwrap();
    answer_correctly(&mut c);
    driver.sync(&c.armed_timers());

    let mut last = None;
    while c.phase() != Phase::SessionEnd {
        let event = rx.recv().await.expect("tick");
        last = Some(c.handle(event).unwrap());
        driver.sync(&c.armed_timers());
    }
    let t = last.expect("transition");
    assert_eq!(t.reason, ReasonCode::R102_SESSION_TIMER_EXPIRED);
    assert_eq!(t.session_record.unwrap().end_cause, SessionEndCause::TimerExpired);
    assert_eq!(store.load_history().unwrap().len(), 1);
    assert_eq!(driver.running(), 0);
}
