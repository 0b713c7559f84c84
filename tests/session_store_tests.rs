use std::sync::Arc;
use std::time::{Duration, Instant};

use MehrnazChatBot::models::user_session::{Mode, UserSession};
use MehrnazChatBot::models::global_session_manager::GlobalSessionManager;

const LIMIT: usize = 5;
const WINDOW: Duration = Duration::from_secs(10);

#[test]
fn test_burst_of_five_then_sixth_rejected() {
    let mut session = UserSession::new();
    let start = Instant::now();

    // five messages at t = 0..4 are all admitted
    for t in 0..5 {
        assert!(
            session.admit(start + Duration::from_secs(t), LIMIT, WINDOW),
            "message at t={} should be admitted",
            t
        );
    }
    // the sixth at t=5 still falls inside the 10s window
    assert!(!session.admit(start + Duration::from_secs(5), LIMIT, WINDOW));
}

#[test]
fn test_seventh_message_admitted_after_window_moves() {
    let mut session = UserSession::new();
    let start = Instant::now();
    for t in 0..5 {
        session.admit(start + Duration::from_secs(t), LIMIT, WINDOW);
    }
    assert!(!session.admit(start + Duration::from_secs(5), LIMIT, WINDOW));
    // by t=11 the t=0 and t=1 entries have expired
    assert!(session.admit(start + Duration::from_secs(11), LIMIT, WINDOW));
}

#[test]
fn test_rejection_leaves_window_untouched() {
    let mut session = UserSession::new();
    let start = Instant::now();
    for t in 0..5 {
        session.admit(start + Duration::from_secs(t), LIMIT, WINDOW);
    }
    // rejected attempts must not count toward the window
    for _ in 0..3 {
        assert!(!session.admit(start + Duration::from_secs(5), LIMIT, WINDOW));
    }
    assert_eq!(session.request_timestamps.len(), 5);
}

#[test]
fn test_mode_overwrite_without_stacking() {
    let mut session = UserSession::new();
    session.mode = Mode::AwaitingReport;
    session.mode = Mode::AwaitingSupport;
    // only the last selection is live, and it is consumed exactly once
    assert_eq!(session.take_mode(), Mode::AwaitingSupport);
    assert_eq!(session.take_mode(), Mode::Idle);
}

#[test]
fn test_full_history_keeps_length_ten_after_turn() {
    let mut session = UserSession::new();
    for i in 0..5 {
        session.record_turn(format!("q{}", i), format!("a{}", i), 10);
    }
    assert_eq!(session.history.len(), 10);

    session.record_turn("q5".to_string(), "a5".to_string(), 10);
    assert_eq!(session.history.len(), 10);
    assert_eq!(session.history[0].content, "q1");
}

#[tokio::test]
async fn test_manager_isolates_users_and_reuses_sessions() {
    let manager = GlobalSessionManager::new();
    let a = manager.get_or_create(1);
    let b = manager.get_or_create(2);

    a.lock().await.mode = Mode::AwaitingReport;
    assert_eq!(b.lock().await.mode, Mode::Idle);

    assert!(Arc::ptr_eq(&a, &manager.get_or_create(1)));
    assert_eq!(manager.session_count(), 2);
}
