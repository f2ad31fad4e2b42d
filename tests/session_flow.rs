// tests/session_flow.rs
//
// Session lifecycle with a source we can hold open, to observe the Loading state.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use joke_board::{Joke, JokeSession, JokeSource, JokesConfig, SessionError, SessionStatus};
use tokio::sync::Notify;

/// Unique ids; request number `block_at` waits until `gate` is notified.
struct Gated {
    gate: Notify,
    calls: AtomicUsize,
    block_at: usize,
}

#[async_trait::async_trait]
impl JokeSource for Gated {
    async fn fetch_one(&self) -> anyhow::Result<Joke> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n == self.block_at {
            self.gate.notified().await;
        }
        Ok(Joke::new(format!("g{n}"), format!("gated joke {n}")))
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}

async fn wait_for(session: &JokeSession, want: SessionStatus) {
    for _ in 0..200 {
        if session.status() == want {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("session never reached {want:?}, stuck at {:?}", session.status());
}

fn gated_session(batch_size: usize, block_at: usize) -> (JokeSession, Arc<Gated>) {
    let src = Arc::new(Gated {
        gate: Notify::new(),
        calls: AtomicUsize::new(0),
        block_at,
    });
    let cfg = JokesConfig {
        batch_size,
        ..JokesConfig::default()
    };
    (JokeSession::new(src.clone(), cfg), src)
}

#[tokio::test]
async fn second_refresh_while_loading_is_busy() {
    let (session, src) = gated_session(3, 0);

    let first = tokio::spawn({
        let s = session.clone();
        async move { s.refresh(None).await }
    });
    wait_for(&session, SessionStatus::Loading).await;

    assert!(matches!(session.refresh(None).await, Err(SessionError::Busy)));
    assert_eq!(session.snapshot().status, SessionStatus::Loading);

    src.gate.notify_one();
    let batch = first.await.unwrap().unwrap();
    assert_eq!(batch.len(), 3);
    assert_eq!(session.status(), SessionStatus::Ready);
    assert_eq!(src.calls.load(Ordering::SeqCst), 3, "busy refresh issued no requests");
}

#[tokio::test]
async fn votes_are_rejected_during_refresh() {
    // Requests 0 and 1 fill the first batch; request 2 is held.
    let (session, src) = gated_session(2, 2);
    session.refresh(None).await.unwrap();
    session.vote("g0", 1).unwrap();

    let pending = tokio::spawn({
        let s = session.clone();
        async move { s.refresh(None).await }
    });
    wait_for(&session, SessionStatus::Loading).await;

    assert!(matches!(session.vote("g0", 1), Err(SessionError::Busy)));

    src.gate.notify_one();
    let batch = pending.await.unwrap().unwrap();
    let ids: Vec<_> = batch.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["g2", "g3"]);
    assert!(matches!(session.vote("g0", 1), Err(SessionError::UnknownJoke(_))));
}

#[tokio::test]
async fn refresh_survives_a_dropped_caller() {
    let (session, src) = gated_session(2, 0);

    let caller = tokio::spawn({
        let s = session.clone();
        async move { s.refresh(None).await }
    });
    wait_for(&session, SessionStatus::Loading).await;
    caller.abort();

    src.gate.notify_one();
    wait_for(&session, SessionStatus::Ready).await;
    assert_eq!(session.snapshot().jokes.len(), 2);
}
