//! Notification badge behaviour over the public surface.
//!
//! Covers the unread-count watch channel across a realistic reading
//! session and the background poller under a manually driven clock.

use std::sync::Arc;

use client::domain::Role;
use client::domain::ports::ApiError;
use client::domain::sync::{NotificationsSync, UNREAD_POLL_INTERVAL};
use client::test_support::gateway::ScriptedGateway;
use client::test_support::sleepers::ManualSleeper;
use serde_json::{Value, json};

fn feed() -> Value {
    json!({
        "success": true,
        "data": [
            { "id": 1, "type": "mission", "message": "Mission validée", "lue": true },
            { "id": 2, "message": "Nouvelle facture disponible", "lue": false },
            { "id": 5, "type": "paiement", "message": "Paiement reçu", "lue": false }
        ]
    })
}

fn receipt() -> Value {
    json!({ "success": true })
}

/// Yield until `check` holds, failing the test if it never does.
async fn settle(check: impl Fn() -> bool) {
    for _ in 0..64 {
        if check() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("background task never settled");
}

#[tokio::test]
async fn the_badge_tracks_a_session_of_reading() {
    let gateway = Arc::new(ScriptedGateway::default());
    gateway.push_ok(feed());
    gateway.push_ok(receipt());
    gateway.push_ok(receipt());
    let sync = NotificationsSync::new(gateway.clone());
    let mut counts = sync.unread_counts();

    sync.load("ECL-001", Role::School).await.expect("feed loads");
    assert_eq!(*counts.borrow_and_update(), 2);

    let told = sync.mark_read(5).await.expect("receipt confirms");
    assert!(told);
    assert_eq!(*counts.borrow_and_update(), 1);

    let swept = sync
        .mark_all_read("ECL-001", Role::School)
        .await
        .expect("sweep confirms");
    assert!(swept);
    assert_eq!(*counts.borrow_and_update(), 0);

    // Nothing left unread: the repeat sweep resolves without a request.
    let repeat = sync
        .mark_all_read("ECL-001", Role::School)
        .await
        .expect("repeat sweep is local");
    assert!(!repeat);

    assert_eq!(
        gateway.paths(),
        vec![
            "/api/notifications?user_id=ECL-001&user_type=ecole".to_owned(),
            "/api/notifications/5/marquer-lue".to_owned(),
            "/api/notifications/tout-marquer-lu".to_owned(),
        ]
    );
    let calls = gateway.calls();
    // The read receipt carries no payload.
    assert_eq!(calls[1].body, Some(Value::Null));
    assert_eq!(
        calls[2].body,
        Some(json!({ "user_id": "ECL-001", "user_type": "ecole" }))
    );
}

#[tokio::test]
async fn the_poller_refreshes_after_each_elapsed_interval() {
    let gateway = Arc::new(ScriptedGateway::default());
    gateway.push_error(ApiError::network("connection reset"));
    gateway.push_ok(feed());
    let sync = Arc::new(NotificationsSync::new(gateway.clone()));
    let sleeper = Arc::new(ManualSleeper::default());

    let handle = sync.spawn_unread_poller(
        "ECL-001",
        Role::School,
        sleeper.clone(),
        UNREAD_POLL_INTERVAL,
    );

    // The loop parks on its first sleep without touching the server.
    settle(|| sleeper.sleeps_started() == 1).await;
    assert!(gateway.calls().is_empty());

    // First tick fails; the loop logs and keeps going.
    sleeper.release_one();
    settle(|| sleeper.sleeps_started() == 2).await;
    assert!(handle.is_active());

    // Second tick succeeds and updates the badge.
    sleeper.release_one();
    settle(|| sleeper.sleeps_started() == 3).await;
    assert_eq!(gateway.paths().len(), 2);
    assert_eq!(sync.unread(), 2);
}

#[tokio::test]
async fn dropping_the_handle_stops_the_refreshes() {
    let gateway = Arc::new(ScriptedGateway::default());
    let sync = Arc::new(NotificationsSync::new(gateway.clone()));
    let sleeper = Arc::new(ManualSleeper::default());

    let handle = sync.spawn_unread_poller(
        "ECL-001",
        Role::School,
        sleeper.clone(),
        UNREAD_POLL_INTERVAL,
    );
    settle(|| sleeper.sleeps_started() == 1).await;

    drop(handle);
    tokio::task::yield_now().await;
    sleeper.release_one();
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }

    assert!(gateway.calls().is_empty());
    assert_eq!(sleeper.sleeps_started(), 1);
}
