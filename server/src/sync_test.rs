use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::{Duration, timeout};
use uuid::Uuid;

use super::*;
use crate::state::test_helpers;
use protocol::normalize::MalformedShapePolicy;

async fn recv_frame(rx: &mut mpsc::Receiver<ServerMessage>) -> ServerMessage {
    timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("broadcast receive timed out")
        .expect("broadcast channel closed unexpectedly")
}

// =============================================================
// Commit
// =============================================================

#[tokio::test]
async fn commit_normalizes_and_replaces() {
    let state = test_helpers::test_app_state();
    let pages = vec![json!({"id": 1, "shapes": [{"type": "rectangle"}]})];
    let snapshot = commit(&state, &pages).await;

    let shape = &snapshot.pages[0].shapes[0];
    assert_eq!((shape.x, shape.y), (0.0, 0.0));
    assert_eq!((shape.width, shape.height), (10.0, 10.0));
    assert!(!shape.id.is_empty());

    let stored = state.board.read().await.snapshot();
    assert_eq!(stored, snapshot);
}

#[tokio::test]
async fn commit_twice_with_identical_normalized_input_is_idempotent() {
    let state = test_helpers::test_app_state();
    // Already-normalized payload: ids present, all fields defined.
    let pages = vec![json!({"id": 1, "shapes": [{
        "type": "rectangle", "id": "r1",
        "x": 1.0, "y": 2.0, "width": 30.0, "height": 40.0,
        "strokeWidth": 5.0, "color": "#abc", "rotation": 0.0,
    }]})];
    let first = commit(&state, &pages).await;
    let second = commit(&state, &pages).await;
    assert_eq!(first, second);
    assert_eq!(state.board.read().await.snapshot(), first);
}

#[tokio::test]
async fn commit_honors_drop_policy() {
    let state = AppState::new(MalformedShapePolicy::Drop);
    let pages = vec![json!({"id": 1, "shapes": [{"type": "rectangle"}]})];
    let snapshot = commit(&state, &pages).await;
    assert!(snapshot.pages[0].shapes.is_empty());
}

// =============================================================
// Broadcast
// =============================================================

#[tokio::test]
async fn broadcast_reaches_every_client_including_sender() {
    let state = test_helpers::test_app_state();
    let (_sender_id, mut rx_a) = test_helpers::attach_client(&state).await;
    let (_other_id, mut rx_b) = test_helpers::attach_client(&state).await;

    let snapshot = state.board.read().await.snapshot();
    broadcast(&state, &ServerMessage::DrawUpdate { pages: snapshot.pages }).await;

    let ServerMessage::DrawUpdate { pages: got_a } = recv_frame(&mut rx_a).await;
    let ServerMessage::DrawUpdate { pages: got_b } = recv_frame(&mut rx_b).await;
    assert_eq!(got_a, got_b);
}

#[tokio::test]
async fn broadcast_skips_full_channels_without_failing() {
    let state = test_helpers::test_app_state();
    // A deliberately tiny channel that is already full.
    let (tx, mut stuck_rx) = mpsc::channel::<ServerMessage>(1);
    tx.try_send(ServerMessage::DrawUpdate { pages: vec![] })
        .expect("first frame fits");
    state.board.write().await.clients.insert(Uuid::new_v4(), tx);
    let (_healthy_id, mut rx) = test_helpers::attach_client(&state).await;

    let snapshot = state.board.read().await.snapshot();
    broadcast(&state, &ServerMessage::DrawUpdate { pages: snapshot.pages.clone() }).await;
    broadcast(&state, &ServerMessage::DrawUpdate { pages: snapshot.pages }).await;

    // The healthy client got both frames; the stuck one lost them.
    recv_frame(&mut rx).await;
    recv_frame(&mut rx).await;
    let ServerMessage::DrawUpdate { pages } = recv_frame(&mut stuck_rx).await;
    assert!(pages.is_empty());
}

#[tokio::test]
async fn departed_client_does_not_affect_document() {
    let state = test_helpers::test_app_state();
    let (client_id, rx) = test_helpers::attach_client(&state).await;
    let pages = vec![json!({"id": 1, "shapes": [{"type": "circle", "id": "c"}]})];
    let committed = commit(&state, &pages).await;

    drop(rx);
    state.board.write().await.clients.remove(&client_id);
    assert_eq!(state.board.read().await.snapshot(), committed);
}
