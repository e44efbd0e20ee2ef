//! End-to-end synchronization tests
//!
//! Two simulated clients share one in-process hub backed by the in-memory
//! store. Run with: cargo test -p integration-tests --test sync_tests

use integration_tests::{seed_message, seed_post, seed_user, TestHub};

use agora_core::traits::MessageRepository;
use agora_hub::protocol::{LikeRef, MessageRef, PingPayload};
use agora_hub::{ClientEvent, ServerEvent};
use agora_service::{CreateMessageRequest, LikeRequest, LikeService, MessageService};
use agora_sync::{EngineState, SyncEngine};
use uuid::Uuid;

#[tokio::test]
async fn test_post_broadcast_is_enriched_and_excludes_sender() {
    let hub = TestHub::start();
    let author = seed_user(&hub.store);
    let post = seed_post(&hub.store, &author).await;

    let mut a = hub.connect("a");
    let mut b = hub.connect("b");
    a.join(post.id).await;
    b.join(post.id).await;

    // A writes through the service, then publishes the bare id
    let created = MessageService::new(hub.context())
        .create(
            author.id,
            CreateMessageRequest {
                post_id: post.id,
                parent_id: None,
                text: "first!".to_string(),
            },
        )
        .await
        .unwrap();

    a.emit(ClientEvent::MessagePosted(MessageRef { id: created.id() }))
        .await
        .unwrap();

    // B gets the full enriched record without re-fetching the page
    match b.recv().await {
        ServerEvent::MessagePosted(message) => {
            assert_eq!(message.id(), created.id());
            assert_eq!(message.message.text, "first!");
            assert_eq!(message.user.id, author.id);
            assert!(message.likes.is_empty());
        }
        other => panic!("expected messagePosted, got {}", other.name()),
    }

    // The sender never hears its own broadcast
    a.assert_silent();
}

#[tokio::test]
async fn test_like_unlike_round_trip_leaves_observer_unchanged() {
    let hub = TestHub::start();
    let author = seed_user(&hub.store);
    let liker = seed_user(&hub.store);
    let post = seed_post(&hub.store, &author).await;
    let message = seed_message(&hub.store, &post, &author, "likeable").await;

    let a = hub.connect("a");
    let mut b = hub.connect("b");
    a.join(post.id).await;
    b.join(post.id).await;

    // B's engine starts from the page snapshot
    let snapshot = hub
        .context()
        .message_repo()
        .find_by_post_with_relations(post.id)
        .await
        .unwrap();
    let mut engine_b = SyncEngine::new(post.id, snapshot);
    let original = engine_b.cache().get(message.id).unwrap().likes.clone();

    let like_service = LikeService::new(hub.context());
    let request = LikeRequest {
        message_id: message.id,
        emoji: "👍".to_string(),
    };

    // Like, announce, observe
    let liked = like_service.like(liker.id, request.clone()).await.unwrap();
    a.emit(ClientEvent::LikePosted(LikeRef { id: liked.like.id }))
        .await
        .unwrap();
    b.drain_into(&mut engine_b);
    assert_eq!(engine_b.cache().get(message.id).unwrap().likes.len(), 1);

    // Unlike carries the full deleted record; the hub relays it as-is
    let removed = like_service.unlike(liker.id, request).await.unwrap();
    a.emit(ClientEvent::UnlikePosted(removed)).await.unwrap();
    b.drain_into(&mut engine_b);

    assert_eq!(engine_b.cache().get(message.id).unwrap().likes, original);
}

#[tokio::test]
async fn test_drift_reply_goes_to_requester_only() {
    let hub = TestHub::start();
    let author = seed_user(&hub.store);
    let post = seed_post(&hub.store, &author).await;
    seed_message(&hub.store, &post, &author, "one").await;

    let mut a = hub.connect("a");
    let mut b = hub.connect("b");
    a.join(post.id).await;
    b.join(post.id).await;

    // A's count disagrees with the store
    a.emit(ClientEvent::Ping(PingPayload {
        post_id: post.id,
        number_of_messages_in_list: 0,
    }))
    .await
    .unwrap();

    assert_eq!(a.recv().await, ServerEvent::OutOfSync(true));
    b.assert_silent();

    // An agreeing count draws no reply at all
    a.emit(ClientEvent::Ping(PingPayload {
        post_id: post.id,
        number_of_messages_in_list: 1,
    }))
    .await
    .unwrap();
    a.assert_silent();
}

#[tokio::test]
async fn test_missing_entity_is_dropped_silently() {
    let hub = TestHub::start();
    let author = seed_user(&hub.store);
    let post = seed_post(&hub.store, &author).await;

    let mut a = hub.connect("a");
    let mut b = hub.connect("b");
    a.join(post.id).await;
    b.join(post.id).await;

    // References nothing in the store; no broadcast, no error back
    a.emit(ClientEvent::MessagePosted(MessageRef { id: Uuid::new_v4() }))
        .await
        .unwrap();
    a.emit(ClientEvent::LikePosted(LikeRef { id: Uuid::new_v4() }))
        .await
        .unwrap();

    b.assert_silent();

    // The connection survives and keeps working
    a.emit(ClientEvent::Ping(PingPayload {
        post_id: post.id,
        number_of_messages_in_list: 0,
    }))
    .await
    .unwrap();
    assert_eq!(a.recv().await, ServerEvent::OutOfSync(true));
}

#[tokio::test]
async fn test_edit_updates_observer_and_unknown_edit_is_noop() {
    let hub = TestHub::start();
    let author = seed_user(&hub.store);
    let post = seed_post(&hub.store, &author).await;
    let known = seed_message(&hub.store, &post, &author, "typo").await;
    // In the store but deliberately missing from B's snapshot
    let unseen = seed_message(&hub.store, &post, &author, "unseen").await;

    let a = hub.connect("a");
    let mut b = hub.connect("b");
    a.join(post.id).await;
    b.join(post.id).await;

    let snapshot = hub
        .context()
        .message_repo()
        .find_by_id_with_relations(known.id)
        .await
        .unwrap()
        .unwrap();
    let mut engine_b = SyncEngine::new(post.id, vec![snapshot]);

    let message_service = MessageService::new(hub.context());
    message_service
        .edit(
            author.id,
            agora_service::EditMessageRequest {
                message_id: known.id,
                text: "fixed".to_string(),
            },
        )
        .await
        .unwrap();

    a.emit(ClientEvent::MessageEdited(MessageRef { id: known.id }))
        .await
        .unwrap();
    a.emit(ClientEvent::MessageEdited(MessageRef { id: unseen.id }))
        .await
        .unwrap();

    b.drain_into(&mut engine_b);

    assert_eq!(
        engine_b.cache().get(known.id).unwrap().message.text,
        "fixed"
    );
    // The edit for the message B never loaded neither errors nor appears
    assert!(engine_b.cache().get(unseen.id).is_none());
    assert_eq!(engine_b.cache().len(), 1);
}

#[tokio::test]
async fn test_disconnect_removes_room_membership() {
    let hub = TestHub::start();
    let author = seed_user(&hub.store);
    let post = seed_post(&hub.store, &author).await;
    let message = seed_message(&hub.store, &post, &author, "hello").await;

    let a = hub.connect("a");
    let mut b = hub.connect("b");
    a.join(post.id).await;
    b.join(post.id).await;
    assert_eq!(hub.state.rooms().member_count(post.id), 2);

    b.disconnect().await;
    assert_eq!(hub.state.rooms().member_count(post.id), 1);

    // Broadcast after the disconnect reaches nobody else
    a.emit(ClientEvent::MessagePosted(MessageRef { id: message.id }))
        .await
        .unwrap();
    b.assert_silent();
}

#[tokio::test]
async fn test_engine_end_to_end_over_dispatcher_transport() {
    let hub = TestHub::start();
    let author = seed_user(&hub.store);
    let post = seed_post(&hub.store, &author).await;

    let mut a = hub.connect("a");
    let mut b = hub.connect("b");

    let mut engine_a = SyncEngine::new(post.id, Vec::new());
    let mut engine_b = SyncEngine::new(post.id, Vec::new());
    engine_a.connect(a.transport()).await.unwrap();
    engine_b.connect(b.transport()).await.unwrap();
    assert_eq!(engine_a.state(), EngineState::Joined);
    assert_eq!(hub.state.rooms().member_count(post.id), 2);

    // A writes and announces through its engine
    let created = MessageService::new(hub.context())
        .create(
            author.id,
            CreateMessageRequest {
                post_id: post.id,
                parent_id: None,
                text: "hello room".to_string(),
            },
        )
        .await
        .unwrap();
    engine_a.apply_own_write(created.clone());
    engine_a.announce_message_posted(created.id()).await.unwrap();

    b.drain_into(&mut engine_b);
    a.drain_into(&mut engine_a);

    // Both sides converge; B learned it from the broadcast, A from its write
    assert_eq!(engine_a.cache().len(), 1);
    assert_eq!(engine_b.cache().len(), 1);
    assert_eq!(
        engine_b.cache().get(created.id()).unwrap().message.text,
        "hello room"
    );
}

#[tokio::test]
async fn test_engine_gives_up_after_three_drifts() {
    let hub = TestHub::start();
    let author = seed_user(&hub.store);
    let post = seed_post(&hub.store, &author).await;
    seed_message(&hub.store, &post, &author, "missed").await;

    let mut a = hub.connect("a");

    // The engine's empty cache disagrees with the store forever
    let mut engine = SyncEngine::new(post.id, Vec::new());
    engine.connect(a.transport()).await.unwrap();

    for _ in 0..3 {
        engine.reconcile().await.unwrap();
        a.drain_into(&mut engine);
    }

    assert_eq!(engine.state(), EngineState::Desynced);
    assert!(engine.warning().is_some());
    assert_eq!(engine.reconcile_interval(), None);
}
