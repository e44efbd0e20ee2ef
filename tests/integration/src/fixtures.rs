//! Test fixtures and data seeding

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use agora_core::entities::{Message, Post, User};
use agora_core::traits::{MessageRepository, PostRepository};
use agora_db::InMemoryStore;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Seed a user with a unique name
pub fn seed_user(store: &Arc<InMemoryStore>) -> User {
    let user = User::new(Uuid::new_v4(), format!("user{}", unique_suffix()));
    store.seed_user(user.clone());
    user
}

/// Seed a post owned by the given user
pub async fn seed_post(store: &Arc<InMemoryStore>, author: &User) -> Post {
    let post = Post::new(
        Uuid::new_v4(),
        format!("post {}", unique_suffix()),
        "https://example.com/cat.gif".to_string(),
        author.id,
    );
    PostRepository::create(store.as_ref(), &post)
        .await
        .expect("post seed failed");
    post
}

/// Seed a top-level message on a post
pub async fn seed_message(
    store: &Arc<InMemoryStore>,
    post: &Post,
    author: &User,
    text: &str,
) -> Message {
    let message = Message::new(Uuid::new_v4(), post.id, author.id, text.to_string());
    MessageRepository::create(store.as_ref(), &message)
        .await
        .expect("message seed failed");
    message
}
