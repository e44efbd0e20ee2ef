//! # agora-db
//!
//! Persistence layer implementing the repository traits from `agora-core`.
//!
//! Two backends live here:
//!
//! - PostgreSQL via SQLx (`Pg*Repository`), the production store;
//! - an in-memory store (`memory::InMemoryStore`) backing tests and demos.
//!
//! The event hub only ever talks to the trait objects, so the two are
//! interchangeable.

pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

pub use memory::InMemoryStore;
pub use pool::{create_pool, PgPool};
pub use repositories::{
    PgLikeRepository, PgMessageRepository, PgPostRepository, PgUserRepository,
};
