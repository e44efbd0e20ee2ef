//! # agora-core
//!
//! Domain layer containing entities, repository traits, and domain errors.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{Like, LikeWithRelations, LikeWithUser, Message, MessageWithRelations, Post, User};
pub use error::DomainError;
pub use traits::{LikeRepository, MessageRepository, PostRepository, RepoResult, UserRepository};
