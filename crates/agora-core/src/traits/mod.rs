//! Repository traits (ports)

mod repositories;

pub use repositories::{
    LikeRepository, MessageRepository, PostRepository, RepoResult, UserRepository,
};
