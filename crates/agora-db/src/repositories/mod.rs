//! PostgreSQL repository implementations

mod error;
mod like;
mod message;
mod post;
mod user;

pub use error::map_db_error;
pub use like::PgLikeRepository;
pub use message::PgMessageRepository;
pub use post::PgPostRepository;
pub use user::PgUserRepository;
