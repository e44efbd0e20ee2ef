//! Domain entities

mod like;
mod message;
mod post;
mod user;

pub use like::{Like, LikeWithRelations, LikeWithUser};
pub use message::{Message, MessageWithRelations};
pub use post::Post;
pub use user::User;
