//! Service implementations

mod context;
mod error;
mod like;
mod message;

pub use context::ServiceContext;
pub use error::{ServiceError, ServiceResult};
pub use like::LikeService;
pub use message::MessageService;
