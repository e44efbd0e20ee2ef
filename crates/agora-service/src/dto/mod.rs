//! Request DTOs

mod requests;

pub use requests::{CreateMessageRequest, EditMessageRequest, LikeRequest};
