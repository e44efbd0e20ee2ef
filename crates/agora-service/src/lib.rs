//! # agora-service
//!
//! Write-path services: message creation and editing, like and unlike.
//! Validation failures are returned to the submitter as field-level errors
//! and are never broadcast; only successful writes reach the event hub.

pub mod dto;
pub mod services;

pub use dto::{CreateMessageRequest, EditMessageRequest, LikeRequest};
pub use services::{LikeService, MessageService, ServiceContext, ServiceError, ServiceResult};
