//! Hub state
//!
//! Application state shared by every connection handler.

use std::sync::Arc;

use agora_common::AppConfig;
use agora_service::ServiceContext;

use crate::rooms::RoomRegistry;

/// Hub application state
#[derive(Clone)]
pub struct HubState {
    /// Service context with repositories
    service_context: Arc<ServiceContext>,
    /// Room registry for connections and membership
    rooms: Arc<RoomRegistry>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl HubState {
    /// Create a new hub state
    pub fn new(service_context: ServiceContext, rooms: Arc<RoomRegistry>, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            rooms,
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the room registry
    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for HubState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubState")
            .field("rooms", &self.rooms)
            .finish()
    }
}
