//! Room membership and connection tracking

mod connection;
mod registry;

pub use connection::Connection;
pub use registry::RoomRegistry;
