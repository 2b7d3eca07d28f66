//! Core types and service wiring for the binday bin collection lookup.

/// Synthetic schedules served when a live lookup fails.
pub mod mock;
/// Domain models shared by the provider and the HTTP front door.
pub mod model;
/// Traits describing the provider interface.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;

pub use mock::*;
pub use model::*;
pub use ports::*;
pub use service::*;
