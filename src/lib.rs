//! # opportunities-client
//!
//! Client-side session layer for the opportunities backend: a REST client
//! bound to one origin, an observable store holding the current user, the
//! bootstrap that resolves "who am I" at startup, and the durable storage the
//! store mirrors itself to.
//!
//! Control flow: [`bootstrap::load`] → [`net::api::ApiClient`] → `@me` →
//! [`state::session::SessionStore`] → storage mirror and subscribers.

pub mod bootstrap;
pub mod config;
pub mod context;
pub mod error;
pub mod net;
pub mod state;
pub mod util;

pub use config::{ClientConfig, StatusPolicy};
pub use context::{SessionContext, StorageKind};
pub use error::{ApiError, ConfigError};
pub use net::api::ApiClient;
pub use net::types::User;
pub use state::session::{SessionStore, Subscription};

#[cfg(test)]
#[path = "mock_backend_test.rs"]
mod mock_backend;
