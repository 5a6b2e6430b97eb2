//! Application-lifetime session context.
//!
//! SYSTEM CONTEXT
//! ==============
//! Built once at startup and passed explicitly to whatever needs the API
//! client or the current user. Dropping it tears the session down; the
//! persisted copy stays in durable storage for the next start.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use std::path::PathBuf;
use std::rc::Rc;

use crate::bootstrap;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::net::api::ApiClient;
use crate::net::types::User;
use crate::state::session::SessionStore;
#[cfg(feature = "hydrate")]
use crate::util::storage::LocalStorage;
use crate::util::storage::{FileStorage, NullStorage, SessionStorage};

/// Durable storage backend chosen for a [`SessionContext`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageKind {
    /// Browser `localStorage`.
    #[cfg(feature = "hydrate")]
    Local,
    /// One file per key under the directory.
    File(PathBuf),
    Null,
}

impl StorageKind {
    /// Browser builds always use `localStorage`.
    #[cfg(feature = "hydrate")]
    #[must_use]
    pub fn for_config(_config: &ClientConfig) -> Self {
        Self::Local
    }

    /// Persist to `config.session_dir` when set and nowhere otherwise.
    #[cfg(not(feature = "hydrate"))]
    #[must_use]
    pub fn for_config(config: &ClientConfig) -> Self {
        match &config.session_dir {
            Some(dir) => Self::File(dir.clone()),
            None => Self::Null,
        }
    }

    #[must_use]
    pub fn open(self) -> Rc<dyn SessionStorage> {
        match self {
            #[cfg(feature = "hydrate")]
            Self::Local => Rc::new(LocalStorage),
            Self::File(dir) => Rc::new(FileStorage::new(dir)),
            Self::Null => Rc::new(NullStorage),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionContext {
    api: ApiClient,
    store: SessionStore,
}

impl SessionContext {
    /// Build the API client and seed the store from `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built from `config`.
    pub fn new(config: &ClientConfig, storage: Rc<dyn SessionStorage>) -> Result<Self, ApiError> {
        Ok(Self { api: ApiClient::new(config)?, store: SessionStore::new(storage) })
    }

    /// Like [`SessionContext::new`], with storage picked by [`StorageKind::for_config`].
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config, StorageKind::for_config(config).open())
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Resolve the current user. See [`bootstrap::load`].
    pub async fn bootstrap(&self) -> Option<User> {
        bootstrap::load(&self.api, &self.store).await
    }

    /// See [`bootstrap::logout`].
    pub async fn logout(&self) {
        bootstrap::logout(&self.api, &self.store).await;
    }
}
