//! Identity resolution at application start.
//!
//! ERROR HANDLING
//! ==============
//! Every failure (transport, non-JSON body, a body that is not a complete
//! user, strict-status rejection) collapses to "no user". Nothing is raised
//! to the caller; the outcome is always one `set` on the store.

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod bootstrap_test;

use serde_json::Value;

use crate::net::api::{ApiClient, LOGOUT_PATH, WHO_AM_I_PATH};
use crate::net::types::User;
use crate::state::session::SessionStore;

/// Ask the backend who is logged in and store the answer.
///
/// Returns the value that was stored.
pub async fn load(api: &ApiClient, store: &SessionStore) -> Option<User> {
    let user = match api.get::<User>(WHO_AM_I_PATH).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, role = %user.role, "session resolved");
            Some(user)
        }
        Err(e) => {
            tracing::info!(error = %e, "no authenticated user");
            None
        }
    };
    store.set(user.clone());
    user
}

/// End the server-side session, then clear the store whatever the outcome.
pub async fn logout(api: &ApiClient, store: &SessionStore) {
    if let Err(e) = api.post::<Value, _>(LOGOUT_PATH, &()).await {
        tracing::warn!(error = %e, "logout request failed; clearing local session anyway");
    }
    store.clear();
}
