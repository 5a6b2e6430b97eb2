//! Wire DTOs shared by the REST client and the session store.
//!
//! DESIGN
//! ======
//! `User` has no defaulted fields: a payload missing any of them fails to
//! deserialize, so the session store never holds a partially filled record.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Role string the backend requires for moderator-only routes.
pub const MODERATOR_ROLE: &str = "moderator";

/// An authenticated user as returned by the `@me` endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Account classification (e.g. `"user"`, `"admin"`, `"moderator"`).
    pub role: String,
    /// Display name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Whether the account is usable.
    pub account_active: bool,
    /// Whether the account is administratively blocked.
    pub is_banned: bool,
}

impl User {
    #[must_use]
    pub fn is_moderator(&self) -> bool {
        self.role == MODERATOR_ROLE
    }

    /// Active and not banned.
    #[must_use]
    pub fn can_act(&self) -> bool {
        self.account_active && !self.is_banned
    }
}
