//! Types for user requesting and saving

use serde::{Deserialize, Serialize};

/// The longest username or password the login accepts.
pub const MAX_CREDENTIAL_LENGTH: usize = 32;

/// Data to login.
#[derive(Debug, Deserialize, Default, Serialize, Clone)]
pub struct LoginUser {
    pub username: String,
    pub password: String,
}

impl LoginUser {
    /// A cheap sanity check before the database is asked.
    #[must_use]
    pub fn is_plausible(&self) -> bool {
        !self.username.is_empty()
            && !self.password.is_empty()
            && self.username.len() <= MAX_CREDENTIAL_LENGTH
            && self.password.len() <= MAX_CREDENTIAL_LENGTH
    }
}
