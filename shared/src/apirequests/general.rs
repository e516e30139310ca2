//! The more generic request datatypes
use serde::{Deserialize, Serialize};

/// A non-2xx response a loader decided to hand to the catch boundary.
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq, Eq)]
pub struct CaughtResponse {
    pub status: u16,
    pub status_text: String,
}

impl CaughtResponse {
    #[must_use]
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
        }
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(401, "Unauthorized")
    }

    #[must_use]
    pub fn not_found(status_text: impl Into<String>) -> Self {
        Self::new(404, status_text)
    }

    /// Only 401 and 404 are expected to reach the jokes layout.
    ///
    /// # Errors
    /// Every other status is reported as [`UnhandledStatus`].
    pub fn handled(&self) -> Result<HandledCatch<'_>, UnhandledStatus> {
        match self.status {
            401 | 404 => Ok(HandledCatch {
                status: self.status,
                status_text: &self.status_text,
            }),
            status => Err(UnhandledStatus { status }),
        }
    }
}

/// A caught response the jokes layout knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandledCatch<'a> {
    pub status: u16,
    pub status_text: &'a str,
}

impl std::fmt::Display for HandledCatch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.status_text)
    }
}

/// A caught response with a status no boundary on this route handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unexpected caught response with status: {status}")]
pub struct UnhandledStatus {
    pub status: u16,
}

/// The result of a loader: either data or a response for the catch boundary.
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq)]
pub enum Outcome<T> {
    Data(T),
    Caught(CaughtResponse),
}
