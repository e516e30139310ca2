//! Types for submitting jokes

use serde::{Deserialize, Serialize};

use crate::datatypes::JokeTeaser;

pub const MIN_NAME_LENGTH: usize = 3;
pub const MIN_CONTENT_LENGTH: usize = 10;

/// The data of the "add your own" form.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewJokeForm {
    pub name: String,
    pub content: String,
}

/// Per field complaints about a [`NewJokeForm`].
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JokeFieldErrors {
    pub name: Option<String>,
    pub content: Option<String>,
}

impl JokeFieldErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.content.is_none()
    }
}

impl NewJokeForm {
    /// Check the lengths of name and content, counted in characters after trimming.
    ///
    /// # Errors
    /// Returns the complaints for every field that is too short.
    pub fn validate(&self) -> Result<(), JokeFieldErrors> {
        let mut errors = JokeFieldErrors::default();
        if self.name.trim().chars().count() < MIN_NAME_LENGTH {
            errors.name = Some("That joke's name is too short".to_owned());
        }
        if self.content.trim().chars().count() < MIN_CONTENT_LENGTH {
            errors.content = Some("That joke is too short".to_owned());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// What happened to a submitted joke.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum JokeSubmission {
    Created(JokeTeaser),
    Invalid(JokeFieldErrors),
}
