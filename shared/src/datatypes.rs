use serde::{Deserialize, Serialize, Serializer};

/// A registered jokester.
#[derive(PartialEq, Serialize, Deserialize, Clone, Debug)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: Secret,
}

/// The short version of a joke as shown in the list of the jokes layout.
#[derive(PartialEq, Eq, Serialize, Deserialize, Clone, Debug)]
pub struct JokeTeaser {
    pub id: String,
    pub name: String,
}

/// A complete joke.
#[derive(PartialEq, Serialize, Deserialize, Clone, Debug)]
pub struct Joke {
    pub id: String,
    pub jokester_id: i64,
    pub name: String,
    pub content: String,
    pub created_at: chrono::NaiveDateTime,
}

impl Joke {
    #[must_use]
    pub fn teaser(&self) -> JokeTeaser {
        JokeTeaser {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Everything the jokes layout needs for one request.
///
/// The field names on the wire are `user` and `jokeListItems`.
#[derive(PartialEq, Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub user: Option<User>,
    pub joke_list_items: Vec<JokeTeaser>,
}

impl PageData {
    #[must_use]
    pub fn viewer(&self) -> Viewer {
        Viewer::from(self.user.clone())
    }
}

/// Who is looking at the page.
#[derive(PartialEq, Clone, Debug, Default)]
pub enum Viewer {
    Authenticated(User),
    #[default]
    Anonymous,
}

impl Viewer {
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Anonymous => None,
        }
    }
}

impl From<Option<User>> for Viewer {
    fn from(user: Option<User>) -> Self {
        user.map_or(Self::Anonymous, Self::Authenticated)
    }
}

#[derive(PartialEq, Clone, Deserialize)]
#[serde(from = "String")]
pub struct Secret {
    pub secret: Option<String>,
    pub is_random: bool,
}

impl From<String> for Secret {
    fn from(_: String) -> Self {
        Self {
            secret: None,
            is_random: false,
        }
    }
}

impl Serialize for Secret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str("*****SECRET*****")
    }
}

impl Secret {
    #[must_use]
    pub const fn new(secret: String) -> Self {
        Self {
            secret: Some(secret),
            is_random: false,
        }
    }

    /// Generate a throwaway secret, passwords hashed with it are lost on restart.
    #[cfg(feature = "server")]
    #[must_use]
    pub fn random() -> Self {
        use rand::{Rng as _, distributions::Alphanumeric};

        let secret: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        Self {
            secret: Some(secret),
            is_random: true,
        }
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("*****SECRET*****")
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("*****SECRET*****")
    }
}
