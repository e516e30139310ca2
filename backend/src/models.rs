use dioxus::{logger::tracing::info, prelude::ServerFnError};
use jokes_shared::{
    apirequests::users::{LoginUser, MAX_CREDENTIAL_LENGTH},
    datatypes::{Joke, JokeTeaser, Secret, User},
};
use serde::Deserialize;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use argon2::{PasswordHasher as _, PasswordVerifier as _};

use crate::loader::JokeTeaserSource;

/// The operations a User should support.
pub trait UserDbOperations<T> {
    async fn get_user(db: &SqlitePool, id: i64) -> Result<Option<T>, ServerFnError>;
    async fn get_user_by_name(db: &SqlitePool, name: &str) -> Result<Option<T>, ServerFnError>;
    async fn count_users(db: &SqlitePool) -> Result<i64, ServerFnError>;
}

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        password: Secret::new(row.get("password_hash")),
    }
}

impl UserDbOperations<Self> for User {
    /// get a user by its id
    ///
    /// # Errors
    /// fails with [`ServerFnError`] if the database cannot be acessed.
    async fn get_user(db: &SqlitePool, id: i64) -> Result<Option<Self>, ServerFnError> {
        let row = sqlx::query("SELECT id, username, password_hash FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    /// get a user by its username
    ///
    /// # Errors
    /// fails with [`ServerFnError`] if the database cannot be acessed.
    async fn get_user_by_name(db: &SqlitePool, name: &str) -> Result<Option<Self>, ServerFnError> {
        let row = sqlx::query("SELECT id, username, password_hash FROM users WHERE username = ?")
            .bind(name)
            .fetch_optional(db)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn count_users(db: &SqlitePool) -> Result<i64, ServerFnError> {
        let row = sqlx::query("SELECT count(*) AS number FROM users")
            .fetch_one(db)
            .await?;
        Ok(row.get("number"))
    }
}

fn argon2_with_secret(secret: &Secret) -> Result<argon2::Argon2<'_>, ServerFnError> {
    let key = secret
        .secret
        .as_deref()
        .ok_or_else(|| ServerFnError::new("No secret configured"))?;
    argon2::Argon2::new_with_secret(
        key.as_bytes(),
        argon2::Algorithm::default(),
        argon2::Version::default(),
        argon2::Params::default(),
    )
    .map_err(|e| ServerFnError::new(format!("Failed to create argon2 hasher: {e}")))
}

/// Check a password against the stored hash of `user`.
pub(crate) fn verify_password(
    user: &User,
    password: &str,
    secret: &Secret,
) -> Result<bool, ServerFnError> {
    let Some(hash) = user.password.secret.as_deref() else {
        return Ok(false);
    };
    let parsed_hash = match argon2::PasswordHash::new(hash) {
        Ok(h) => h,
        Err(e) => {
            info!("Failed to parse password hash for {}: {}", &user.username, e);
            return Ok(false);
        }
    };
    Ok(argon2_with_secret(secret)?
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Relevant parameters when creating a new user
/// Use the [`NewUser::new`] constructor to store the password encrypted. Otherwise it will not work.
#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

impl NewUser {
    /// Create a new user that can then be inserted in the database
    ///
    /// The password is hashed using the secret before creating.
    ///
    /// # Errors
    /// fails with [`ServerFnError`] if the credentials could never pass the login
    /// or the password could not be hashed.
    pub fn new(username: String, password: &str, secret: &Secret) -> Result<Self, ServerFnError> {
        let credentials = LoginUser {
            username,
            password: password.to_owned(),
        };
        if !credentials.is_plausible() {
            return Err(ServerFnError::new(format!(
                "Username and password need between 1 and {MAX_CREDENTIAL_LENGTH} bytes"
            )));
        }
        let password_hash = Self::hash_password(&credentials.password, secret)?;

        Ok(Self {
            username: credentials.username,
            password_hash,
        })
    }

    /// This function uses the Secret from the config settings to hash the password
    pub(crate) fn hash_password(password: &str, secret: &Secret) -> Result<String, ServerFnError> {
        let salt = argon2::password_hash::SaltString::generate(&mut rand::rngs::OsRng);
        let hash = argon2_with_secret(secret)?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ServerFnError::new(format!("Password error: {e}")))?;
        Ok(hash.to_string())
    }

    /// Insert this user into the database.
    ///
    /// # Errors
    /// fails with [`ServerFnError`] if the database cannot be acessed or the username is taken.
    pub async fn insert_user(&self, db: &SqlitePool) -> Result<(), ServerFnError> {
        sqlx::query("INSERT INTO users (username, password_hash, created_at) VALUES (?, ?, ?)")
            .bind(&self.username)
            .bind(&self.password_hash)
            .bind(chrono::Local::now().naive_utc())
            .execute(db)
            .await?;
        Ok(())
    }
}

/// Operations that should be supported by jokes
pub trait JokeDbOperations<T> {
    async fn get_joke_by_id(db: &SqlitePool, id: &str) -> Result<Option<T>, ServerFnError>;
    async fn get_random_joke(db: &SqlitePool) -> Result<Option<T>, ServerFnError>;
    async fn get_recent_jokes(db: &SqlitePool, limit: i64) -> Result<Vec<T>, ServerFnError>;
    async fn get_teasers(db: &SqlitePool, limit: i64) -> Result<Vec<JokeTeaser>, ServerFnError>;
}

fn joke_from_row(row: &SqliteRow) -> Joke {
    Joke {
        id: row.get("id"),
        jokester_id: row.get("jokester_id"),
        name: row.get("name"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

impl JokeDbOperations<Self> for Joke {
    /// Get a joke by its id
    ///
    /// # Errors
    /// fails with [`ServerFnError`] if the database cannot be acessed.
    async fn get_joke_by_id(db: &SqlitePool, id: &str) -> Result<Option<Self>, ServerFnError> {
        let row = sqlx::query(
            "SELECT id, jokester_id, name, content, created_at FROM jokes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        info!("Found joke: {:?}", row.is_some());
        Ok(row.as_ref().map(joke_from_row))
    }

    async fn get_random_joke(db: &SqlitePool) -> Result<Option<Self>, ServerFnError> {
        let row = sqlx::query(
            "SELECT id, jokester_id, name, content, created_at FROM jokes ORDER BY random() LIMIT 1",
        )
        .fetch_optional(db)
        .await?;
        Ok(row.as_ref().map(joke_from_row))
    }

    /// The newest jokes first.
    async fn get_recent_jokes(db: &SqlitePool, limit: i64) -> Result<Vec<Self>, ServerFnError> {
        let rows = sqlx::query(
            "SELECT id, jokester_id, name, content, created_at FROM jokes
            ORDER BY created_at DESC, id ASC
            LIMIT ?",
        )
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(rows.iter().map(joke_from_row).collect())
    }

    /// Only `id` and `name` of the newest jokes.
    async fn get_teasers(db: &SqlitePool, limit: i64) -> Result<Vec<JokeTeaser>, ServerFnError> {
        let rows = sqlx::query(
            "SELECT id, name FROM jokes
            ORDER BY created_at DESC, id ASC
            LIMIT ?",
        )
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(rows
            .into_iter()
            .map(|row| JokeTeaser {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }
}

/// The sqlite database as a source of teasers for the loader.
pub(crate) struct SqliteJokes {
    db: SqlitePool,
}

impl SqliteJokes {
    pub(crate) const fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

impl JokeTeaserSource for SqliteJokes {
    async fn find_teasers(&self, limit: usize) -> Result<Vec<JokeTeaser>, ServerFnError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        Joke::get_teasers(&self.db, limit).await
    }
}

/// Relevant parameters when creating a new joke.
#[derive(Debug)]
pub struct NewJoke {
    pub name: String,
    pub content: String,
    pub jokester_id: i64,
    pub created_at: chrono::NaiveDateTime,
}

impl NewJoke {
    /// `created_at` is populated with the current time.
    pub(crate) fn new(name: String, content: String, jokester_id: i64) -> Self {
        Self {
            name,
            content,
            jokester_id,
            created_at: chrono::Local::now().naive_utc(),
        }
    }

    /// Insert the new joke into the database and return it with its generated id.
    ///
    /// # Errors
    /// fails with [`ServerFnError`] if the database cannot be acessed or constraints are not met.
    pub async fn insert(self, db: &SqlitePool) -> Result<Joke, ServerFnError> {
        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO jokes (
                id,
                jokester_id,
                name,
                content,
                created_at) VALUES (?,?,?,?,?)",
        )
        .bind(&id)
        .bind(self.jokester_id)
        .bind(&self.name)
        .bind(&self.content)
        .bind(self.created_at)
        .execute(db)
        .await?;
        Ok(Joke {
            id,
            jokester_id: self.jokester_id,
            name: self.name,
            content: self.content,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    /// A fresh in-memory database with all migrations applied.
    ///
    /// One connection only, every sqlite memory connection is a database of its own.
    pub(crate) async fn memory_db() -> SqlitePool {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::cli::MIGRATOR.run(&db).await.unwrap();
        db
    }

    pub(crate) fn secret() -> Secret {
        Secret::new("a-test-secret-that-is-long-enough".to_owned())
    }

    pub(crate) async fn insert_kody(db: &SqlitePool) -> User {
        NewUser::new("kody".to_owned(), "twixrox", &secret())
            .unwrap()
            .insert_user(db)
            .await
            .unwrap();
        User::get_user_by_name(db, "kody").await.unwrap().unwrap()
    }

    async fn insert_jokes(db: &SqlitePool, jokester: i64, count: usize) -> Vec<Joke> {
        let start = chrono::NaiveDate::from_ymd_opt(2021, 11, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let mut jokes = Vec::new();
        for i in 0..count {
            let mut joke = NewJoke::new(
                format!("Joke {i}"),
                format!("This is the content of joke number {i}"),
                jokester,
            );
            joke.created_at = start + chrono::Duration::minutes(i as i64);
            jokes.push(joke.insert(db).await.unwrap());
        }
        jokes
    }

    #[tokio::test]
    async fn teasers_are_limited_and_newest_first() {
        let db = memory_db().await;
        let kody = insert_kody(&db).await;
        insert_jokes(&db, kody.id, 8).await;

        let teasers = SqliteJokes::new(db.clone()).find_teasers(5).await.unwrap();
        let names: Vec<_> = teasers.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Joke 7", "Joke 6", "Joke 5", "Joke 4", "Joke 3"]);
    }

    #[tokio::test]
    async fn teasers_of_an_empty_store() {
        let db = memory_db().await;
        let teasers = SqliteJokes::new(db).find_teasers(5).await.unwrap();
        assert!(teasers.is_empty());
    }

    #[tokio::test]
    async fn jokes_are_found_by_id() {
        let db = memory_db().await;
        let kody = insert_kody(&db).await;
        let jokes = insert_jokes(&db, kody.id, 2).await;

        let found = Joke::get_joke_by_id(&db, &jokes[1].id).await.unwrap();
        assert_eq!(found.as_ref(), Some(&jokes[1]));
        assert_eq!(Joke::get_joke_by_id(&db, "missing").await.unwrap(), None);
        assert!(Joke::get_random_joke(&db).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn random_joke_of_an_empty_store() {
        let db = memory_db().await;
        assert_eq!(Joke::get_random_joke(&db).await.unwrap(), None);
    }

    #[tokio::test]
    async fn users_who_could_never_log_in_are_rejected() {
        let db = memory_db().await;
        let too_long = "x".repeat(MAX_CREDENTIAL_LENGTH + 1);
        assert!(NewUser::new(too_long.clone(), "twixrox", &secret()).is_err());
        assert!(NewUser::new("kody".to_owned(), &too_long, &secret()).is_err());
        assert!(NewUser::new(String::new(), "twixrox", &secret()).is_err());
        assert!(NewUser::new("kody".to_owned(), "", &secret()).is_err());

        let longest = "x".repeat(MAX_CREDENTIAL_LENGTH);
        let user = NewUser::new(longest.clone(), &longest, &secret()).unwrap();
        user.insert_user(&db).await.unwrap();
        let stored = User::get_user_by_name(&db, &longest).await.unwrap().unwrap();
        let login = LoginUser {
            username: longest.clone(),
            password: longest.clone(),
        };
        assert!(login.is_plausible());
        assert!(verify_password(&stored, &longest, &secret()).unwrap());
    }

    #[tokio::test]
    async fn passwords_are_verified() {
        let db = memory_db().await;
        let kody = insert_kody(&db).await;
        assert_eq!(User::count_users(&db).await.unwrap(), 1);
        assert_ne!(kody.password.secret.as_deref(), Some("twixrox"));
        assert!(verify_password(&kody, "twixrox", &secret()).unwrap());
        assert!(!verify_password(&kody, "wrong", &secret()).unwrap());
        let other_secret = Secret::new("another-secret-entirely".to_owned());
        assert!(!verify_password(&kody, "twixrox", &other_secret).unwrap());
    }
}
