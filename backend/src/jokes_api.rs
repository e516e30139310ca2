#[cfg(feature = "server")]
use crate::models::SqliteJokes;
#[cfg(feature = "server")]
use dioxus::logger::tracing::info;
use dioxus::prelude::{ServerFnError, server, server_fn};
use jokes_shared::{
    apirequests::{
        general::Outcome,
        jokes::{JokeSubmission, NewJokeForm},
    },
    datatypes::{Joke, PageData},
};

/// The data of the jokes layout: the user of the session and up to five teasers.
///
/// # Errors
/// Fails with [`ServerFnError`] if the session or the database cannot be accessed.
#[server(GetJokesPageData, endpoint = "jokes_page")]
pub async fn get_jokes_page_data() -> Result<PageData, ServerFnError> {
    let auth = crate::auth::get_session().await?;
    let db = crate::get_db().await?;
    crate::loader::load_jokes_page(&SqliteJokes::new(db), &auth).await
}

/// A random joke for the jokes index, 404 if there is none.
#[server(GetRandomJoke, endpoint = "random_joke")]
pub async fn get_random_joke() -> Result<Outcome<Joke>, ServerFnError> {
    let db = crate::get_db().await?;
    crate::jokes::random_joke(&db).await
}

/// A single joke, 404 if the id is unknown.
#[server(GetJoke, endpoint = "get_joke")]
pub async fn get_joke(joke_id: String) -> Result<Outcome<Joke>, ServerFnError> {
    info!("Getting joke {:?}", joke_id);
    let db = crate::get_db().await?;
    crate::jokes::joke_by_id(&db, &joke_id).await
}

/// Only logged in users may see the form for new jokes.
#[server(NewJokeAccess, endpoint = "new_joke_access")]
pub async fn new_joke_access() -> Result<Outcome<()>, ServerFnError> {
    let auth = crate::auth::get_session().await?;
    Ok(crate::jokes::new_joke_access(
        crate::auth::session_user(&auth).as_ref(),
    ))
}

/// Store a new joke of the logged in user.
///
/// # Errors
/// Fails with [`ServerFnError`] if the database cannot be accessed.
#[server(CreateJoke, endpoint = "create_joke")]
pub async fn create_joke(form: NewJokeForm) -> Result<Outcome<JokeSubmission>, ServerFnError> {
    let auth = crate::auth::get_session().await?;
    let db = crate::get_db().await?;
    crate::jokes::submit_joke(&db, crate::auth::session_user(&auth), form).await
}
