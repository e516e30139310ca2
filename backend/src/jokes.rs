//! The joke loaders and actions behind the server functions.

use dioxus::{logger::tracing::info, prelude::ServerFnError};
use jokes_shared::{
    apirequests::{
        general::{CaughtResponse, Outcome},
        jokes::{JokeSubmission, NewJokeForm},
    },
    datatypes::{Joke, User},
};
use sqlx::SqlitePool;

use crate::models::{JokeDbOperations as _, NewJoke};

pub(crate) async fn random_joke(db: &SqlitePool) -> Result<Outcome<Joke>, ServerFnError> {
    Ok(match Joke::get_random_joke(db).await? {
        Some(joke) => Outcome::Data(joke),
        None => Outcome::Caught(CaughtResponse::not_found("No random joke found")),
    })
}

pub(crate) async fn joke_by_id(db: &SqlitePool, joke_id: &str) -> Result<Outcome<Joke>, ServerFnError> {
    Ok(match Joke::get_joke_by_id(db, joke_id).await? {
        Some(joke) => Outcome::Data(joke),
        None => Outcome::Caught(CaughtResponse::not_found("Not Found")),
    })
}

pub(crate) fn new_joke_access(user: Option<&User>) -> Outcome<()> {
    match user {
        Some(_) => Outcome::Data(()),
        None => Outcome::Caught(CaughtResponse::unauthorized()),
    }
}

/// Validate and store a joke of `user`, anonymous visitors get a 401.
pub(crate) async fn submit_joke(
    db: &SqlitePool,
    user: Option<User>,
    form: NewJokeForm,
) -> Result<Outcome<JokeSubmission>, ServerFnError> {
    let Some(user) = user else {
        return Ok(Outcome::Caught(CaughtResponse::unauthorized()));
    };
    if let Err(errors) = form.validate() {
        return Ok(Outcome::Data(JokeSubmission::Invalid(errors)));
    }

    let joke = NewJoke::new(
        form.name.trim().to_owned(),
        form.content.trim().to_owned(),
        user.id,
    )
    .insert(db)
    .await?;
    info!("{} created the joke {}", user.username, joke.id);
    Ok(Outcome::Data(JokeSubmission::Created(joke.teaser())))
}

#[cfg(test)]
mod tests {
    use jokes_shared::apirequests::jokes::JokeFieldErrors;

    use super::*;
    use crate::models::{
        SqliteJokes,
        tests::{insert_kody, memory_db},
    };
    use crate::loader::JokeTeaserSource as _;

    fn form(name: &str, content: &str) -> NewJokeForm {
        NewJokeForm {
            name: name.to_owned(),
            content: content.to_owned(),
        }
    }

    #[tokio::test]
    async fn empty_store_has_no_random_joke() {
        let db = memory_db().await;
        assert_eq!(
            random_joke(&db).await.unwrap(),
            Outcome::Caught(CaughtResponse::new(404, "No random joke found"))
        );
    }

    #[tokio::test]
    async fn unknown_joke_is_not_found() {
        let db = memory_db().await;
        assert_eq!(
            joke_by_id(&db, "does-not-exist").await.unwrap(),
            Outcome::Caught(CaughtResponse::new(404, "Not Found"))
        );
    }

    #[test]
    fn anonymous_visitors_may_not_add_jokes() {
        assert_eq!(
            new_joke_access(None),
            Outcome::Caught(CaughtResponse::new(401, "Unauthorized"))
        );
    }

    #[tokio::test]
    async fn anonymous_submission_is_unauthorized_and_stores_nothing() {
        let db = memory_db().await;
        let outcome = submit_joke(&db, None, form("Frisbee", "Then it hit me, hard."))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Caught(CaughtResponse::unauthorized()));
        assert!(SqliteJokes::new(db).find_teasers(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn short_submission_is_invalid() {
        let db = memory_db().await;
        let kody = insert_kody(&db).await;
        let outcome = submit_joke(&db, Some(kody), form("ab", "too short"))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Data(JokeSubmission::Invalid(JokeFieldErrors {
                name: Some("That joke's name is too short".to_owned()),
                content: Some("That joke is too short".to_owned()),
            }))
        );
    }

    #[tokio::test]
    async fn created_joke_is_found_and_leads_the_teasers() {
        let db = memory_db().await;
        let kody = insert_kody(&db).await;
        assert_eq!(new_joke_access(Some(&kody)), Outcome::Data(()));

        let outcome = submit_joke(&db, Some(kody), form(" Frisbee ", "Then it hit me, hard."))
            .await
            .unwrap();
        let Outcome::Data(JokeSubmission::Created(teaser)) = outcome else {
            panic!("the joke was not created: {outcome:?}");
        };
        assert_eq!(teaser.name, "Frisbee");

        let Outcome::Data(joke) = joke_by_id(&db, &teaser.id).await.unwrap() else {
            panic!("the created joke was not found");
        };
        assert_eq!(joke.content, "Then it hit me, hard.");
        let teasers = SqliteJokes::new(db).find_teasers(5).await.unwrap();
        assert_eq!(teasers.first(), Some(&teaser));
    }
}
