use backend::jokes_api::get_random_joke;
use dioxus::prelude::*;
use jokes_shared::apirequests::general::Outcome;

use crate::{
    catch_boundary::JokesCatchBoundary,
    jokes::{JokesScreen, joke_href},
};

/// `/jokes` shows a random joke.
#[component]
pub fn JokesIndex() -> Element {
    let joke = use_server_future(get_random_joke)?;

    match joke() {
        Some(Ok(Outcome::Data(joke))) => rsx! {
            JokesScreen {
                div {
                    p { "Here's a random joke:" }
                    p { "{joke.content}" }
                    Link { to: joke_href(&joke.id), "\"{joke.name}\" Permalink" }
                }
            }
        },
        Some(Ok(Outcome::Caught(caught))) => rsx! {
            JokesCatchBoundary { caught }
        },
        Some(Err(err)) => Err(err.into()),
        None => rsx! {},
    }
}
