use backend::jokes_api::get_joke;
use dioxus::{logger::tracing::info, prelude::*};
use jokes_shared::apirequests::general::Outcome;

use crate::{
    catch_boundary::JokesCatchBoundary,
    jokes::{JokesScreen, joke_href},
};

#[component]
pub fn JokeDetail(joke_id: String) -> Element {
    let joke = use_server_future(use_reactive((&joke_id,), |(joke_id,)| get_joke(joke_id)))?;

    match joke() {
        Some(Ok(Outcome::Data(joke))) => rsx! {
            JokesScreen {
                div {
                    p { "Here's your hilarious joke:" }
                    p { "{joke.content}" }
                    Link { to: joke_href(&joke.id), "{joke.name} Permalink" }
                }
            }
        },
        Some(Ok(Outcome::Caught(caught))) => {
            info!("Joke not shown: {} {}", caught.status, caught.status_text);
            rsx! {
                JokesCatchBoundary { caught }
            }
        }
        Some(Err(err)) => Err(err.into()),
        None => rsx! {},
    }
}
