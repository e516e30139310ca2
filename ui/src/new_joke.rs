use backend::jokes_api::{create_joke, new_joke_access};
use dioxus::{
    logger::tracing::{error, info},
    prelude::*,
};
use jokes_shared::apirequests::{
    general::Outcome,
    jokes::{JokeFieldErrors, JokeSubmission, NewJokeForm},
};

use crate::{Route, catch_boundary::JokesCatchBoundary, jokes::JokesScreen};

/// `/jokes/new`, only for logged in users.
#[component]
pub fn NewJoke() -> Element {
    let access = use_server_future(new_joke_access)?;

    match access() {
        Some(Ok(Outcome::Data(()))) => rsx! {
            JokesScreen {
                NewJokeEditor {}
            }
        },
        Some(Ok(Outcome::Caught(caught))) => rsx! {
            JokesCatchBoundary { caught }
        },
        Some(Err(err)) => Err(err.into()),
        None => rsx! {},
    }
}

#[component]
fn NewJokeEditor() -> Element {
    let mut name = use_signal(String::new);
    let mut content = use_signal(String::new);
    let mut field_errors = use_signal(JokeFieldErrors::default);
    let mut failure = use_signal(|| None::<String>);
    let nav = navigator();

    rsx! {
        div {
            p { "Add your own hilarious joke" }
            form { onsubmit: move |event| { info!("Submitted! {event:?}") },
                div {
                    label {
                        "Name: "
                        input {
                            r#type: "text",
                            value: "{name}",
                            oninput: move |e| name.set(e.value()),
                        }
                    }
                    if let Some(message) = field_errors().name {
                        p { class: "form-validation-error", role: "alert", "{message}" }
                    }
                }
                div {
                    label {
                        "Content: "
                        textarea {
                            value: "{content}",
                            oninput: move |e| content.set(e.value()),
                        }
                    }
                    if let Some(message) = field_errors().content {
                        p { class: "form-validation-error", role: "alert", "{message}" }
                    }
                }
                if let Some(message) = failure() {
                    p { class: "form-validation-error", role: "alert", "{message}" }
                }
                button {
                    class: "button",
                    onclick: move |_| {
                        async move {
                            let form = NewJokeForm {
                                name: name.to_string(),
                                content: content.to_string(),
                            };
                            failure.set(None);
                            if let Err(errors) = form.validate() {
                                field_errors.set(errors);
                                return;
                            }
                            field_errors.set(JokeFieldErrors::default());
                            match create_joke(form).await {
                                Ok(Outcome::Data(JokeSubmission::Created(teaser))) => {
                                    nav.push(Route::JokeDetail {
                                        joke_id: teaser.id,
                                    });
                                }
                                Ok(Outcome::Data(JokeSubmission::Invalid(errors))) => {
                                    field_errors.set(errors);
                                }
                                Ok(Outcome::Caught(caught)) => {
                                    info!("Joke rejected: {} {}", caught.status, caught.status_text);
                                    nav.push(Route::LoginScreen {});
                                }
                                Err(e) => {
                                    error!("Failed to create the joke: {:?}", e);
                                    failure.set(Some("The joke could not be saved, please try again".to_owned()));
                                }
                            }
                        }
                    },
                    "Add"
                }
            }
        }
    }
}
