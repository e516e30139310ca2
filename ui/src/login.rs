use dioxus::{logger::tracing::info, prelude::*};

use crate::Route;

#[component]
pub fn LoginScreen() -> Element {
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut failure = use_signal(|| None::<String>);
    let nav = navigator();

    rsx! {
        form { onsubmit: move |event| { info!("Submitted! {event:?}") },
            div { class: "center login",
                h1 { "Login" }
                div {
                    label { "Username" }
                    input {
                        r#type: "text",
                        autofocus: true,
                        value: "{username}",
                        placeholder: "Username",
                        oninput: move |e| {
                            username.set(e.value());
                        },
                    }
                }
                div {
                    label { "Password" }
                    input {
                        r#type: "password",
                        placeholder: "Password",
                        value: "{password}",
                        oninput: move |e| {
                            password.set(e.value());
                        },
                    }
                }
                if let Some(message) = failure() {
                    p { class: "form-validation-error", role: "alert", "{message}" }
                }
                button {
                    onclick: move |_| {
                        async move {
                            info!("Logging in with username: {}", username);
                            match backend::auth_api::login(username.to_string(), password.to_string())
                                .await
                            {
                                Ok(_) => {
                                    nav.push(Route::JokesIndex {});
                                }
                                Err(e) => {
                                    info!("Failed to login: {:?}", e);
                                    failure.set(Some("Username/Password combination is incorrect".to_owned()));
                                }
                            }
                        }
                    },
                    "Login"
                }
            }
        }
    }
}
