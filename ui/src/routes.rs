use crate::{
    about::About, home::Home, joke_detail::JokeDetail, jokes::JokesRoute,
    jokes_index::JokesIndex, login::LoginScreen, new_joke::NewJoke,
};
use dioxus::prelude::*;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/about")]
    About {},
    #[route("/login")]
    LoginScreen {},
    #[nest("/jokes")]
        #[layout(JokesRoute)]
            #[route("/")]
            JokesIndex {},
            #[route("/new")]
            NewJoke {},
            #[route("/:joke_id")]
            JokeDetail { joke_id: String },
        #[end_layout]
    #[end_nest]
    // PageNotFound is a catch all route that will match any route and placing the matched segments in the route field
    #[route("/:..route")]
    PageNotFound { route: Vec<String> },
}

#[component]
pub fn PageNotFound(route: Vec<String>) -> Element {
    rsx! {
        div { class: "container",
            div { class: "content",
                h1 { "404 - Page not found" }
                p { "The page you requested could not be found." }
                p { "Requested route: {route.join(\"/\")}" }
                Link { to: Route::JokesIndex {}, "Read some jokes instead" }
            }
        }
    }
}
