//! The `/jokes` layout: header, footer, the outlet for the child routes and
//! the list of teasers below the child content.

use backend::jokes_api::get_jokes_page_data;
use dioxus::{logger::tracing::error, prelude::*};
use jokes_shared::datatypes::{JokeTeaser, PageData, Viewer};

use crate::Route;

const JOKES_LAYOUT_CSS: Asset = asset!("/assets/styling/jokes-layout.css");

/// A `<link>` the layout adds to the document head.
#[derive(Clone)]
pub struct PageLink {
    pub rel: &'static str,
    pub href: Asset,
}

/// The links of the jokes layout.
#[must_use]
pub fn jokes_links() -> Vec<PageLink> {
    vec![PageLink {
        rel: "stylesheet",
        href: JOKES_LAYOUT_CSS,
    }]
}

/// The teasers loaded by [`JokesRoute`], handed down to the child routes.
#[derive(Clone, Copy)]
pub struct JokeListItems(pub Memo<Vec<JokeTeaser>>);

/// The layout route of `/jokes`.
#[component]
pub fn JokesRoute() -> Element {
    // Every navigation below `/jokes` reloads the teasers and the user.
    let route = use_route::<Route>();
    let page = use_server_future(use_reactive((&route,), |(_route,)| {
        get_jokes_page_data()
    }))?;
    let items = use_memo(move || match &*page.read() {
        Some(Ok(data)) => data.joke_list_items.clone(),
        _ => Vec::new(),
    });
    use_context_provider(|| JokeListItems(items));

    let data: PageData = match page() {
        Some(Ok(data)) => data,
        Some(Err(err)) => {
            error!("Failed to load the jokes layout: {err}");
            return Err(err.into());
        }
        None => return rsx! {},
    };

    rsx! {
        for link in jokes_links() {
            document::Link { rel: link.rel, href: link.href }
        }
        JokesLayout { viewer: data.viewer(), Outlet::<Route> {} }
    }
}

#[component]
pub fn JokesLayout(viewer: Viewer, children: Element) -> Element {
    rsx! {
        div { class: "jokes-layout",
            JokesHeader { viewer }
            main { class: "jokes-main",
                div { class: "container", {children} }
            }
            JokesFooter {}
        }
    }
}

#[component]
pub fn JokesHeader(viewer: Viewer) -> Element {
    rsx! {
        header { class: "jokes-header",
            div { class: "container",
                div { class: "home-link",
                    Link { to: "/",
                        span { class: "logo", "🤪" }
                        span { class: "logo-medium", "J🤪KES" }
                    }
                }
                nav {
                    ul {
                        li {
                            Link { to: "/jokes", "Read Jokes" }
                        }
                        li {
                            Link { to: "/about", "About" }
                        }
                        li {
                            if viewer.user().is_some() {
                                a { href: "/logout", "Logout" }
                            } else {
                                Link { to: "/login", "Login" }
                            }
                        }
                    }
                }
                if let Viewer::Authenticated(user) = &viewer {
                    span { class: "greeting", "Hi {user.username}" }
                    a { href: "/logout", class: "button", "Logout" }
                }
            }
        }
    }
}

/// The feed is served outside of the app, the link always loads a new document.
#[component]
pub fn JokesFooter() -> Element {
    rsx! {
        footer { class: "jokes-footer",
            div { class: "container",
                a { href: "/jokes-rss", "RSS" }
            }
        }
    }
}

/// The content of a child route followed by the teasers of the layout.
#[component]
pub fn JokesScreen(children: Element) -> Element {
    let items = try_use_context::<JokeListItems>()
        .map(|JokeListItems(items)| items())
        .unwrap_or_default();
    rsx! {
        {children}
        JokeTeasers { items }
    }
}

pub(crate) fn joke_href(joke_id: &str) -> String {
    Route::JokeDetail {
        joke_id: joke_id.to_owned(),
    }
    .to_string()
}

#[component]
pub fn JokeTeasers(items: Vec<JokeTeaser>) -> Element {
    let new_joke = Route::NewJoke {}.to_string();
    rsx! {
        p { "Here are a few more jokes to check out" }
        ul {
            for teaser in items {
                li { key: "{teaser.id}",
                    Link { to: joke_href(&teaser.id), "{teaser.name}" }
                }
            }
        }
        Link { to: new_joke, class: "button", "Add your own" }
    }
}
