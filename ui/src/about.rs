use dioxus::prelude::*;

#[component]
pub fn About() -> Element {
    rsx! {
        div { class: "container",
            div { class: "content",
                h1 { "About Remix Jokes" }
                p {
                    "A small collection of jokes. Read a random one, browse the newest ones \
                     or log in and add your own."
                }
                Link { to: "/jokes", "Back to the jokes" }
            }
        }
    }
}
