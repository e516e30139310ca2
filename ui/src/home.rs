use dioxus::prelude::*;

#[component]
pub fn Home() -> Element {
    rsx! {
        div { class: "container",
            div { class: "content",
                h1 {
                    "Remix "
                    span { "Jokes!" }
                }
                nav {
                    ul {
                        li {
                            Link { to: "/jokes", "Read Jokes" }
                        }
                        li {
                            a { href: "/jokes-rss", "RSS" }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::render_routed;

    #[test]
    fn home_links_to_the_jokes() {
        let html = render_routed(|| rsx! {
            Home {}
        });
        assert!(html.contains("Jokes!"));
        assert!(html.contains(r#"href="/jokes""#));
    }
}
