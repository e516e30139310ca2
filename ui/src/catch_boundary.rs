use dioxus::{logger::tracing::error, prelude::*};
use jokes_shared::apirequests::general::{CaughtResponse, UnhandledStatus};

/// Render a caught response of the jokes routes.
///
/// Only 401 and 404 are expected here. Any other status means a loader
/// produced a response nobody planned for, the caller decides what to do with it.
///
/// # Errors
/// [`UnhandledStatus`] for every status but 401 and 404.
pub fn jokes_catch_boundary(caught: &CaughtResponse) -> Result<Element, UnhandledStatus> {
    let heading = caught.handled()?.to_string();
    Ok(rsx! {
        h1 { "{heading}" }
    })
}

/// Shows a caught response inside the jokes layout, unexpected statuses abort the render.
#[component]
pub fn JokesCatchBoundary(caught: CaughtResponse) -> Element {
    match jokes_catch_boundary(&caught) {
        Ok(content) => content,
        Err(unhandled) => {
            error!("{unhandled}");
            Err(unhandled.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use jokes_shared::datatypes::Viewer;

    use super::*;
    use crate::{jokes::JokesLayout, testing::render_routed};

    #[test]
    fn unauthorized_is_rendered_in_the_shell() {
        let html = render_routed(|| rsx! {
            JokesLayout { viewer: Viewer::Anonymous,
                JokesCatchBoundary { caught: CaughtResponse::unauthorized() }
            }
        });
        assert!(html.contains("<h1>401: Unauthorized</h1>"));
        assert!(html.contains("jokes-header"));
        assert!(html.contains("jokes-footer"));
    }

    #[test]
    fn not_found_is_rendered_in_the_shell() {
        let html = render_routed(|| rsx! {
            JokesLayout { viewer: Viewer::Anonymous,
                JokesCatchBoundary { caught: CaughtResponse::not_found("No random joke found") }
            }
        });
        assert!(html.contains("<h1>404: No random joke found</h1>"));
        assert!(html.contains("jokes-main"));
        assert!(!html.contains("Here are a few more jokes"));
    }

    #[test]
    fn heading_is_the_only_content() {
        let heading = jokes_catch_boundary(&CaughtResponse::not_found("Not Found")).unwrap();
        let html = dioxus_ssr::render_element(heading);
        assert!(html.contains("<h1>404: Not Found</h1>"));
        assert_eq!(html.matches("<h1").count(), 1);
        assert!(!html.contains("jokes-header"));
    }

    #[test]
    fn other_statuses_are_raised() {
        for status in [400, 403, 500] {
            let caught = CaughtResponse::new(status, "Server Error");
            match jokes_catch_boundary(&caught) {
                Ok(_) => panic!("{status} must not be rendered"),
                Err(unhandled) => assert_eq!(unhandled, UnhandledStatus { status }),
            }
        }
    }

    #[component]
    fn ServerErrorBelowBoundary() -> Element {
        rsx! {
            ErrorBoundary {
                handle_error: |_: ErrorContext| rsx! {
                    p { "raised to the error boundary" }
                },
                JokesCatchBoundary { caught: CaughtResponse::new(500, "Server Error") }
            }
        }
    }

    #[test]
    fn server_error_reaches_the_error_boundary() {
        let mut vdom = VirtualDom::new(ServerErrorBelowBoundary);
        vdom.rebuild_in_place();
        vdom.process_events();
        vdom.render_immediate_to_vec();
        let html = dioxus_ssr::render(&vdom);
        assert!(html.contains("raised to the error boundary"));
        assert!(!html.contains("500"));
    }
}
