//! Rendering helpers for components that contain router links.

use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_history::{History, MemoryHistory};

#[derive(Clone, Copy)]
struct Staged(fn() -> Element);

#[derive(Debug, Clone, Routable, PartialEq)]
enum Stage {
    #[route("/")]
    Stand {},
}

#[component]
fn Stand() -> Element {
    let Staged(content) = use_context::<Staged>();
    content()
}

#[component]
fn StageApp() -> Element {
    rsx! {
        Router::<Stage> {}
    }
}

/// Render `content` below a router, `Link` needs one to resolve its target.
pub(crate) fn render_routed(content: fn() -> Element) -> String {
    let mut vdom = VirtualDom::new(StageApp);
    vdom.provide_root_context(Staged(content));
    vdom.provide_root_context(Rc::new(MemoryHistory::with_initial_path("/")) as Rc<dyn History>);
    vdom.rebuild_in_place();
    dioxus_ssr::render(&vdom)
}
