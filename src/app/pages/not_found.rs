use dioxus::prelude::*;

use super::Page;
use crate::app::Route;

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = format!("/{}", segments.join("/"));
    rsx! {
        Page { title: "Page Not Found",
            p { "Nothing lives at {path}." }
            Link { to: Route::Landing {}, "Go to the start page" }
        }
    }
}
