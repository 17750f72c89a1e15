//! Event pages reachable from links and notifications.

use dioxus::prelude::*;

use super::Page;
use crate::app::api::BackendClient;
use crate::app::session::use_session;
use crate::app::Route;

#[component]
pub fn EventDetail(id: String) -> Element {
    let ctx = use_session();
    let session = ctx.session();
    let client = use_context::<BackendClient>();
    let nav = use_navigator();
    let mut deleting = use_signal(|| false);

    let event_id = id.clone();
    let delete = move |_: MouseEvent| {
        let client = client.clone();
        let event_id = event_id.clone();
        deleting.set(true);
        spawn(async move {
            ctx.delete_event(&client, nav, &event_id).await;
            deleting.set(false);
        });
    };

    rsx! {
        Page { title: "Event Details",
            p { "Event #{id}" }
            Link { to: Route::EventRegistration { id: id.clone() }, class: "btn btn-primary", "Register" }
            if session.is_admin {
                div { class: "admin-actions",
                    Link { to: Route::EditEvent { id: id.clone() }, class: "btn", "Edit" }
                    Link { to: Route::EventResponses { id: id.clone() }, class: "btn", "Responses" }
                    button {
                        class: "btn btn-danger",
                        disabled: deleting(),
                        onclick: delete,
                        if deleting() { "Deleting..." } else { "Delete" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn EventRegistration(id: String) -> Element {
    rsx! {
        Page { title: "Register for Event",
            p { "Registering for event #{id}." }
        }
    }
}

#[component]
pub fn EventResponses(id: String) -> Element {
    rsx! {
        Page { title: "Event Responses",
            p { "Feedback submitted for event #{id}." }
        }
    }
}
