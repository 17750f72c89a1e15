use dioxus::prelude::*;

use super::Page;
use crate::app::Route;

#[component]
pub fn AdminDashboard() -> Element {
    rsx! {
        Page { title: "Admin Dashboard",
            Link { to: Route::CreateEvent {}, class: "btn btn-primary", "Create Event" }
        }
    }
}

#[component]
pub fn CreateEvent() -> Element {
    rsx! {
        Page { title: "Create Event",
            p { "Publish a new event for members to register." }
        }
    }
}

#[component]
pub fn AdminRegistrations() -> Element {
    rsx! {
        Page { title: "Registrations",
            p { "Registrations across all events." }
        }
    }
}

#[component]
pub fn AdminCalendar() -> Element {
    rsx! {
        Page { title: "Event Calendar",
            p { "All scheduled events by date." }
        }
    }
}

#[component]
pub fn AdminReviewsDashboard() -> Element {
    rsx! {
        Page { title: "Review Analytics",
            p { "Ratings and feedback trends across events." }
        }
    }
}

#[component]
pub fn EditEvent(id: String) -> Element {
    rsx! {
        Page { title: "Edit Event",
            p { "Editing event {id}." }
            Link { to: Route::EventDetail { id: id.clone() }, "View event" }
        }
    }
}
