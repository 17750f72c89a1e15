//! Page components, one per route.
//!
//! Forms and data views belong to the backend-driven screens; these pages
//! provide the skeleton each route renders inside the layout.

mod admin;
mod event;
mod member;
mod not_found;
mod public;

use dioxus::prelude::*;

pub use admin::{
    AdminCalendar, AdminDashboard, AdminRegistrations, AdminReviewsDashboard, CreateEvent,
    EditEvent,
};
pub use event::{EventDetail, EventRegistration, EventResponses};
pub use member::{AiInsights, Calendar, Home, MyRegistrations, Profile};
pub use not_found::NotFound;
pub use public::{
    Chatbot, ForgotPassword, Landing, Login, Registration, ResetPassword, Success,
};

/// Title plus heading shared by every page
#[component]
fn Page(title: String, children: Element) -> Element {
    let full_title = format!("{} - Event Hive", title);
    rsx! {
        document::Title { "{full_title}" }
        section { class: "page",
            h1 { "{title}" }
            {children}
        }
    }
}
