use dioxus::prelude::*;

use super::Page;
use crate::app::session::use_session;

#[component]
pub fn Home() -> Element {
    let session = use_session().session();
    rsx! {
        Page { title: "Upcoming Events",
            p { "Hello {session.username}, here is what's coming up." }
        }
    }
}

#[component]
pub fn Calendar() -> Element {
    rsx! {
        Page { title: "Calendar",
            p { "Your registered events by date." }
        }
    }
}

#[component]
pub fn AiInsights() -> Element {
    rsx! {
        Page { title: "Insights",
            p { "Personalised event recommendations." }
        }
    }
}

#[component]
pub fn MyRegistrations() -> Element {
    rsx! {
        Page { title: "My Tickets",
            p { "Events you have registered for." }
        }
    }
}

#[component]
pub fn Profile() -> Element {
    let session = use_session().session();
    let role = if session.is_admin { "Administrator" } else { "Member" };
    rsx! {
        Page { title: "Profile",
            dl {
                dt { "Username" }
                dd { "{session.username}" }
                dt { "Account ID" }
                dd { "{session.id}" }
                dt { "Role" }
                dd { "{role}" }
            }
        }
    }
}
