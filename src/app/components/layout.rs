//! Route layout: session provider, access guard and the navigation bar.

use dioxus::prelude::*;

use super::nav::Nav;
use crate::app::guard::{guard_decision, GuardDecision};
use crate::app::session::use_session_provider;
use crate::app::Route;

/// Wraps every route. Protected pages render only once the session is known
/// and the visitor is allowed in; everyone else is sent to the route's
/// fallback.
#[component]
pub fn Layout() -> Element {
    let session = use_session_provider();
    let route = use_route::<Route>();
    let nav = use_navigator();

    let decision = guard_decision(&route, session.is_resolved(), &session.session());
    let content = match decision {
        GuardDecision::Render => rsx! { Outlet::<Route> {} },
        GuardDecision::Wait => rsx! {},
        GuardDecision::Redirect(fallback) => {
            tracing::info!("Access to {} denied, redirecting to {}", route, fallback);
            nav.replace(fallback);
            rsx! {}
        }
    };

    rsx! {
        document::Title { "Event Hive" }

        if !route.hides_nav() {
            Nav {}
        }
        main { class: "container mx-auto px-4 mt-4",
            {content}
        }
    }
}
