//! Role-aware navigation bar.

use dioxus::prelude::*;

use super::notification_bell::NotificationBell;
use crate::app::guard::nav_items;
use crate::app::session::use_session;
use crate::app::Route;

#[component]
pub fn Nav() -> Element {
    let ctx = use_session();
    let session = ctx.session();
    let nav = use_navigator();

    rsx! {
        nav { class: "navbar",
            ul {
                li {
                    Link { to: Route::Landing {}, strong { "Event Hive" } }
                }
            }
            ul {
                for item in nav_items(&session) {
                    li { key: "{item.label}",
                        Link { to: item.route.clone(), active_class: "active", "{item.label}" }
                    }
                }
                if session.authenticated {
                    li {
                        Link { to: Route::Profile {}, class: "username", "{session.username}" }
                    }
                    if session.is_admin {
                        li { NotificationBell {} }
                    }
                    li {
                        button {
                            class: "btn btn-ghost btn-sm",
                            onclick: move |_| ctx.logout(nav),
                            "Logout"
                        }
                    }
                }
            }
        }
    }
}
