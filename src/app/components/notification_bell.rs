//! Admin notification bell with its dropdown panel.

use dioxus::prelude::*;

use crate::app::notifications::{use_notification_feed, NotificationFeed};
use crate::app::Route;
use crate::notifications::{badge_label, Dropdown, Notification};

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

const BUTTON_ID: &str = "notification-bell-button";
const PANEL_ID: &str = "notification-bell-panel";

/// Document `mousedown` listener, removed on drop
#[cfg(target_arch = "wasm32")]
struct PointerDownGuard {
    document: web_sys::Document,
    listener: Closure<dyn FnMut(web_sys::MouseEvent)>,
}

#[cfg(target_arch = "wasm32")]
impl PointerDownGuard {
    fn install(
        mut on_target: impl FnMut(crate::notifications::ClickTarget) + 'static,
    ) -> Result<Self, JsValue> {
        use crate::notifications::ClickTarget;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let lookup = document.clone();
        let listener = Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
            let target = e.target().and_then(|t| t.dyn_into::<web_sys::Node>().ok());
            let contains = |id: &str| {
                lookup
                    .get_element_by_id(id)
                    .is_some_and(|el| el.contains(target.as_ref()))
            };
            on_target(ClickTarget::classify(contains(BUTTON_ID), contains(PANEL_ID)));
        }) as Box<dyn FnMut(_)>);

        document
            .add_event_listener_with_callback("mousedown", listener.as_ref().unchecked_ref())?;
        Ok(Self { document, listener })
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for PointerDownGuard {
    fn drop(&mut self) {
        let _ = self.document.remove_event_listener_with_callback(
            "mousedown",
            self.listener.as_ref().unchecked_ref(),
        );
    }
}

/// Close the dropdown on any pointer-down outside the bell and its panel
fn use_outside_click(dropdown: Signal<Dropdown>) {
    #[cfg(target_arch = "wasm32")]
    {
        let guard: Rc<RefCell<Option<PointerDownGuard>>> =
            use_hook(|| Rc::new(RefCell::new(None)));

        let slot = guard.clone();
        use_effect(move || {
            if slot.borrow().is_some() {
                return;
            }
            let mut dropdown = dropdown;
            let installed = PointerDownGuard::install(move |target| {
                let current = *dropdown.peek();
                let next = current.on_pointer_down(target);
                if next != current {
                    dropdown.set(next);
                }
            });
            match installed {
                Ok(g) => *slot.borrow_mut() = Some(g),
                Err(e) => tracing::warn!("Outside-click listener not installed: {:?}", e),
            }
        });

        use_drop(move || {
            guard.borrow_mut().take();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    let _ = dropdown;
}

/// Class and label of the push channel indicator
fn connection_status(connected: bool) -> (&'static str, &'static str) {
    if connected {
        ("notification-status live", "Live")
    } else {
        ("notification-status offline", "Offline")
    }
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[component]
fn NotificationEntry(notification: Notification, on_open: EventHandler<Notification>) -> Element {
    let class = if notification.is_read {
        "notification-item"
    } else {
        "notification-item unread"
    };
    let time = notification.created_at.format("%b %e, %Y %H:%M").to_string();
    let rating = notification.rating();
    let product = notification.product_name().map(str::to_string);
    let clicked = notification.clone();

    rsx! {
        li {
            class: "{class}",
            onclick: move |_| on_open.call(clicked.clone()),
            p { class: "notification-message", "{notification.message}" }
            if let Some(r) = rating {
                p { class: "notification-rating",
                    "Rating: {r} "
                    span { class: "stars", "{stars(r)}" }
                }
            }
            if let Some(name) = product {
                p { class: "notification-event", "Event: {name}" }
            }
            small { class: "notification-time", "{time}" }
        }
    }
}

/// Bell button, unread badge and notification panel for admins
#[component]
pub fn NotificationBell() -> Element {
    let feed: NotificationFeed = use_notification_feed();
    let mut dropdown = use_signal(Dropdown::default);
    let nav = use_navigator();
    let route = use_route::<Route>();

    use_outside_click(dropdown);

    // Navigation closes the panel
    use_effect(use_reactive!(|route| {
        let _ = route;
        dropdown.set(Dropdown::Closed);
    }));

    let unread = feed.unread_count();
    let notifications = feed.notifications();
    let (status_class, status_label) = connection_status(feed.is_connected());

    let open_entry = move |n: Notification| {
        if !n.is_read {
            feed.mark_read(n.id.clone());
        }
        dropdown.set(Dropdown::Closed);
        if let Some(target) = n.target() {
            nav.push(Route::from(target));
        }
    };

    rsx! {
        div { class: "notification-bell",
            button {
                id: BUTTON_ID,
                class: "notification-button",
                "aria-label": "Notifications",
                onclick: move |_| {
                    let next = dropdown().toggle();
                    dropdown.set(next);
                },
                "🔔"
                if let Some(label) = badge_label(unread) {
                    span { class: "notification-badge", "{label}" }
                }
            }
            if dropdown().is_open() {
                div { id: PANEL_ID, class: "notification-dropdown",
                    div { class: "notification-header",
                        h3 { "Notifications" }
                        span { class: "{status_class}", "{status_label}" }
                        if unread > 0 {
                            button {
                                class: "mark-all-read",
                                onclick: move |_| feed.mark_all_read(),
                                "Mark all as read"
                            }
                        }
                    }
                    if notifications.is_empty() {
                        p { class: "notification-empty", "No notifications" }
                    } else {
                        ul { class: "notification-list",
                            for n in notifications {
                                NotificationEntry {
                                    key: "{n.id}",
                                    notification: n.clone(),
                                    on_open: open_entry,
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
