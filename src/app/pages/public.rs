use dioxus::prelude::*;

use super::Page;
use crate::app::Route;

#[component]
pub fn Landing() -> Element {
    rsx! {
        Page { title: "Welcome to Event Hive",
            p { "Discover events, register in a click and share your feedback." }
            nav { class: "landing-actions",
                Link { to: Route::Login {}, class: "btn btn-primary", "Login" }
                Link { to: Route::Registration {}, class: "btn", "Create an account" }
            }
        }
    }
}

#[component]
pub fn Login() -> Element {
    rsx! {
        Page { title: "Login",
            p { "Sign in with your Event Hive account." }
            ul {
                li { Link { to: Route::ForgotPassword {}, "Forgot your password?" } }
                li { Link { to: Route::Registration {}, "New here? Register" } }
            }
        }
    }
}

#[component]
pub fn Registration() -> Element {
    rsx! {
        Page { title: "Register",
            p { "Create an account to register for events." }
            Link { to: Route::Login {}, "Already registered? Login" }
        }
    }
}

#[component]
pub fn ForgotPassword() -> Element {
    rsx! {
        Page { title: "Forgot Password",
            p { "Enter your email and we will send you a reset link." }
        }
    }
}

#[component]
pub fn ResetPassword(token: String) -> Element {
    rsx! {
        Page { title: "Reset Password",
            p { "Choose a new password." }
            input { r#type: "hidden", name: "token", value: "{token}" }
        }
    }
}

#[component]
pub fn Success() -> Element {
    rsx! {
        Page { title: "Registration Complete",
            p { "You are registered. See you at the event!" }
            Link { to: Route::Home {}, "Back to events" }
        }
    }
}

/// Event assistant. The chat itself is served by the backend.
#[component]
pub fn Chatbot() -> Element {
    rsx! {
        Page { title: "Event Assistant",
            p { "Ask about upcoming events, schedules and registrations." }
        }
    }
}
