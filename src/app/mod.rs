//! Dioxus application: routes, session guard and the admin notification bell.
//!
//! `App` provides the backend client and configuration as context; the route
//! layout owns the session and enforces each route's access level.

use dioxus::prelude::*;

pub mod api;
pub mod components;
pub mod guard;
pub mod notifications;
pub mod pages;
pub mod session;
pub mod storage;

use crate::config::ClientConfig;
use api::BackendClient;
use components::Layout;
use pages::{
    AdminCalendar, AdminDashboard, AdminRegistrations, AdminReviewsDashboard, AiInsights,
    Calendar, Chatbot, CreateEvent, EditEvent, EventDetail, EventRegistration, EventResponses,
    ForgotPassword, Home, Landing, Login, MyRegistrations, NotFound, Profile, Registration,
    ResetPassword, Success,
};

/// Root app component with routing
#[component]
pub fn App() -> Element {
    let config = use_context_provider(ClientConfig::from_build_env);
    use_context_provider(|| BackendClient::from_config(&config));

    rsx! {
        Router::<Route> {}
    }
}

/// Application routes
#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/")]
        Landing {},
        #[route("/landingPage", Landing)]
        LandingPage {},
        #[route("/login")]
        Login {},
        #[route("/registration")]
        Registration {},
        #[route("/forgot-password")]
        ForgotPassword {},
        #[route("/reset-password/:token")]
        ResetPassword { token: String },
        #[route("/event/:id")]
        EventDetail { id: String },
        #[route("/register/:id")]
        EventRegistration { id: String },
        #[route("/response/:id")]
        EventResponses { id: String },
        #[route("/success")]
        Success {},
        #[route("/chatbot")]
        Chatbot {},

        #[route("/home")]
        Home {},
        #[route("/calendar")]
        Calendar {},
        #[route("/AIInsights")]
        AiInsights {},
        #[route("/profile")]
        Profile {},
        #[route("/my-registrations")]
        MyRegistrations {},

        #[route("/admin")]
        AdminDashboard {},
        #[route("/create_event")]
        CreateEvent {},
        #[route("/admin/registrations")]
        AdminRegistrations {},
        #[route("/admincalendar")]
        AdminCalendar {},
        #[route("/AdminAIReviewsDashboard")]
        AdminReviewsDashboard {},
        #[route("/admin/edit-event/:id")]
        EditEvent { id: String },

        #[route("/:..segments")]
        NotFound { segments: Vec<String> },
}
