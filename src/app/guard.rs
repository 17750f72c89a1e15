//! Route access policy.
//!
//! Every route declares who may see it and where everyone else is sent.

use super::session::Session;
use super::Route;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any signed-in user
    Member,
    Admin,
}

impl Access {
    pub fn allows(self, session: &Session) -> bool {
        match self {
            Access::Public => true,
            Access::Member => session.authenticated,
            Access::Admin => session.authenticated && session.is_admin,
        }
    }
}

impl Route {
    pub fn access(&self) -> Access {
        match self {
            Route::Home {}
            | Route::Calendar {}
            | Route::AiInsights {}
            | Route::Profile {}
            | Route::MyRegistrations {} => Access::Member,
            Route::AdminDashboard {}
            | Route::CreateEvent {}
            | Route::AdminRegistrations {}
            | Route::AdminCalendar {}
            | Route::AdminReviewsDashboard {}
            | Route::EditEvent { .. } => Access::Admin,
            Route::Landing {}
            | Route::LandingPage {}
            | Route::Login {}
            | Route::Registration {}
            | Route::ForgotPassword {}
            | Route::ResetPassword { .. }
            | Route::EventDetail { .. }
            | Route::EventRegistration { .. }
            | Route::EventResponses { .. }
            | Route::Success {}
            | Route::Chatbot {}
            | Route::NotFound { .. } => Access::Public,
        }
    }

    /// Where a visitor without access is sent
    pub fn fallback(&self) -> Route {
        match self {
            Route::AdminDashboard {}
            | Route::CreateEvent {}
            | Route::AdminRegistrations {}
            | Route::AdminCalendar {} => Route::Home {},
            Route::EditEvent { .. } => Route::Landing {},
            _ => Route::Login {},
        }
    }

    /// Pages that render without the navigation bar
    pub fn hides_nav(&self) -> bool {
        matches!(
            self,
            Route::Landing {} | Route::LandingPage {} | Route::Login {} | Route::Registration {}
        )
    }
}

/// `Err` carries the redirect target
pub fn authorize(route: &Route, session: &Session) -> Result<(), Route> {
    if route.access().allows(session) {
        Ok(())
    } else {
        Err(route.fallback())
    }
}

/// What the layout does with the current route
#[derive(Clone, Debug, PartialEq)]
pub enum GuardDecision {
    Render,
    /// Session not resolved yet; render nothing
    Wait,
    Redirect(Route),
}

pub fn guard_decision(route: &Route, resolved: bool, session: &Session) -> GuardDecision {
    if route.access() == Access::Public {
        return GuardDecision::Render;
    }
    if !resolved {
        return GuardDecision::Wait;
    }
    match authorize(route, session) {
        Ok(()) => GuardDecision::Render,
        Err(fallback) => GuardDecision::Redirect(fallback),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
}

fn item(label: &'static str, route: Route) -> NavItem {
    NavItem { label, route }
}

/// Navigation links for the visitor's role
pub fn nav_items(session: &Session) -> Vec<NavItem> {
    if !session.authenticated {
        vec![
            item("Login", Route::Login {}),
            item("Register", Route::Registration {}),
        ]
    } else if session.is_admin {
        vec![
            item("Dashboard", Route::AdminDashboard {}),
            item("Create Event", Route::CreateEvent {}),
            item("Registrations", Route::AdminRegistrations {}),
            item("Calendar", Route::AdminCalendar {}),
            item("Analytics", Route::AdminReviewsDashboard {}),
            item("Insights", Route::AiInsights {}),
        ]
    } else {
        vec![
            item("Home", Route::Home {}),
            item("My Tickets", Route::MyRegistrations {}),
            item("Calendar", Route::Calendar {}),
            item("Insights", Route::AiInsights {}),
        ]
    }
}
