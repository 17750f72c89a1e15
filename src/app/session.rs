//! Session context.
//!
//! Holds who is signed in, derived once per page load by validating the
//! stored bearer token against `GET /auth/auth`. Route guards and the nav
//! read it; login state changes (logout, expiry, a 401) reset it.

use chrono::Utc;
use dioxus::prelude::*;
use dioxus::router::{router, Navigator};

use super::api::{ApiError, AuthInfo, BackendClient};
use super::storage::{BrowserStorage, KeyValueStore, StoredCredentials};
use super::Route;

/// Identity of the current visitor
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub id: i64,
    pub authenticated: bool,
    pub is_admin: bool,
}

impl Session {
    pub fn from_auth(info: AuthInfo) -> Self {
        Self {
            username: info
                .username
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "User".to_string()),
            id: info.id,
            authenticated: true,
            is_admin: info.is_admin,
        }
    }
}

/// Outcome of inspecting stored credentials before any network call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenCheck {
    /// `tokenExpiry` lies in the past
    Expired,
    Missing,
    Present(String),
}

/// Expiry wins over presence: a stale expiry is cleared even without a token.
pub fn check_stored_token(creds: &StoredCredentials, now_ms: i64) -> TokenCheck {
    if creds.is_expired(now_ms) {
        return TokenCheck::Expired;
    }
    match &creds.access_token {
        Some(token) => TokenCheck::Present(token.clone()),
        None => TokenCheck::Missing,
    }
}

/// Home route for a freshly verified user
pub fn landing_route(is_admin: bool) -> Route {
    if is_admin {
        Route::AdminDashboard {}
    } else {
        Route::Home {}
    }
}

/// Redirect after a successful verification. Only the login page moves on.
pub fn after_verification(current: &Route, is_admin: bool) -> Option<Route> {
    matches!(current, Route::Login {}).then(|| landing_route(is_admin))
}

/// Redirect after the backend rejected the token
pub fn after_rejection(current: &Route) -> Option<Route> {
    (!matches!(current, Route::Login {})).then_some(Route::Login {})
}

/// Resolve the session from stored credentials without touching the router.
///
/// Returns the session to install and where to send the visitor, if
/// anywhere. Expired or rejected credentials are cleared from `store`. The
/// backend is only asked when a live token is present.
pub async fn resolve_session(
    client: &BackendClient,
    store: &impl KeyValueStore,
    current: &Route,
    now_ms: i64,
) -> (Session, Option<Route>) {
    let creds = StoredCredentials::load(store);
    match check_stored_token(&creds, now_ms) {
        TokenCheck::Expired => {
            tracing::info!("Stored token expired");
            StoredCredentials::clear(store);
            (Session::default(), Some(Route::Login {}))
        }
        TokenCheck::Missing => (Session::default(), None),
        TokenCheck::Present(token) => match client.verify_token(&token).await {
            Ok(info) => {
                let session = Session::from_auth(info);
                tracing::debug!("Session verified for {}", session.username);
                let next = after_verification(current, session.is_admin);
                (session, next)
            }
            Err(e) => {
                tracing::warn!("Token verification failed: {}", e);
                StoredCredentials::clear(store);
                (Session::default(), after_rejection(current))
            }
        },
    }
}

/// Bearer token currently in browser storage
pub fn stored_token() -> Option<String> {
    StoredCredentials::load(&BrowserStorage).access_token
}

/// Session state shared via context
#[derive(Clone, Copy)]
pub struct SessionContext {
    session: Signal<Session>,
    /// Set once the stored token has been checked
    resolved: Signal<bool>,
}

impl SessionContext {
    pub fn session(&self) -> Session {
        (self.session)()
    }

    pub fn is_resolved(&self) -> bool {
        (self.resolved)()
    }

    pub fn set_session(&self, value: Session) {
        let mut session = self.session;
        let mut resolved = self.resolved;
        session.set(value);
        resolved.set(true);
    }

    /// Back to anonymous
    pub fn reset(&self) {
        self.set_session(Session::default());
    }

    /// Forget the stored token and go to the login page
    pub fn logout(&self, nav: Navigator) {
        tracing::info!("Logging out");
        StoredCredentials::clear(&BrowserStorage);
        self.reset();
        nav.push(Route::Login {});
    }

    /// `DELETE /events/{id}`, then back to `/home`. A 401 ends the session.
    pub async fn delete_event(&self, client: &BackendClient, nav: Navigator, event_id: &str) {
        let Some(token) = stored_token() else {
            nav.push(Route::Login {});
            return;
        };

        match client.delete_event(&token, event_id).await {
            Ok(()) => {
                tracing::info!("Deleted event {}", event_id);
                nav.push(Route::Home {});
            }
            Err(ApiError::Unauthorized) => {
                tracing::warn!("Delete of event {} rejected, session expired", event_id);
                StoredCredentials::clear(&BrowserStorage);
                self.reset();
                nav.push(Route::Login {});
            }
            Err(e) => {
                tracing::error!("Failed to delete event {}: {}", event_id, e);
            }
        }
    }

    async fn restore(&self, client: &BackendClient, nav: Navigator) {
        let current = router().current::<Route>();
        let now_ms = Utc::now().timestamp_millis();
        let (session, next) = resolve_session(client, &BrowserStorage, &current, now_ms).await;
        self.set_session(session);
        if let Some(next) = next {
            nav.replace(next);
        }
    }
}

/// Initialize the session context. Call once inside the router so the
/// verification result can navigate.
pub fn use_session_provider() -> SessionContext {
    let session = use_signal(Session::default);
    let resolved = use_signal(|| false);
    let ctx = use_context_provider(|| SessionContext { session, resolved });

    let client = use_context::<BackendClient>();
    let nav = use_navigator();

    // Effects only run in the browser; during SSR the session stays unresolved
    use_effect(move || {
        let client = client.clone();
        spawn(async move {
            ctx.restore(&client, nav).await;
        });
    });

    ctx
}

/// Get session context
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}
