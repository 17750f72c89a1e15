//! Admin notification feed.
//!
//! [`drive_feed`] owns the feed. Push events are reduced as they arrive.
//! REST calls (the bootstrap `GET /notifications/admin` and the mark-read
//! `PUT`s) run as separate tasks and report their confirmed action back
//! through a channel, so a slow request never holds up the push stream.

use chrono::Utc;
use dioxus::prelude::*;
use futures::channel::mpsc;
use futures::future::{self, LocalBoxFuture};
use futures::{stream, FutureExt, Stream, StreamExt};

use super::api::BackendClient;
use super::session::stored_token;
use super::Route;
use crate::notifications::{
    reduce, FeedAction, FeedState, Notification, NotificationTarget, RecordId,
};
use crate::push::PushEvent;

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

/// Played when a new review lands in the feed
pub const REVIEW_CUE_SRC: &str = "/review-notification.mp3";

impl From<NotificationTarget> for Route {
    fn from(target: NotificationTarget) -> Self {
        match target {
            NotificationTarget::Event(id) => Route::EventDetail { id: id.to_string() },
            NotificationTarget::Responses(id) => Route::EventResponses { id: id.to_string() },
        }
    }
}

/// Messages handled by the feed
#[derive(Debug, Clone, PartialEq)]
pub enum FeedCommand {
    Push(PushEvent),
    MarkRead(RecordId),
    MarkAllRead,
}

/// Where the feed's effects land
pub trait FeedSink {
    /// Reduce `action` into the feed; `true` if anything changed
    fn apply(&mut self, action: FeedAction) -> bool;

    fn connection_changed(&mut self, _connected: bool) {}

    /// A new review was inserted
    fn review_arrived(&mut self) {}
}

enum Inbox {
    Command(FeedCommand),
    Confirmed(FeedAction),
    Closed,
}

fn is_new_review(event: &PushEvent) -> bool {
    matches!(event, PushEvent::NewReview(_))
}

fn on_push(sink: &mut impl FeedSink, event: PushEvent) {
    match &event {
        PushEvent::Connected => {
            tracing::info!("Notification channel connected");
            sink.connection_changed(true);
        }
        PushEvent::ConnectError(message) => {
            tracing::error!("Notification channel refused: {}", message);
            sink.connection_changed(false);
        }
        PushEvent::Disconnected => sink.connection_changed(false),
        PushEvent::Unhandled(name) => tracing::debug!("Ignoring push event {}", name),
        _ => {}
    }

    let review = is_new_review(&event);
    if let Some(action) = event.into_feed_action(Utc::now()) {
        if sink.apply(action) && review {
            sink.review_arrived();
        }
    }
}

/// Hand a confirmed action back to the feed, if it is still running
fn report(done: &mpsc::UnboundedSender<FeedAction>, action: FeedAction) {
    if let Err(e) = done.unbounded_send(action) {
        tracing::debug!("Feed closed, dropping {:?}", e.into_inner());
    }
}

async fn bootstrap(
    client: BackendClient,
    token: String,
    done: mpsc::UnboundedSender<FeedAction>,
) {
    match client.admin_notifications(&token).await {
        Ok(list) => {
            tracing::debug!("Loaded {} admin notifications", list.len());
            report(&done, FeedAction::Loaded(list));
        }
        Err(e) => tracing::error!("Failed to load admin notifications: {}", e),
    }
}

async fn confirm_read(
    client: BackendClient,
    token: String,
    id: RecordId,
    done: mpsc::UnboundedSender<FeedAction>,
) {
    match client.mark_admin_notification_read(&token, &id).await {
        Ok(()) => {
            report(&done, FeedAction::MarkedRead(id));
        }
        Err(e) => tracing::error!("Failed to mark notification {} read: {}", id, e),
    }
}

async fn confirm_read_all(
    client: BackendClient,
    token: String,
    done: mpsc::UnboundedSender<FeedAction>,
) {
    match client.mark_all_admin_notifications_read(&token).await {
        Ok(()) => {
            report(&done, FeedAction::MarkedAllRead);
        }
        Err(e) => tracing::error!("Failed to mark all notifications read: {}", e),
    }
}

/// Run the feed until `commands` ends.
///
/// `token` is read whenever a request is about to go out. `spawn_task`
/// starts a REST call alongside the loop. Read state only changes once the
/// backend has confirmed it.
pub async fn drive_feed<C, S>(
    client: BackendClient,
    token: impl Fn() -> Option<String>,
    commands: C,
    spawn_task: impl Fn(LocalBoxFuture<'static, ()>),
    mut sink: S,
) where
    C: Stream<Item = FeedCommand> + Unpin,
    S: FeedSink,
{
    let (done, confirmed) = mpsc::unbounded::<FeedAction>();

    match token() {
        Some(t) => spawn_task(bootstrap(client.clone(), t, done.clone()).boxed_local()),
        None => tracing::warn!("No token, skipping notification bootstrap"),
    }

    let commands = commands
        .map(Inbox::Command)
        .chain(stream::once(future::ready(Inbox::Closed)));
    let mut inbox = stream::select(commands, confirmed.map(Inbox::Confirmed));

    while let Some(item) = inbox.next().await {
        match item {
            Inbox::Command(FeedCommand::Push(event)) => on_push(&mut sink, event),
            Inbox::Command(FeedCommand::MarkRead(id)) => match token() {
                Some(t) => spawn_task(
                    confirm_read(client.clone(), t, id, done.clone()).boxed_local(),
                ),
                None => tracing::warn!("Cannot mark notification {} read: no token", id),
            },
            Inbox::Command(FeedCommand::MarkAllRead) => match token() {
                Some(t) => {
                    spawn_task(confirm_read_all(client.clone(), t, done.clone()).boxed_local())
                }
                None => tracing::warn!("Cannot mark notifications read: no token"),
            },
            Inbox::Confirmed(action) => {
                sink.apply(action);
            }
            Inbox::Closed => break,
        }
    }
}

/// Feed state held in component signals
struct SignalSink {
    state: Signal<FeedState>,
    connected: Signal<bool>,
}

impl FeedSink for SignalSink {
    fn apply(&mut self, action: FeedAction) -> bool {
        self.state.with_mut(|feed| reduce(feed, action))
    }

    fn connection_changed(&mut self, connected: bool) {
        self.connected.set(connected);
    }

    fn review_arrived(&mut self) {
        play_review_cue();
    }
}

/// Handle to a mounted feed
#[derive(Clone, Copy)]
pub struct NotificationFeed {
    state: Signal<FeedState>,
    connected: Signal<bool>,
    commands: Coroutine<FeedCommand>,
}

impl NotificationFeed {
    pub fn notifications(&self) -> Vec<Notification> {
        self.state.read().notifications().to_vec()
    }

    pub fn unread_count(&self) -> usize {
        self.state.read().unread_count()
    }

    /// Push channel currently connected
    pub fn is_connected(&self) -> bool {
        (self.connected)()
    }

    pub fn mark_read(&self, id: RecordId) {
        self.commands.send(FeedCommand::MarkRead(id));
    }

    pub fn mark_all_read(&self) {
        self.commands.send(FeedCommand::MarkAllRead);
    }
}

/// Mount a feed for the current admin session. The push connection lives as
/// long as the calling component.
pub fn use_notification_feed() -> NotificationFeed {
    let state = use_signal(FeedState::default);
    let connected = use_signal(|| false);
    let client = use_context::<BackendClient>();

    let commands = use_coroutine(move |rx: UnboundedReceiver<FeedCommand>| {
        let client = client.clone();
        let sink = SignalSink { state, connected };
        drive_feed(
            client,
            stored_token,
            rx,
            |task| {
                spawn(task);
            },
            sink,
        )
    });

    #[cfg(target_arch = "wasm32")]
    {
        use crate::config::ClientConfig;
        use crate::push::{PushConnection, ReconnectPolicy};

        let connection: Rc<RefCell<Option<PushConnection>>> =
            use_hook(|| Rc::new(RefCell::new(None)));
        let config = use_context::<ClientConfig>();

        let slot = connection.clone();
        use_effect(move || {
            if slot.borrow().is_some() {
                return;
            }
            let url = match config.push_socket_url() {
                Ok(url) => url,
                Err(e) => {
                    tracing::error!("Invalid push URL: {}", e);
                    return;
                }
            };
            let handler = move |event: PushEvent| commands.send(FeedCommand::Push(event));
            match PushConnection::open(url, stored_token(), ReconnectPolicy::default(), handler) {
                Ok(conn) => *slot.borrow_mut() = Some(conn),
                Err(e) => tracing::error!("Failed to open notification channel: {:?}", e),
            }
        });

        use_drop(move || {
            if let Some(conn) = connection.borrow_mut().take() {
                conn.close();
            }
        });
    }

    NotificationFeed {
        state,
        connected,
        commands,
    }
}

#[cfg(target_arch = "wasm32")]
fn play_review_cue() {
    let audio = match web_sys::HtmlAudioElement::new_with_src(REVIEW_CUE_SRC) {
        Ok(audio) => audio,
        Err(e) => {
            tracing::warn!("Review cue unavailable: {:?}", e);
            return;
        }
    };
    match audio.play() {
        Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
            // Autoplay policies reject playback before any user gesture
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                tracing::debug!("Review cue not played: {:?}", e);
            }
        }),
        Err(e) => tracing::debug!("Review cue not played: {:?}", e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn play_review_cue() {}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::notifications::ReviewSubmitted;

    #[test]
    fn test_only_reviews_trigger_the_cue() {
        let review = PushEvent::NewReview(ReviewSubmitted::default());
        assert!(is_new_review(&review));
        assert!(!is_new_review(&PushEvent::AdminNotificationsReadAll));
        assert!(!is_new_review(&PushEvent::Connected));
    }

    #[derive(Default)]
    struct Recorder {
        state: FeedState,
        connected: Option<bool>,
        cues: usize,
    }

    impl FeedSink for Recorder {
        fn apply(&mut self, action: FeedAction) -> bool {
            reduce(&mut self.state, action)
        }

        fn connection_changed(&mut self, connected: bool) {
            self.connected = Some(connected);
        }

        fn review_arrived(&mut self) {
            self.cues += 1;
        }
    }

    #[test]
    fn test_push_tracks_connection_and_cues_once() {
        let mut sink = Recorder::default();
        on_push(&mut sink, PushEvent::Connected);
        assert_eq!(sink.connected, Some(true));

        let review = || {
            PushEvent::NewReview(ReviewSubmitted {
                review_id: Some(RecordId::new("r1")),
                ..Default::default()
            })
        };
        on_push(&mut sink, review());
        on_push(&mut sink, review());
        assert_eq!(sink.state.len(), 1);
        assert_eq!(sink.cues, 1);

        on_push(&mut sink, PushEvent::Disconnected);
        assert_eq!(sink.connected, Some(false));
    }

    #[test]
    fn test_targets_map_to_routes() {
        assert_eq!(
            Route::from(NotificationTarget::Event(RecordId::new("12"))),
            Route::EventDetail { id: "12".into() }
        );
        assert_eq!(
            Route::from(NotificationTarget::Responses(RecordId::new("5"))),
            Route::EventResponses { id: "5".into() }
        );
    }
}
