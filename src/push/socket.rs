//! Browser WebSocket connection for the push channel.
//!
//! Owns the socket and its JS callbacks; dropping the [`PushConnection`]
//! closes the socket and cancels any pending reconnect.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use super::{PushEvent, PushSession, ReconnectPolicy};

type Handler = Box<dyn FnMut(PushEvent)>;

/// One live socket plus the closures registered on it
struct LiveSocket {
    ws: WebSocket,
    _onmessage: Closure<dyn FnMut(MessageEvent)>,
    _onerror: Closure<dyn FnMut(Event)>,
    _onclose: Closure<dyn FnMut(CloseEvent)>,
}

impl LiveSocket {
    fn shutdown(self) {
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);
        let _ = self.ws.close();
    }
}

struct Shared {
    url: String,
    token: Option<String>,
    policy: ReconnectPolicy,
    handler: RefCell<Handler>,
    live: RefCell<Option<LiveSocket>>,
    attempts: Cell<u32>,
    closed: Cell<bool>,
}

impl Shared {
    fn deliver(&self, event: PushEvent) {
        let mut handler = self.handler.borrow_mut();
        (*handler)(event);
    }
}

/// Push-channel connection scoped to its owner
pub struct PushConnection {
    shared: Rc<Shared>,
}

impl PushConnection {
    /// Open a connection to `url`; `handler` receives every decoded event
    pub fn open(
        url: String,
        token: Option<String>,
        policy: ReconnectPolicy,
        handler: impl FnMut(PushEvent) + 'static,
    ) -> Result<Self, JsValue> {
        let shared = Rc::new(Shared {
            url,
            token,
            policy,
            handler: RefCell::new(Box::new(handler)),
            live: RefCell::new(None),
            attempts: Cell::new(0),
            closed: Cell::new(false),
        });
        open_socket(&shared)?;
        Ok(Self { shared })
    }

    /// Close the socket and stop reconnecting
    pub fn close(&self) {
        if self.shared.closed.replace(true) {
            return;
        }
        tracing::info!("push: closing connection");
        if let Some(live) = self.shared.live.borrow_mut().take() {
            live.shutdown();
        }
    }
}

impl Drop for PushConnection {
    fn drop(&mut self) {
        self.close();
    }
}

fn open_socket(shared: &Rc<Shared>) -> Result<(), JsValue> {
    let ws = WebSocket::new(&shared.url)?;
    tracing::info!("push: connecting to {}", shared.url);

    let session = RefCell::new(PushSession::new(shared.token.clone()));

    let weak = Rc::downgrade(shared);
    let reply_ws = ws.clone();
    let onmessage = Closure::wrap(Box::new(move |e: MessageEvent| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let Some(frame) = e.data().as_string() else {
            tracing::debug!("push: ignoring binary frame");
            return;
        };
        let step = match session.borrow_mut().on_frame(&frame) {
            Ok(step) => step,
            Err(err) => {
                tracing::warn!("push: dropping frame: {}", err);
                return;
            }
        };
        for reply in step.replies {
            if let Err(e) = reply_ws.send_with_str(&reply) {
                tracing::warn!("push: send failed: {:?}", e);
            }
        }
        for event in step.events {
            if event == PushEvent::Connected {
                shared.attempts.set(0);
            }
            shared.deliver(event);
        }
    }) as Box<dyn FnMut(_)>);
    ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));

    let onerror = Closure::wrap(Box::new(move |_: Event| {
        tracing::error!("push: socket connection error");
    }) as Box<dyn FnMut(_)>);
    ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));

    let weak = Rc::downgrade(shared);
    let onclose = Closure::wrap(Box::new(move |e: CloseEvent| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        if shared.closed.get() {
            return;
        }
        tracing::warn!("push: socket closed (code {})", e.code());
        shared.deliver(PushEvent::Disconnected);
        schedule_reconnect(&shared);
    }) as Box<dyn FnMut(_)>);
    ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));

    let previous = shared.live.borrow_mut().replace(LiveSocket {
        ws,
        _onmessage: onmessage,
        _onerror: onerror,
        _onclose: onclose,
    });
    if let Some(previous) = previous {
        previous.shutdown();
    }
    Ok(())
}

fn schedule_reconnect(shared: &Rc<Shared>) {
    let attempt = shared.attempts.get() + 1;
    let Some(delay) = shared.policy.delay_for(attempt) else {
        tracing::error!(
            "push: giving up after {} reconnect attempts",
            shared.policy.max_attempts
        );
        return;
    };
    shared.attempts.set(attempt);

    let weak: Weak<Shared> = Rc::downgrade(shared);
    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::sleep(delay).await;
        let Some(shared) = weak.upgrade() else {
            return;
        };
        if shared.closed.get() {
            return;
        }
        tracing::info!("push: reconnect attempt {}", attempt);
        if let Err(e) = open_socket(&shared) {
            tracing::warn!("push: reconnect failed: {:?}", e);
            schedule_reconnect(&shared);
        }
    });
}
