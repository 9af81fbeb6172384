//! Embedded-Service Session
//!
//! Tracks the one third-party service currently shown inside the portal.
//!
//! ## States
//!
//! ```text
//!            open(embeddable)            load signal (current token)
//!   Closed ───────────────────▶ Loading ─────────────────────────────▶ Ready
//!     ▲                           │  ▲                                   │
//!     │                  9s timer │  │ retry / open another service      │
//!     │                           ▼  │                                   │
//!     │                          Failed ◀────────────────────────────────┘
//!     │                                       (retry / open another → Loading)
//!     └──────────── close / dismiss from any state ─────────────────────
//! ```
//!
//! Third parties that forbid framing give no direct signal, so a missing load
//! signal within [`EMBED_LOAD_TIMEOUT`] is treated as failure. Every (re)open
//! mints a fresh [`InstanceToken`]; the wait timer is tied to that token and is
//! aborted on every transition that starts or ends a Loading phase, so a timer
//! from a replaced session can never fail the new one.
//!
//! Non-embeddable services never touch the state machine: they go straight to
//! the [`ExternalOpener`].

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::catalog::ServiceDescriptor;
use crate::opener::ExternalOpener;
use crate::overlay::{Overlay, ScrollLock};

/// How long an embedded service may take to signal load before it is
/// considered blocked.
pub const EMBED_LOAD_TIMEOUT: Duration = Duration::from_secs(9);

/// Identity of one embedded load attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceToken(Uuid);

impl InstanceToken {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for InstanceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Phase of an open session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedPhase {
    Loading,
    Ready,
    Failed,
}

/// The single open session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub target: ServiceDescriptor,
    pub instance: InstanceToken,
    pub phase: EmbedPhase,
}

/// Flattened view of the session, including Closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    Loading,
    Ready,
    Failed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Closed => "closed",
            SessionState::Loading => "loading",
            SessionState::Ready => "ready",
            SessionState::Failed => "failed",
        }
    }
}

/// What a UI layer renders from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub active: Option<ActiveSession>,
    pub navigation_open: bool,
    pub scroll_locked: bool,
}

impl SessionSnapshot {
    pub fn state(&self) -> SessionState {
        match self.active.as_ref().map(|a| a.phase) {
            None => SessionState::Closed,
            Some(EmbedPhase::Loading) => SessionState::Loading,
            Some(EmbedPhase::Ready) => SessionState::Ready,
            Some(EmbedPhase::Failed) => SessionState::Failed,
        }
    }

    pub fn instance(&self) -> Option<InstanceToken> {
        self.active.as_ref().map(|a| a.instance)
    }
}

/// Result of asking to open a service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// Framed in the portal; the session is Loading under this token
    Embedded(InstanceToken),
    /// Handed to the external opener; the session was left untouched
    External,
}

struct Inner {
    active: Option<ActiveSession>,
    timer: Option<JoinHandle<()>>,
    scroll: ScrollLock,
    timeout: Duration,
    updates: watch::Sender<SessionSnapshot>,
}

impl Inner {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            active: self.active.clone(),
            navigation_open: self.scroll.is_open(Overlay::NavigationMenu),
            scroll_locked: self.scroll.is_locked(),
        }
    }

    fn publish(&mut self) {
        self.scroll.set(Overlay::ServiceSession, self.active.is_some());
        let snapshot = self.snapshot();
        tracing::trace!(state = snapshot.state().as_str(), "Session updated");
        self.updates.send_replace(snapshot);
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn expire(&mut self, token: InstanceToken) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.instance != token || active.phase != EmbedPhase::Loading {
            return;
        }
        active.phase = EmbedPhase::Failed;
        tracing::warn!(
            service = %active.target.label,
            instance = %token,
            timeout_secs = self.timeout.as_secs(),
            "Embedded service did not load in time, it probably blocks framing"
        );
        self.timer = None;
        self.publish();
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// Single-slot controller for the embedded-service session.
///
/// Owned by the top-level UI controller and lent to consumers. Dropping it
/// cancels any pending load timer.
pub struct EmbedSession {
    inner: Arc<Mutex<Inner>>,
    opener: Arc<dyn ExternalOpener>,
}

impl EmbedSession {
    pub fn new(opener: Arc<dyn ExternalOpener>) -> Self {
        Self::with_timeout(opener, EMBED_LOAD_TIMEOUT)
    }

    pub fn with_timeout(opener: Arc<dyn ExternalOpener>, timeout: Duration) -> Self {
        let (updates, _) = watch::channel(SessionSnapshot {
            active: None,
            navigation_open: false,
            scroll_locked: false,
        });
        let inner = Inner {
            active: None,
            timer: None,
            scroll: ScrollLock::new(),
            timeout,
            updates,
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
            opener,
        }
    }

    /// Open `service`, replacing any current session.
    ///
    /// Embeddable services start a fresh Loading phase; the rest are opened
    /// externally and the session is not touched.
    pub async fn open(&self, service: &ServiceDescriptor) -> OpenOutcome {
        if !service.embeddable {
            tracing::debug!(service = %service.label, "Service forbids embedding");
            self.opener.open_external(&service.url);
            return OpenOutcome::External;
        }

        let mut inner = self.inner.lock().await;
        let token = self.start_loading(&mut inner, service.clone());
        OpenOutcome::Embedded(token)
    }

    /// Reload the current service under a new token. `None` when closed.
    pub async fn retry(&self) -> Option<InstanceToken> {
        let mut inner = self.inner.lock().await;
        let target = inner.active.as_ref()?.target.clone();
        tracing::debug!(service = %target.label, "Retrying embedded service");
        Some(self.start_loading(&mut inner, target))
    }

    /// Signal that the framed content for `token` finished loading.
    ///
    /// Only a Loading session with a matching token becomes Ready; stale or
    /// late signals are ignored and `false` is returned.
    pub async fn mark_loaded(&self, token: InstanceToken) -> bool {
        let mut inner = self.inner.lock().await;
        let Some(active) = inner.active.as_mut() else {
            return false;
        };
        if active.instance != token || active.phase != EmbedPhase::Loading {
            tracing::debug!(instance = %token, "Ignoring stale load signal");
            return false;
        }
        active.phase = EmbedPhase::Ready;
        tracing::debug!(service = %active.target.label, instance = %token, "Embedded service ready");
        inner.cancel_timer();
        inner.publish();
        true
    }

    /// Open the current service externally without changing the session.
    pub async fn open_externally(&self) -> bool {
        let inner = self.inner.lock().await;
        match inner.active.as_ref() {
            Some(active) => {
                self.opener.open_external(&active.target.url);
                true
            }
            None => false,
        }
    }

    /// Close the session. Returns `false` if nothing was open.
    pub async fn close(&self) -> bool {
        let mut inner = self.inner.lock().await;
        inner.cancel_timer();
        let Some(closed) = inner.active.take() else {
            return false;
        };
        tracing::debug!(service = %closed.target.label, "Embedded service closed");
        inner.publish();
        true
    }

    /// Escape: close the navigation overlay and the session together.
    pub async fn dismiss(&self) {
        let mut inner = self.inner.lock().await;
        inner.cancel_timer();
        inner.active = None;
        inner.scroll.set(Overlay::NavigationMenu, false);
        inner.publish();
    }

    /// Track the navigation overlay, which shares the scroll lock.
    pub async fn set_navigation_open(&self, open: bool) {
        let mut inner = self.inner.lock().await;
        if inner.scroll.is_open(Overlay::NavigationMenu) == open {
            return;
        }
        inner.scroll.set(Overlay::NavigationMenu, open);
        inner.publish();
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.snapshot()
    }

    pub async fn state(&self) -> SessionState {
        self.snapshot().await.state()
    }

    /// Receiver that yields a snapshot after every transition
    pub async fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.lock().await.updates.subscribe()
    }

    fn start_loading(&self, inner: &mut Inner, target: ServiceDescriptor) -> InstanceToken {
        inner.cancel_timer();

        let token = InstanceToken::fresh();
        tracing::debug!(service = %target.label, instance = %token, "Embedding service");
        inner.active = Some(ActiveSession {
            target,
            instance: token,
            phase: EmbedPhase::Loading,
        });
        inner.timer = Some(spawn_load_timer(
            Arc::downgrade(&self.inner),
            token,
            inner.timeout,
        ));
        inner.publish();
        token
    }
}

fn spawn_load_timer(
    inner: Weak<Mutex<Inner>>,
    token: InstanceToken,
    timeout: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        if let Some(inner) = inner.upgrade() {
            inner.lock().await.expire(token);
        }
    })
}
