//! Session guard: reacts to session events for the whole process.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use geolab_client::{FrameMessage, SessionBus, SessionEvent, Subscription};
use geolab_persistence::TokenStore;
use tokio::task::JoinHandle;

use super::HostFrame;

/// How often an embedded form asks its host for a fresh token.
pub const TOKEN_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Watches session events and keeps the token fresh.
///
/// - `SessionExpired` marks the session expired; the front end should
///   force re-authentication.
/// - `TOKEN_REFRESH` from the host replaces the stored token.
/// - While embedded, `TOKEN_REFRESH_REQUEST` is posted to the host every
///   refresh interval.
///
/// Events are handled when [`SessionGuard::poll`] is called. Dropping the
/// guard stops the refresh timer and unsubscribes.
pub struct SessionGuard {
    subscription: Subscription,
    tokens: TokenStore,
    expired: Arc<AtomicBool>,
    refresh_task: Option<JoinHandle<()>>,
}

impl SessionGuard {
    /// Starts the guard. Must be called within a tokio runtime when `frame`
    /// is embedded.
    pub fn start(
        bus: &SessionBus,
        tokens: TokenStore,
        frame: Arc<dyn HostFrame>,
        refresh_interval: Duration,
    ) -> Self {
        let refresh_task = frame.is_embedded().then(|| {
            tokio::spawn(async move {
                let start = tokio::time::Instant::now() + refresh_interval;
                let mut ticker = tokio::time::interval_at(start, refresh_interval);
                loop {
                    ticker.tick().await;
                    frame.post(FrameMessage::TokenRefreshRequest);
                }
            })
        });

        Self {
            subscription: bus.subscribe(),
            tokens,
            expired: Arc::default(),
            refresh_task,
        }
    }

    /// Handles every event published since the last poll and returns them.
    pub fn poll(&self) -> Vec<SessionEvent> {
        let events = self.subscription.drain();
        for event in &events {
            self.handle(event);
        }
        events
    }

    fn handle(&self, event: &SessionEvent) {
        match event {
            SessionEvent::SessionExpired => {
                if !self.expired.swap(true, Ordering::SeqCst) {
                    tracing::warn!("session expired, re-authentication required");
                }
            }
            SessionEvent::Host(FrameMessage::TokenRefresh { token }) => {
                match self.tokens.set_token(token) {
                    Ok(()) => {
                        self.expired.store(false, Ordering::SeqCst);
                        tracing::info!("session token refreshed by host");
                    }
                    Err(e) => tracing::warn!(error = %e, "failed to store refreshed token"),
                }
            }
            SessionEvent::Host(_) => {}
        }
    }

    /// Whether a request has been rejected since the last token refresh.
    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::SeqCst)
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(task) = self.refresh_task.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("expired", &self.is_expired())
            .field("refreshing", &self.refresh_task.is_some())
            .finish()
    }
}
