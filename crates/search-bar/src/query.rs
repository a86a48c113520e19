//! Query sessions
//!
//! A [`SearchSession`] owns the query of one search surface (a dialog or an
//! inline bar). Every keystroke updates the immediate query right away; the
//! debounced copy follows once the input has been quiet for the configured
//! window. Consumers get the session handed to them and subscribe to changes.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use log::debug;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::SearchBarConfig;

/// The two views of what the user typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Current input, updated on every keystroke
    pub immediate: String,
    /// Last input that survived the quiet period
    pub debounced: String,
}

/// Runs a task after a delay, cancelling the previously scheduled one
///
/// Requires a tokio runtime; scheduled tasks are spawned onto it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` once the delay has elapsed, unless something else gets
    /// scheduled (or the debouncer is cancelled) first
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Cancel the pending task; returns whether one was still waiting
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let was_waiting = !handle.is_finished();
                handle.abort();
                was_waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Query state of one search surface
///
/// Cloning is cheap and yields a handle to the same session. The session lives
/// as long as any handle; dropping the last one cancels the pending debounce.
#[derive(Clone)]
pub struct SearchSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    query_tx: watch::Sender<Query>,
    debouncer: Mutex<Debouncer>,
    /// Bumped on every input so a timer that already fired can tell it is stale
    generation: AtomicU64,
}

impl SearchSession {
    pub fn new(config: &SearchBarConfig) -> Self {
        Self::with_debounce(config.debounce())
    }

    pub fn with_debounce(delay: Duration) -> Self {
        let (query_tx, _) = watch::channel(Query::default());
        Self {
            inner: Arc::new(SessionInner {
                query_tx,
                debouncer: Mutex::new(Debouncer::new(delay)),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Snapshot of the current query
    pub fn query(&self) -> Query {
        self.inner.query_tx.borrow().clone()
    }

    /// Receive every future query change
    pub fn subscribe(&self) -> watch::Receiver<Query> {
        self.inner.query_tx.subscribe()
    }

    /// Handle an input change
    ///
    /// The immediate query changes now and the debounced query follows after
    /// the quiet period. Emptying the input clears both right away.
    pub fn set_input(&self, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.clear();
            return;
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.inner.query_tx.send_if_modified(|query| {
            if query.immediate == value {
                return false;
            }
            query.immediate = value.clone();
            true
        });

        let session = Arc::downgrade(&self.inner);
        if let Ok(mut debouncer) = self.inner.debouncer.lock() {
            debug!("Debouncing {:?} for {:?}", value, debouncer.delay());
            debouncer.schedule(async move {
                publish_debounced(session, generation, value);
            });
        }
    }

    /// Cancel the search: drop any pending debounce and clear both queries
    pub fn clear(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);

        if let Ok(mut debouncer) = self.inner.debouncer.lock()
            && debouncer.cancel()
        {
            debug!("Cancelled pending debounced query");
        }

        self.inner.query_tx.send_if_modified(|query| {
            if query.immediate.is_empty() && query.debounced.is_empty() {
                return false;
            }
            *query = Query::default();
            true
        });
    }

    /// Whether a debounced update is still waiting for the quiet period
    pub fn is_debouncing(&self) -> bool {
        self.inner
            .debouncer
            .lock()
            .map(|debouncer| debouncer.is_pending())
            .unwrap_or(false)
    }
}

fn publish_debounced(session: Weak<SessionInner>, generation: u64, value: String) {
    let Some(inner) = session.upgrade() else {
        return;
    };

    // Checked under the channel lock: clear() bumps the generation before it
    // sends, so a stale value can never land after the reset
    let published = inner.query_tx.send_if_modified(|query| {
        if inner.generation.load(Ordering::SeqCst) != generation || query.debounced == value {
            return false;
        }
        query.debounced = value.clone();
        true
    });

    if published {
        debug!("Debounced query is now {:?}", value);
    } else {
        debug!("Debounced query {:?} superseded or unchanged", value);
    }
}

impl fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchSession")
            .field("query", &*self.inner.query_tx.borrow())
            .field("generation", &self.inner.generation.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn session() -> SearchSession {
        SearchSession::with_debounce(Duration::from_millis(300))
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_follows_after_quiet_period() {
        let session = session();
        session.set_input("se");

        assert_eq!(session.query().immediate, "se");
        assert_eq!(session.query().debounced, "");
        assert!(session.is_debouncing());

        sleep(Duration::from_millis(299)).await;
        assert_eq!(session.query().debounced, "");

        sleep(Duration::from_millis(2)).await;
        assert_eq!(session.query().debounced, "se");
        assert!(!session.is_debouncing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_publishes_last_input_only() {
        let session = session();
        session.set_input("s");
        sleep(Duration::from_millis(200)).await;
        session.set_input("se");
        sleep(Duration::from_millis(200)).await;

        // "s" would have been published at 300ms had it not been cancelled
        assert_eq!(session.query().immediate, "se");
        assert_eq!(session.query().debounced, "");

        sleep(Duration::from_millis(101)).await;
        assert_eq!(session.query().debounced, "se");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_pending_update() {
        let session = session();
        session.set_input("abc");
        sleep(Duration::from_millis(400)).await;
        assert_eq!(session.query().debounced, "abc");

        session.set_input("abcd");
        session.clear();
        assert_eq!(session.query(), Query::default());

        sleep(Duration::from_millis(400)).await;
        assert_eq!(session.query(), Query::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_clears_immediately() {
        let session = session();
        session.set_input("abc");
        sleep(Duration::from_millis(400)).await;

        session.set_input("");
        assert_eq!(session.query(), Query::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_changes() {
        let session = session();
        let mut rx = session.subscribe();

        session.set_input("bar");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().immediate, "bar");

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().debounced, "bar");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_session_cancels_debounce() {
        let session = session();
        let rx = session.subscribe();
        session.set_input("x");
        drop(session);

        sleep(Duration::from_millis(400)).await;
        assert_eq!(rx.borrow().debounced, "");
        assert!(rx.has_changed().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_runs_latest_task() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        assert_eq!(debouncer.delay(), Duration::from_millis(50));

        for i in 0..3 {
            let tx = tx.clone();
            debouncer.schedule(async move {
                let _ = tx.send(i);
            });
        }

        assert_eq!(rx.recv().await, Some(2));
        sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fired_timer_cannot_undo_clear() {
        let session = session();
        session.set_input("abc");
        let generation = session.inner.generation.load(Ordering::SeqCst);

        // The timer already fired and is about to publish when clear() wins
        session.clear();
        publish_debounced(Arc::downgrade(&session.inner), generation, "abc".into());

        assert_eq!(session.query(), Query::default());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_clear_racing_debounce_keeps_queries_consistent() {
        let session = SearchSession::with_debounce(Duration::ZERO);

        for i in 0..2000 {
            let value = format!("q{i}");
            session.set_input(value.clone());
            let generation = session.inner.generation.load(Ordering::SeqCst);

            let timer = {
                let inner = Arc::downgrade(&session.inner);
                tokio::spawn(async move { publish_debounced(inner, generation, value) })
            };
            let clearing = {
                let session = session.clone();
                tokio::spawn(async move { session.clear() })
            };
            timer.await.unwrap();
            clearing.await.unwrap();

            let query = session.query();
            assert!(
                query.immediate.is_empty() && query.debounced.is_empty(),
                "cycle {i} left {query:?}"
            );
        }
    }
}
