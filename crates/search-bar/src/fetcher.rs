//! Turning debounced queries into result sets
//!
//! [`FetchState`] is the pure state machine (Idle, Loading, Settled) and
//! [`ResultFetcher`] is the task that drives it from a session's query
//! channel. Searches are never cancelled; a response is applied only if its
//! ticket is still the active one when it arrives.

use std::sync::Arc;

use log::{debug, error};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::error::SearchError;
use crate::query::{Query, SearchSession};
use crate::source::SearchSource;

/// Identifies one issued search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    /// Monotonic per fetcher; newer searches have larger generations
    pub generation: u64,
    pub query: String,
}

/// Results and loading flag for the most recently issued search
#[derive(Debug, Clone)]
pub struct FetchState<T> {
    results: Vec<T>,
    is_loading: bool,
    active: Option<SearchTicket>,
    generation: u64,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            is_loading: false,
            active: None,
            generation: 0,
        }
    }
}

impl<T> FetchState<T> {
    pub fn results(&self) -> &[T] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Query of the search whose results are (or will be) shown
    pub fn active_query(&self) -> Option<&str> {
        self.active.as_ref().map(|ticket| ticket.query.as_str())
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Start a search for `query`
    ///
    /// Returns the ticket to search with, or `None` for a blank query, which
    /// resets to idle instead.
    pub fn begin(&mut self, query: &str) -> Option<SearchTicket> {
        if query.trim().is_empty() {
            self.reset();
            return None;
        }

        self.generation += 1;
        let ticket = SearchTicket {
            generation: self.generation,
            query: query.to_string(),
        };
        self.active = Some(ticket.clone());
        self.is_loading = true;
        Some(ticket)
    }

    /// Apply the outcome of the search identified by `ticket`
    ///
    /// Outcomes for anything but the active ticket are dropped. Failures are
    /// logged either way and leave an empty result set. Returns whether the
    /// state changed.
    pub fn settle(&mut self, ticket: &SearchTicket, outcome: Result<Vec<T>, SearchError>) -> bool {
        if let Err(err) = &outcome {
            error!("Search for {:?} failed: {:#}", err.query(), err);
        }

        if self.active.as_ref() != Some(ticket) {
            debug!(
                "Discarding results for superseded query {:?} (generation {})",
                ticket.query, ticket.generation
            );
            return false;
        }

        match outcome {
            Ok(results) => {
                debug!("Query {:?} returned {} results", ticket.query, results.len());
                self.results = results;
            }
            Err(_) => self.results.clear(),
        }
        self.is_loading = false;
        true
    }

    /// Go back to idle: no active search, no results, not loading
    pub fn reset(&mut self) {
        self.active = None;
        self.results.clear();
        self.is_loading = false;
    }
}

type Completion<T> = (SearchTicket, Result<Vec<T>, SearchError>);

/// Background task feeding a [`FetchState`] from a search session
///
/// Dropping the fetcher stops the task; searches already in flight finish but
/// their results go nowhere.
pub struct ResultFetcher<T> {
    state_rx: watch::Receiver<FetchState<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T> ResultFetcher<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Start fetching results for `session` from `source`
    ///
    /// Without a session the fetcher is inert and stays idle.
    pub fn spawn<S>(session: Option<&SearchSession>, source: S) -> Self
    where
        S: SearchSource<T>,
    {
        let (state_tx, state_rx) = watch::channel(FetchState::default());

        let Some(session) = session else {
            debug!("No search session provided; results stay empty");
            return Self {
                state_rx,
                task: None,
            };
        };

        let query_rx = session.subscribe();
        let task = tokio::spawn(run_fetcher(query_rx, Arc::new(source), state_tx));

        Self {
            state_rx,
            task: Some(task),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> FetchState<T> {
        self.state_rx.borrow().clone()
    }

    /// Receive every future state change
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state_rx.clone()
    }

    /// Wait until the state satisfies `predicate`
    ///
    /// If the fetcher has stopped, the last state is returned as is.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&FetchState<T>) -> bool,
    ) -> FetchState<T> {
        if let Ok(state) = self.state_rx.wait_for(predicate).await {
            return state.clone();
        }
        self.state_rx.borrow().clone()
    }
}

impl<T> Drop for ResultFetcher<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_fetcher<T, S>(
    mut query_rx: watch::Receiver<Query>,
    source: Arc<S>,
    state_tx: watch::Sender<FetchState<T>>,
) where
    T: Send + Sync + 'static,
    S: SearchSource<T>,
{
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion<T>>();
    let mut fetcher = Fetcher {
        source,
        state_tx,
        done_tx,
        last_debounced: String::new(),
    };

    let initial = query_rx.borrow_and_update().clone();
    fetcher.on_query(&initial);

    loop {
        tokio::select! {
            changed = query_rx.changed() => {
                if changed.is_err() {
                    debug!("Search session closed; stopping result fetcher");
                    break;
                }
                let query = query_rx.borrow_and_update().clone();
                fetcher.on_query(&query);
            }
            Some((ticket, outcome)) = done_rx.recv() => {
                fetcher
                    .state_tx
                    .send_if_modified(|state| state.settle(&ticket, outcome));
            }
        }
    }
}

struct Fetcher<T, S> {
    source: Arc<S>,
    state_tx: watch::Sender<FetchState<T>>,
    done_tx: mpsc::UnboundedSender<Completion<T>>,
    /// Debounced query the current search was started for
    last_debounced: String,
}

impl<T, S> Fetcher<T, S>
where
    T: Send + Sync + 'static,
    S: SearchSource<T>,
{
    fn on_query(&mut self, query: &Query) {
        if query.immediate.trim().is_empty() || query.debounced.trim().is_empty() {
            self.last_debounced.clear();
            self.state_tx.send_if_modified(|state| {
                let changed = !state.is_idle() || state.is_loading() || !state.results().is_empty();
                state.reset();
                changed
            });
            return;
        }

        // Only the immediate query moved; keep the current search
        if query.debounced == self.last_debounced {
            return;
        }
        self.last_debounced = query.debounced.clone();

        let mut ticket = None;
        self.state_tx
            .send_modify(|state| ticket = state.begin(&query.debounced));

        if let Some(ticket) = ticket {
            self.start_search(ticket);
        }
    }

    fn start_search(&self, ticket: SearchTicket) {
        debug!("Searching for {:?} (generation {})", ticket.query, ticket.generation);

        let searcher = Arc::clone(&self.source);
        let done_tx = self.done_tx.clone();

        tokio::spawn(async move {
            let query = ticket.query.clone();
            let search = tokio::spawn(async move { searcher.search(query).await });

            let outcome = match search.await {
                Ok(Ok(results)) => Ok(results),
                Ok(Err(source)) => Err(SearchError::Failed {
                    query: ticket.query.clone(),
                    source,
                }),
                Err(join_error) => {
                    debug!("Search task failed to complete: {}", join_error);
                    Err(SearchError::Aborted {
                        query: ticket.query.clone(),
                    })
                }
            };

            // The fetcher may be gone already
            let _ = done_tx.send((ticket, outcome));
        });
    }
}
