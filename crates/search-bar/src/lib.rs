//! Headless command palette / search bar core
//!
//! This crate provides the non-visual half of a search bar widget:
//! - Query sessions with an immediate and a debounced copy of the input
//! - A result fetcher that turns debounced queries into result sets,
//!   discarding responses that arrive for superseded queries
//! - Approximate-match highlighting of result titles (exact substring first,
//!   bounded Levenshtein fallback second)
//! - An in-memory command index usable as a search source
//!
//! Rendering is left to the caller: results are handed to a render function
//! and titles come back as text/highlight segments.
//!
//! # Example
//!
//! ```
//! use search_bar::{ResultFetcher, ResultsView, SearchBarConfig, SearchSession, highlight_title};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let session = SearchSession::new(&SearchBarConfig::default());
//! let mut fetcher = ResultFetcher::spawn(Some(&session), |query: String| async move {
//!     Ok::<_, anyhow::Error>(vec![format!("Result for {query}")])
//! });
//!
//! session.set_input("result");
//!
//! let state = fetcher
//!     .wait_for(|state| state.active_query() == Some("result") && !state.is_loading())
//!     .await;
//! match state.view(|title| title.clone()) {
//!     ResultsView::Loading { .. } => { /* draw skeleton rows */ }
//!     ResultsView::Hidden => {}
//!     ResultsView::Items(titles) => {
//!         for title in &titles {
//!             let segments = highlight_title(Some(&session), title);
//!             assert!(segments[0].is_highlighted());
//!         }
//!     }
//! }
//! # }
//! ```

mod config;
mod error;
mod fetcher;
mod highlight;
mod provider;
mod query;
mod results;
mod search;
mod source;

pub use config::SearchBarConfig;
pub use error::SearchError;
pub use fetcher::{FetchState, ResultFetcher, SearchTicket};
pub use highlight::{Segment, highlight, highlight_title, levenshtein, search_words};
pub use provider::{CommandIndex, ItemProvider, SearchItem};
pub use query::{Debouncer, Query, SearchSession};
pub use results::{LOADING_PLACEHOLDERS, ResultsView};
pub use search::filter_items;
pub use source::SearchSource;
