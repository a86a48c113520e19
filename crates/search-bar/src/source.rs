//! The data boundary between a search bar and whatever it searches

use std::future::Future;

/// Something that can turn a query into results
///
/// This is the only place a search bar touches data. Implementations may call
/// a remote API, query a local index, or answer straight from memory. Repeated
/// calls with the same query should return the same results.
///
/// Any `Fn(String) -> impl Future<Output = anyhow::Result<Vec<T>>>` closure is
/// a search source:
///
/// ```
/// use search_bar::SearchSource;
///
/// let source = |query: String| async move {
///     Ok::<_, anyhow::Error>(vec![query.to_uppercase()])
/// };
///
/// let runtime = tokio::runtime::Runtime::new()?;
/// let results = runtime.block_on(source.search("bar".to_string()))?;
/// assert_eq!(results, ["BAR"]);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub trait SearchSource<T>: Send + Sync + 'static {
    /// Search for `query`
    ///
    /// Errors are logged by the caller and treated as an empty result set.
    fn search(&self, query: String) -> impl Future<Output = anyhow::Result<Vec<T>>> + Send;
}

impl<T, F, Fut> SearchSource<T> for F
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Vec<T>>> + Send,
{
    fn search(&self, query: String) -> impl Future<Output = anyhow::Result<Vec<T>>> + Send {
        self(query)
    }
}
