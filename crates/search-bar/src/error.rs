/// Why a search produced no results
///
/// Search failures never reach the renderer; they are logged and the fetcher
/// falls back to an empty result set.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search failed: {source}")]
    Failed {
        query: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("search task stopped before completing")]
    Aborted { query: String },
}

impl SearchError {
    /// The query the failed search was issued for
    pub fn query(&self) -> &str {
        match self {
            SearchError::Failed { query, .. } | SearchError::Aborted { query } => query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_kept_for_every_variant() {
        let failed = SearchError::Failed {
            query: "save".into(),
            source: anyhow::anyhow!("timeout"),
        };
        let aborted = SearchError::Aborted {
            query: "open".into(),
        };

        assert_eq!(failed.query(), "save");
        assert_eq!(failed.to_string(), "search failed: timeout");
        assert_eq!(aborted.query(), "open");
    }
}
