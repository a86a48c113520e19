//! What a results list should show for a given fetch state

use crate::fetcher::FetchState;

/// Number of skeleton rows shown while a search is in flight
pub const LOADING_PLACEHOLDERS: usize = 3;

/// Renderable form of a [`FetchState`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView<R> {
    /// Nothing to show: idle, or the search came back empty
    Hidden,
    /// A search is in flight; draw this many placeholder rows
    Loading { placeholders: usize },
    /// One rendered row per result, in result order
    Items(Vec<R>),
}

impl<R> ResultsView<R> {
    /// Number of rows the list needs, placeholders included
    pub fn row_count(&self) -> usize {
        match self {
            ResultsView::Hidden => 0,
            ResultsView::Loading { placeholders } => *placeholders,
            ResultsView::Items(rows) => rows.len(),
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, ResultsView::Hidden)
    }
}

impl<T> FetchState<T> {
    /// Map the state to rows using the caller's render function
    ///
    /// `render_result` is only called for settled results.
    pub fn view<R>(&self, render_result: impl FnMut(&T) -> R) -> ResultsView<R> {
        if self.is_loading() {
            return ResultsView::Loading {
                placeholders: LOADING_PLACEHOLDERS,
            };
        }

        if self.results().is_empty() {
            return ResultsView::Hidden;
        }

        ResultsView::Items(self.results().iter().map(render_result).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_is_hidden() {
        let state = FetchState::<String>::default();
        let view = state.view(|s| s.len());
        assert!(view.is_hidden());
        assert_eq!(view.row_count(), 0);
    }

    #[test]
    fn test_loading_shows_three_placeholders() {
        let mut state = FetchState::<String>::default();
        state.begin("query");

        let mut rendered = 0;
        let view = state.view(|_| rendered += 1);
        assert_eq!(view, ResultsView::Loading { placeholders: 3 });
        assert_eq!(rendered, 0);
    }

    #[test]
    fn test_settled_results_are_rendered_in_order() {
        let mut state = FetchState::default();
        let ticket = state.begin("file").unwrap();
        state.settle(&ticket, Ok(vec!["Open File".to_string(), "Save File".to_string()]));

        let view = state.view(|title| title.to_uppercase());
        assert_eq!(
            view,
            ResultsView::Items(vec!["OPEN FILE".to_string(), "SAVE FILE".to_string()])
        );
        assert_eq!(view.row_count(), 2);
    }

    #[test]
    fn test_empty_settled_results_are_hidden() {
        let mut state = FetchState::<String>::default();
        let ticket = state.begin("nothing").unwrap();
        state.settle(&ticket, Ok(Vec::new()));

        assert!(state.view(|s| s.clone()).is_hidden());
    }
}
