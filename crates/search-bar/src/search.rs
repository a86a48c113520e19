//! Fuzzy ranking for the command index

use nucleo_matcher::{Config, Matcher, Utf32Str};

use crate::provider::SearchItem;

/// Filter and score items based on a search query
///
/// Uses nucleo-matcher's fuzzy matching algorithm (same as Helix/Zed).
/// Returns a vector of (item, score) pairs sorted by score (highest first);
/// ties keep registration order. A blank query returns all items with
/// score 0.
pub fn filter_items<T: Clone>(items: &[SearchItem<T>], query: &str) -> Vec<(SearchItem<T>, u16)> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items.iter().map(|item| (item.clone(), 0)).collect();
    }

    let mut matcher = Matcher::new(Config::DEFAULT);

    // Reusable buffers for UTF-32 conversion
    let mut haystack_buf = Vec::new();
    let mut needle_buf = Vec::new();

    let mut results: Vec<(SearchItem<T>, u16)> = items
        .iter()
        .filter_map(|item| {
            let haystack = item.searchable_text();

            haystack_buf.clear();
            needle_buf.clear();

            let haystack_str = Utf32Str::new(&haystack, &mut haystack_buf);
            let query_str = Utf32Str::new(&query, &mut needle_buf);

            matcher
                .fuzzy_match(haystack_str, query_str)
                .map(|score| (item.clone(), score.saturating_add(boost(item, &query))))
        })
        .collect();

    // Stable sort keeps registration order among equal scores
    results.sort_by(|a, b| b.1.cmp(&a.1));

    results
}

/// Prefix matches on the title outrank everything else, then subtitle
/// prefixes, then titles containing the query
fn boost<T>(item: &SearchItem<T>, query: &str) -> u16 {
    let title = item.title.to_lowercase();
    let subtitle = item.subtitle.as_deref().unwrap_or_default().to_lowercase();

    if title.starts_with(query) {
        10000
    } else if subtitle.starts_with(query) {
        5000
    } else if title.contains(query) {
        1000
    } else {
        0
    }
}
