//! Approximate-match highlighting for result titles
//!
//! Titles are split into word and delimiter tokens. Each word token is matched
//! against the query's search words, exact substring first and bounded edit
//! distance second, and the matched region comes back as a highlight segment.
//! Concatenating the returned segments always reproduces the input text.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::query::SearchSession;

/// Search words shorter than this are dropped
const MIN_SEARCH_WORD_LEN: usize = 2;

/// A piece of highlighted text, borrowed from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain text
    Text(&'a str),
    /// Text that matched a search word
    Highlight(&'a str),
}

impl<'a> Segment<'a> {
    /// The underlying text regardless of highlighting
    pub fn as_str(&self) -> &'a str {
        match self {
            Segment::Text(s) | Segment::Highlight(s) => *s,
        }
    }

    pub fn is_highlighted(&self) -> bool {
        matches!(self, Segment::Highlight(_))
    }
}

/// Highlight the parts of `text` that match `query`
///
/// The query is split into lowercase search words of at least two characters.
/// For every word token in `text` the search words are tried in query order:
/// first as a case-insensitive substring, then (only if no word matched
/// exactly) as the leftmost window within edit-distance budget. The first
/// word that hits wins for that token.
///
/// A blank query, or one made only of single-character words, returns the
/// text as a single [`Segment::Text`].
pub fn highlight<'a>(text: &'a str, query: &str) -> Vec<Segment<'a>> {
    let words = folded_search_words(query);
    if words.is_empty() {
        return vec![Segment::Text(text)];
    }

    let mut builder = SegmentBuilder::default();

    for token in tokenize(text) {
        let token_text = &text[token.clone()];
        if token_text.trim().is_empty() {
            builder.push(false, token);
            continue;
        }

        let lower: Vec<char> = token_text.chars().map(fold_char).collect();
        let Some((start, len)) = find_match(&lower, &words) else {
            builder.push(false, token);
            continue;
        };

        // Offsets are found in chars; map them back to bytes of the token
        let offsets: Vec<usize> = token_text
            .char_indices()
            .map(|(i, _)| token.start + i)
            .chain(std::iter::once(token.end))
            .collect();
        let match_start = offsets[start];
        let match_end = offsets[start + len];

        builder.push(false, token.start..match_start);
        builder.push(true, match_start..match_end);
        builder.push(false, match_end..token.end);
    }

    builder.finish(text)
}

/// Highlight a title against the session's debounced query
///
/// Without a session there is nothing to match against and the title is
/// returned unchanged.
pub fn highlight_title<'a>(
    session: Option<&SearchSession>,
    title: &'a str,
) -> Vec<Segment<'a>> {
    match session {
        Some(session) => highlight(title, &session.query().debounced),
        None => vec![Segment::Text(title)],
    }
}

/// Split a query into the lowercase words used for matching
pub fn search_words(query: &str) -> Vec<String> {
    folded_search_words(query)
        .into_iter()
        .map(|word| word.into_iter().collect())
        .collect()
}

/// Levenshtein edit distance with unit costs, counted in characters
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    edit_distance(&a, &b)
}

fn folded_search_words(query: &str) -> Vec<Vec<char>> {
    query
        .split_whitespace()
        .map(|word| word.chars().map(fold_char).collect::<Vec<_>>())
        .filter(|word| word.len() >= MIN_SEARCH_WORD_LEN)
        .collect()
}

/// Lowercase a single char without changing the char count
fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Split text into word tokens and delimiter tokens (whitespace runs and
/// `.,!?;`), as byte ranges covering the whole text
fn tokenize(text: &str) -> Vec<Range<usize>> {
    static DELIMITER_REGEX: OnceLock<Regex> = OnceLock::new();

    let re = DELIMITER_REGEX.get_or_init(|| Regex::new(r"\s+|[.,!?;]").unwrap());

    let mut tokens = Vec::new();
    let mut last = 0;
    for delimiter in re.find_iter(text) {
        if delimiter.start() > last {
            tokens.push(last..delimiter.start());
        }
        tokens.push(delimiter.range());
        last = delimiter.end();
    }
    if last < text.len() {
        tokens.push(last..text.len());
    }
    tokens
}

/// Find `(char_start, char_len)` of the region to highlight in a lowercase token
fn find_match(token: &[char], words: &[Vec<char>]) -> Option<(usize, usize)> {
    words
        .iter()
        .find_map(|word| exact_position(token, word).map(|start| (start, word.len())))
        .or_else(|| {
            words
                .iter()
                .find_map(|word| fuzzy_position(token, word).map(|start| (start, word.len())))
        })
}

fn exact_position(token: &[char], word: &[char]) -> Option<usize> {
    token.windows(word.len()).position(|window| window == word)
}

fn fuzzy_position(token: &[char], word: &[char]) -> Option<usize> {
    let budget = distance_budget(word.len());
    token
        .windows(word.len())
        .position(|window| edit_distance(window, word) <= budget)
}

/// Maximum edit distance tolerated for a search word of `len` chars
fn distance_budget(len: usize) -> usize {
    match len {
        0..=2 => 0,
        3..=4 => 1,
        _ => 2,
    }
}

fn edit_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Collects byte ranges, merging neighbouring plain text
#[derive(Default)]
struct SegmentBuilder {
    parts: Vec<(bool, Range<usize>)>,
}

impl SegmentBuilder {
    fn push(&mut self, highlighted: bool, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        if let Some((false, last)) = self.parts.last_mut()
            && !highlighted
            && last.end == range.start
        {
            last.end = range.end;
            return;
        }
        self.parts.push((highlighted, range));
    }

    fn finish<'a>(self, text: &'a str) -> Vec<Segment<'a>> {
        if self.parts.is_empty() {
            return vec![Segment::Text(text)];
        }
        self.parts
            .into_iter()
            .map(|(highlighted, range)| {
                if highlighted {
                    Segment::Highlight(&text[range])
                } else {
                    Segment::Text(&text[range])
                }
            })
            .collect()
    }
}
