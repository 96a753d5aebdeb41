//! Snippet extraction for search results.
//!
//! Given a hit's raw body HTML and the query phrase, produce the short
//! plain-text excerpt shown under the result, with the matched text
//! emphasized. Matching degrades gracefully: the full phrase first, then
//! each word, then each word with punctuation stripped.

use crate::html::strip_tags;

/// Maximum context kept on each side of the match, in bytes.
const CONTEXT: usize = 100;

/// Extract an emphasized snippet around the first match of `phrase`.
///
/// Returns `None` when neither the phrase nor any of its words (even with
/// non-alphanumeric characters stripped) occur in the stripped text.
/// Matching is case-sensitive.
#[must_use]
pub fn find_relevant_text(html: &str, phrase: &str) -> Option<String> {
    let text = strip_tags(html);

    if let Some(snippet) = locate(&text, phrase) {
        return Some(snippet);
    }
    for word in phrase.split_whitespace() {
        if let Some(snippet) = locate(&text, word) {
            return Some(snippet);
        }
    }
    for word in phrase.split_whitespace() {
        let bare: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
        if let Some(snippet) = locate(&text, &bare) {
            return Some(snippet);
        }
    }
    None
}

/// Emphasized excerpt around the first occurrence of `needle`, up to
/// [`CONTEXT`] on each side, trimmed at the nearest newline found while
/// scanning inward from each window edge.
fn locate(text: &str, needle: &str) -> Option<String> {
    if needle.is_empty() {
        return None;
    }
    let start = text.find(needle)?;
    let end = start + needle.len();

    let mut window_start = start.saturating_sub(CONTEXT);
    while !text.is_char_boundary(window_start) {
        window_start -= 1;
    }
    let mut window_end = (end + CONTEXT).min(text.len());
    while !text.is_char_boundary(window_end) {
        window_end += 1;
    }

    let mut left = window_start;
    if let Some(pos) = text[window_start..start].find('\n') {
        left = window_start + pos + 1;
    }
    let mut right = window_end;
    if let Some(pos) = text[end..window_end].rfind('\n') {
        right = end + pos;
    }

    Some(format!(
        "{}<em>{needle}</em>{}",
        &text[left..start],
        &text[end..right]
    ))
}
