//! Confirmation policy: turning a candidate into a selection member.

use crate::text::{format_selection, trim_ascii_ws};
use crate::types::{DataItem, SelectionSet};

/// Separator left after a confirmation so the next keystroke starts a fresh
/// token.
pub const DEFAULT_TRAILING: char = ' ';

/// Keys that trigger auto-promotion of a sole visible candidate.
pub const PROMOTION_KEYS: [char; 2] = [' ', ','];

/// Result of a confirmation: the new selection and the rewritten buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub selection: SelectionSet,
    pub text: String,
}

/// Confirm `candidate` against `selection`.
///
/// Already-selected ids leave the selection unchanged; the buffer is always
/// rewritten from the full selection so the user resumes typing from a
/// canonical `type:label, type:label` prefix.
pub fn confirm(candidate: &DataItem, selection: &SelectionSet, trailing: Option<char>) -> Confirmation {
    let mut selection = selection.clone();
    if !selection.push(candidate.clone()) {
        tracing::debug!(id = %candidate.id, "candidate already selected");
    }
    let text = format_selection(&selection, trailing);
    Confirmation { selection, text }
}

/// The candidate to confirm automatically when `key` is typed.
///
/// Fires only when exactly one candidate is visible, `key` is a separator
/// and `text` is neither empty nor blank.
pub fn auto_promotion<'a>(visible: &'a [DataItem], text: &str, key: char) -> Option<&'a DataItem> {
    if !PROMOTION_KEYS.contains(&key) || trim_ascii_ws(text).is_empty() {
        return None;
    }
    match visible {
        [only] => Some(only),
        _ => None,
    }
}
