//! Buffer encoding shared by the parser, reconciler and confirmation policy.
//!
//! A confirmed selection is written into the search buffer as `type:label`
//! segments joined by [`SEGMENT_DELIMITER`]. Spaces inside a label are stored
//! as U+00A0 so that splitting the buffer on ASCII whitespace keeps multi-word
//! labels in one piece; every reader maps them back with
//! [`normalize_spaces`].

use crate::types::SelectionSet;

pub const SEGMENT_DELIMITER: &str = ", ";

/// Stand-in for a space inside a label.
pub const ENCODED_SPACE: char = '\u{a0}';

/// `:` separates a type from its label, `,` separates segments.
pub fn is_separator(c: char) -> bool {
    c == ':' || c == ','
}

pub fn encode_spaces(label: &str) -> String {
    label.replace(' ', &ENCODED_SPACE.to_string())
}

pub fn normalize_spaces(s: &str) -> String {
    s.replace(ENCODED_SPACE, " ")
}

/// `str::trim` also strips U+00A0, which is part of a label here.
pub(crate) fn trim_ascii_ws(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_ascii_whitespace())
}

/// Serialise `selection` as `type:label` segments, followed by `trailing`.
pub fn format_selection(selection: &SelectionSet, trailing: Option<char>) -> String {
    let mut out = selection
        .iter()
        .map(|item| format!("{}:{}", item.field_type, encode_spaces(&item.label)))
        .collect::<Vec<_>>()
        .join(SEGMENT_DELIMITER);
    if let Some(c) = trailing {
        out.push(c);
    }
    out
}

/// Re-segment a buffer into `(type, label)` pairs.
///
/// A label is a single word: it ends at `,` or ASCII whitespace, so text
/// typed after a confirmed segment's trailing space is free text and leaves
/// the pair intact. A word with its own `type:` prefix starts a new pair. The
/// first word of a segment without `:` inherits the type of the closest typed
/// segment to its left, so `flag:Spain,France` yields both flags. Leading
/// untyped segments and empty labels produce nothing.
pub fn parse_segments(text: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut current_type: Option<String> = None;

    for piece in text.split(',') {
        // `flag: Spain` still labels the word after the colon.
        let mut expecting_label = true;
        for word in piece.split_ascii_whitespace() {
            let label = match word.split_once(':') {
                Some((t, l)) => {
                    current_type = Some(t.to_string());
                    l
                }
                None if expecting_label => word,
                None => continue,
            };
            expecting_label = label.is_empty();
            if expecting_label {
                continue;
            }
            if let Some(t) = &current_type {
                pairs.push((t.clone(), normalize_spaces(label)));
            }
        }
    }
    pairs
}
