//! Token parser: turns the raw search buffer into ordered field tokens.
//!
//! The buffer is split on `:`, `,` and ASCII whitespace. Words that merely
//! restate the current selection are dropped: the first occurrence of a
//! selected item's type acts as a silent type filter, and a selected item's
//! label is never searched for again. The word being typed at the cursor is
//! re-appended as a final pseudo-token so a half-typed type prefix keeps
//! narrowing the candidates.
//!
//! Every function here is pure; identical inputs always produce identical
//! tokens in identical order.

use crate::text::{is_separator, normalize_spaces, trim_ascii_ws};
use crate::types::{FieldTypes, SearchToken, SelectionSet};

/// Parse `text` into the tokens used for ranking and remote lookups.
///
/// `cursor` is the byte offset of the insertion point. Offsets past the end
/// of `text` are clamped.
pub fn tokenize(
    text: &str,
    cursor: usize,
    selection: &SelectionSet,
    types: &FieldTypes,
) -> Vec<SearchToken> {
    let cursor = clamp_cursor(text, cursor);
    let mut consumed_types: Vec<String> = Vec::new();
    let mut tokens = Vec::new();

    for (start, end) in words(text) {
        let word = normalize_spaces(&text[start..end]);
        if word.is_empty() {
            continue;
        }
        if selection.has_type(&word) {
            // First mention of a selected type is the filter directive itself.
            if !consumed_types.contains(&word) {
                consumed_types.push(word);
                continue;
            }
        } else if selection.has_label(&word) {
            continue;
        }
        tokens.push(token(word, start, end, types));
    }

    if let Some(fragment) = in_progress_fragment(text, cursor, types) {
        tokens.push(fragment);
    }

    tracing::trace!(
        text,
        cursor,
        tokens = ?tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
        "tokenized"
    );
    tokens
}

/// The token under the cursor: from just after the nearest `:`/`,` before
/// the cursor (or the start) to the first `:`/`,` at or after it (or the end).
///
/// The text is space-normalised but not trimmed. `inferred_type` is the type
/// prefix of the segment when the token follows a `type:` prefix, or the
/// token itself when it names a known type.
pub fn active_token(text: &str, cursor: usize, types: &FieldTypes) -> SearchToken {
    let cursor = clamp_cursor(text, cursor);
    let start = text[..cursor]
        .rfind(is_separator)
        .map(|i| i + 1)
        .unwrap_or(0);
    let end = text[cursor..]
        .find(is_separator)
        .map(|i| cursor + i)
        .unwrap_or(text.len());

    let body = normalize_spaces(&text[start..end]);
    let inferred_type = type_prefix(text, start)
        .or_else(|| Some(trim_ascii_ws(&body).to_string()))
        .filter(|t| types.is_known(t));

    SearchToken {
        text: body,
        inferred_type,
        start,
        end,
    }
}

/// Free-text part of the tokens: everything that is neither a field type
/// name nor a selected label, joined by `,`.
pub fn remote_query(tokens: &[SearchToken], selection: &SelectionSet, types: &FieldTypes) -> String {
    tokens
        .iter()
        .filter(|t| !selection.has_label(&t.text) && !types.is_known(&t.text))
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Whether the tokens ask for candidates only the remote lookup can supply.
///
/// True when any token names an async-only type. With `untyped_queries`, a
/// buffer that names no field type at all also qualifies.
pub fn wants_remote(tokens: &[SearchToken], types: &FieldTypes, untyped_queries: bool) -> bool {
    let mut typed = tokens.iter().filter(|t| types.is_known(&t.text)).peekable();
    if typed.peek().is_none() {
        return untyped_queries;
    }
    typed.any(|t| types.is_remote(&t.text))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn clamp_cursor(text: &str, cursor: usize) -> usize {
    let mut c = cursor.min(text.len());
    while !text.is_char_boundary(c) {
        c -= 1;
    }
    c
}

fn token(text: String, start: usize, end: usize, types: &FieldTypes) -> SearchToken {
    let inferred_type = types.is_known(&text).then(|| text.clone());
    SearchToken {
        text,
        inferred_type,
        start,
        end,
    }
}

/// Byte ranges of the words of `text`.
fn words(text: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        let boundary = is_separator(c) || c.is_ascii_whitespace();
        match (boundary, start) {
            (true, Some(s)) => {
                out.push((s, i));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push((s, text.len()));
    }
    out
}

/// The type prefix being typed at the cursor: from just after the nearest
/// space before the cursor to the first `:` after that space. Nothing when
/// the cursor sits on a space.
fn in_progress_fragment(text: &str, cursor: usize, types: &FieldTypes) -> Option<SearchToken> {
    if text[cursor..].starts_with(' ') {
        return None;
    }
    let before = &text[..cursor];

    let mut start = 0;
    let mut end = None;
    for (i, c) in before.char_indices().rev() {
        if c == ':' {
            end = Some(i);
        } else if c == ' ' {
            start = i + 1;
            break;
        }
    }
    let end = end.unwrap_or(start);
    if end <= start {
        return None;
    }
    Some(token(normalize_spaces(&text[start..end]), start, end, types))
}

/// The `type` in `type:label` when `label_start` sits right after the `:`.
fn type_prefix(text: &str, label_start: usize) -> Option<String> {
    let colon = label_start.checked_sub(1)?;
    if text.as_bytes().get(colon) != Some(&b':') {
        return None;
    }
    let head = &text[..colon];
    let from = head
        .rfind(|c: char| c == ',' || c == ':' || c.is_ascii_whitespace())
        .map(|i| i + 1)
        .unwrap_or(0);
    let t = &head[from..];
    (!t.is_empty()).then(|| t.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataItem;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn texts(tokens: &[SearchToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    fn spain() -> SelectionSet {
        std::iter::once(DataItem::new("1", "Spain", "flag")).collect()
    }

    #[test]
    fn selected_type_and_label_are_dropped() {
        let text = "flag:Spain, IOTC";
        let tokens = tokenize(text, text.len(), &spain(), &FieldTypes::default());
        assert_eq!(texts(&tokens), ["IOTC"]);
        assert_eq!((tokens[0].start, tokens[0].end), (12, 16));
        assert_eq!(tokens[0].inferred_type, None);
    }

    #[test]
    fn repeated_selected_type_is_kept_as_text() {
        let text = "flag:Spain, flag:Ind";
        let tokens = tokenize(text, text.len(), &spain(), &FieldTypes::default());
        // second `flag` kept, then the in-progress type prefix appended
        assert_eq!(texts(&tokens), ["flag", "Ind", "flag"]);
        assert_eq!(tokens[0].inferred_type.as_deref(), Some("flag"));
    }

    #[test]
    fn unselected_type_prefix_is_kept_and_recovered() {
        let text = "vessel:Sea";
        let tokens = tokenize(text, text.len(), &SelectionSet::new(), &FieldTypes::default());
        assert_eq!(texts(&tokens), ["vessel", "Sea", "vessel"]);
        let last = tokens.last().unwrap();
        assert_eq!((last.start, last.end), (0, 6));
    }

    #[test]
    fn encoded_spaces_stay_in_one_token() {
        let text = "vessel:Sea\u{a0}Breeze";
        let tokens = tokenize(text, 0, &SelectionSet::new(), &FieldTypes::default());
        assert_eq!(texts(&tokens), ["vessel", "Sea Breeze"]);
    }

    #[test]
    fn trailing_space_suppresses_fragment() {
        let text = "vessel:Sea ";
        let tokens = tokenize(text, text.len(), &SelectionSet::new(), &FieldTypes::default());
        assert_eq!(texts(&tokens), ["vessel", "Sea"]);
    }

    #[rstest]
    #[case::cursor_on_inner_space("vessel:Sea Breeze", 10, &["vessel", "Sea", "Breeze"])]
    #[case::cursor_after_inner_space("vessel:Sea Breeze", 11, &["vessel", "Sea", "Breeze"])]
    #[case::cursor_inside_label("vessel:Sea Breeze", 9, &["vessel", "Sea", "Breeze", "vessel"])]
    #[case::cursor_at_end("vessel:Sea Breeze", 17, &["vessel", "Sea", "Breeze"])]
    #[case::cursor_at_end_of_prefix("vessel:Sea", 10, &["vessel", "Sea", "vessel"])]
    fn type_prefix_fragment_at_cursor(
        #[case] text: &str,
        #[case] cursor: usize,
        #[case] expected: &[&str],
    ) {
        let tokens = tokenize(text, cursor, &SelectionSet::new(), &FieldTypes::default());
        assert_eq!(texts(&tokens), expected);
    }

    #[test]
    fn empty_text_has_no_tokens() {
        assert!(tokenize("", 0, &spain(), &FieldTypes::default()).is_empty());
        assert!(tokenize(" , : ", 5, &spain(), &FieldTypes::default()).is_empty());
    }

    #[test]
    fn cursor_past_end_is_clamped() {
        let tokens = tokenize("IOTC", 99, &SelectionSet::new(), &FieldTypes::default());
        assert_eq!(texts(&tokens), ["IOTC"]);
    }

    #[rstest]
    #[case("Spain", 5, "Spain")]
    #[case("  Indo nesia ", 4, "Indo nesia")]
    #[case("flag:Spa", 8, "Spa")]
    #[case("flag:Spain, rfmo:IO", 19, "IO")]
    #[case("flag:Spain, rfmo:IOTC", 7, "Spain")]
    #[case("flag:Spain, rfmo", 13, " rfmo")]
    fn active_token_bounds(#[case] text: &str, #[case] cursor: usize, #[case] expected: &str) {
        let token = active_token(text, cursor, &FieldTypes::default());
        assert_eq!(token.text.trim(), expected.trim());
    }

    #[test]
    fn active_token_infers_segment_type() {
        let types = FieldTypes::default();
        let text = "flag:Spain, rfmo:IO";
        assert_eq!(
            active_token(text, text.len(), &types).inferred_type.as_deref(),
            Some("rfmo")
        );
        assert_eq!(active_token("vessel", 3, &types).inferred_type.as_deref(), Some("vessel"));
        assert_eq!(active_token("Indo", 4, &types).inferred_type, None);
    }

    #[test]
    fn remote_query_strips_types_and_selected_labels() {
        let types = FieldTypes::default();
        let tokens = vec![
            token("vessel".into(), 0, 6, &types),
            token("Sea Breeze".into(), 7, 18, &types),
        ];
        assert_eq!(remote_query(&tokens, &SelectionSet::new(), &types), "Sea Breeze");

        let selected: SelectionSet =
            std::iter::once(DataItem::new("v9", "Sea Breeze", "vessel")).collect();
        assert_eq!(remote_query(&tokens, &selected, &types), "");
    }

    #[test]
    fn remote_wanted_only_for_async_types_by_default() {
        let types = FieldTypes::default();
        let vessel = tokenize("vessel:Sea", 10, &SelectionSet::new(), &types);
        let flag = tokenize("flag:Spa", 8, &SelectionSet::new(), &types);
        let bare = tokenize("Sea", 3, &SelectionSet::new(), &types);
        assert!(wants_remote(&vessel, &types, false));
        assert!(!wants_remote(&flag, &types, false));
        assert!(!wants_remote(&bare, &types, false));
        assert!(wants_remote(&bare, &types, true));
        assert!(!wants_remote(&flag, &types, true));
    }
}
