//! Selection reconciler: which confirmed selections survive a text edit.

use crate::parser::active_token;
use crate::text::parse_segments;
use crate::types::{FieldTypes, SelectionSet};

/// Reconcile `selection` against the edited buffer.
///
/// Members whose `type:label` segment was edited away are dropped. A member
/// whose label is exactly the token under the cursor is released for editing
/// when its type comes from the static catalog; members of async-only types
/// stay selected.
pub fn reconcile(
    text: &str,
    cursor: usize,
    selection: &SelectionSet,
    types: &FieldTypes,
) -> SelectionSet {
    if text.is_empty() {
        return SelectionSet::new();
    }

    let pairs = parse_segments(text);
    let mut surviving: SelectionSet = selection
        .iter()
        .filter(|item| {
            pairs
                .iter()
                .any(|(t, l)| *t == item.field_type && *l == item.label)
        })
        .cloned()
        .collect();

    let under_cursor = active_token(text, cursor, types);
    let reopened = surviving
        .iter()
        .find(|item| item.label == under_cursor.text)
        .filter(|item| !types.is_remote(&item.field_type))
        .map(|item| item.id.clone());
    if let Some(id) = reopened {
        tracing::debug!(%id, token = %under_cursor.text, "selection reopened for editing");
        surviving.remove_id(&id);
    }

    surviving
}
