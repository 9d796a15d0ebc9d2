//! Core types for trawl-core.
//!
//! This module defines the data shared by every engine component: the
//! [`DataItem`] candidates, the duplicate-free [`SelectionSet`], the derived
//! [`SearchToken`], and the session-level [`SearchState`], [`SearchPhase`] and
//! [`SearchEvent`] vocabulary.

use serde::{Deserialize, Serialize};

/// A selectable candidate: an entry of the static catalog or a remote match.
///
/// Identity is `id`; two items with the same id are the same candidate even
/// if their labels differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataItem {
    pub id: String,
    /// Display text, also what the user types to find the item.
    pub label: String,
    /// Field-type tag (`flag`, `rfmo`, `vessel`, …).
    #[serde(rename = "type")]
    pub field_type: String,
}

impl DataItem {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field_type: field_type.into(),
        }
    }
}

impl std::fmt::Display for DataItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.field_type, self.label)
    }
}

// ---------------------------------------------------------------------------
// SelectionSet
// ---------------------------------------------------------------------------

/// Confirmed selections in confirmation order. No two elements share an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    items: Vec<DataItem>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` unless its id is already present. Returns whether the
    /// set changed.
    pub fn push(&mut self, item: DataItem) -> bool {
        if self.contains_id(&item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    pub fn has_type(&self, field_type: &str) -> bool {
        self.items.iter().any(|i| i.field_type == field_type)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.items.iter().any(|i| i.label == label)
    }

    pub fn retain(&mut self, keep: impl FnMut(&DataItem) -> bool) {
        self.items.retain(keep);
    }

    pub fn remove_id(&mut self, id: &str) -> Option<DataItem> {
        let pos = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(pos))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataItem> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[DataItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<DataItem> for SelectionSet {
    /// Later items whose id was already seen are dropped.
    fn from_iter<I: IntoIterator<Item = DataItem>>(iter: I) -> Self {
        let mut set = SelectionSet::new();
        for item in iter {
            set.push(item);
        }
        set
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a DataItem;
    type IntoIter = std::slice::Iter<'a, DataItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ---------------------------------------------------------------------------
// Field types
// ---------------------------------------------------------------------------

/// The field-type vocabulary of a session.
///
/// `known` lists every type name a user can type as a prefix; `remote` is the
/// subset whose candidates only come from the remote lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTypes {
    known: Vec<String>,
    remote: Vec<String>,
}

impl FieldTypes {
    pub fn new<K, R>(known: K, remote: R) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let mut known: Vec<String> = known.into_iter().map(Into::into).collect();
        let remote: Vec<String> = remote.into_iter().map(Into::into).collect();
        // An async-only type is always a known type.
        for r in &remote {
            if !known.contains(r) {
                known.push(r.clone());
            }
        }
        Self { known, remote }
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.known.iter().any(|t| t == name)
    }

    /// True when `name` is resolved by the remote lookup rather than the
    /// static catalog.
    pub fn is_remote(&self, name: &str) -> bool {
        self.remote.iter().any(|t| t == name)
    }

    pub fn known(&self) -> &[String] {
        &self.known
    }
}

impl Default for FieldTypes {
    fn default() -> Self {
        Self::new(["flag", "rfmo", "vessel"], ["vessel"])
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// A word of the search buffer, derived on every keystroke.
///
/// `start..end` is the byte range of the token in the buffer it was parsed
/// from. `text` has no-break spaces already normalised to plain spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchToken {
    pub text: String,
    pub inferred_type: Option<String>,
    pub start: usize,
    pub end: usize,
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Where a session is in its search cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// Empty buffer; results are the whole catalog.
    #[default]
    Idle,
    /// Local ranking only.
    Filtering,
    /// Local results shown, remote lookup in flight.
    AwaitingRemote,
    /// Local results plus the remote addendum.
    Merged,
}

impl std::fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchPhase::Idle => write!(f, "idle"),
            SearchPhase::Filtering => write!(f, "filtering"),
            SearchPhase::AwaitingRemote => write!(f, "awaiting-remote"),
            SearchPhase::Merged => write!(f, "merged"),
        }
    }
}

/// Everything a session knows after the last event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub text: String,
    /// Byte offset of the insertion point within `text`.
    pub cursor: usize,
    pub selection: SelectionSet,
    pub loading: bool,
    pub results: Vec<DataItem>,
    /// Query of the most recently dispatched remote lookup.
    pub request_signature: Option<String>,
}

/// Input to a session, produced by the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// Confirm a candidate and leave a trailing space for further typing.
    ConfirmSelection(DataItem),
    /// Confirm a candidate without a trailing separator.
    ConfirmWithoutSeparator(DataItem),
    /// The buffer or the cursor changed.
    TextChanged { text: String, cursor: usize },
    Noop,
}

/// What the rendering surface observes.
#[derive(Debug, Clone, Copy)]
pub struct SearchView<'a> {
    pub results: &'a [DataItem],
    pub loading: bool,
    pub selection: &'a SelectionSet,
    pub active_token: &'a str,
}
