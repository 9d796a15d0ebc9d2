//! Test builders: ergonomic constructors for catalogs, selections and
//! sessions.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use std::sync::Arc;
use std::time::Duration;

use trawl_core::rank::MatchRank;
use trawl_core::{
    Catalog, DataItem, FieldTypes, RemoteLookup, SearchEvent, SearchSession, SearchSettings,
    SelectionSet,
};

// ---------------------------------------------------------------------------
// CatalogBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Catalog`] fixtures.
///
/// # Example
///
/// ```rust
/// let catalog = CatalogBuilder::new()
///     .flag("1", "Spain")
///     .rfmo("3", "IOTC")
///     .build();
/// ```
#[derive(Default)]
pub struct CatalogBuilder {
    items: Vec<DataItem>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(mut self, id: &str, label: &str, field_type: &str) -> Self {
        self.items.push(DataItem::new(id, label, field_type));
        self
    }

    pub fn flag(self, id: &str, label: &str) -> Self {
        self.item(id, label, "flag")
    }

    pub fn rfmo(self, id: &str, label: &str) -> Self {
        self.item(id, label, "rfmo")
    }

    pub fn build(self) -> Catalog {
        Catalog::new(self.items).expect("test catalog must have unique ids")
    }
}

// ---------------------------------------------------------------------------
// SessionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for a [`SearchSession`] with test-friendly settings: no
/// debounce, default field types, fuzzy threshold.
pub struct SessionBuilder {
    catalog: Catalog,
    settings: SearchSettings,
    selection: SelectionSet,
}

impl SessionBuilder {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            settings: SearchSettings::default(),
            selection: SelectionSet::new(),
        }
    }

    pub fn field_types(mut self, known: &[&str], remote: &[&str]) -> Self {
        self.settings.field_types =
            FieldTypes::new(known.iter().copied(), remote.iter().copied());
        self
    }

    pub fn threshold(mut self, threshold: MatchRank) -> Self {
        self.settings.match_threshold = threshold;
        self
    }

    pub fn untyped_queries(mut self, on: bool) -> Self {
        self.settings.untyped_queries = on;
        self
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.settings.debounce = debounce;
        self
    }

    pub fn offline(mut self) -> Self {
        self.settings.remote_enabled = false;
        self
    }

    pub fn selected(mut self, item: DataItem) -> Self {
        self.selection.push(item);
        self
    }

    pub fn build<L: RemoteLookup>(self, lookup: L) -> SearchSession<L> {
        SearchSession::new(self.catalog, self.settings, Arc::new(lookup))
            .with_selection(self.selection)
    }
}

// ---------------------------------------------------------------------------
// Event helpers
// ---------------------------------------------------------------------------

/// Replace the buffer with `text`, cursor at the end.
pub fn type_text<L: RemoteLookup>(session: &mut SearchSession<L>, text: &str) {
    session.handle(SearchEvent::TextChanged {
        text: text.to_string(),
        cursor: text.len(),
    });
}

/// Move the cursor without touching the text.
pub fn move_cursor<L: RemoteLookup>(session: &mut SearchSession<L>, cursor: usize) {
    let text = session.state().text.clone();
    session.handle(SearchEvent::TextChanged { text, cursor });
}

/// Confirm the result with the given label, keeping a trailing space.
pub fn confirm_label<L: RemoteLookup>(session: &mut SearchSession<L>, label: &str) {
    let item = session
        .view()
        .results
        .iter()
        .find(|i| i.label == label)
        .cloned()
        .unwrap_or_else(|| panic!("{label:?} is not among the results"));
    session.handle(SearchEvent::ConfirmSelection(item));
}

pub fn labels(items: &[DataItem]) -> Vec<&str> {
    items.iter().map(|i| i.label.as_str()).collect()
}
