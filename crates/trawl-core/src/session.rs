//! Search orchestrator.
//!
//! A [`SearchSession`] owns one input box worth of state. Each
//! [`SearchEvent`] runs the synchronous pipeline (reconcile, tokenize, rank)
//! and, when the buffer names an async-only field type, dispatches a remote
//! lookup through the session's [`RequestSlot`]. Remote outcomes come back
//! over a channel and are merged only if they carry the signature of the
//! most recent request.
//!
//! ```text
//!            TextChanged / Confirm*
//!   Idle ──────────────────────────► Filtering
//!    ▲                                 │   ▲
//!    │ empty buffer     async type +   │   │ no remote needed
//!    │                  free text      ▼   │
//!    └──────────────────────────── AwaitingRemote ──► Merged
//!                                       outcome with current signature
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::catalog::Catalog;
use crate::confirm::{auto_promotion, confirm, Confirmation, DEFAULT_TRAILING};
use crate::dispatch::{RemoteOutcome, RequestSlot};
use crate::parser::{active_token, clamp_cursor, remote_query, tokenize, wants_remote};
use crate::rank::{rank, MatchRank};
use crate::reconcile::reconcile;
use crate::remote::{to_candidates, LookupError, RemoteLookup};
use crate::text::{format_selection, trim_ascii_ws};
use crate::types::{
    DataItem, FieldTypes, SearchEvent, SearchPhase, SearchState, SearchView, SelectionSet,
};

/// Engine knobs, usually built with [`crate::config::Config::settings`].
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub field_types: FieldTypes,
    /// Field type given to remote candidates.
    pub source_type: String,
    pub match_threshold: MatchRank,
    pub untyped_queries: bool,
    /// When false the session never dispatches remote lookups.
    pub remote_enabled: bool,
    pub debounce: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            field_types: FieldTypes::default(),
            source_type: "vessel".to_string(),
            match_threshold: MatchRank::Fuzzy,
            untyped_queries: false,
            remote_enabled: true,
            debounce: Duration::ZERO,
        }
    }
}

pub struct SearchSession<L: RemoteLookup> {
    catalog: Catalog,
    settings: SearchSettings,
    lookup: Arc<L>,
    state: SearchState,
    phase: SearchPhase,
    active_token: String,
    slot: RequestSlot,
    outcome_tx: mpsc::UnboundedSender<RemoteOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<RemoteOutcome>,
}

impl<L: RemoteLookup> SearchSession<L> {
    pub fn new(catalog: Catalog, settings: SearchSettings, lookup: Arc<L>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let state = SearchState {
            results: catalog.items().to_vec(),
            ..SearchState::default()
        };
        Self {
            slot: RequestSlot::new(settings.debounce),
            catalog,
            settings,
            lookup,
            state,
            phase: SearchPhase::Idle,
            active_token: String::new(),
            outcome_tx,
            outcome_rx,
        }
    }

    /// Start from an existing selection, with the buffer showing it.
    pub fn with_selection(mut self, selection: SelectionSet) -> Self {
        if selection.is_empty() {
            return self;
        }
        self.state.text = format_selection(&selection, Some(DEFAULT_TRAILING));
        self.state.cursor = self.state.text.len();
        self.state.selection = selection;
        self.research();
        self
    }

    /// Apply one event from the rendering surface.
    ///
    /// Remote lookups are spawned on the ambient tokio runtime.
    pub fn handle(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::TextChanged { text, cursor } => self.text_changed(text, cursor),
            SearchEvent::ConfirmSelection(item) => self.confirm_item(&item, Some(DEFAULT_TRAILING)),
            SearchEvent::ConfirmWithoutSeparator(item) => self.confirm_item(&item, None),
            SearchEvent::Noop => {}
        }
    }

    /// Offer a raw key press before it is inserted into the buffer.
    ///
    /// Returns true when the key confirmed the sole visible candidate; the
    /// caller must then not insert it.
    pub fn key_pressed(&mut self, key: char) -> bool {
        let Some(item) = auto_promotion(&self.state.results, &self.state.text, key).cloned() else {
            return false;
        };
        tracing::debug!(id = %item.id, ?key, "auto-promoting sole candidate");
        self.confirm_item(&item, Some(key));
        true
    }

    /// Apply a remote outcome. Returns whether it changed the session.
    pub fn apply(&mut self, outcome: RemoteOutcome) -> bool {
        let RemoteOutcome {
            signature,
            serial,
            result,
        } = outcome;

        if matches!(result, Err(LookupError::Cancelled)) {
            tracing::debug!(%signature, "remote lookup cancelled");
            return false;
        }
        if !self.state.loading || self.state.request_signature.as_deref() != Some(signature.as_str()) {
            tracing::debug!(%signature, current = ?self.state.request_signature, "discarding stale remote outcome");
            return false;
        }

        let entries = match result {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(%signature, error = %err, "remote lookup failed");
                Vec::new()
            }
        };

        let addendum = to_candidates(entries, &self.settings.source_type, &self.state.selection);
        let mut added = 0usize;
        for item in addendum {
            if !self.state.results.iter().any(|r| r.id == item.id) {
                self.state.results.push(item);
                added += 1;
            }
        }

        self.state.loading = false;
        if !self.slot.finish(serial) {
            // An older request for the same query answered first; the one
            // still tracked can only repeat it.
            self.slot.cancel();
        }
        self.phase = SearchPhase::Merged;
        tracing::debug!(%signature, added, total = self.state.results.len(), "remote results merged");
        true
    }

    /// Apply every outcome that has already arrived, without waiting.
    /// Returns how many changed the session.
    pub fn poll_remote(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if self.apply(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until the current remote request, if any, has been merged.
    pub async fn settle(&mut self) {
        while self.state.loading {
            match self.outcome_rx.recv().await {
                Some(outcome) => {
                    self.apply(outcome);
                }
                None => break,
            }
        }
    }

    /// Cancel the outstanding lookup and keep the local results.
    pub fn cancel_pending(&mut self) {
        self.abort_remote();
        if self.phase == SearchPhase::AwaitingRemote {
            self.phase = SearchPhase::Filtering;
        }
    }

    pub fn view(&self) -> SearchView<'_> {
        SearchView {
            results: &self.state.results,
            loading: self.state.loading,
            selection: &self.state.selection,
            active_token: &self.active_token,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.state.selection
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    fn text_changed(&mut self, text: String, cursor: usize) {
        let cursor = clamp_cursor(&text, cursor);
        if text == self.state.text {
            self.state.cursor = cursor;
            self.refresh_active_token();
            return;
        }

        let selection = reconcile(&text, cursor, &self.state.selection, &self.settings.field_types);
        if selection.len() != self.state.selection.len() {
            tracing::debug!(before = self.state.selection.len(), after = selection.len(), "selection reconciled");
        }
        self.state.text = text;
        self.state.cursor = cursor;
        self.state.selection = selection;
        self.research();
    }

    fn confirm_item(&mut self, item: &DataItem, trailing: Option<char>) {
        let Confirmation { selection, text } = confirm(item, &self.state.selection, trailing);
        self.state.cursor = text.len();
        self.state.text = text;
        self.state.selection = selection;
        self.research();
    }

    fn research(&mut self) {
        self.refresh_active_token();
        let types = &self.settings.field_types;
        let tokens = tokenize(&self.state.text, self.state.cursor, &self.state.selection, types);

        if self.state.text.is_empty() && tokens.is_empty() {
            self.state.results = self
                .catalog
                .items()
                .iter()
                .filter(|item| !self.state.selection.contains_id(&item.id))
                .cloned()
                .collect();
            self.abort_remote();
            self.transition(SearchPhase::Idle);
            return;
        }

        let query = remote_query(&tokens, &self.state.selection, types);
        let remote = self.settings.remote_enabled
            && !query.is_empty()
            && wants_remote(&tokens, types, self.settings.untyped_queries);
        self.state.results = rank(
            &tokens,
            self.catalog.items(),
            &self.state.selection,
            self.settings.match_threshold,
        );

        if !remote {
            self.abort_remote();
            self.transition(SearchPhase::Filtering);
            return;
        }

        self.state.loading = true;
        self.state.request_signature = Some(query.clone());
        self.transition(SearchPhase::AwaitingRemote);
        self.slot
            .dispatch(Arc::clone(&self.lookup), query, 0, self.outcome_tx.clone());
    }

    fn abort_remote(&mut self) {
        if self.slot.cancel() {
            tracing::debug!(signature = ?self.state.request_signature, "cancelled outstanding lookup");
        }
        self.state.loading = false;
        self.state.request_signature = None;
    }

    fn refresh_active_token(&mut self) {
        let token = active_token(&self.state.text, self.state.cursor, &self.settings.field_types);
        self.active_token = trim_ascii_ws(&token.text).to_string();
    }

    fn transition(&mut self, next: SearchPhase) {
        if self.phase != next {
            tracing::debug!(from = %self.phase, to = %next, results = self.state.results.len(), "phase");
        }
        self.phase = next;
    }
}

impl<L: RemoteLookup> std::fmt::Debug for SearchSession<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("active_token", &self.active_token)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
