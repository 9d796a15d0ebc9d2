//! Remote lookup seam.
//!
//! Candidates of async-only field types come from a remote service. The
//! engine only sees the [`RemoteLookup`] trait; `trawl-remote` provides the
//! HTTP implementation and tests provide scripted ones.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::types::{DataItem, SelectionSet};

/// One row of a remote response. Rows without a usable `name` are dropped
/// when converted to candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub id: String,
    pub name: Option<String>,
}

impl RemoteEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }
}

/// Why a lookup produced no entries.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The service answered with a non-success status.
    #[error("remote lookup unavailable (HTTP {status})")]
    Unavailable { status: u16 },
    #[error("remote transport error: {0}")]
    Transport(String),
    #[error("remote response could not be decoded: {0}")]
    Decode(String),
    /// Superseded by a newer request or torn down with the session.
    #[error("remote lookup cancelled")]
    Cancelled,
}

impl LookupError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LookupError::Cancelled)
    }
}

/// A read-only remote candidate source.
///
/// `query` is the comma-joined free text, `offset` the zero-based index of
/// the first result. Implementations should stop work and return
/// [`LookupError::Cancelled`] once `cancel` fires; the session also stops
/// polling the future at that point.
pub trait RemoteLookup: Send + Sync + 'static {
    fn lookup(
        &self,
        query: &str,
        offset: usize,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<Vec<RemoteEntry>, LookupError>> + Send;
}

/// A lookup that never finds anything. Used when remote search is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineLookup;

impl RemoteLookup for OfflineLookup {
    async fn lookup(
        &self,
        _query: &str,
        _offset: usize,
        _cancel: CancellationToken,
    ) -> Result<Vec<RemoteEntry>, LookupError> {
        Ok(Vec::new())
    }
}

/// Convert remote rows to candidates tagged `source_type`.
///
/// Rows with a missing or blank name are dropped, as are ids already in
/// `selection`.
pub fn to_candidates(
    entries: Vec<RemoteEntry>,
    source_type: &str,
    selection: &SelectionSet,
) -> Vec<DataItem> {
    entries
        .into_iter()
        .filter_map(|entry| match entry.name {
            Some(name) if !name.trim().is_empty() => Some(DataItem::new(entry.id, name, source_type)),
            _ => {
                tracing::trace!(id = %entry.id, "dropping remote entry without a name");
                None
            }
        })
        .filter(|item| !selection.contains_id(&item.id))
        .collect()
}
