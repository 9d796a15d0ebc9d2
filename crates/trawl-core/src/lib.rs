//! trawl-core: token-aware multi-select search engine.
//!
//! The user types `type:value, type:value` segments into a single buffer.
//! Each edit is reconciled against the confirmed selection, tokenized,
//! ranked against the static [`Catalog`], and, when the buffer names an
//! async-only field type, supplemented by a cancellable remote lookup.
//!
//! # Architecture
//!
//! ```text
//! SearchEvent ──► reconcile ──► tokenize ──► rank ──► SearchView
//!                                   │                    ▲
//!                                   └──► RequestSlot ──► RemoteLookup
//!                                        (debounce, cancel, signature)
//! ```
//!
//! Everything except the remote lookup runs synchronously on the caller's
//! thread. Lookups run as tokio tasks and report back over a channel owned
//! by the [`SearchSession`].

pub mod catalog;
pub mod config;
pub mod confirm;
pub mod dispatch;
pub mod parser;
pub mod rank;
pub mod reconcile;
pub mod remote;
pub mod session;
pub mod text;
pub mod types;

pub use catalog::{Catalog, CatalogError};
pub use remote::{LookupError, OfflineLookup, RemoteEntry, RemoteLookup};
pub use session::{SearchSession, SearchSettings};
pub use types::{DataItem, FieldTypes, SearchEvent, SearchPhase, SearchState, SearchView, SelectionSet};
