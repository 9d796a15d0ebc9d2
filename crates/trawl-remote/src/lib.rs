//! trawl-remote: remote vessel lookup for trawl.
//!
//! [`HttpLookup`] implements [`trawl_core::RemoteLookup`] against the vessel
//! search API:
//!
//! ```text
//! GET {base_url}/datasets/{dataset}/vessels?query=<q>&offset=<n>
//! → {"entries": [{"vesselId": "...", "name": "..."}, ...]}
//! ```
//!
//! Malformed entries are skipped individually; a body that is not a page of
//! entries at all is a [`trawl_core::LookupError::Decode`].

pub mod http;
pub mod wire;

pub use http::{EndpointError, HttpLookup};
pub use wire::decode_entries;
