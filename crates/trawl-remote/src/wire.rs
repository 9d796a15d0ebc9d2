//! JSON wire format of the vessel search API.

use serde::Deserialize;
use trawl_core::{LookupError, RemoteEntry};

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    entries: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEntry {
    vessel_id: WireId,
    #[serde(default)]
    name: Option<String>,
}

/// Vessel ids arrive as strings from some datasets and numbers from others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(serde_json::Number),
}

impl From<WireEntry> for RemoteEntry {
    fn from(entry: WireEntry) -> Self {
        let id = match entry.vessel_id {
            WireId::Text(s) => s,
            WireId::Number(n) => n.to_string(),
        };
        RemoteEntry {
            id,
            name: entry.name,
        }
    }
}

/// Decode a response body into entries, skipping entries that do not parse.
pub fn decode_entries(body: &[u8]) -> Result<Vec<RemoteEntry>, LookupError> {
    let page: Page =
        serde_json::from_slice(body).map_err(|e| LookupError::Decode(e.to_string()))?;

    let entries = page
        .entries
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<WireEntry>(value) {
            Ok(entry) => Some(RemoteEntry::from(entry)),
            Err(err) => {
                tracing::trace!(error = %err, "skipping malformed vessel entry");
                None
            }
        })
        .collect();
    Ok(entries)
}
