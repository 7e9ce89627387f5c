#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Occurrence record and search summary types.
//!
//! These mirror the JSON body returned by the occurrence search endpoint.
//! Summary blocks the pipeline does not interpret (legend, county and state
//! breakdowns) are kept as raw [`serde_json::Value`]s.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A single raw observation returned by the search API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceRecord {
    /// Free-form scientific name (species or subspecies).
    ///
    /// Records whose name is missing, `null`, or not a string deserialize
    /// to an empty string, which the ranker drops like any other malformed
    /// name.
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
    /// Provenance fields, passed through untouched.
    #[serde(flatten)]
    pub provenance: BTreeMap<String, serde_json::Value>,
}

impl OccurrenceRecord {
    /// Creates a record carrying only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provenance: BTreeMap::new(),
        }
    }
}

/// Accepts any JSON value for a record name, keeping only strings.
fn lenient_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(name)) => name,
        _ => String::new(),
    })
}

/// Per-basis-of-observation breakdown (`occurrences.legend` in the response).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceBreakdown {
    /// Counts keyed by basis of observation, copied verbatim.
    #[serde(default)]
    pub legend: serde_json::Value,
}

/// Aggregate metadata from one search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultSummary {
    /// Total number of matching occurrences upstream.
    pub total: u64,
    /// Number of matching occurrences with coordinates.
    pub georeferenced: u64,
    /// Counts by basis of observation.
    #[serde(default)]
    pub occurrences: OccurrenceBreakdown,
    /// Per-county counts, copied verbatim.
    #[serde(default)]
    pub counties: serde_json::Value,
    /// Per-state counts, copied verbatim.
    #[serde(default)]
    pub states: serde_json::Value,
    /// Server-side search time as reported upstream.
    #[serde(default)]
    pub search_time: f64,
    /// Paging offset of the returned page.
    #[serde(default)]
    pub offset: u64,
    /// Page size of the returned page.
    #[serde(default)]
    pub items_per_page: u64,
}

impl SearchResultSummary {
    /// Whether the upstream total exceeds what one page can hold.
    ///
    /// Only the first page is ever fetched, so a `true` here means the
    /// ranked species list was computed from a sample.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.total > self.items_per_page
    }
}

/// One parsed search response: the summary plus the first page of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Summary metadata.
    #[serde(flatten)]
    pub summary: SearchResultSummary,
    /// Occurrence records (`data` in the response).
    #[serde(rename = "data", default)]
    pub records: Vec<OccurrenceRecord>,
}
