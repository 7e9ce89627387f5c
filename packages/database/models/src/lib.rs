#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Species, alternate-name, and image document types.
//!
//! A [`SpeciesRecord`] is the persisted taxonomic document, keyed by its
//! scientific name. Records are created by an ingestion process; the
//! species pipeline only reads them, and the image job only touches the
//! `image_meta` and `image_id` fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier of an image stored in the blob table.
pub type ImageId = String;

/// Taxonomic classification above the species level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    /// Kingdom (e.g. "Animalia").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kingdom: Option<String>,
    /// Phylum (e.g. "Chordata").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phylum: Option<String>,
    /// Class (e.g. "Aves").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Order (e.g. "Passeriformes").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Family (e.g. "Corvidae").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Genus (e.g. "Corvus").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genus: Option<String>,
}

/// Attribution metadata for a species' representative image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMeta {
    /// Image author.
    pub artist: String,
    /// Credit line.
    pub credit: String,
    /// Permission statement.
    pub permission: String,
    /// License / usage terms.
    pub usage_terms: String,
    /// File name on the image host.
    pub filename: String,
    /// URL the image was downloaded from.
    pub source: String,
}

/// A persisted taxonomic document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    /// Accepted scientific name (the lookup key).
    pub scientific_name: String,
    /// Vernacular name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    /// Higher classification.
    #[serde(default)]
    pub taxonomy: Taxonomy,
    /// Attribution for the representative image, if one was found.
    #[serde(default)]
    pub image_meta: Option<ImageMeta>,
    /// Stored image identifier, if one was found.
    #[serde(default)]
    pub image_id: Option<ImageId>,
    /// Any further document fields, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl SpeciesRecord {
    /// Creates a record with only a scientific name.
    #[must_use]
    pub fn new(scientific_name: impl Into<String>) -> Self {
        Self {
            scientific_name: scientific_name.into(),
            common_name: None,
            taxonomy: Taxonomy::default(),
            image_meta: None,
            image_id: None,
            extra: BTreeMap::new(),
        }
    }

    /// Sets the vernacular name.
    #[must_use]
    pub fn with_common_name(mut self, name: &str) -> Self {
        self.common_name = Some(name.to_owned());
        self
    }
}

/// A synonym pointing at an accepted scientific name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateNameMapping {
    /// The synonym or outdated name.
    pub alternate_name: String,
    /// The accepted name it resolves to.
    pub primary_name: String,
}

/// An image blob as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Identifier returned by the insert.
    pub id: ImageId,
    /// File name the image was stored under.
    pub filename: String,
    /// Raw image bytes.
    pub content: Vec<u8>,
}
