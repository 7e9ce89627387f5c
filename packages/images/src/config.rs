//! Embedded configuration for the Wikipedia / Wikimedia Commons endpoints.

use serde::Deserialize;

use crate::ImageError;

const WIKIMEDIA_TOML: &str = include_str!("../services/wikimedia.toml");

/// Endpoints and pacing for the image job.
#[derive(Debug, Clone, Deserialize)]
pub struct WikimediaConfig {
    /// Base URL for article pages; the page title is appended.
    pub wiki_url: String,
    /// Commons `api.php` endpoint.
    pub commons_api_url: String,
    /// Delay after every remote request, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

const fn default_delay_ms() -> u64 {
    3000
}

impl WikimediaConfig {
    /// Loads the embedded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Parse`] if the embedded TOML is malformed.
    pub fn load() -> Result<Self, ImageError> {
        toml::de::from_str(WIKIMEDIA_TOML)
            .map_err(|e| ImageError::Parse(format!("invalid wikimedia.toml: {e}")))
    }

    /// Overrides the politeness delay.
    #[must_use]
    pub const fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    /// URL of the article page for `title`.
    #[must_use]
    pub fn page_url(&self, title: &str) -> String {
        format!("{}/{}", self.wiki_url.trim_end_matches('/'), title.replace(' ', "_"))
    }
}

#[cfg(test)]
impl WikimediaConfig {
    /// Points both endpoints at a local server and disables the delay.
    pub(crate) fn for_server(base_url: &str) -> Self {
        Self {
            wiki_url: format!("{base_url}/wiki"),
            commons_api_url: format!("{base_url}/w/api.php"),
            delay_ms: 0,
            user_agent: "species-map-tests".to_owned(),
        }
    }
}
