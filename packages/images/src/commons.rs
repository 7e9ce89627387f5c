//! Image attribution lookup on Wikimedia Commons.
//!
//! Queries the `imageinfo` / `extmetadata` API for a file and reduces the
//! HTML-formatted attribution fields to plain text.

use scraper::Html;
use species_map_database_models::ImageMeta;

use crate::taxobox::TaxoboxImage;
use crate::{ImageError, WikimediaConfig};

/// Strips markup from an `extmetadata` value.
#[must_use]
pub fn strip_html(value: &str) -> String {
    Html::parse_fragment(value)
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_owned()
}

fn ext_field(extmetadata: &serde_json::Value, key: &str) -> String {
    extmetadata[key]["value"]
        .as_str()
        .map(strip_html)
        .unwrap_or_default()
}

/// Builds [`ImageMeta`] from a Commons `imageinfo` response.
///
/// Returns `None` if the response has no `extmetadata` block for the file.
/// Individual attribution fields that are missing come back empty.
#[must_use]
pub fn parse_image_meta(body: &serde_json::Value, image: &TaxoboxImage) -> Option<ImageMeta> {
    let page = body["query"]["pages"].as_object()?.values().next()?;
    let extmetadata = &page["imageinfo"][0]["extmetadata"];
    if !extmetadata.is_object() {
        return None;
    }

    Some(ImageMeta {
        artist: ext_field(extmetadata, "Artist"),
        credit: ext_field(extmetadata, "Credit"),
        permission: ext_field(extmetadata, "Permission"),
        usage_terms: ext_field(extmetadata, "UsageTerms"),
        filename: image.filename.clone(),
        source: image.source.clone(),
    })
}

/// Fetches attribution metadata for a taxobox image.
///
/// A non-success status or a response without metadata yields `Ok(None)`.
///
/// # Errors
///
/// Returns [`ImageError`] if the request fails or the body is not JSON.
pub async fn fetch_image_meta(
    client: &reqwest::Client,
    config: &WikimediaConfig,
    image: &TaxoboxImage,
) -> Result<Option<ImageMeta>, ImageError> {
    let title = format!("File:{}", image.filename);
    let resp = client
        .get(&config.commons_api_url)
        .query(&[
            ("action", "query"),
            ("prop", "imageinfo"),
            ("format", "json"),
            ("iiprop", "extmetadata"),
            ("iilimit", "1"),
            ("titles", title.as_str()),
        ])
        .send()
        .await?;
    crate::pause(config).await;

    if !resp.status().is_success() {
        log::debug!("Commons API returned status {} for {title}", resp.status());
        return Ok(None);
    }

    let body: serde_json::Value = serde_json::from_str(&resp.text().await?)?;
    Ok(parse_image_meta(&body, image))
}
