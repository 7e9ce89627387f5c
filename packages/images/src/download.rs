//! Image download and naming.

use crate::{ImageError, WikimediaConfig};

/// Downloads an image into memory.
///
/// A non-success status yields `Ok(None)`.
///
/// # Errors
///
/// Returns [`ImageError::Http`] if the request or body read fails.
pub async fn download_image(
    client: &reqwest::Client,
    config: &WikimediaConfig,
    url: &str,
) -> Result<Option<Vec<u8>>, ImageError> {
    let resp = client.get(url).send().await?;
    crate::pause(config).await;

    if !resp.status().is_success() {
        log::debug!("Image download {url} returned status {}", resp.status());
        return Ok(None);
    }

    Ok(Some(resp.bytes().await?.to_vec()))
}

/// Name to store an image under: the species name plus the source file's
/// extension (e.g. `"Corvus corax.jpg"`).
#[must_use]
pub fn stored_filename(species: &str, source_url: &str) -> String {
    let path = source_url.split(['?', '#']).next().unwrap_or(source_url);
    let last_segment = path.rsplit('/').next().unwrap_or(path);

    match last_segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!("{species}.{}", ext.to_ascii_lowercase())
        }
        _ => species.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn names_file_after_species() {
        assert_eq!(
            stored_filename(
                "Corvus corax",
                "https://upload.wikimedia.org/wikipedia/commons/thumb/a/a5/Raven.jpg/220px-Raven.JPG"
            ),
            "Corvus corax.jpg"
        );
    }

    #[test]
    fn ignores_query_strings() {
        assert_eq!(
            stored_filename("Junco hyemalis", "https://example.org/junco.png?width=220"),
            "Junco hyemalis.png"
        );
    }

    #[test]
    fn no_extension_uses_bare_species_name() {
        assert_eq!(
            stored_filename("Sitta carolinensis", "https://example.org/image"),
            "Sitta carolinensis"
        );
        assert_eq!(
            stored_filename("Sitta carolinensis", "https://example.org/.hidden"),
            "Sitta carolinensis"
        );
    }

    #[tokio::test]
    async fn downloads_image_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/raven.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\xff\xd8jpeg".to_vec()))
            .mount(&server)
            .await;

        let config = WikimediaConfig::for_server(&server.uri());
        let bytes = download_image(
            &reqwest::Client::new(),
            &config,
            &format!("{}/raven.jpg", server.uri()),
        )
        .await
        .unwrap();
        assert_eq!(bytes, Some(b"\xff\xd8jpeg".to_vec()));
    }

    #[tokio::test]
    async fn error_status_is_not_downloaded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = WikimediaConfig::for_server(&server.uri());
        let bytes = download_image(
            &reqwest::Client::new(),
            &config,
            &format!("{}/missing.jpg", server.uri()),
        )
        .await
        .unwrap();
        assert!(bytes.is_none());
    }
}
