//! Locates the main image in a Wikipedia taxobox.
//!
//! The taxobox is the `infobox biota` table at the top of a species
//! article. Its first cell holds the lead image: an `<a>` link to the
//! `File:` page wrapping the `<img>` thumbnail.

use scraper::{ElementRef, Html, Selector};

use crate::{ImageError, WikimediaConfig};

const TAXOBOX_SELECTOR: &str = "table.infobox.biota";
const CELL_SELECTOR: &str = "td";
// Older markup uses `a.image`; current MediaWiki emits `a.mw-file-description`.
const LINK_SELECTOR: &str = "a.image, a.mw-file-description";
const IMG_SELECTOR: &str = "img";

/// The lead image of a taxobox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxoboxImage {
    /// File name on Wikimedia Commons (without the `File:` prefix).
    pub filename: String,
    /// Absolute URL of the thumbnail.
    pub source: String,
}

fn parse_selector(selector: &str) -> Result<Selector, ImageError> {
    Selector::parse(selector)
        .map_err(|e| ImageError::Parse(format!("invalid CSS selector '{selector}': {e}")))
}

/// Extracts the file name from a `/wiki/File:<name>` link target.
fn filename_from_href(href: &str) -> Option<String> {
    href.split_once("File:")
        .map(|(_, name)| name.to_owned())
        .filter(|name| !name.is_empty())
}

/// Turns protocol-relative URLs (`//upload.wikimedia.org/...`) into
/// `https:` URLs.
#[must_use]
pub fn absolute_src(src: &str) -> String {
    if src.starts_with("//") {
        format!("https:{src}")
    } else {
        src.to_owned()
    }
}

fn first<'a>(parent: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    parent.select(selector).next()
}

/// Finds the taxobox lead image in an article's HTML.
///
/// Returns `Ok(None)` when the page has no taxobox, the taxobox has no
/// image, or the image has neither a usable `alt` text nor a `File:` link.
///
/// # Errors
///
/// Returns [`ImageError::Parse`] only if a built-in selector is invalid.
pub fn parse_taxobox(html: &str) -> Result<Option<TaxoboxImage>, ImageError> {
    let taxobox_sel = parse_selector(TAXOBOX_SELECTOR)?;
    let cell_sel = parse_selector(CELL_SELECTOR)?;
    let link_sel = parse_selector(LINK_SELECTOR)?;
    let img_sel = parse_selector(IMG_SELECTOR)?;

    let document = Html::parse_document(html);

    let Some(taxobox) = document.select(&taxobox_sel).next() else {
        return Ok(None);
    };
    let Some(link) = first(taxobox, &cell_sel).and_then(|cell| first(cell, &link_sel)) else {
        return Ok(None);
    };
    let Some(img) = first(link, &img_sel) else {
        return Ok(None);
    };

    let filename = img
        .value()
        .attr("alt")
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .map(str::to_owned)
        .or_else(|| link.value().attr("href").and_then(filename_from_href));

    let source = img
        .value()
        .attr("src")
        .filter(|src| !src.is_empty())
        .map(absolute_src);

    Ok(filename
        .zip(source)
        .map(|(filename, source)| TaxoboxImage { filename, source }))
}

/// Fetches the article for `title` and finds its taxobox image.
///
/// A non-success status is treated as "no image".
///
/// # Errors
///
/// Returns [`ImageError::Http`] if the request cannot be completed.
pub async fn fetch_taxobox_image(
    client: &reqwest::Client,
    config: &WikimediaConfig,
    title: &str,
) -> Result<Option<TaxoboxImage>, ImageError> {
    let url = config.page_url(title);
    let resp = client.get(&url).send().await?;
    crate::pause(config).await;

    if !resp.status().is_success() {
        log::debug!("Article {url} returned status {}", resp.status());
        return Ok(None);
    }

    let body = resp.text().await?;
    parse_taxobox(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RAVEN_PAGE: &str = r#"
        <html><body>
        <table class="infobox biota">
          <tbody>
            <tr><th>Common raven</th></tr>
            <tr><td colspan="2">
              <a href="/wiki/File:Corvus_corax_(FWS).jpg" class="image">
                <img alt="Corvus corax (FWS).jpg"
                     src="//upload.wikimedia.org/wikipedia/commons/thumb/a/a5/Corvus_corax_(FWS).jpg/220px-Corvus_corax_(FWS).jpg">
              </a>
            </td></tr>
          </tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn finds_taxobox_image() {
        let image = parse_taxobox(RAVEN_PAGE).unwrap().unwrap();
        assert_eq!(image.filename, "Corvus corax (FWS).jpg");
        assert_eq!(
            image.source,
            "https://upload.wikimedia.org/wikipedia/commons/thumb/a/a5/Corvus_corax_(FWS).jpg/220px-Corvus_corax_(FWS).jpg"
        );
    }

    #[test]
    fn falls_back_to_file_link_when_alt_is_empty() {
        let html = r#"
            <table class="infobox biota"><tr><td>
              <span typeof="mw:File"><a href="/wiki/File:Junco_hyemalis.jpg" class="mw-file-description">
                <img alt="" src="https://upload.wikimedia.org/junco.jpg"></a></span>
            </td></tr></table>
        "#;
        let image = parse_taxobox(html).unwrap().unwrap();
        assert_eq!(image.filename, "Junco_hyemalis.jpg");
        assert_eq!(image.source, "https://upload.wikimedia.org/junco.jpg");
    }

    #[test]
    fn page_without_taxobox_has_no_image() {
        let html = "<html><body><p>Corvus may refer to...</p></body></html>";
        assert!(parse_taxobox(html).unwrap().is_none());
    }

    #[test]
    fn taxobox_without_image_has_no_image() {
        let html = r#"<table class="infobox biota"><tr><td>No image</td></tr></table>"#;
        assert!(parse_taxobox(html).unwrap().is_none());
    }

    #[test]
    fn image_without_src_has_no_image() {
        let html = r#"
            <table class="infobox biota"><tr><td>
              <a href="/wiki/File:X.jpg" class="image"><img alt="X.jpg"></a>
            </td></tr></table>
        "#;
        assert!(parse_taxobox(html).unwrap().is_none());
    }

    #[test]
    fn absolute_src_leaves_full_urls_alone() {
        assert_eq!(absolute_src("https://a/b.jpg"), "https://a/b.jpg");
        assert_eq!(absolute_src("//a/b.jpg"), "https://a/b.jpg");
    }

    #[tokio::test]
    async fn fetches_article_by_title() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wiki/Corvus_corax"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RAVEN_PAGE))
            .expect(1)
            .mount(&server)
            .await;

        let config = WikimediaConfig::for_server(&server.uri());
        let image = fetch_taxobox_image(&reqwest::Client::new(), &config, "Corvus corax")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(image.filename, "Corvus corax (FWS).jpg");
    }

    #[tokio::test]
    async fn missing_article_has_no_image() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string(RAVEN_PAGE))
            .mount(&server)
            .await;

        let config = WikimediaConfig::for_server(&server.uri());
        let image = fetch_taxobox_image(&reqwest::Client::new(), &config, "Corvus corax")
            .await
            .unwrap();
        assert!(image.is_none());
    }
}
