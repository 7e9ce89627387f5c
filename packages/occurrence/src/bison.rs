//! Client for the BISON occurrence search endpoint.
//!
//! Sends a single GET with the area of interest as a WKT polygon and parses
//! the JSON body into a [`SearchResult`]. Only the first page is fetched.

use async_trait::async_trait;
use species_map_geography_models::AreaOfInterest;
use species_map_occurrence_models::SearchResult;

use crate::service_registry::OccurrenceService;
use crate::{OccurrenceError, OccurrenceSearch, SearchOptions};

/// HTTP client for the BISON search API.
#[derive(Debug, Clone)]
pub struct BisonClient {
    client: reqwest::Client,
    base_url: String,
}

impl BisonClient {
    /// Creates a client for the given search endpoint.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_owned(),
        }
    }

    /// Creates a client for a configured service.
    #[must_use]
    pub fn for_service(client: reqwest::Client, service: &OccurrenceService) -> Self {
        Self::new(client, &service.base_url)
    }

    /// The endpoint this client queries.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Builds the query parameters for a search request.
///
/// # Errors
///
/// Returns [`OccurrenceError::DegenerateArea`] if `area` is not a polygon.
pub fn query_params(
    area: &AreaOfInterest,
    options: &SearchOptions,
) -> Result<Vec<(&'static str, String)>, OccurrenceError> {
    if area.is_degenerate() {
        return Err(OccurrenceError::DegenerateArea {
            vertices: area.len(),
        });
    }

    Ok(vec![
        ("aoi", area.to_wkt()),
        ("basisOfObservation", options.basis_of_observation.clone()),
        ("count", options.count.to_string()),
    ])
}

/// Maps a response status to an error unless it is a success.
///
/// # Errors
///
/// Returns [`OccurrenceError::UpstreamUnavailable`] for any non-2xx status.
pub fn check_status(status: reqwest::StatusCode) -> Result<(), OccurrenceError> {
    if status.is_success() {
        Ok(())
    } else {
        log::debug!("BISON search API returned status code {status}");
        Err(OccurrenceError::UpstreamUnavailable {
            status: status.as_u16(),
        })
    }
}

/// Parses a search response body.
///
/// # Errors
///
/// Returns [`OccurrenceError::Json`] if the body is not a search result.
pub fn parse_search_response(body: &str) -> Result<SearchResult, OccurrenceError> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl OccurrenceSearch for BisonClient {
    async fn search(
        &self,
        area: &AreaOfInterest,
        options: &SearchOptions,
    ) -> Result<SearchResult, OccurrenceError> {
        let params = query_params(area, options)?;

        let resp = self.client.get(&self.base_url).query(&params).send().await?;
        check_status(resp.status())?;

        let body = resp.text().await?;
        let result = parse_search_response(&body)?;

        log::debug!(
            "BISON search returned {} of {} occurrences ({} georeferenced)",
            result.records.len(),
            result.summary.total,
            result.summary.georeferenced,
        );
        if result.summary.is_truncated() {
            log::debug!(
                "Only the first page ({} items) of {} occurrences was fetched",
                result.summary.items_per_page,
                result.summary.total,
            );
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use species_map_geography::build_circle;
    use species_map_geography_models::GeoPoint;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const SEARCH_PATH: &str = "/api/search.json";

    fn client_for(server: &MockServer) -> BisonClient {
        BisonClient::new(
            reqwest::Client::new(),
            &format!("{}{SEARCH_PATH}", server.uri()),
        )
    }

    #[test]
    fn builds_query_params() {
        let area = build_circle(GeoPoint::new(39.0, -106.0), 10.0, 4);
        let params = query_params(&area, &SearchOptions::default()).unwrap();

        assert_eq!(params[0].0, "aoi");
        assert!(params[0].1.starts_with("POLYGON(("));
        assert!(params[0].1.ends_with("))"));
        // longitude first on the wire
        assert!(params[0].1.starts_with("POLYGON((-106 "));
        assert_eq!(params[1], ("basisOfObservation", "observation".to_owned()));
        assert_eq!(params[2], ("count", "1000000".to_owned()));
    }

    #[test]
    fn custom_options_are_forwarded() {
        let area = build_circle(GeoPoint::new(39.0, -106.0), 10.0, 1);
        let options = SearchOptions::default()
            .with_basis_of_observation("specimen")
            .with_count(50);
        let params = query_params(&area, &options).unwrap();
        assert_eq!(params[1].1, "specimen");
        assert_eq!(params[2].1, "50");
    }

    #[test]
    fn rejects_degenerate_areas() {
        let err = query_params(&AreaOfInterest::empty(), &SearchOptions::default()).unwrap_err();
        assert!(matches!(err, OccurrenceError::DegenerateArea { vertices: 0 }));
    }

    #[test]
    fn non_success_status_is_upstream_unavailable() {
        assert!(check_status(reqwest::StatusCode::OK).is_ok());
        let err = check_status(reqwest::StatusCode::SERVICE_UNAVAILABLE).unwrap_err();
        assert!(matches!(
            err,
            OccurrenceError::UpstreamUnavailable { status: 503 }
        ));
        assert!(check_status(reqwest::StatusCode::NOT_FOUND).is_err());
    }

    #[test]
    fn parses_search_body() {
        let body = serde_json::json!({
            "total": 3,
            "georeferenced": 3,
            "occurrences": { "legend": { "observation": 3 } },
            "counties": {},
            "states": {},
            "searchTime": 4,
            "offset": 0,
            "itemsPerPage": 10,
            "data": [
                { "name": "Sitta carolinensis" },
                { "name": "Sitta carolinensis" },
                { "name": "Junco hyemalis" }
            ]
        })
        .to_string();

        let result = parse_search_response(&body).unwrap();
        assert_eq!(result.records.len(), 3);
        assert_eq!(
            crate::rank_species(&result.records),
            vec!["Sitta carolinensis", "Junco hyemalis"]
        );
    }

    #[test]
    fn rejects_malformed_body() {
        assert!(matches!(
            parse_search_response("<html>oops</html>"),
            Err(OccurrenceError::Json(_))
        ));
    }

    #[tokio::test]
    async fn search_sends_area_and_options() {
        let server = MockServer::start().await;
        let area = build_circle(GeoPoint::new(39.0, -106.0), 10.0, 2);

        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("aoi", area.to_wkt()))
            .and(query_param("basisOfObservation", "specimen"))
            .and(query_param("count", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total": 4,
                "georeferenced": 4,
                "searchTime": 2,
                "offset": 0,
                "itemsPerPage": 25,
                "data": [
                    { "name": "Pica hudsonia" },
                    { "name": "Corvus corax" },
                    { "name": null },
                    { "name": "Corvus corax" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let options = SearchOptions::default()
            .with_basis_of_observation("specimen")
            .with_count(25);
        let result = client_for(&server).search(&area, &options).await.unwrap();

        assert_eq!(result.summary.total, 4);
        assert_eq!(result.records.len(), 4);
        assert_eq!(
            crate::rank_species(&result.records),
            vec!["Corvus corax", "Pica hudsonia"]
        );
    }

    #[tokio::test]
    async fn search_maps_503_to_upstream_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&server)
            .await;

        let area = build_circle(GeoPoint::new(39.0, -106.0), 10.0, 4);
        let err = client_for(&server)
            .search(&area, &SearchOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OccurrenceError::UpstreamUnavailable { status: 503 }
        ));
    }

    #[tokio::test]
    async fn search_rejects_non_json_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let area = build_circle(GeoPoint::new(39.0, -106.0), 10.0, 4);
        let err = client_for(&server)
            .search(&area, &SearchOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, OccurrenceError::Json(_)));
    }

    #[tokio::test]
    async fn degenerate_area_is_never_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .search(&AreaOfInterest::empty(), &SearchOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, OccurrenceError::DegenerateArea { vertices: 0 }));
    }
}
