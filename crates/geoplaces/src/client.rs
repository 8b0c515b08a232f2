//! HTTP client for the geocoding and places web service.
//!
//! Wraps `reqwest` with service-specific error handling, API key injection,
//! and the mapping pipeline from [`crate::mapper`]. Every endpoint shares the
//! JSON envelope checked by [`ResponseEnvelope::check_status`], so API-level
//! failures surface as typed [`PlacesError`] variants rather than raw bodies.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::config::ClientConfig;
use crate::envelope::ResponseEnvelope;
use crate::error::PlacesError;
use crate::mapper::{parse_geocoder_result, parse_place, parse_place_detail};
use crate::pagination::{EndpointFamily, PageCursor};
use crate::params;
use crate::types::{GeocoderResult, Place, PlaceDetail};

pub(crate) const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

// Endpoint paths are relative so `Url::join` keeps the base path intact.
pub(crate) const GEOCODE_PATH: &str = "geocode/json";
pub(crate) const NEARBY_SEARCH_PATH: &str = "place/nearbysearch/json";
pub(crate) const TEXT_SEARCH_PATH: &str = "place/textsearch/json";
pub(crate) const PLACE_DETAILS_PATH: &str = "place/details/json";
pub(crate) const PLACE_PHOTO_PATH: &str = "place/photo";

/// One page of a paginated search: the mapped places plus the cursor that
/// fetches the next page (see [`PageCursor::advance`]).
#[derive(Debug)]
pub struct SearchPage {
    pub places: Vec<Place>,
    pub cursor: PageCursor,
}

/// Client for the geocoding and places endpoints.
///
/// Manages the HTTP client, API key, and base URL. Use [`PlacesClient::new`]
/// for production or [`PlacesClient::with_base_url`] to point at a mock
/// server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl PlacesClient {
    /// Creates a new client pointed at the production service.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidParameter`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("geoplaces/0.1 (places-client)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // joining a relative endpoint path appends to it rather than replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            PlacesError::InvalidParameter(format!("invalid base URL '{base_url}': {e}"))
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Creates a client from a loaded [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`PlacesClient::with_base_url`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, PlacesError> {
        Self::with_base_url(&config.api_key, config.timeout_secs, &config.base_url)
    }

    /// Geocodes a free-form address into zero or more results.
    ///
    /// An address the service cannot resolve yields an empty list, not an
    /// error.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::OverQueryLimit`], [`PlacesError::RequestDenied`],
    ///   [`PlacesError::InvalidRequest`] or [`PlacesError::Unknown`] for a
    ///   failure status in the envelope.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::MalformedResponse`] if a result record cannot be
    ///   mapped.
    pub async fn geocode(&self, address: &str) -> Result<Vec<GeocoderResult>, PlacesError> {
        let query = vec![(params::ADDRESS.to_string(), address.to_string())];
        let envelope = self.fetch(GEOCODE_PATH, &query).await?;
        envelope
            .into_results()?
            .into_iter()
            .map(parse_geocoder_result)
            .collect()
    }

    /// Reverse-geocodes a coordinate into the addresses that contain it.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PlacesClient::geocode`].
    pub async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<GeocoderResult>, PlacesError> {
        let query = vec![(
            params::LATLNG.to_string(),
            format!("{latitude},{longitude}"),
        )];
        let envelope = self.fetch(GEOCODE_PATH, &query).await?;
        envelope
            .into_results()?
            .into_iter()
            .map(parse_geocoder_result)
            .collect()
    }

    /// Searches for places around a location.
    ///
    /// `query` holds the endpoint parameters by name (see [`crate::params`]);
    /// at minimum [`params::LOCATION`] plus either [`params::RADIUS`] or
    /// [`params::RANKBY`]. The returned cursor continues the search; for this
    /// endpoint a continuation request carries only the token.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PlacesClient::geocode`].
    pub async fn nearby_search(
        &self,
        query: &[(&str, &str)],
    ) -> Result<SearchPage, PlacesError> {
        self.search(EndpointFamily::Nearby, query).await
    }

    /// Searches for places matching a free-form text query.
    ///
    /// `query` must include [`params::QUERY`]. Unlike a nearby search, a
    /// continuation request for this endpoint resends the original
    /// parameters alongside the token.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PlacesClient::geocode`].
    pub async fn text_search(&self, query: &[(&str, &str)]) -> Result<SearchPage, PlacesError> {
        self.search(EndpointFamily::Text, query).await
    }

    async fn search(
        &self,
        family: EndpointFamily,
        query: &[(&str, &str)],
    ) -> Result<SearchPage, PlacesError> {
        let query: Vec<(String, String)> = query
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();

        let envelope = self.fetch(family.path(), &query).await?;
        let token = envelope.next_page_token.clone();
        let places = envelope
            .into_results()?
            .into_iter()
            .map(parse_place)
            .collect::<Result<Vec<_>, _>>()?;

        let mut cursor = PageCursor::new(family, query);
        cursor.record_token(token);
        Ok(SearchPage { places, cursor })
    }

    /// Fetches the full detail record for a place id.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PlacesClient::geocode`], plus
    /// [`PlacesError::MalformedResponse`] when the envelope carries no
    /// `result` object.
    pub async fn place_detail(&self, place_id: &str) -> Result<PlaceDetail, PlacesError> {
        let query = vec![(params::PLACEID.to_string(), place_id.to_string())];
        let envelope = self.fetch(PLACE_DETAILS_PATH, &query).await?;
        parse_place_detail(envelope.into_result()?)
    }

    /// Builds the URL that serves a photo, optionally bounded by one of
    /// `max_width` or `max_height` in pixels.
    ///
    /// The photo endpoint returns image bytes, not the JSON envelope, so
    /// this client only constructs the URL; fetching it is left to the
    /// caller.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::InvalidParameter`] when both bounds are given;
    /// they are mutually exclusive.
    pub fn photo_url(
        &self,
        reference: &str,
        max_width: Option<u32>,
        max_height: Option<u32>,
    ) -> Result<Url, PlacesError> {
        let bound = match (max_width, max_height) {
            (Some(width), None) => Some((params::MAXWIDTH, width)),
            (None, Some(height)) => Some((params::MAXHEIGHT, height)),
            (None, None) => None,
            (Some(_), Some(_)) => {
                return Err(PlacesError::InvalidParameter(
                    "max_width and max_height are mutually exclusive".to_string(),
                ))
            }
        };
        let mut query = vec![(params::PHOTOREFERENCE.to_string(), reference.to_string())];
        if let Some((name, value)) = bound {
            query.push((name.to_string(), value.to_string()));
        }
        self.build_url(PLACE_PHOTO_PATH, &query)
    }

    /// Builds the full request URL with percent-encoded query parameters,
    /// appending the API key unless the caller already supplied one.
    fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url, PlacesError> {
        let mut url = self.base_url.join(path).map_err(|e| {
            PlacesError::InvalidParameter(format!("invalid endpoint path '{path}': {e}"))
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
            if !query.iter().any(|(k, _)| k == params::KEY) {
                pairs.append_pair(params::KEY, &self.api_key);
            }
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the body
    /// into the shared response envelope.
    ///
    /// The deserialization context is the endpoint path, never the full URL,
    /// which carries the API key.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] on network failure or a non-2xx status.
    /// Returns [`PlacesError::Deserialize`] if the body does not parse.
    pub(crate) async fn fetch(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<ResponseEnvelope, PlacesError> {
        let url = self.build_url(path, query)?;
        tracing::debug!(endpoint = path, "requesting");
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: path.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> PlacesClient {
        PlacesClient::with_base_url("test-key", 30, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_keeps_the_base_path() {
        let client = test_client("https://maps.example.com/maps/api");
        let url = client
            .build_url(
                GEOCODE_PATH,
                &[("address".to_string(), "Berlin".to_string())],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://maps.example.com/maps/api/geocode/json?address=Berlin&key=test-key"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://maps.example.com/maps/api/");
        let url = client
            .build_url(
                GEOCODE_PATH,
                &[("address".to_string(), "Foo & Bar, Baz".to_string())],
            )
            .unwrap();
        assert!(
            url.as_str().contains("Foo+%26+Bar%2C+Baz")
                || url.as_str().contains("Foo%20%26%20Bar%2C%20Baz"),
            "address should be percent-encoded: {url}"
        );
    }

    #[test]
    fn caller_supplied_key_is_not_duplicated() {
        let client = test_client("https://maps.example.com/maps/api/");
        let url = client
            .build_url(
                GEOCODE_PATH,
                &[("key".to_string(), "caller-key".to_string())],
            )
            .unwrap();
        let keys: Vec<_> = url
            .query_pairs()
            .filter(|(k, _)| k == "key")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(keys, vec!["caller-key"]);
    }

    #[test]
    fn photo_url_carries_exactly_one_bound() {
        let client = test_client("https://maps.example.com/maps/api/");
        let url = client.photo_url("ref-1", Some(400), None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://maps.example.com/maps/api/place/photo?photoreference=ref-1&maxwidth=400&key=test-key"
        );
        let url = client.photo_url("ref-1", None, Some(300)).unwrap();
        assert!(url.as_str().contains("maxheight=300"));
    }

    #[test]
    fn photo_url_rejects_both_bounds() {
        let client = test_client("https://maps.example.com/maps/api/");
        let err = client.photo_url("ref-1", Some(400), Some(300)).unwrap_err();
        assert!(matches!(err, PlacesError::InvalidParameter(_)));
    }

    #[test]
    fn photo_url_accepts_no_bounds() {
        let client = test_client("https://maps.example.com/maps/api/");
        let url = client.photo_url("ref-1", None, None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://maps.example.com/maps/api/place/photo?photoreference=ref-1&key=test-key"
        );
    }
}
