use postgeo_core::domain::AddressComponent;
use postgeo_core::error::GeocodeError;
use postgeo_core::ports::Geocoder;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    address_components: Vec<AddressComponent>,
}

/// Extracts the best match's address components from a response body.
///
/// `ZERO_RESULTS` is a successful lookup with no match.
pub fn parse_response(body: &str) -> Result<Option<Vec<AddressComponent>>, GeocodeError> {
    let response: GeocodeResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::MalformedResponse(e.to_string()))?;

    match response.status.as_str() {
        "OK" => Ok(response
            .results
            .into_iter()
            .next()
            .map(|best| best.address_components)),
        "ZERO_RESULTS" => Ok(None),
        status => Err(GeocodeError::Rejected(match response.error_message {
            Some(message) => format!("{}: {}", status, message),
            None => status.to_string(),
        })),
    }
}

pub struct GoogleGeocoder {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(api_key: String, endpoint: String, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

impl Geocoder for GoogleGeocoder {
    fn geocode(&self, query: &str) -> Result<Option<Vec<AddressComponent>>, GeocodeError> {
        debug!(query, "geocoding");
        let body = self
            .client
            .get(&self.endpoint)
            .query(&[("address", query), ("key", self.api_key.as_str())])
            .send()
            .and_then(|res| res.error_for_status())
            .and_then(|res| res.text())
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        parse_response(&body)
    }
}
