use std::net::IpAddr;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::probes::{ProbeError, PROBE_TIMEOUT};
use crate::traits::GeoLookup;

const IP_API_URL: &str = "http://ip-api.com/json";

/// Geolocation via the plain-HTTP ip-api.com lookup service.
pub struct IpApiProbe {
    http: reqwest::Client,
    base_url: String,
}

impl IpApiProbe {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: IP_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

impl Default for IpApiProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    city: Option<String>,
    #[serde(rename = "countryCode")]
    country_code: Option<String>,
}

#[async_trait]
impl GeoLookup for IpApiProbe {
    async fn locate(&self, address: IpAddr) -> Result<String, ProbeError> {
        let url = format!("{}/{}", self.base_url, address);

        let response = self.http.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProbeError::Timeout
            } else {
                ProbeError::Connect(e.to_string())
            }
        })?;

        let geo: GeoResponse = response
            .json()
            .await
            .map_err(|e| ProbeError::Malformed(e.to_string()))?;

        match (geo.city, geo.country_code) {
            (Some(city), Some(country)) => Ok(format!("{city}, {country}")),
            (None, _) => Err(ProbeError::MissingField("city")),
            (_, None) => Err(ProbeError::MissingField("countryCode")),
        }
    }
}

/// Format a location for an optionally-resolved address.
///
/// With no address there is nothing to look up: returns "Unknown" without
/// touching the network. Lookup failures also collapse to "Unknown".
pub async fn locate_address(geo: &dyn GeoLookup, address: Option<IpAddr>) -> String {
    let Some(ip) = address else {
        return "Unknown".to_string();
    };

    match geo.locate(ip).await {
        Ok(location) => location,
        Err(e) => {
            debug!(error = %e, %ip, "Geolocation lookup failed");
            "Unknown".to_string()
        }
    }
}
