//! Endpoint configuration
//!
//! Defaults point at the public City of Philadelphia services. Every field
//! can be overridden from a config file; missing fields fall back to the
//! defaults.

use crate::error::{ResolveError, Result};
use parcelview_core::ParcelLayer;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_GEOCODER_URL: &str = "https://api.phila.gov/ais/v1";
pub const DEFAULT_PARCELS_URL: &str =
    "https://services.arcgis.com/fLeGjb7u4uXqeF9q/ArcGIS/rest/services";
pub const DEFAULT_PWD_DATASET: &str = "PWD_PARCELS";
pub const DEFAULT_DOR_DATASET: &str = "DOR_Parcel";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the resolvers send their requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Geocoder base URL; `/search/{query}` is appended
    pub geocoder_url: String,
    /// Feature-service base URL; `/{dataset}/FeatureServer/0/query` is appended
    pub parcels_url: String,
    /// Dataset backing the `pwd` layer
    pub pwd_dataset: String,
    /// Dataset backing the `dor` layer
    pub dor_dataset: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            parcels_url: DEFAULT_PARCELS_URL.to_string(),
            pwd_dataset: DEFAULT_PWD_DATASET.to_string(),
            dor_dataset: DEFAULT_DOR_DATASET.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl EndpointConfig {
    /// Point both services at one base URL (used by tests against a mock server)
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            geocoder_url: base_url.to_string(),
            parcels_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Dataset name for a parcel layer
    pub fn dataset(&self, layer: ParcelLayer) -> &str {
        match layer {
            ParcelLayer::Pwd => &self.pwd_dataset,
            ParcelLayer::Dor => &self.dor_dataset,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check the URLs parse and the numeric fields are usable
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("geocoder_url", &self.geocoder_url),
            ("parcels_url", &self.parcels_url),
        ] {
            reqwest::Url::parse(url)
                .map_err(|e| ResolveError::Config(format!("{name} '{url}': {e}")))?;
        }
        if self.pwd_dataset.trim().is_empty() || self.dor_dataset.trim().is_empty() {
            return Err(ResolveError::Config(
                "dataset names must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ResolveError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the shared HTTP client
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout())
            .build()
            .map_err(|e| ResolveError::Config(format!("failed to build HTTP client: {e}")))
    }
}

/// Strip trailing slashes so path joins never produce `//`
pub(crate) fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
