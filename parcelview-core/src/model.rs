//! Address and parcel records
//!
//! [`NormalizedAddress`] is what the geocoder hands back for one search
//! input. [`ParcelSet`] is a collection of [`ParcelFeature`]s with an
//! explicit distinction between "never fetched" and "fetched, nothing there".

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the current search was initiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchMethod {
    Address,
    MapClick,
}

/// Parcel dataset selector for point-in-polygon lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParcelLayer {
    /// Water department parcels
    Pwd,
    /// Department of Records parcels
    Dor,
}

impl ParcelLayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParcelLayer::Pwd => "pwd",
            ParcelLayer::Dor => "dor",
        }
    }
}

impl fmt::Display for ParcelLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParcelLayer {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pwd" => Ok(ParcelLayer::Pwd),
            "dor" => Ok(ParcelLayer::Dor),
            other => Err(CoreError::UnknownLayer(other.to_string())),
        }
    }
}

/// GeoJSON geometry with untyped coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: serde_json::Value,
}

impl Geometry {
    /// `[lng, lat]` for point geometries
    pub fn point(&self) -> Option<(f64, f64)> {
        let coords = self.coordinates.as_array()?;
        match coords.as_slice() {
            [lng, lat, ..] => Some((lng.as_f64()?, lat.as_f64()?)),
            _ => None,
        }
    }
}

/// One geocoder match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressFeature {
    pub street_address: Option<String>,
    pub parcel_id: Option<String>,
    pub account_number: Option<String>,
    #[serde(default)]
    pub owner_names: Vec<String>,
    pub geometry: Option<Geometry>,
    pub feature_type: Option<String>,
    pub match_type: Option<String>,
}

/// Result of resolving a search input against the geocoder
///
/// `match_count == 0` is the "no such address" outcome. The summary fields
/// are taken from the first (best) match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAddress {
    pub raw_input: String,
    pub normalized_id: String,
    pub street_address: Option<String>,
    pub parcel_id: Option<String>,
    pub account_number: Option<String>,
    #[serde(default)]
    pub owner_names: Vec<String>,
    pub match_count: u64,
    #[serde(default)]
    pub features: Vec<AddressFeature>,
}

impl NormalizedAddress {
    /// Empty result for an input the geocoder did not recognize
    pub fn empty(raw_input: impl Into<String>) -> Self {
        Self {
            raw_input: raw_input.into(),
            normalized_id: String::new(),
            street_address: None,
            parcel_id: None,
            account_number: None,
            owner_names: Vec::new(),
            match_count: 0,
            features: Vec::new(),
        }
    }

    /// Build from geocoder matches; summary fields come from the first match.
    pub fn from_features(
        raw_input: impl Into<String>,
        normalized_id: impl Into<String>,
        total_size: u64,
        features: Vec<AddressFeature>,
    ) -> Self {
        let mut address = Self::empty(raw_input);
        address.normalized_id = normalized_id.into();
        if let Some(first) = features.first() {
            address.street_address = first.street_address.clone();
            address.parcel_id = first.parcel_id.clone().filter(|id| !id.is_empty());
            address.account_number = first.account_number.clone();
            address.owner_names = first.owner_names.clone();
            address.match_count = total_size.max(features.len() as u64);
        }
        address.features = features;
        address
    }

    pub fn is_empty(&self) -> bool {
        self.match_count == 0 || self.features.is_empty()
    }

    /// Point coordinates of the best match
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.features.first()?.geometry.as_ref()?.point()
    }

    /// Whether this result already answers a lookup keyed on `key`.
    ///
    /// Matches on the normalized id, the street address or the account
    /// number, compared trimmed and ASCII case-insensitively.
    pub fn answers(&self, key: &str) -> bool {
        if self.is_empty() {
            return false;
        }
        let key = key.trim();
        [
            Some(self.normalized_id.as_str()),
            self.street_address.as_deref(),
            self.account_number.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|candidate| !candidate.is_empty() && candidate.trim().eq_ignore_ascii_case(key))
    }
}

/// One parcel polygon with its ownership attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelFeature {
    pub external_id: Option<i64>,
    pub geometry: Option<Geometry>,
    pub parcel_identifier: Option<String>,
    pub address: Option<String>,
    pub owner1: Option<String>,
    pub owner2: Option<String>,
    pub brt_id: Option<String>,
}

impl ParcelFeature {
    pub fn geometry_type(&self) -> Option<&str> {
        self.geometry.as_ref().map(|g| g.kind.as_str())
    }
}

/// Parcel lookup result slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "features", rename_all = "lowercase")]
pub enum ParcelSet {
    /// No lookup has completed for this slot yet
    #[default]
    Unfetched,
    /// A lookup completed and matched nothing
    Empty,
    /// A lookup completed with at least one parcel
    Found(Vec<ParcelFeature>),
}

impl ParcelSet {
    /// `Found` for a non-empty list, `Empty` otherwise
    pub fn from_features(features: Vec<ParcelFeature>) -> Self {
        if features.is_empty() {
            ParcelSet::Empty
        } else {
            ParcelSet::Found(features)
        }
    }

    pub fn features(&self) -> &[ParcelFeature] {
        match self {
            ParcelSet::Found(features) => features,
            ParcelSet::Unfetched | ParcelSet::Empty => &[],
        }
    }

    pub fn first(&self) -> Option<&ParcelFeature> {
        self.features().first()
    }

    pub fn is_fetched(&self) -> bool {
        !matches!(self, ParcelSet::Unfetched)
    }

    pub fn has_features(&self) -> bool {
        matches!(self, ParcelSet::Found(_))
    }

    pub fn len(&self) -> usize {
        self.features().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
