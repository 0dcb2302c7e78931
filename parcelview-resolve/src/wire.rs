//! Wire formats of the upstream services
//!
//! Only the fields the client reads are modeled; everything else in the
//! payloads is ignored. Identifier fields arrive as numbers from some
//! datasets and strings from others, so they are normalized to strings.

use parcelview_core::{AddressFeature, Geometry, NormalizedAddress, ParcelFeature};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Geocoder search response (`GET /search/{query}`)
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub total_size: u64,
    #[serde(default)]
    pub normalized: String,
    #[serde(default)]
    pub features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeFeature {
    #[serde(default)]
    pub properties: GeocodeProperties,
    pub geometry: Option<Geometry>,
    pub ais_feature_type: Option<String>,
    pub match_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeocodeProperties {
    pub street_address: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub pwd_parcel_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub opa_account_num: Option<String>,
    #[serde(default)]
    pub opa_owners: Option<Vec<String>>,
}

impl GeocodeResponse {
    /// Convert into the client model, keeping the caller's raw input
    pub fn into_normalized(self, raw_input: &str) -> NormalizedAddress {
        let features = self
            .features
            .into_iter()
            .map(|f| AddressFeature {
                street_address: f.properties.street_address,
                parcel_id: f.properties.pwd_parcel_id,
                account_number: f.properties.opa_account_num,
                owner_names: f.properties.opa_owners.unwrap_or_default(),
                geometry: f.geometry,
                feature_type: f.ais_feature_type,
                match_type: f.match_type,
            })
            .collect();
        NormalizedAddress::from_features(raw_input, self.normalized, self.total_size, features)
    }
}

/// GeoJSON feature collection from the feature-query endpoint
#[derive(Debug, Deserialize)]
pub struct ParcelCollection {
    #[serde(default)]
    pub features: Vec<ParcelWireFeature>,
}

#[derive(Debug, Deserialize)]
pub struct ParcelWireFeature {
    pub id: Option<i64>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: ParcelProperties,
}

#[derive(Debug, Default, Deserialize)]
pub struct ParcelProperties {
    #[serde(rename = "PARCELID", default, deserialize_with = "string_or_number")]
    pub parcel_id: Option<String>,
    #[serde(rename = "ADDRESS")]
    pub address: Option<String>,
    #[serde(rename = "OWNER1")]
    pub owner1: Option<String>,
    #[serde(rename = "OWNER2")]
    pub owner2: Option<String>,
    #[serde(rename = "BRT_ID", default, deserialize_with = "string_or_number")]
    pub brt_id: Option<String>,
}

impl ParcelCollection {
    pub fn into_features(self) -> Vec<ParcelFeature> {
        self.features
            .into_iter()
            .map(|f| ParcelFeature {
                external_id: f.id,
                geometry: f.geometry,
                parcel_identifier: f.properties.parcel_id,
                address: f.properties.address,
                owner1: f.properties.owner1,
                owner2: f.properties.owner2,
                brt_id: f.properties.brt_id,
            })
            .collect()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocode_response_parse() {
        let json = r#"{
            "type": "FeatureCollection",
            "total_size": 1,
            "normalized": "1234 MARKET ST",
            "features": [{
                "type": "Feature",
                "properties": {
                    "street_address": "1234 MARKET ST",
                    "pwd_parcel_id": "001234000",
                    "opa_account_num": "883309050",
                    "opa_owners": ["CITY OF PHILA"]
                },
                "geometry": {"type": "Point", "coordinates": [-75.16, 39.95]},
                "ais_feature_type": "address",
                "match_type": "exact"
            }]
        }"#;

        let response: GeocodeResponse = serde_json::from_str(json).unwrap();
        let address = response.into_normalized("1234 Market St");
        assert_eq!(address.raw_input, "1234 Market St");
        assert_eq!(address.normalized_id, "1234 MARKET ST");
        assert_eq!(address.parcel_id.as_deref(), Some("001234000"));
        assert_eq!(address.owner_names, vec!["CITY OF PHILA".to_string()]);
        assert_eq!(address.coordinates(), Some((-75.16, 39.95)));
    }

    #[test]
    fn test_geocode_null_owners_and_numeric_parcel() {
        let json = r#"{
            "total_size": 1,
            "normalized": "1 X ST",
            "features": [{
                "properties": {"street_address": "1 X ST", "pwd_parcel_id": 42, "opa_owners": null},
                "geometry": null
            }]
        }"#;
        let address = serde_json::from_str::<GeocodeResponse>(json)
            .unwrap()
            .into_normalized("1 x st");
        assert_eq!(address.parcel_id.as_deref(), Some("42"));
        assert!(address.owner_names.is_empty());
        assert!(address.coordinates().is_none());
    }

    #[test]
    fn test_parcel_collection_parse() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "id": 7,
                "geometry": {"type": "Polygon", "coordinates": [[[-75.1, 39.9], [-75.2, 39.9], [-75.1, 39.9]]]},
                "properties": {"PARCELID": 1234000, "ADDRESS": "1234 MARKET ST", "OWNER1": "CITY OF PHILA", "OWNER2": null, "BRT_ID": "883309050"}
            }]
        }"#;
        let features = serde_json::from_str::<ParcelCollection>(json)
            .unwrap()
            .into_features();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].external_id, Some(7));
        assert_eq!(features[0].parcel_identifier.as_deref(), Some("1234000"));
        assert_eq!(features[0].geometry_type(), Some("Polygon"));
        assert!(features[0].owner2.is_none());
    }
}
