//! Shared fakes for router integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parcelview_core::{
    AddressFeature, Geometry, NormalizedAddress, ParcelFeature, ParcelLayer, Resolution,
    SessionStore,
};
use parcelview_resolve::{AddressResolver, AddressStore, ParcelResolver, ParcelStore};
use parcelview_router::{NavigatorConfig, Orchestrator};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

pub const MARKET_ST: &str = "1234 MARKET ST";
pub const MARKET_PARCEL: &str = "001234000";
pub const MARKET_ACCOUNT: &str = "883309050";

pub fn normalized(input: &str, street: &str, parcel_id: &str) -> NormalizedAddress {
    NormalizedAddress::from_features(
        input,
        street,
        1,
        vec![AddressFeature {
            street_address: Some(street.to_string()),
            parcel_id: Some(parcel_id.to_string()),
            account_number: Some(MARKET_ACCOUNT.to_string()),
            owner_names: vec!["CITY OF PHILA".to_string()],
            geometry: Some(Geometry {
                kind: "Point".to_string(),
                coordinates: serde_json::json!([-75.16, 39.95]),
            }),
            feature_type: Some("address".to_string()),
            match_type: Some("exact".to_string()),
        }],
    )
}

pub fn parcel(parcel_id: &str, address: &str) -> ParcelFeature {
    ParcelFeature {
        external_id: Some(1),
        geometry: Some(Geometry {
            kind: "Polygon".to_string(),
            coordinates: serde_json::json!([[[-75.16, 39.95], [-75.17, 39.95], [-75.16, 39.96], [-75.16, 39.95]]]),
        }),
        parcel_identifier: Some(parcel_id.to_string()),
        address: Some(address.to_string()),
        owner1: Some("CITY OF PHILA".to_string()),
        owner2: None,
        brt_id: Some(MARKET_ACCOUNT.to_string()),
    }
}

/// Geocoder fake keyed on trimmed, uppercased input
#[derive(Debug, Default)]
pub struct FakeGeocoder {
    answers: Mutex<HashMap<String, NormalizedAddress>>,
    failing: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeGeocoder {
    pub fn with_market_st() -> Self {
        let geocoder = Self::default();
        let market = normalized("1234 Market St", MARKET_ST, MARKET_PARCEL);
        geocoder.answer("1234 Market St", market.clone());
        geocoder.answer(MARKET_ST, market.clone());
        geocoder.answer(MARKET_ACCOUNT, market);
        geocoder
    }

    pub fn answer(&self, input: &str, address: NormalizedAddress) {
        self.answers.lock().insert(key(input), address);
    }

    pub fn fail(&self, input: &str) {
        self.failing.lock().push(key(input));
    }

    /// Hold every call until `gate` is notified
    pub fn gate(&self, gate: Arc<Notify>) {
        *self.gate.lock() = Some(gate);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

fn key(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

#[async_trait]
impl AddressResolver for FakeGeocoder {
    async fn resolve(&self, input: &str) -> Resolution<NormalizedAddress> {
        self.calls.lock().push(input.to_string());
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failing.lock().contains(&key(input)) {
            return Resolution::Failed("connection refused".to_string());
        }
        match self.answers.lock().get(&key(input)) {
            Some(address) => Resolution::Found(address.clone()),
            None => Resolution::NotFound,
        }
    }
}

/// Parcel service fake recording which lookups were made
#[derive(Debug, Default)]
pub struct FakeParcels {
    by_id: Mutex<HashMap<String, Vec<ParcelFeature>>>,
    at_point: Mutex<Vec<ParcelFeature>>,
    identifier_calls: Mutex<Vec<String>>,
    point_calls: Mutex<Vec<(f64, f64, ParcelLayer)>>,
}

impl FakeParcels {
    pub fn with_market_st() -> Self {
        let parcels = Self::default();
        parcels
            .by_id
            .lock()
            .insert(MARKET_PARCEL.to_string(), vec![parcel(MARKET_PARCEL, MARKET_ST)]);
        *parcels.at_point.lock() = vec![parcel(MARKET_PARCEL, MARKET_ST)];
        parcels
    }

    pub fn identifier_calls(&self) -> Vec<String> {
        self.identifier_calls.lock().clone()
    }

    pub fn point_calls(&self) -> Vec<(f64, f64, ParcelLayer)> {
        self.point_calls.lock().clone()
    }
}

#[async_trait]
impl ParcelResolver for FakeParcels {
    async fn by_identifier(&self, parcel_id: &str) -> Resolution<Vec<ParcelFeature>> {
        self.identifier_calls.lock().push(parcel_id.to_string());
        match self.by_id.lock().get(parcel_id) {
            Some(features) if !features.is_empty() => Resolution::Found(features.clone()),
            _ => Resolution::NotFound,
        }
    }

    async fn by_point(
        &self,
        lng: f64,
        lat: f64,
        layer: ParcelLayer,
    ) -> Resolution<Vec<ParcelFeature>> {
        self.point_calls.lock().push((lng, lat, layer));
        let features = self.at_point.lock().clone();
        if features.is_empty() {
            Resolution::NotFound
        } else {
            Resolution::Found(features)
        }
    }
}

pub struct Harness {
    pub geocoder: Arc<FakeGeocoder>,
    pub parcels: Arc<FakeParcels>,
    pub orchestrator: Arc<Orchestrator>,
}

impl Harness {
    pub fn new(geocoder: FakeGeocoder, parcels: FakeParcels) -> Self {
        Self::with_config(geocoder, parcels, NavigatorConfig::default())
    }

    pub fn with_config(geocoder: FakeGeocoder, parcels: FakeParcels, config: NavigatorConfig) -> Self {
        let geocoder = Arc::new(geocoder);
        let parcels = Arc::new(parcels);
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::new(SessionStore::new()),
            Arc::new(AddressStore::new(geocoder.clone())),
            Arc::new(ParcelStore::new(parcels.clone())),
            config,
        ));
        Self {
            geocoder,
            parcels,
            orchestrator,
        }
    }

    pub fn market_st() -> Self {
        Self::new(FakeGeocoder::with_market_st(), FakeParcels::with_market_st())
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.orchestrator.session()
    }
}
