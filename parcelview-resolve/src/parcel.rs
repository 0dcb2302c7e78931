//! Parcel resolution
//!
//! Two lookups against the feature-query service:
//!
//! - by parcel identifier (`where=PARCELID='...'`) on the `pwd` dataset
//! - by point (`esriSpatialRelWithin`) on the dataset named by a [`ParcelLayer`]
//!
//! [`ParcelStore`] keeps the identifier result in `pwd` and one point-lookup
//! ("checked") set per layer. All slots start out [`ParcelSet::Unfetched`].

use crate::config::{trim_base, EndpointConfig};
use crate::error::{ResolveError, Result};
use crate::wire::ParcelCollection;
use async_trait::async_trait;
use parcelview_core::{
    NormalizedAddress, ParcelFeature, ParcelLayer, ParcelSet, RequestFence, RequestTicket,
    Resolution,
};
use parking_lot::RwLock;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, warn};

/// Parcel geometry and ownership lookups
#[async_trait]
pub trait ParcelResolver: Debug + Send + Sync {
    /// Parcels whose identifier equals `parcel_id`
    async fn by_identifier(&self, parcel_id: &str) -> Resolution<Vec<ParcelFeature>>;

    /// Parcels on `layer` containing the point
    async fn by_point(
        &self,
        lng: f64,
        lat: f64,
        layer: ParcelLayer,
    ) -> Resolution<Vec<ParcelFeature>>;
}

/// Feature-query client over HTTP
#[derive(Debug, Clone)]
pub struct HttpParcelResolver {
    base_url: String,
    pwd_dataset: String,
    dor_dataset: String,
    http: reqwest::Client,
}

impl HttpParcelResolver {
    pub fn new(config: &EndpointConfig, http: reqwest::Client) -> Self {
        Self {
            base_url: trim_base(&config.parcels_url),
            pwd_dataset: config.pwd_dataset.clone(),
            dor_dataset: config.dor_dataset.clone(),
            http,
        }
    }

    pub fn from_config(config: &EndpointConfig) -> Result<Self> {
        Ok(Self::new(config, config.http_client()?))
    }

    fn query_url(&self, layer: ParcelLayer) -> String {
        let dataset = match layer {
            ParcelLayer::Pwd => &self.pwd_dataset,
            ParcelLayer::Dor => &self.dor_dataset,
        };
        format!("{}/{}/FeatureServer/0/query", self.base_url, dataset)
    }

    async fn query(
        &self,
        layer: ParcelLayer,
        params: &[(&str, String)],
    ) -> Result<Vec<ParcelFeature>> {
        let url = self.query_url(layer);
        debug!(url = %url, layer = %layer, "querying parcels");
        let resp = self.http.get(&url).query(params).send().await?;

        if !resp.status().is_success() {
            return Err(ResolveError::Status {
                status: resp.status().as_u16(),
                url,
            });
        }

        let body = resp.bytes().await?;
        let collection: ParcelCollection = serde_json::from_slice(&body)?;
        Ok(collection.into_features())
    }

    /// Identifier lookup on the `pwd` dataset
    pub async fn lookup_identifier(&self, parcel_id: &str) -> Result<Vec<ParcelFeature>> {
        let params = [
            ("where", format!("PARCELID='{}'", parcel_id.replace('\'', "''"))),
            ("outSR", "4326".to_string()),
            ("f", "geojson".to_string()),
            ("outFields", "*".to_string()),
            ("returnGeometry", "true".to_string()),
        ];
        self.query(ParcelLayer::Pwd, &params).await
    }

    /// Point-in-polygon lookup on `layer`
    pub async fn lookup_point(
        &self,
        lng: f64,
        lat: f64,
        layer: ParcelLayer,
    ) -> Result<Vec<ParcelFeature>> {
        let geometry = serde_json::json!({
            "x": lng,
            "y": lat,
            "spatialReference": {"wkid": 4326}
        });
        let params = [
            ("where", "1=1".to_string()),
            ("outSR", "4326".to_string()),
            ("f", "geojson".to_string()),
            ("outFields", "*".to_string()),
            ("returnGeometry", "true".to_string()),
            ("geometry", geometry.to_string()),
            ("geometryType", "esriGeometryPoint".to_string()),
            ("spatialRel", "esriSpatialRelWithin".to_string()),
        ];
        self.query(layer, &params).await
    }
}

fn to_resolution(
    result: Result<Vec<ParcelFeature>>,
    what: &str,
) -> Resolution<Vec<ParcelFeature>> {
    match result {
        Ok(features) if features.is_empty() => Resolution::NotFound,
        Ok(features) => Resolution::Found(features),
        Err(e) => {
            warn!(lookup = what, error = %e, "parcel lookup failed");
            Resolution::Failed(e.to_string())
        }
    }
}

#[async_trait]
impl ParcelResolver for HttpParcelResolver {
    async fn by_identifier(&self, parcel_id: &str) -> Resolution<Vec<ParcelFeature>> {
        to_resolution(self.lookup_identifier(parcel_id).await, "identifier")
    }

    async fn by_point(
        &self,
        lng: f64,
        lat: f64,
        layer: ParcelLayer,
    ) -> Resolution<Vec<ParcelFeature>> {
        to_resolution(self.lookup_point(lng, lat, layer).await, "point")
    }
}

/// One fenced parcel slot
#[derive(Debug, Default)]
struct ParcelSlot {
    set: RwLock<ParcelSet>,
    fence: RequestFence,
}

impl ParcelSlot {
    fn get(&self) -> ParcelSet {
        self.set.read().clone()
    }

    /// Write `set` if `ticket` is still the latest; false when superseded
    fn apply(&self, ticket: RequestTicket, set: ParcelSet) -> bool {
        let mut slot = self.set.write();
        if !self.fence.is_current(ticket) {
            debug!(
                ticket = ticket.sequence(),
                latest = self.fence.latest(),
                "discarding superseded parcel response"
            );
            return false;
        }
        *slot = set;
        true
    }
}

/// Fenced parcel result slots
pub struct ParcelStore {
    resolver: Arc<dyn ParcelResolver>,
    pwd: ParcelSlot,
    pwd_checked: ParcelSlot,
    dor_checked: ParcelSlot,
}

impl Debug for ParcelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParcelStore")
            .field("resolver", &self.resolver)
            .field("pwd", &self.pwd.get().len())
            .field("pwd_checked", &self.pwd_checked.get().len())
            .field("dor_checked", &self.dor_checked.get().len())
            .finish()
    }
}

impl ParcelStore {
    pub fn new(resolver: Arc<dyn ParcelResolver>) -> Self {
        Self {
            resolver,
            pwd: ParcelSlot::default(),
            pwd_checked: ParcelSlot::default(),
            dor_checked: ParcelSlot::default(),
        }
    }

    /// Build a store backed by the HTTP feature service
    pub fn http(config: &EndpointConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpParcelResolver::from_config(config)?)))
    }

    /// Parcels for the current address (identifier lookup)
    pub fn pwd(&self) -> ParcelSet {
        self.pwd.get()
    }

    /// Latest point-lookup result for `layer`
    pub fn checked(&self, layer: ParcelLayer) -> ParcelSet {
        self.checked_slot(layer).get()
    }

    fn checked_slot(&self, layer: ParcelLayer) -> &ParcelSlot {
        match layer {
            ParcelLayer::Pwd => &self.pwd_checked,
            ParcelLayer::Dor => &self.dor_checked,
        }
    }

    /// Fetch parcels for a resolved address into `pwd`.
    ///
    /// With a parcel identifier this is an identifier lookup: matches and
    /// "no match" overwrite `pwd`, failures leave it as it was. Without one,
    /// the address coordinates are looked up on the `pwd` layer and the
    /// checked result is promoted into `pwd`.
    pub async fn fill_by_identifier(&self, address: &NormalizedAddress) -> Resolution<ParcelSet> {
        if address.is_empty() {
            debug!(input = %address.raw_input, "no resolved address; skipping parcel lookup");
            return Resolution::NotFound;
        }

        let Some(parcel_id) = address.parcel_id.as_deref() else {
            let Some((lng, lat)) = address.coordinates() else {
                debug!(input = %address.raw_input, "address has neither parcel id nor coordinates");
                return Resolution::NotFound;
            };
            debug!(lng, lat, "no parcel id on address; falling back to point lookup");
            let ticket = self.pwd.fence.issue();
            let resolution = self.check_by_point(lng, lat, ParcelLayer::Pwd).await;
            if let Resolution::Superseded = resolution {
                return Resolution::Superseded;
            }
            if !self.pwd.apply(ticket, self.checked(ParcelLayer::Pwd)) {
                return Resolution::Superseded;
            }
            return resolution;
        };

        let ticket = self.pwd.fence.issue();
        let resolution = self.resolver.by_identifier(parcel_id).await;
        let applied = match &resolution {
            Resolution::Found(features) => {
                self.pwd.apply(ticket, ParcelSet::from_features(features.clone()))
            }
            Resolution::NotFound => self.pwd.apply(ticket, ParcelSet::Empty),
            Resolution::Failed(_) | Resolution::Superseded => {
                debug!(parcel_id, "keeping previous parcels after failure");
                true
            }
        };
        if !applied {
            return Resolution::Superseded;
        }
        resolution.map(ParcelSet::from_features)
    }

    /// Point-in-polygon lookup into the checked set for `layer`.
    ///
    /// Both "no parcel here" and a failed request leave the checked set
    /// `Empty`; the returned resolution tells them apart.
    pub async fn check_by_point(
        &self,
        lng: f64,
        lat: f64,
        layer: ParcelLayer,
    ) -> Resolution<ParcelSet> {
        let slot = self.checked_slot(layer);
        let ticket = slot.fence.issue();
        let resolution = self.resolver.by_point(lng, lat, layer).await;
        let set = match &resolution {
            Resolution::Found(features) => ParcelSet::from_features(features.clone()),
            _ => ParcelSet::Empty,
        };
        if !slot.apply(ticket, set) {
            return Resolution::Superseded;
        }
        resolution.map(ParcelSet::from_features)
    }

    /// Copy the checked set for `layer` into `pwd`, fencing off in-flight
    /// identifier lookups.
    pub fn promote_checked(&self, layer: ParcelLayer) {
        let ticket = self.pwd.fence.issue();
        self.pwd.apply(ticket, self.checked(layer));
    }
}
