//! Address resolution
//!
//! [`AddressResolver`] is the seam between the client and the geocoder.
//! [`AddressStore`] wraps a resolver with two fenced result slots:
//!
//! - `current`: the address the session is showing; overwritten by every
//!   [`AddressStore::fill`] that completes, including with an empty result
//! - `checked`: a look-ahead slot for validating input without disturbing
//!   `current` ([`AddressStore::check`])

use crate::config::{trim_base, EndpointConfig};
use crate::error::Result;
use crate::wire::GeocodeResponse;
use async_trait::async_trait;
use parcelview_core::{NormalizedAddress, RequestFence, RequestTicket, Resolution};
use parking_lot::RwLock;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves free-text addresses and account/parcel numbers
///
/// The same call handles both kinds of input; the geocoder tells them apart
/// by content.
#[async_trait]
pub trait AddressResolver: Debug + Send + Sync {
    async fn resolve(&self, input: &str) -> Resolution<NormalizedAddress>;
}

/// Geocoder client over HTTP
#[derive(Debug, Clone)]
pub struct HttpAddressResolver {
    base_url: String,
    http: reqwest::Client,
}

impl HttpAddressResolver {
    pub fn new(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: trim_base(&base_url.into()),
            http,
        }
    }

    pub fn from_config(config: &EndpointConfig) -> Result<Self> {
        Ok(Self::new(config.geocoder_url.clone(), config.http_client()?))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self, input: &str) -> String {
        format!(
            "{}/search/{}?include_units=false",
            self.base_url,
            urlencoding::encode(input.trim())
        )
    }

    /// Query the geocoder.
    ///
    /// `Ok(None)` for "no match" (zero features or a non-success status);
    /// `Err` only when no usable response came back.
    pub async fn lookup(&self, input: &str) -> Result<Option<NormalizedAddress>> {
        let url = self.search_url(input);
        debug!(url = %url, "geocoding");
        let resp = self.http.get(&url).send().await?;

        if !resp.status().is_success() {
            debug!(status = resp.status().as_u16(), input, "geocoder returned non-success");
            return Ok(None);
        }

        let body = resp.bytes().await?;
        let response: GeocodeResponse = serde_json::from_slice(&body)?;
        let address = response.into_normalized(input);
        if address.is_empty() {
            debug!(input, "geocoder returned no features");
            return Ok(None);
        }
        Ok(Some(address))
    }
}

#[async_trait]
impl AddressResolver for HttpAddressResolver {
    async fn resolve(&self, input: &str) -> Resolution<NormalizedAddress> {
        match self.lookup(input).await {
            Ok(Some(address)) => Resolution::Found(address),
            Ok(None) => Resolution::NotFound,
            Err(e) => {
                warn!(input, error = %e, "address lookup failed");
                Resolution::Failed(e.to_string())
            }
        }
    }
}

/// Fenced result slots for address resolution
pub struct AddressStore {
    resolver: Arc<dyn AddressResolver>,
    current: RwLock<Option<NormalizedAddress>>,
    checked: RwLock<Option<NormalizedAddress>>,
    current_fence: RequestFence,
    checked_fence: RequestFence,
}

impl Debug for AddressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressStore")
            .field("resolver", &self.resolver)
            .field("current", &*self.current.read())
            .field("latest_request", &self.current_fence.latest())
            .finish()
    }
}

impl AddressStore {
    pub fn new(resolver: Arc<dyn AddressResolver>) -> Self {
        Self {
            resolver,
            current: RwLock::new(None),
            checked: RwLock::new(None),
            current_fence: RequestFence::new(),
            checked_fence: RequestFence::new(),
        }
    }

    /// Build a store backed by the HTTP geocoder
    pub fn http(config: &EndpointConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpAddressResolver::from_config(config)?)))
    }

    /// Latest completed result; an empty result means "no such address"
    pub fn current(&self) -> Option<NormalizedAddress> {
        self.current.read().clone()
    }

    pub fn checked(&self) -> Option<NormalizedAddress> {
        self.checked.read().clone()
    }

    /// Resolve `input` into the `current` slot.
    ///
    /// `Found` and `NotFound` overwrite the slot (the latter with an empty
    /// result); `Failed` leaves it untouched. A response whose request has
    /// been superseded is dropped and reported as `Superseded`.
    pub async fn fill(&self, input: &str) -> Resolution<NormalizedAddress> {
        let ticket = self.current_fence.issue();
        let resolution = self.resolver.resolve(input).await;
        apply(&self.current, &self.current_fence, ticket, input, resolution)
    }

    /// Resolve `input` into the `checked` slot only
    pub async fn check(&self, input: &str) -> Resolution<NormalizedAddress> {
        let ticket = self.checked_fence.issue();
        let resolution = self.resolver.resolve(input).await;
        apply(&self.checked, &self.checked_fence, ticket, input, resolution)
    }

    /// Forget the current result; in-flight requests are fenced off.
    pub fn clear(&self) {
        let _ = self.current_fence.issue();
        *self.current.write() = None;
    }
}

fn apply(
    slot: &RwLock<Option<NormalizedAddress>>,
    fence: &RequestFence,
    ticket: RequestTicket,
    input: &str,
    resolution: Resolution<NormalizedAddress>,
) -> Resolution<NormalizedAddress> {
    let mut slot = slot.write();
    if !fence.is_current(ticket) {
        debug!(
            input,
            ticket = ticket.sequence(),
            latest = fence.latest(),
            "discarding superseded address response"
        );
        return Resolution::Superseded;
    }
    match &resolution {
        Resolution::Found(address) => *slot = Some(address.clone()),
        Resolution::NotFound => *slot = Some(NormalizedAddress::empty(input)),
        Resolution::Failed(reason) => {
            debug!(input, reason = %reason, "keeping previous address after failure");
        }
        Resolution::Superseded => {}
    }
    resolution
}
