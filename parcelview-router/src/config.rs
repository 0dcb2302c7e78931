//! Navigator settings

use parcelview_core::route::DEFAULT_TOPIC;
use serde::{Deserialize, Serialize};

/// What a cycle does when the address lookup fails outright
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressFailurePolicy {
    /// Skip the parcel fetch; the previous parcels stay on screen
    #[default]
    Abort,
    /// Fetch parcels for whatever address is still cached
    ProceedWithStale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Topic segment used when building canonical address routes
    pub default_topic: String,
    pub address_failure: AddressFailurePolicy,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            default_topic: DEFAULT_TOPIC.to_string(),
            address_failure: AddressFailurePolicy::default(),
        }
    }
}
