//! Transition predicates and the cycle planner
//!
//! [`plan_cycle`] is a pure function of the navigation request, a session
//! snapshot and the cached address. It evaluates the rules in priority
//! order; the first that applies decides the cycle:
//!
//! 1. a cycle is already running: reject
//! 2. entering `not-found`: clear state, no lookups
//! 3. the parcel identifier changed and is present: identifier branch
//! 4. the path address changed and a query address is present: address branch
//! 5. otherwise: bookkeeping only
//!
//! Rules 3 and 4 are exclusive, so an identifier change wins over an
//! address change on the same transition.

use parcelview_core::{
    NavigationRequest, NormalizedAddress, RouteLocation, RouteName, SearchMethod, SessionState,
};
use serde::Serialize;

/// Which key a fetch cycle resolves on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Branch {
    Identifier,
    Address,
}

/// Lookups a fetch cycle will issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub branch: Branch,
    /// Identifier or address text handed to the geocoder
    pub key: String,
    /// False when the cached address already answers `key`
    pub geocode: bool,
    /// False for map-click searches, whose point lookup is authoritative
    pub fetch_parcels: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CyclePlan {
    Rejected,
    ClearForNotFound,
    Fetch(FetchPlan),
    Bookkeeping,
}

/// Payload-free summary of a [`CyclePlan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanKind {
    Rejected,
    ClearForNotFound,
    Identifier,
    Address,
    Bookkeeping,
    /// The route is handled elsewhere (search entry, ambiguous segment)
    Skipped,
}

impl CyclePlan {
    pub fn kind(&self) -> PlanKind {
        match self {
            CyclePlan::Rejected => PlanKind::Rejected,
            CyclePlan::ClearForNotFound => PlanKind::ClearForNotFound,
            CyclePlan::Fetch(FetchPlan {
                branch: Branch::Identifier,
                ..
            }) => PlanKind::Identifier,
            CyclePlan::Fetch(FetchPlan {
                branch: Branch::Address,
                ..
            }) => PlanKind::Address,
            CyclePlan::Bookkeeping => PlanKind::Bookkeeping,
        }
    }
}

/// The `p` query parameter differs between the two routes
pub fn identifier_changed(previous: &RouteLocation, target: &RouteLocation) -> bool {
    previous.query.parcel_id != target.query.parcel_id
}

/// The path address differs after trimming both sides
pub fn address_changed(previous: &RouteLocation, target: &RouteLocation) -> bool {
    match (
        previous.params.address.as_deref(),
        target.params.address.as_deref(),
    ) {
        (None, None) => false,
        (Some(prev), Some(next)) => prev.trim() != next.trim(),
        _ => true,
    }
}

/// The geocoder must be called unless the cached result already answers `key`
pub fn needs_geocode(cached: Option<&NormalizedAddress>, key: &str) -> bool {
    !cached.is_some_and(|address| address.answers(key))
}

pub fn should_fetch_parcels(last_search_method: Option<SearchMethod>) -> bool {
    last_search_method != Some(SearchMethod::MapClick)
}

pub fn plan_cycle(
    request: &NavigationRequest,
    session: &SessionState,
    cached: Option<&NormalizedAddress>,
) -> CyclePlan {
    if session.data_fetch_running {
        return CyclePlan::Rejected;
    }
    if request.route_name() == RouteName::NotFound {
        return CyclePlan::ClearForNotFound;
    }

    let previous = &request.previous;
    let target = &request.target;
    let fetch = |branch: Branch, key: &str| {
        CyclePlan::Fetch(FetchPlan {
            branch,
            key: key.to_string(),
            geocode: needs_geocode(cached, key),
            fetch_parcels: should_fetch_parcels(session.last_search_method),
        })
    };

    match (
        target.query.parcel_id.as_deref(),
        target.query.address.as_deref(),
    ) {
        (Some(id), _) if identifier_changed(previous, target) => fetch(Branch::Identifier, id),
        (_, Some(address)) if address_changed(previous, target) => fetch(Branch::Address, address),
        _ => CyclePlan::Bookkeeping,
    }
}
