//! Navigation orchestrator
//!
//! Two entry points, both called by the [`Navigator`](crate::Navigator):
//!
//! - [`Orchestrator::before_enter_search`] runs when a `/search` location is
//!   about to be entered. It geocodes the address (or point-queries the
//!   clicked location) and redirects to the canonical address route.
//! - [`Orchestrator::after_each`] runs after every committed navigation and,
//!   for address-bearing routes, runs one data-fetch cycle.
//!
//! Both paths claim the session's fetch flag before issuing any request and
//! hold it until every request they issued has come back.

use crate::config::{AddressFailurePolicy, NavigatorConfig};
use crate::error::Result;
use crate::plan::{plan_cycle, CyclePlan, FetchPlan, PlanKind};
use crate::state::{CycleState, CycleStep, CycleTracker};
use parcelview_core::{
    FetchGuard, NavigationRequest, NormalizedAddress, Outcome, ParcelLayer, Resolution,
    RouteLocation, RouteName, SearchMethod, SessionState, SessionStore,
};
use parcelview_resolve::{AddressStore, EndpointConfig, ParcelStore};
use serde::Serialize;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, info};

/// What one after-navigation pass did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub plan: PlanKind,
    /// States entered, starting and ending at `Idle`
    pub states: Vec<CycleState>,
    /// Geocoder outcome, when the geocoder was called
    pub address: Option<Outcome>,
    /// Parcel lookup outcome, when parcels were fetched
    pub parcels: Option<Outcome>,
}

impl CycleReport {
    fn new(plan: PlanKind) -> Self {
        Self {
            plan,
            states: vec![CycleState::Idle],
            address: None,
            parcels: None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.plan == PlanKind::Rejected
    }
}

/// Verdict of the search-route entry guard
#[derive(Debug, Clone, PartialEq)]
pub enum EntryDecision {
    /// Replace the search location with this one
    Redirect(RouteLocation),
    /// Cancel the navigation
    Abort,
    /// A fetch is already running; the navigation is discarded
    Rejected,
}

/// Context object tying the session to the resolver stores
pub struct Orchestrator {
    session: Arc<SessionStore>,
    addresses: Arc<AddressStore>,
    parcels: Arc<ParcelStore>,
    config: NavigatorConfig,
}

impl Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("session", &self.session)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(
        session: Arc<SessionStore>,
        addresses: Arc<AddressStore>,
        parcels: Arc<ParcelStore>,
        config: NavigatorConfig,
    ) -> Self {
        Self {
            session,
            addresses,
            parcels,
            config,
        }
    }

    /// Wire up HTTP-backed stores and a fresh session
    pub fn http(endpoints: &EndpointConfig, config: NavigatorConfig) -> Result<Self> {
        Ok(Self::new(
            Arc::new(SessionStore::new()),
            Arc::new(AddressStore::http(endpoints)?),
            Arc::new(ParcelStore::http(endpoints)?),
            config,
        ))
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn addresses(&self) -> &Arc<AddressStore> {
        &self.addresses
    }

    pub fn parcels(&self) -> &Arc<ParcelStore> {
        &self.parcels
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    fn canonical_route(&self, address: String, from: &RouteLocation) -> RouteLocation {
        RouteLocation::address(address, self.config.default_topic.clone())
            .with_lang(from.query.lang.clone())
    }

    /// Entry guard for `/search`.
    ///
    /// Checks the fetch flag first. An address is geocoded and redirected to
    /// its canonical route (or to `not-found`). A point is looked up on the
    /// `pwd` layer and redirected to the route of the parcel it falls in.
    /// Anything else aborts.
    pub async fn before_enter_search(&self, to: &RouteLocation) -> EntryDecision {
        let Some(_guard) = self.session.try_begin_fetch() else {
            debug!(route = %to, "search entered while a fetch is running; rejecting");
            return EntryDecision::Rejected;
        };

        if let Some(address) = to.query.address.as_deref().filter(|a| !a.trim().is_empty()) {
            return self.search_address(address, to).await;
        }
        if let Some((lng, lat)) = to.coordinates() {
            return self.search_point(lng, lat, to).await;
        }

        debug!(route = %to, "search without address or coordinates; aborting");
        EntryDecision::Abort
    }

    async fn search_address(&self, address: &str, to: &RouteLocation) -> EntryDecision {
        info!(address, "address search");
        self.session
            .set_last_search_method(Some(SearchMethod::Address));
        self.session.set_address_search_running(true);

        match self.addresses.fill(address).await {
            Resolution::Found(found) => {
                self.session
                    .set_current_address(found.street_address.clone());
                let canonical = found
                    .street_address
                    .unwrap_or_else(|| address.trim().to_string());
                EntryDecision::Redirect(self.canonical_route(canonical, to))
            }
            Resolution::NotFound => {
                self.session.set_current_address(None);
                self.session.set_current_topic(None);
                EntryDecision::Redirect(RouteLocation::not_found().with_lang(to.query.lang.clone()))
            }
            Resolution::Failed(_) | Resolution::Superseded => {
                self.session.set_address_search_running(false);
                EntryDecision::Abort
            }
        }
    }

    async fn search_point(&self, lng: f64, lat: f64, to: &RouteLocation) -> EntryDecision {
        info!(lng, lat, "map click search");
        self.session
            .set_last_search_method(Some(SearchMethod::MapClick));
        self.session.set_last_click_coords(Some((lng, lat)));

        let resolution = self.parcels.check_by_point(lng, lat, ParcelLayer::Pwd).await;
        debug!(outcome = %resolution.outcome(), "point lookup finished");

        let layer = [ParcelLayer::Pwd, ParcelLayer::Dor]
            .into_iter()
            .find(|layer| self.parcels.checked(*layer).has_features());
        let Some(layer) = layer else {
            debug!(lng, lat, "no parcel at clicked point; aborting");
            self.session.set_address_search_running(false);
            return EntryDecision::Abort;
        };

        let checked = self.parcels.checked(layer);
        let Some(parcel) = checked.first() else {
            return EntryDecision::Abort;
        };
        let Some(parcel_address) = parcel.address.clone().filter(|a| !a.trim().is_empty()) else {
            debug!(layer = %layer, "clicked parcel has no address; aborting");
            self.session.set_address_search_running(false);
            return EntryDecision::Abort;
        };

        self.parcels.promote_checked(layer);
        self.session
            .set_current_parcel_geocode_parameter(parcel.parcel_identifier.clone());
        self.session
            .set_current_parcel_address(Some(parcel_address.clone()));
        EntryDecision::Redirect(self.canonical_route(parcel_address, to))
    }

    /// Hook run after every committed navigation.
    ///
    /// The fetch flag is claimed before any session write; a call that finds
    /// it held reports `Rejected` and changes nothing.
    pub async fn after_each(&self, request: &NavigationRequest) -> Result<CycleReport> {
        let Some(guard) = self.session.try_begin_fetch() else {
            debug!(route = %request.target, "navigation arrived while a fetch is running; rejecting");
            return Ok(CycleReport::new(PlanKind::Rejected));
        };

        let target = &request.target;
        if target.query.lang != request.previous.query.lang {
            self.session.set_current_lang(target.query.lang.clone());
        }

        match target.name {
            RouteName::AddressOrTopic | RouteName::Search => Ok(CycleReport::new(PlanKind::Skipped)),
            RouteName::NotFound => {
                self.clear_for_not_found();
                Ok(CycleReport::new(PlanKind::ClearForNotFound))
            }
            RouteName::Home | RouteName::Address => {
                if let Some(topic) = target.params.topic.clone() {
                    self.session.set_current_topic(Some(topic));
                }
                self.session.set_address_search_running(false);
                self.fetch_cycle(request, guard).await
            }
        }
    }

    fn clear_for_not_found(&self) {
        self.session.clear_for_not_found();
        self.addresses.clear();
    }

    /// One fetch cycle for an address-bearing route
    pub async fn data_fetch(&self, request: &NavigationRequest) -> Result<CycleReport> {
        let Some(guard) = self.session.try_begin_fetch() else {
            return Ok(CycleReport::new(PlanKind::Rejected));
        };
        self.fetch_cycle(request, guard).await
    }

    async fn fetch_cycle(
        &self,
        request: &NavigationRequest,
        _guard: FetchGuard<'_>,
    ) -> Result<CycleReport> {
        let cached = self.addresses.current();
        // The flag in the snapshot is the one this cycle holds.
        let session = SessionState {
            data_fetch_running: false,
            ..self.session.snapshot()
        };
        let plan = plan_cycle(request, &session, cached.as_ref());
        let mut report = CycleReport::new(plan.kind());

        debug!(route = %request.target, plan = ?plan, "data fetch starting");
        let mut tracker = CycleTracker::new();
        tracker.step(CycleStep::Begin)?;

        match &plan {
            CyclePlan::Fetch(fetch) => self.run_fetch(fetch, &mut tracker, &mut report).await?,
            CyclePlan::ClearForNotFound => {
                tracker.step(CycleStep::Reconcile)?;
                self.clear_for_not_found();
            }
            CyclePlan::Rejected | CyclePlan::Bookkeeping => {}
        }

        tracker.step(CycleStep::Finish)?;
        report.states = tracker.into_visited();
        debug!(report = ?report, "data fetch finished");
        Ok(report)
    }

    async fn run_fetch(
        &self,
        fetch: &FetchPlan,
        tracker: &mut CycleTracker,
        report: &mut CycleReport,
    ) -> Result<()> {
        let mut geocoded = None;
        if fetch.geocode {
            tracker.step(CycleStep::ResolveAddress)?;
            let resolution = self.addresses.fill(&fetch.key).await;
            report.address = Some(resolution.outcome());
            geocoded = Some(resolution);
        }

        let address_failed = matches!(
            geocoded,
            Some(Resolution::Failed(_)) | Some(Resolution::Superseded)
        );
        if fetch.fetch_parcels {
            let resolved = self.addresses.current().filter(|a| !a.is_empty());
            if address_failed && self.config.address_failure == AddressFailurePolicy::Abort {
                debug!(key = %fetch.key, "address lookup failed; skipping parcel fetch");
            } else if let Some(address) = resolved {
                tracker.step(CycleStep::ResolveParcels)?;
                let resolution = self.parcels.fill_by_identifier(&address).await;
                report.parcels = Some(resolution.outcome());
            } else {
                debug!(key = %fetch.key, "no resolved address; skipping parcel fetch");
            }
        }

        tracker.step(CycleStep::Reconcile)?;
        self.reconcile(geocoded, report.parcels);
        Ok(())
    }

    /// Write lookup results back into the session
    fn reconcile(&self, geocoded: Option<Resolution<NormalizedAddress>>, parcels: Option<Outcome>) {
        match geocoded {
            Some(Resolution::Found(address)) => {
                self.session.set_current_address(address.street_address);
            }
            Some(Resolution::NotFound) => {
                if self.session.last_search_method() == Some(SearchMethod::Address) {
                    self.session.set_current_address(None);
                }
            }
            Some(Resolution::Failed(_)) | Some(Resolution::Superseded) => {}
            None => {
                if let Some(cached) = self.addresses.current().filter(|a| !a.is_empty()) {
                    self.session.set_current_address(cached.street_address);
                }
            }
        }

        if parcels == Some(Outcome::Found) {
            if let Some(parcel) = self.parcels.pwd().first() {
                self.session
                    .set_current_parcel_geocode_parameter(parcel.parcel_identifier.clone());
                self.session
                    .set_current_parcel_address(parcel.address.clone());
            }
        }
    }
}
