//! Navigation orchestration for the parcel lookup client
//!
//! Every route transition passes through here. The orchestrator decides,
//! from the previous and next route and the session state, whether the
//! geocoder and/or the parcel service must be called, calls them in order,
//! and writes the results back into the session.
//!
//! - [`state`]: Explicit per-cycle state machine
//! - [`plan`]: Transition predicates and the cycle planner
//! - [`orchestrator`]: Search-route entry guard and after-navigation hook
//! - [`navigator`]: Route history, redirects and back/forward
//! - [`config`]: Navigator settings and the address-failure policy
//! - [`error`]: Error types for orchestration

pub mod config;
pub mod error;
pub mod navigator;
pub mod orchestrator;
pub mod plan;
pub mod state;

pub use config::{AddressFailurePolicy, NavigatorConfig};
pub use error::{Result, RouteError};
pub use navigator::{NavigationOutcome, Navigator};
pub use orchestrator::{CycleReport, EntryDecision, Orchestrator};
pub use plan::{plan_cycle, Branch, CyclePlan, FetchPlan, PlanKind};
pub use state::{CycleState, CycleStep, CycleTracker};
