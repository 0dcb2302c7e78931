//! Core types for the parcel lookup client
//!
//! This crate holds everything the resolvers and the navigation orchestrator
//! share without depending on HTTP:
//!
//! - [`route`]: Route descriptors and navigation requests
//! - [`model`]: Normalized addresses, parcel features and parcel sets
//! - [`session`]: Process-wide session state with change notifications
//! - [`fence`]: Monotonic request sequencing for last-request-wins slots
//! - [`resolution`]: Typed outcome of a resolver call
//! - [`error`]: Error types for route parsing and model validation

pub mod error;
pub mod fence;
pub mod model;
pub mod resolution;
pub mod route;
pub mod session;

pub use error::{CoreError, Result};
pub use fence::{RequestFence, RequestTicket};
pub use model::{
    AddressFeature, Geometry, NormalizedAddress, ParcelFeature, ParcelLayer, ParcelSet,
    SearchMethod,
};
pub use resolution::{Outcome, Resolution};
pub use route::{NavigationRequest, RouteLocation, RouteName, RouteParams, RouteQuery};
pub use session::{FetchGuard, SessionEvent, SessionField, SessionState, SessionStore};
