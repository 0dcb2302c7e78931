//! Address and parcel resolvers
//!
//! This crate talks to the three upstream services the lookup client
//! consumes and keeps their latest answers in fenced result slots.
//!
//! # Architecture
//!
//! - [`config`]: Endpoint URLs, dataset names and timeouts
//! - [`wire`]: Serde shapes of the geocoder and feature-service responses
//! - [`address`]: Address resolver trait, HTTP implementation, and [`AddressStore`]
//! - [`parcel`]: Parcel resolver trait, HTTP implementation, and [`ParcelStore`]
//! - [`error`]: Error types for resolver operations
//!
//! Resolver traits return [`parcelview_core::Resolution`] rather than
//! `Result` so callers can tell "no match" apart from "service unreachable".

pub mod address;
pub mod config;
pub mod error;
pub mod parcel;
pub mod wire;

pub use address::{AddressResolver, AddressStore, HttpAddressResolver};
pub use config::EndpointConfig;
pub use error::{ResolveError, Result};
pub use parcel::{HttpParcelResolver, ParcelResolver, ParcelStore};
