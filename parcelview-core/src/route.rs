//! Route descriptors
//!
//! A [`RouteLocation`] is the parsed form of a browser location such as
//! `/search?address=1234%20Market%20St` or `/1234 MARKET ST/property?p=883309050`.
//! A [`NavigationRequest`] pairs the location being entered with the one
//! being left and is consumed once by the orchestrator.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic used when a canonical address route is built without one
pub const DEFAULT_TOPIC: &str = "property";

/// Named routes known to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteName {
    /// `/`
    Home,
    /// `/search?address=..` or `/search?lng=..&lat=..`
    Search,
    /// `/{segment}`: a single segment that is either an address or a topic
    AddressOrTopic,
    /// `/{address}/{topic}`
    Address,
    /// Catch-all for locations that resolve to nothing
    NotFound,
}

impl RouteName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Home => "home",
            RouteName::Search => "search",
            RouteName::AddressOrTopic => "address-or-topic",
            RouteName::Address => "address",
            RouteName::NotFound => "not-found",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteParams {
    pub address: Option<String>,
    pub topic: Option<String>,
}

/// Query parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub address: Option<String>,
    /// Parcel / account identifier, carried as `p` in the URL
    pub parcel_id: Option<String>,
    pub lng: Option<f64>,
    pub lat: Option<f64>,
    pub lang: Option<String>,
}

/// A parsed route: name plus path and query parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLocation {
    pub name: RouteName,
    #[serde(default)]
    pub params: RouteParams,
    #[serde(default)]
    pub query: RouteQuery,
}

impl Default for RouteLocation {
    fn default() -> Self {
        Self::home()
    }
}

impl RouteLocation {
    fn named(name: RouteName) -> Self {
        Self {
            name,
            params: RouteParams::default(),
            query: RouteQuery::default(),
        }
    }

    pub fn home() -> Self {
        Self::named(RouteName::Home)
    }

    pub fn not_found() -> Self {
        Self::named(RouteName::NotFound)
    }

    /// `/search?address={address}`
    pub fn search_address(address: impl Into<String>) -> Self {
        let mut route = Self::named(RouteName::Search);
        route.query.address = non_empty(address.into());
        route
    }

    /// `/search?lng={lng}&lat={lat}`
    pub fn search_point(lng: f64, lat: f64) -> Self {
        let mut route = Self::named(RouteName::Search);
        route.query.lng = Some(lng);
        route.query.lat = Some(lat);
        route
    }

    /// Canonical address-bearing route: `/{address}/{topic}?address={address}`
    pub fn address(address: impl Into<String>, topic: impl Into<String>) -> Self {
        let address = address.into();
        let mut route = Self::named(RouteName::Address);
        route.params.address = Some(address.clone());
        route.params.topic = Some(topic.into());
        route.query.address = non_empty(address);
        route
    }

    pub fn with_parcel_id(mut self, parcel_id: impl Into<String>) -> Self {
        self.query.parcel_id = non_empty(parcel_id.into());
        self
    }

    pub fn with_lang(mut self, lang: Option<String>) -> Self {
        self.query.lang = lang.and_then(non_empty);
        self
    }

    /// Longitude/latitude pair, present only when both are set
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.query.lng, self.query.lat) {
            (Some(lng), Some(lat)) => Some((lng, lat)),
            _ => None,
        }
    }

    /// Parse a path with optional query string.
    ///
    /// Empty query values are treated as absent. Unknown query keys are
    /// ignored. More than two path segments map to [`RouteName::NotFound`].
    pub fn parse(path_and_query: &str) -> Result<Self> {
        let input = path_and_query.trim();
        if !input.starts_with('/') {
            return Err(CoreError::invalid_route(format!(
                "path must start with '/': {input}"
            )));
        }

        let (path, query) = match input.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (input, None),
        };

        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode_component)
            .collect::<Result<Vec<_>>>()?;

        let mut route = match segments.as_slice() {
            [] => Self::home(),
            [one] if one == "search" => Self::named(RouteName::Search),
            [one] if one == "not-found" => Self::not_found(),
            [one] => {
                let mut r = Self::named(RouteName::AddressOrTopic);
                r.params.address = Some(one.clone());
                r
            }
            [address, topic] => {
                let mut r = Self::named(RouteName::Address);
                r.params.address = Some(address.clone());
                r.params.topic = Some(topic.clone());
                r
            }
            _ => Self::not_found(),
        };

        if let Some(query) = query {
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
                let value = decode_component(&raw.replace('+', " "))?;
                let Some(value) = non_empty(value) else {
                    continue;
                };
                match key {
                    "address" => route.query.address = Some(value),
                    "p" => route.query.parcel_id = Some(value),
                    "lng" => route.query.lng = Some(parse_coordinate("lng", &value, 180.0)?),
                    "lat" => route.query.lat = Some(parse_coordinate("lat", &value, 90.0)?),
                    "lang" => route.query.lang = Some(value),
                    _ => {}
                }
            }
        }

        Ok(route)
    }

    /// Render back to a path with query string
    pub fn to_path(&self) -> String {
        let mut path = match self.name {
            RouteName::Home => "/".to_string(),
            RouteName::Search => "/search".to_string(),
            RouteName::NotFound => "/not-found".to_string(),
            RouteName::AddressOrTopic => format!(
                "/{}",
                urlencoding::encode(self.params.address.as_deref().unwrap_or_default())
            ),
            RouteName::Address => format!(
                "/{}/{}",
                urlencoding::encode(self.params.address.as_deref().unwrap_or_default()),
                urlencoding::encode(self.params.topic.as_deref().unwrap_or(DEFAULT_TOPIC)),
            ),
        };

        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(address) = &self.query.address {
            pairs.push(("address", address.clone()));
        }
        if let Some(p) = &self.query.parcel_id {
            pairs.push(("p", p.clone()));
        }
        if let Some(lng) = self.query.lng {
            pairs.push(("lng", lng.to_string()));
        }
        if let Some(lat) = self.query.lat {
            pairs.push(("lat", lat.to_string()));
        }
        if let Some(lang) = &self.query.lang {
            pairs.push(("lang", lang.clone()));
        }

        if !pairs.is_empty() {
            let query = pairs
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            path.push('?');
            path.push_str(&query);
        }
        path
    }
}

impl fmt::Display for RouteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// Immutable snapshot of one route transition
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationRequest {
    pub target: RouteLocation,
    pub previous: RouteLocation,
}

impl NavigationRequest {
    pub fn new(target: RouteLocation, previous: RouteLocation) -> Self {
        Self { target, previous }
    }

    /// Name of the route being entered
    pub fn route_name(&self) -> RouteName {
        self.target.name
    }

    pub fn target_query(&self) -> &RouteQuery {
        &self.target.query
    }

    pub fn previous_query(&self) -> &RouteQuery {
        &self.previous.query
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn decode_component(raw: &str) -> Result<String> {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .map_err(|e| CoreError::invalid_route(format!("bad percent-encoding in '{raw}': {e}")))
}

fn parse_coordinate(name: &'static str, value: &str, bound: f64) -> Result<f64> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| CoreError::invalid_coordinate(name, value))?;
    if !parsed.is_finite() || parsed.abs() > bound {
        return Err(CoreError::invalid_coordinate(name, value));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_home() {
        let route = RouteLocation::parse("/").unwrap();
        assert_eq!(route.name, RouteName::Home);
        assert_eq!(route.query, RouteQuery::default());
    }

    #[test]
    fn test_parse_search_address() {
        let route = RouteLocation::parse("/search?address=1234%20Market+St").unwrap();
        assert_eq!(route.name, RouteName::Search);
        assert_eq!(route.query.address.as_deref(), Some("1234 Market St"));
        assert!(route.coordinates().is_none());
    }

    #[test]
    fn test_parse_search_point() {
        let route = RouteLocation::parse("/search?lng=-75.16&lat=39.95").unwrap();
        assert_eq!(route.coordinates(), Some((-75.16, 39.95)));
    }

    #[test]
    fn test_parse_rejects_out_of_range_latitude() {
        let err = RouteLocation::parse("/search?lng=-75.16&lat=139.95").unwrap_err();
        assert!(matches!(err, CoreError::InvalidCoordinate { name: "lat", .. }));
    }

    #[test]
    fn test_parse_address_with_topic_and_identifier() {
        let route =
            RouteLocation::parse("/1234%20MARKET%20ST/property?p=883309050&lang=es").unwrap();
        assert_eq!(route.name, RouteName::Address);
        assert_eq!(route.params.address.as_deref(), Some("1234 MARKET ST"));
        assert_eq!(route.params.topic.as_deref(), Some("property"));
        assert_eq!(route.query.parcel_id.as_deref(), Some("883309050"));
        assert_eq!(route.query.lang.as_deref(), Some("es"));
    }

    #[test]
    fn test_parse_empty_identifier_is_absent() {
        let route = RouteLocation::parse("/1234 MARKET ST/property?p=").unwrap();
        assert!(route.query.parcel_id.is_none());
    }

    #[test]
    fn test_parse_single_segment_is_ambiguous() {
        let route = RouteLocation::parse("/voting").unwrap();
        assert_eq!(route.name, RouteName::AddressOrTopic);
        assert_eq!(route.params.address.as_deref(), Some("voting"));
    }

    #[test]
    fn test_parse_deep_path_is_not_found() {
        let route = RouteLocation::parse("/a/b/c").unwrap();
        assert_eq!(route.name, RouteName::NotFound);
    }

    #[test]
    fn test_parse_requires_leading_slash() {
        assert!(RouteLocation::parse("search?address=x").is_err());
    }

    #[test]
    fn test_to_path_canonical_address_route() {
        let route = RouteLocation::address("1234 Market St", "property")
            .with_lang(Some("es".to_string()));
        assert_eq!(
            route.to_path(),
            "/1234%20Market%20St/property?address=1234%20Market%20St&lang=es"
        );
        assert_eq!(RouteLocation::parse(&route.to_path()).unwrap(), route);
    }

    #[test]
    fn test_search_address_drops_empty_input() {
        let route = RouteLocation::search_address("");
        assert!(route.query.address.is_none());
    }
}
