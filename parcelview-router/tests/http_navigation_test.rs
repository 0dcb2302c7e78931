//! End-to-end navigation against mocked upstream services

use parcelview_core::{Outcome, RouteLocation, RouteName};
use parcelview_resolve::EndpointConfig;
use parcelview_router::{NavigationOutcome, Navigator, NavigatorConfig, Orchestrator, PlanKind};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn geocode_body() -> serde_json::Value {
    serde_json::json!({
        "type": "FeatureCollection",
        "total_size": 1,
        "normalized": "1234 MARKET ST",
        "features": [{
            "type": "Feature",
            "properties": {
                "street_address": "1234 MARKET ST",
                "pwd_parcel_id": 1234000,
                "opa_account_num": "883309050",
                "opa_owners": ["CITY OF PHILA"]
            },
            "geometry": {"type": "Point", "coordinates": [-75.16, 39.95]},
            "ais_feature_type": "address",
            "match_type": "exact"
        }]
    })
}

fn parcel_body() -> serde_json::Value {
    serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "id": 7,
            "geometry": {"type": "Polygon", "coordinates": [[[-75.16, 39.95], [-75.17, 39.95], [-75.16, 39.96], [-75.16, 39.95]]]},
            "properties": {
                "PARCELID": "001234000",
                "ADDRESS": "1234 MARKET ST",
                "OWNER1": "CITY OF PHILA",
                "OWNER2": null,
                "BRT_ID": "883309050"
            }
        }]
    })
}

fn navigator(server: &MockServer) -> Navigator {
    let endpoints = EndpointConfig::with_base_url(&server.uri());
    let orchestrator = Orchestrator::http(&endpoints, NavigatorConfig::default()).unwrap();
    Navigator::new(Arc::new(orchestrator))
}

#[tokio::test]
async fn test_search_resolves_address_then_parcels() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/1234%20Market%20St"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/PWD_PARCELS/FeatureServer/0/query"))
        .and(query_param("where", "PARCELID='1234000'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(parcel_body()))
        .expect(1)
        .mount(&server)
        .await;

    let mut nav = navigator(&server);
    let outcome = nav
        .navigate_path("/search?address=1234+Market+St")
        .await
        .unwrap();

    let report = outcome.report().expect("navigation completed").clone();
    assert_eq!(report.plan, PlanKind::Address);
    assert_eq!(report.parcels, Some(Outcome::Found));
    assert_eq!(nav.current().name, RouteName::Address);
    assert_eq!(nav.current().params.address.as_deref(), Some("1234 MARKET ST"));

    let session = nav.orchestrator().session().snapshot();
    assert_eq!(session.current_address.as_deref(), Some("1234 MARKET ST"));
    assert_eq!(
        session.current_parcel_geocode_parameter.as_deref(),
        Some("001234000")
    );
    assert!(!session.data_fetch_running);
}

#[tokio::test]
async fn test_geocoder_outage_aborts_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/1234%20Market%20St"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let mut nav = navigator(&server);
    let outcome = nav
        .navigate(RouteLocation::search_address("1234 Market St"))
        .await
        .unwrap();

    assert_eq!(outcome, NavigationOutcome::Aborted);
    assert_eq!(nav.current(), &RouteLocation::home());
    let session = nav.orchestrator().session().snapshot();
    assert!(!session.address_search_running);
    assert!(!session.data_fetch_running);
}

#[tokio::test]
async fn test_geocoder_miss_redirects_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut nav = navigator(&server);
    let outcome = nav
        .navigate(RouteLocation::search_address("nowhere"))
        .await
        .unwrap();

    assert_eq!(
        outcome.report().map(|r| r.plan),
        Some(PlanKind::ClearForNotFound)
    );
    assert_eq!(nav.current().name, RouteName::NotFound);
}
