//! Router and dispatcher over real data files.

use pinkbombs::registry::{Kind, Locale};
use pinkbombs::server::{ApiKeyGate, ApiRequest, Router};
use serde_json::Value;
use std::sync::atomic::Ordering;

use crate::catalog_data::{builtin_data_dir, builtin_router};
use crate::helpers::{
    DataDir, TEST_KEY, TOP10_FILE, TOP10_ORDER, counting_router, dispatcher, router,
};

fn figure_of(envelope: &Value) -> Value {
    serde_json::from_str(envelope["graph"].as_str().expect("graph payload")).expect("figure JSON")
}

fn locale_prefix(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "/api/v1/secure",
        Locale::Fr => "/api/v1/secure/fr",
    }
}

#[test]
fn test_top10_scenario() {
    let dir = DataDir::with_fixtures();
    let response =
        router(&dir).handle(&ApiRequest::get("/api/v1/secure/graphs/top-10").with_key(TEST_KEY));

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "application/json");
    let envelope = response.body_json().unwrap();
    assert_eq!(envelope["graph_name"], "top-10");
    assert!(envelope["path"].as_str().unwrap().ends_with(TOP10_FILE));

    let figure = figure_of(&envelope);
    let labels: Vec<&str> = figure["data"][0]["y"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(labels, TOP10_ORDER);
    assert_eq!(figure["layout"]["yaxis"]["categoryarray"], serde_json::json!(TOP10_ORDER));
}

#[test]
fn test_invalid_key_never_loads_data() {
    let dir = DataDir::with_fixtures();
    let (router, loads) = counting_router(&dir);

    for key in [None, Some("wrong"), Some("")] {
        let mut request = ApiRequest::get("/api/v1/secure/graphs/top-10");
        request.api_key = key.map(str::to_string);
        let response = router.handle(&request);
        assert_eq!(response.status, 401);
        assert_eq!(
            response.body_json().unwrap()["detail"],
            "Missing or invalid API key"
        );
    }
    // Unknown ids are rejected by the gate too, before any lookup
    let response = router.handle(&ApiRequest::get("/api/v1/secure/maps/nope").with_key("wrong"));
    assert_eq!(response.status, 401);
    assert_eq!(loads.load(Ordering::SeqCst), 0);

    let response = router.handle(&ApiRequest::get("/api/v1/secure/graphs/top-10").with_key(TEST_KEY));
    assert_eq!(response.status, 200);
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_every_registered_id_renders() {
    let dir = DataDir::with_fixtures();
    let router = router(&dir);

    for registry in router.dispatcher().catalog().registries() {
        let prefix = match registry.locale() {
            Locale::En => "/api/v1/secure".to_string(),
            Locale::Fr => "/api/v1/secure/fr".to_string(),
        };
        for entry in registry.entries() {
            let url = format!("{}/{}/{}", prefix, registry.kind(), entry.id);
            let response = router.handle(&ApiRequest::get(&url).with_key(TEST_KEY));
            assert_eq!(response.status, 200, "{}", url);

            let envelope = response.body_json().unwrap();
            let payload = match registry.kind() {
                Kind::Graph => envelope["graph"].as_str().unwrap().to_string(),
                Kind::Map => envelope["map"].as_str().unwrap().to_string(),
            };
            assert!(!payload.is_empty(), "{}", url);
        }
    }
}

#[test]
fn test_map_envelope_carries_html() {
    let dir = DataDir::with_fixtures();
    let response =
        router(&dir).handle(&ApiRequest::get("/api/v1/secure/maps/ras-map").with_key(TEST_KEY));
    assert_eq!(response.status, 200);

    let envelope = response.body_json().unwrap();
    assert_eq!(envelope["map_name"], "ras-map");
    let html = envelope["map"].as_str().unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Pure Salmon"));
    assert!(!html.contains("Ambition only"));
}

#[test]
fn test_unregistered_ids_are_not_found() {
    let dir = DataDir::with_fixtures();
    let router = router(&dir);
    for url in [
        "/api/v1/secure/graphs/aqua-tonnes",
        "/api/v1/secure/graphs/ras-map",
        "/api/v1/secure/maps/top-10",
        "/api/v1/secure/fr/graphs/mortality-rates",
    ] {
        let response = router.handle(&ApiRequest::get(url).with_key(TEST_KEY));
        assert_eq!(response.status, 404, "{}", url);
    }

    let response = router.handle(&ApiRequest::get("/api/v2/graphs/top-10"));
    assert_eq!(response.status, 404);
    assert_eq!(response.body_json().unwrap()["detail"], "Not Found");
}

#[test]
fn test_same_request_same_artifact() {
    let dir = DataDir::with_fixtures();
    let dispatcher = dispatcher(&dir);

    let first = dispatcher.render(Locale::En, Kind::Graph, "top-10").unwrap();
    let second = dispatcher.render(Locale::En, Kind::Graph, "top-10").unwrap();
    assert_eq!(first.payload, second.payload);

    let first = dispatcher.render(Locale::En, Kind::Map, "ras-map").unwrap();
    let second = dispatcher.render(Locale::En, Kind::Map, "ras-map").unwrap();
    assert_eq!(first.payload, second.payload);
}

#[test]
fn test_zero_row_files() {
    let dir = DataDir::new();
    dir.write(TOP10_FILE, "Tons,Country,Flag\n");
    dir.write("mortality.csv", "Company,Mortality_rate\n");
    let dispatcher = dispatcher(&dir);

    let top10 = dispatcher.render(Locale::En, Kind::Graph, "top-10").unwrap();
    let figure: Value = serde_json::from_str(&top10.payload).unwrap();
    assert_eq!(figure["data"][0]["y"], serde_json::json!([]));

    assert!(dispatcher.render(Locale::En, Kind::Graph, "mortality-rates").is_ok());
}

#[test]
fn test_cors_headers_for_allowed_origin() {
    let dir = DataDir::with_fixtures();
    let allowed = "https://pinkbombs.org";
    let router = Router::new(
        dispatcher(&dir),
        ApiKeyGate::new(TEST_KEY),
        vec![allowed.to_string()],
    );

    // Preflight skips the gate
    let preflight = router.handle(
        &ApiRequest::new("OPTIONS", "/api/v1/secure/graphs/top-10").with_origin(allowed),
    );
    assert_eq!(preflight.status, 200);
    assert_eq!(preflight.header("Access-Control-Allow-Origin"), Some(allowed));
    assert_eq!(preflight.header("Access-Control-Allow-Credentials"), Some("true"));

    let response = router.handle(
        &ApiRequest::get("/api/v1/secure/graphs/top-10")
            .with_key(TEST_KEY)
            .with_origin("https://elsewhere.example"),
    );
    assert_eq!(response.status, 200);
    assert_eq!(response.header("Access-Control-Allow-Origin"), None);
}

#[test]
fn test_builtin_catalog_renders_every_entry() {
    let dir = builtin_data_dir();
    let router = builtin_router(&dir);

    let mut rendered = 0;
    for registry in pinkbombs::registry::builtin().registries() {
        for entry in registry.entries() {
            let url = format!(
                "{}/{}/{}",
                locale_prefix(registry.locale()),
                registry.kind(),
                entry.id
            );
            let response = router.handle(&ApiRequest::get(&url).with_key(TEST_KEY));
            assert_eq!(response.status, 200, "{}: {}", url, response.body);

            let envelope = response.body_json().unwrap();
            assert!(envelope["path"].as_str().unwrap().ends_with(&entry.filename));
            match registry.kind() {
                Kind::Graph => assert!(!figure_of(&envelope)["data"].as_array().unwrap().is_empty(), "{}", url),
                Kind::Map => assert!(envelope["map"].as_str().unwrap().contains("leaflet"), "{}", url),
            }
            rendered += 1;
        }
    }
    assert_eq!(rendered, 20);
}

#[test]
fn test_builtin_entries_read_their_columns() {
    let dir = builtin_data_dir();
    let router = builtin_router(&dir);
    let get = |url: &str| {
        let response = router.handle(&ApiRequest::get(url).with_key(TEST_KEY));
        assert_eq!(response.status, 200, "{}: {}", url, response.body);
        response.body_json().unwrap()
    };

    // Five criteria by eight alternatives
    let matrix = figure_of(&get("/api/v1/secure/fr/graphs/alternatives"));
    assert_eq!(matrix["data"][0]["z"].as_array().unwrap().len(), 5);
    assert_eq!(matrix["data"][0]["x"].as_array().unwrap().len(), 8);

    // French headers, same ordering
    let top10 = figure_of(&get("/api/v1/secure/fr/graphs/top-10"));
    assert_eq!(top10["data"][0]["y"], serde_json::json!(TOP10_ORDER));

    // Approximate amounts parse; blank hover cells stay empty
    let companies = figure_of(&get("/api/v1/secure/graphs/top-comp"));
    let trace = &companies["data"][0];
    assert_eq!(trace["y"][0], "Mowi ASA 🇳🇴");
    assert_eq!(trace["customdata"][1][4], "$1.1B");
    assert_eq!(trace["customdata"][2][4], "");
    let land = figure_of(&get("/api/v1/secure/fr/graphs/top-land"));
    assert_eq!(land["data"][0]["x"], serde_json::json!([220000.0, 20000.0]));

    // Frames from the latest year, 1975 filtered out
    let evolution = figure_of(&get("/api/v1/secure/graphs/evolution-map"));
    let frames: Vec<&str> = evolution["frames"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(frames, ["2020", "1990"]);

    let map = get("/api/v1/secure/fr/maps/ras-map");
    let html = map["map"].as_str().unwrap();
    assert!(html.contains("Consommation d"));
    assert!(html.contains("Pure Salmon"));
}
