//! Snapshot tests of response bodies using the insta crate.
//!
//! Bodies are compared as inline JSON snapshots. The health timestamp and
//! temporary paths are redacted.
//!
//! To update snapshots after intentional changes:
//! ```sh
//! cargo insta test --accept
//! ```

use pinkbombs::server::{ApiRequest, ApiResponse};

use crate::helpers::{DataDir, TEST_KEY, router};

fn body(response: &ApiResponse) -> serde_json::Value {
    response.body_json().expect("JSON body")
}

#[test]
fn snapshot_public_health() {
    let dir = DataDir::new();
    let response = router(&dir).handle(&ApiRequest::get("/"));
    assert_eq!(response.status, 200);
    insta::assert_json_snapshot!(body(&response), { ".time" => "[time]" }, @r###"
    {
      "status": "ok",
      "time": "[time]"
    }
    "###);
}

#[test]
fn snapshot_secure_health() {
    let dir = DataDir::new();
    let response = router(&dir).handle(&ApiRequest::get("/api/v1/secure/").with_key(TEST_KEY));
    assert_eq!(response.status, 200);
    insta::assert_json_snapshot!(body(&response), { ".time" => "[time]" }, @r###"
    {
      "status": "ok",
      "time": "[time]"
    }
    "###);
}

#[test]
fn snapshot_unauthorized() {
    let dir = DataDir::new();
    let response = router(&dir).handle(&ApiRequest::get("/api/v1/secure/graphs/top-10"));
    assert_eq!(response.status, 401);
    insta::assert_json_snapshot!(body(&response), @r###"
    {
      "detail": "Missing or invalid API key"
    }
    "###);
}

#[test]
fn snapshot_graph_not_found() {
    let dir = DataDir::new();
    let response = router(&dir)
        .handle(&ApiRequest::get("/api/v1/secure/graphs/aqua-tonnes").with_key(TEST_KEY));
    assert_eq!(response.status, 404);
    insta::assert_json_snapshot!(body(&response), @r###"
    {
      "detail": "Graph not found"
    }
    "###);
}

#[test]
fn snapshot_map_not_found() {
    let dir = DataDir::new();
    let response =
        router(&dir).handle(&ApiRequest::get("/api/v1/secure/fr/maps/ras-map").with_key(TEST_KEY));
    assert_eq!(response.status, 404);
    insta::assert_json_snapshot!(body(&response), @r###"
    {
      "detail": "Map not found"
    }
    "###);
}

#[test]
fn snapshot_missing_data_file() {
    // Registered id whose file is absent: internal error, cause only logged
    let dir = DataDir::new();
    let response =
        router(&dir).handle(&ApiRequest::get("/api/v1/secure/graphs/top-10").with_key(TEST_KEY));
    assert_eq!(response.status, 500);
    insta::assert_json_snapshot!(body(&response), @r###"
    {
      "detail": "Internal Server Error"
    }
    "###);
}

#[test]
fn snapshot_method_not_allowed() {
    let dir = DataDir::new();
    let response = router(&dir).handle(&ApiRequest::new("POST", "/api/v1/secure/graphs/top-10"));
    assert_eq!(response.status, 405);
    assert_eq!(response.header("Allow"), Some("GET, OPTIONS"));
    insta::assert_json_snapshot!(body(&response), @r###"
    {
      "detail": "Method Not Allowed"
    }
    "###);
}

#[test]
fn snapshot_mortality_envelope() {
    let dir = DataDir::with_fixtures();
    let response = router(&dir)
        .handle(&ApiRequest::get("/api/v1/secure/graphs/mortality-rates").with_key(TEST_KEY));
    assert_eq!(response.status, 200);

    let mut envelope = body(&response);
    let figure: serde_json::Value =
        serde_json::from_str(envelope["graph"].as_str().unwrap()).unwrap();
    envelope["graph"] = serde_json::json!({
        "traces": figure["data"].as_array().map(Vec::len),
        "title": figure["layout"]["title"]["text"],
        "categories": figure["layout"]["xaxis"]["categoryarray"],
    });
    insta::assert_json_snapshot!(envelope, { ".path" => "[path]" }, @r###"
    {
      "graph": {
        "categories": [
          "Mowi",
          "Cermaq"
        ],
        "title": "Mortality rates",
        "traces": 1
      },
      "graph_name": "mortality-rates",
      "path": "[path]"
    }
    "###);
}
