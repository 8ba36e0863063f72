//! Request routing, independent of the HTTP library.
//!
//! The listener converts each `tiny_http` request into an [`ApiRequest`]
//! and writes back the [`ApiResponse`] the [`Router`] returns, so routing,
//! the gate and CORS can be exercised without a socket.

use serde_json::{Value, json};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, warn};

use super::auth::ApiKeyGate;
use crate::config::Config;
use crate::constants::{
    DETAIL_METHOD_NOT_ALLOWED, DETAIL_NOT_FOUND, DETAIL_UNAUTHORIZED, HEALTH_TIME_FORMAT,
    SECURE_PREFIX,
};
use crate::dispatch::{Dispatcher, FsSource};
use crate::registry::{Catalog, Kind, Locale};

pub const CONTENT_JSON: &str = "application/json";
pub const CONTENT_TEXT: &str = "text/plain; charset=utf-8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: String,
    /// Path with optional query string
    pub url: String,
    pub api_key: Option<String>,
    pub origin: Option<String>,
}

impl ApiRequest {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            url: url.to_string(),
            api_key: None,
            origin: None,
        }
    }

    pub fn get(url: &str) -> Self {
        Self::new("GET", url)
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.to_string());
        self
    }

    fn path(&self) -> &str {
        self.url.split(['?', '#']).next().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl ApiResponse {
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            content_type: CONTENT_JSON,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    /// `{"detail": ...}` error body
    pub fn detail(status: u16, detail: &str) -> Self {
        Self::json(status, &json!({ "detail": detail }))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Route {
    Health,
    Secure(SecureRoute),
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SecureRoute {
    Health,
    Artifact { locale: Locale, kind: Kind, id: String },
    Unknown,
}

fn decode_id(raw: &str) -> Option<String> {
    urlencoding::decode(raw).ok().map(Cow::into_owned)
}

fn parse_route(path: &str) -> Route {
    if path == "/" || path.is_empty() {
        return Route::Health;
    }
    let Some(rest) = path.strip_prefix(SECURE_PREFIX) else {
        return Route::Unknown;
    };
    if !rest.is_empty() && !rest.starts_with('/') {
        return Route::Unknown;
    }

    let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    let (locale, tail) = match segments.split_first() {
        Some((&"fr", tail)) => (Locale::Fr, tail),
        _ => (Locale::En, segments.as_slice()),
    };
    let route = match (locale, tail) {
        (Locale::En, []) => SecureRoute::Health,
        (_, [kind, id]) => {
            let kind = match *kind {
                "graphs" => Some(Kind::Graph),
                "maps" => Some(Kind::Map),
                _ => None,
            };
            match (kind, decode_id(id)) {
                (Some(kind), Some(id)) => SecureRoute::Artifact { locale, kind, id },
                _ => SecureRoute::Unknown,
            }
        }
        _ => SecureRoute::Unknown,
    };
    Route::Secure(route)
}

fn health() -> ApiResponse {
    let time = chrono::Local::now().format(HEALTH_TIME_FORMAT).to_string();
    ApiResponse::json(200, &json!({ "status": "ok", "time": time }))
}

pub struct Router {
    dispatcher: Dispatcher,
    gate: ApiKeyGate,
    cors_origins: Vec<String>,
}

impl Router {
    pub fn new(dispatcher: Dispatcher, gate: ApiKeyGate, cors_origins: Vec<String>) -> Self {
        Self {
            dispatcher,
            gate,
            cors_origins,
        }
    }

    /// Router serving files from the configured data directory.
    pub fn from_config(config: &Config, catalog: Arc<Catalog>) -> Self {
        let dispatcher = Dispatcher::new(
            catalog,
            Box::new(FsSource::new(&config.data_dir)),
            config.slow_ms,
        );
        Self::new(
            dispatcher,
            ApiKeyGate::new(&config.api_key),
            config.cors_origins.clone(),
        )
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let mut response = self.route(request);
        self.apply_cors(request, &mut response);
        response
    }

    fn route(&self, request: &ApiRequest) -> ApiResponse {
        match request.method.as_str() {
            "GET" => {}
            "OPTIONS" => {
                return ApiResponse {
                    status: 200,
                    content_type: CONTENT_TEXT,
                    headers: Vec::new(),
                    body: String::new(),
                };
            }
            other => {
                debug!(method = other, "Method not allowed");
                let mut response = ApiResponse::detail(405, DETAIL_METHOD_NOT_ALLOWED);
                response.headers.push(("Allow", "GET, OPTIONS".to_string()));
                return response;
            }
        }

        let secure = match parse_route(request.path()) {
            Route::Health => return health(),
            Route::Unknown => return ApiResponse::detail(404, DETAIL_NOT_FOUND),
            Route::Secure(route) => route,
        };

        if !self.gate.allows(request.api_key.as_deref()) {
            warn!(
                path = request.path(),
                key_present = request.api_key.is_some(),
                "Rejected API key"
            );
            return ApiResponse::detail(401, DETAIL_UNAUTHORIZED);
        }

        match secure {
            SecureRoute::Health => health(),
            SecureRoute::Unknown => ApiResponse::detail(404, DETAIL_NOT_FOUND),
            SecureRoute::Artifact { locale, kind, id } => {
                match self.dispatcher.render(locale, kind, &id) {
                    Ok(rendered) => ApiResponse::json(200, &rendered.envelope()),
                    Err(e) => ApiResponse::detail(e.status_code(), e.detail()),
                }
            }
        }
    }

    fn origin_allowed(&self, origin: &str) -> bool {
        let origin = origin.trim_end_matches('/');
        self.cors_origins.iter().any(|o| o == "*" || o == origin)
    }

    fn apply_cors(&self, request: &ApiRequest, response: &mut ApiResponse) {
        let Some(origin) = request.origin.as_deref() else {
            return;
        };
        if !self.origin_allowed(origin) {
            return;
        }
        response.headers.extend([
            ("Access-Control-Allow-Origin", origin.to_string()),
            ("Access-Control-Allow-Credentials", "true".to_string()),
            ("Access-Control-Allow-Methods", "GET, OPTIONS".to_string()),
            ("Access-Control-Allow-Headers", "X-API-Key, Content-Type".to_string()),
            ("Vary", "Origin".to_string()),
        ]);
    }
}
