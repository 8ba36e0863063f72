//! Service-wide constants.
//!
//! Centralizes defaults and limits so configuration, the HTTP layer and the
//! batch generator agree on them.

// ============================================================================
// Data Loading
// ============================================================================

/// Maximum size of a data file read for one request
pub const MAX_DATA_FILE_SIZE_MB: usize = 100;

/// Rows sampled by polars when inferring CSV column types
pub const CSV_INFER_SCHEMA_ROWS: usize = 1000;

/// Wrapper keys accepted around a JSON array of records
pub const JSON_WRAPPER_KEYS: [&str; 5] = ["data", "rows", "items", "records", "results"];

// ============================================================================
// Configuration Defaults
// ============================================================================

/// Shared secret used when `PINKBOMBS_API_KEY` is unset
pub const DEFAULT_API_KEY: &str = "pinkbombs";

/// Listen address used when `PINKBOMBS_BIND` is unset
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

/// Directory holding the registry data files
pub const DEFAULT_DATA_DIR: &str = "data";

/// Worker threads pulling requests off the listener
pub const DEFAULT_WORKERS: usize = 4;

/// Loads or builds slower than this are logged as warnings
pub const DEFAULT_SLOW_MS: u64 = 500;

/// Output root for the batch generator
pub const DEFAULT_OUTPUT_ROOT: &str = "./";

// ============================================================================
// HTTP
// ============================================================================

/// Prefix of every authenticated route
pub const SECURE_PREFIX: &str = "/api/v1/secure";

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Poll interval of the worker loop while waiting for requests
pub const RECV_TIMEOUT_MS: u64 = 100;

/// `strftime` layout of the health timestamp
pub const HEALTH_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S:%6f";

pub const DETAIL_GRAPH_NOT_FOUND: &str = "Graph not found";
pub const DETAIL_MAP_NOT_FOUND: &str = "Map not found";
pub const DETAIL_UNAUTHORIZED: &str = "Missing or invalid API key";
pub const DETAIL_INTERNAL: &str = "Internal Server Error";
pub const DETAIL_NOT_FOUND: &str = "Not Found";
pub const DETAIL_METHOD_NOT_ALLOWED: &str = "Method Not Allowed";

// ============================================================================
// Chart Styling
// ============================================================================

/// Brand dark blue used for single-color series
pub const BRAND_BLUE: &str = "#151c97";

/// Brand red used for secondary series
pub const BRAND_RED: &str = "#ff4530";

/// Fill color of the grouped area chart
pub const GROUPED_AREA_COLOR: &str = "#fd442f";

/// Headroom added past the longest bar of a ranked bar chart
pub const BAR_RANGE_HEADROOM: f64 = 1.15;

/// Hover text wrap width of the alternatives matrix
pub const DEFAULT_HOVER_WRAP: usize = 60;
