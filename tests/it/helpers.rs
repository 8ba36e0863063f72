//! Test helpers: data directories, a small catalog and an HTTP client.
//!
//! - `DataDir` - temporary data directory with fixture writers
//! - `test_catalog()` - a catalog over the fixtures below
//! - `CountingSource` - file source that counts loads
//! - `http_get()` - one-shot HTTP/1.0 request over a `TcpStream`

use pinkbombs::charts::{
    BoxArgs, BuilderSpec, ColorBarArgs, NamedPalette, Palette, RasBubbleMapArgs,
};
use pinkbombs::data::{DataResult, Dataset};
use pinkbombs::dispatch::{DatasetSource, Dispatcher, FsSource};
use pinkbombs::registry::{Catalog, RegistryEntry};
use pinkbombs::server::{ApiKeyGate, Router};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

pub const TEST_KEY: &str = "test-key";

pub const TOP10_FILE: &str = "top_10.csv";
pub const TOP10_FR_FILE: &str = "top_10_fr.csv";
pub const MORTALITY_FILE: &str = "mortality.csv";
pub const RAS_FILE: &str = "ras.csv";

/// Ten producing countries, deliberately out of order
pub const TOP10_CSV: &str = "\
Tons,Country,Flag
39000,Faroe Islands,🇫🇴
1533000,Norway,🇳🇴
17000,Ireland,🇮🇪
203000,United Kingdom,🇬🇧
105000,Canada,🇨🇦
12000,Tasmania,🇦🇺
871000,Chile,🇨🇱
8000,Iceland,🇮🇸
22000,United States,🇺🇸
6000,Denmark,🇩🇰
";

/// Country labels of `TOP10_CSV` by descending tonnage
pub const TOP10_ORDER: [&str; 10] = [
    "Norway 🇳🇴",
    "Chile 🇨🇱",
    "United Kingdom 🇬🇧",
    "Canada 🇨🇦",
    "Faroe Islands 🇫🇴",
    "United States 🇺🇸",
    "Ireland 🇮🇪",
    "Tasmania 🇦🇺",
    "Iceland 🇮🇸",
    "Denmark 🇩🇰",
];

pub const MORTALITY_CSV: &str = "\
Company,Mortality_rate
Mowi,\"12,5\"
Mowi,\"14,1\"
Cermaq,\"16,0\"
Cermaq,\"11,2\"
";

pub const RAS_CSV: &str = "\
Lat,Long,elec_conso_kWh_low,elec_conso_kWh_high,carbon_kt_low,carbon_kt_high,Production Max,Carbon intensity of electricity - gCO2/kWh,Country,Status,Detailed status,Location source,Location,Link info (no text),Latest update,Parent company,Technologie,Species
47.5,-2.1,10000000,20000000,5,7,8000,56,France,Project,Stopped,https://example.org/loc,Plouisy,https://example.org/news,2023,Pure Salmon,RAS,Atlantic
64.1,-21.9,40000000,60000000,20,30,12000,28,Iceland,Operating,Operating,,Reykjanes,,,Samherji,Flow-through,Atlantic
,,1,2,1,2,1000,56,France,Project,,,,,,Ambition only,RAS,Atlantic
";

/// A temporary data directory.
pub struct DataDir {
    dir: TempDir,
}

impl DataDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Directory holding every fixture file
    pub fn with_fixtures() -> Self {
        let dir = Self::new();
        dir.write(TOP10_FILE, TOP10_CSV);
        dir.write(TOP10_FR_FILE, TOP10_CSV);
        dir.write(MORTALITY_FILE, MORTALITY_CSV);
        dir.write(RAS_FILE, RAS_CSV);
        dir
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }
}

pub fn top10_entry(filename: &str) -> RegistryEntry {
    RegistryEntry::new(
        "top-10",
        filename,
        BuilderSpec::ColorBar(ColorBarArgs {
            x: "Tons".into(),
            y1: "Country".into(),
            y2: "Flag".into(),
            share_column: "% of total".into(),
            title: "Top 10 countries producing salmon by tonnes (2021)".into(),
            x_title: None,
            y_title: None,
            palette: Palette::custom(&["#151c97", "#ff4530"]),
            block_zoom: true,
        }),
    )
}

pub fn mortality_entry() -> RegistryEntry {
    RegistryEntry::new(
        "mortality-rates",
        MORTALITY_FILE,
        BuilderSpec::Box(BoxArgs {
            x: "Company".into(),
            y: "Mortality_rate".into(),
            title: "Mortality rates".into(),
            x_title: None,
            y_title: "Mortality Rate (%)".into(),
            block_zoom: true,
            palette: Palette::Named(NamedPalette::Pastel1),
        }),
    )
}

pub fn ras_entry() -> RegistryEntry {
    RegistryEntry::new(
        "ras-map",
        RAS_FILE,
        BuilderSpec::RasBubbleMap(RasBubbleMapArgs {
            add_title_legend: true,
            ..RasBubbleMapArgs::default()
        }),
    )
}

/// English graphs and map plus a French `top-10`
pub fn test_catalog() -> Catalog {
    let catalog = Catalog::new(
        vec![top10_entry(TOP10_FILE), mortality_entry()],
        vec![ras_entry()],
        vec![top10_entry(TOP10_FR_FILE)],
        vec![],
    );
    catalog.validate().expect("test catalog is valid");
    catalog
}

/// File source that counts how often data is loaded.
#[derive(Clone)]
pub struct CountingSource {
    inner: FsSource,
    loads: Arc<AtomicUsize>,
}

impl CountingSource {
    pub fn new(root: &Path) -> (Self, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let source = Self {
            inner: FsSource::new(root),
            loads: loads.clone(),
        };
        (source, loads)
    }
}

impl DatasetSource for CountingSource {
    fn load(&self, entry: &RegistryEntry) -> DataResult<Dataset> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load(entry)
    }

    fn describe(&self, entry: &RegistryEntry) -> String {
        self.inner.describe(entry)
    }
}

pub fn dispatcher(dir: &DataDir) -> Dispatcher {
    Dispatcher::new(
        Arc::new(test_catalog()),
        Box::new(FsSource::new(dir.path())),
        500,
    )
}

pub fn router(dir: &DataDir) -> Router {
    Router::new(dispatcher(dir), ApiKeyGate::new(TEST_KEY), Vec::new())
}

/// Router over a counting source, with the load counter.
pub fn counting_router(dir: &DataDir) -> (Router, Arc<AtomicUsize>) {
    let (source, loads) = CountingSource::new(dir.path());
    let dispatcher = Dispatcher::new(Arc::new(test_catalog()), Box::new(source), 500);
    (
        Router::new(dispatcher, ApiKeyGate::new(TEST_KEY), Vec::new()),
        loads,
    )
}

/// Raw HTTP response: status, headers (lowercased names), body
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("JSON body")
    }
}

pub fn http_request(addr: SocketAddr, method: &str, path: &str, key: Option<&str>) -> RawResponse {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .expect("read timeout");

    let mut request = format!("{} {} HTTP/1.0\r\nHost: {}\r\nConnection: close\r\n", method, path, addr);
    if let Some(key) = key {
        request.push_str(&format!("X-API-Key: {}\r\n", key));
    }
    request.push_str("\r\n");
    stream.write_all(request.as_bytes()).expect("send request");

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).expect("read response");
    let raw = String::from_utf8(raw).expect("utf-8 response");

    let (head, body) = raw.split_once("\r\n\r\n").expect("header terminator");
    let mut lines = head.lines();
    let status = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
        .expect("status line");
    let headers = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(n, v)| (n.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    RawResponse {
        status,
        headers,
        body: body.to_string(),
    }
}

pub fn http_get(addr: SocketAddr, path: &str, key: Option<&str>) -> RawResponse {
    http_request(addr, "GET", path, key)
}
