//! Batch generation into a temporary output tree.

use pinkbombs::batch::{self, BatchError, BatchOptions, FileFilter};
use pinkbombs::registry::{Kind, Locale};
use std::path::Path;
use tempfile::TempDir;

use crate::helpers::{DataDir, MORTALITY_FILE, RAS_FILE, TOP10_FR_FILE, dispatcher};

fn options(root: &Path, locales: Vec<Locale>, graphs: &str, maps: &str) -> BatchOptions {
    BatchOptions {
        root: root.to_path_buf(),
        locales,
        graphs: graphs.parse().unwrap(),
        maps: maps.parse().unwrap(),
    }
}

#[test]
fn test_generate_everything() {
    let data = DataDir::with_fixtures();
    let out = TempDir::new().unwrap();

    let report = batch::generate(
        &dispatcher(&data),
        &options(out.path(), Locale::ALL.to_vec(), "*", "*"),
    )
    .unwrap();

    assert_eq!(report.written.len(), 4);
    for relative in [
        "en/graphs/top-10.json",
        "en/graphs/mortality-rates.json",
        "en/maps/ras-map.html",
        "fr/graphs/top-10.json",
    ] {
        assert!(out.path().join(relative).is_file(), "{}", relative);
    }
    assert_eq!(report.stats.get(Kind::Graph.as_str()).unwrap().count(), 3);
    assert_eq!(report.stats.get(Kind::Map.as_str()).unwrap().count(), 1);
}

#[test]
fn test_graphs_get_white_hover_labels() {
    let data = DataDir::with_fixtures();
    let out = TempDir::new().unwrap();
    batch::generate(
        &dispatcher(&data),
        &options(out.path(), vec![Locale::En], "*", ""),
    )
    .unwrap();

    let json = std::fs::read_to_string(out.path().join("en/graphs/top-10.json")).unwrap();
    let figure: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(figure["layout"]["hoverlabel"]["bgcolor"], "white");
    assert!(!out.path().join("en/maps").exists());
}

#[test]
fn test_filters_resolve_filenames_per_locale() {
    let data = DataDir::with_fixtures();
    let out = TempDir::new().unwrap();
    let report = batch::generate(
        &dispatcher(&data),
        &options(
            out.path(),
            Locale::ALL.to_vec(),
            &format!("{},{}", MORTALITY_FILE, TOP10_FR_FILE),
            RAS_FILE,
        ),
    )
    .unwrap();

    let mut written: Vec<String> = report
        .written
        .iter()
        .map(|p| p.strip_prefix(out.path()).unwrap().display().to_string())
        .collect();
    written.sort();
    assert_eq!(
        written,
        vec![
            "en/graphs/mortality-rates.json",
            "en/maps/ras-map.html",
            "fr/graphs/top-10.json",
        ]
    );
}

#[test]
fn test_unknown_filename_is_an_error() {
    let data = DataDir::with_fixtures();
    let out = TempDir::new().unwrap();
    let err = batch::generate(
        &dispatcher(&data),
        &options(out.path(), vec![Locale::En], "missing.csv", "*"),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        BatchError::UnknownFile { kind: Kind::Graph, ref filename } if filename == "missing.csv"
    ));
    // Nothing is written when a filter is wrong
    assert!(std::fs::read_dir(out.path()).unwrap().next().is_none());
}

#[test]
fn test_map_filter_uses_map_registry() {
    let data = DataDir::with_fixtures();
    let out = TempDir::new().unwrap();
    let err = batch::generate(
        &dispatcher(&data),
        &options(out.path(), vec![Locale::En], "", MORTALITY_FILE),
    )
    .unwrap_err();
    assert!(matches!(err, BatchError::UnknownFile { kind: Kind::Map, .. }));
}

#[test]
fn test_missing_data_stops_the_run() {
    let data = DataDir::new();
    let out = TempDir::new().unwrap();
    let err = batch::generate(
        &dispatcher(&data),
        &options(out.path(), vec![Locale::En], "*", "*"),
    )
    .unwrap_err();
    assert!(matches!(err, BatchError::Dispatch(_)));
    assert_eq!(FileFilter::default(), FileFilter::All);
}
