//! Configuration-driven startup: which catalog gets served.

use pinkbombs::config::{Config, ENV_DATA_DIR, ENV_REGISTRY};
use pinkbombs::registry::{Catalog, Kind, Locale, RegistryError, builtin};
use std::path::PathBuf;

use crate::helpers::DataDir;

const REGISTRY_JSON: &str = r#"{
    "en": {
        "graphs": [{
            "id": "mortality-rates",
            "filename": "mortality.csv",
            "chart": {"builder": "box", "args": {"x": "Company", "y": "Mortality_rate", "title": "Mortality"}}
        }],
        "maps": [{
            "id": "ras-map",
            "filename": "ras.csv",
            "chart": {"builder": "ras_bubble_map", "args": {"add_title_legend": true}}
        }]
    }
}"#;

#[test]
fn test_builtin_catalog_without_registry_path() {
    let config = Config::from_lookup(|_| None).unwrap();
    let catalog = Catalog::from_config(&config).unwrap();
    assert_eq!(&catalog, builtin());
}

#[test]
fn test_registry_file_from_environment() {
    let dir = DataDir::new();
    let path = dir.write("registry.json", REGISTRY_JSON);
    let path_str = path.display().to_string();

    let config = Config::from_lookup(|key| match key {
        ENV_REGISTRY => Some(path_str.clone()),
        ENV_DATA_DIR => Some("/srv/pinkbombs".to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.data_dir, PathBuf::from("/srv/pinkbombs"));

    let catalog = Catalog::from_config(&config).unwrap();
    let graphs = catalog.registry(Locale::En, Kind::Graph);
    assert_eq!(graphs.len(), 1);
    assert!(graphs.lookup("top-10").is_err());
    assert!(catalog.registry(Locale::En, Kind::Map).lookup("ras-map").is_ok());
    assert!(catalog.registry(Locale::Fr, Kind::Graph).is_empty());
}

#[test]
fn test_missing_registry_file_fails_startup() {
    let config = Config {
        registry_path: Some(PathBuf::from("/nonexistent/registry.json")),
        ..Config::default()
    };
    assert!(matches!(
        Catalog::from_config(&config),
        Err(RegistryError::Unreadable { .. })
    ));
}

#[test]
fn test_map_builder_in_graph_list_fails_startup() {
    let dir = DataDir::new();
    let path = dir.write(
        "registry.json",
        r#"{"fr": {"graphs": [{
            "id": "ras-map",
            "filename": "ras_fr.csv",
            "chart": {"builder": "ras_bubble_map", "args": {"french": true}}
        }]}}"#,
    );
    let config = Config {
        registry_path: Some(path),
        ..Config::default()
    };
    assert!(matches!(
        Catalog::from_config(&config),
        Err(RegistryError::KindMismatch {
            locale: Locale::Fr,
            kind: Kind::Graph,
            ..
        })
    ));
}
