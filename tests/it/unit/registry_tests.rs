//! Unit tests for the built-in catalog.

use pinkbombs::charts::{ArtifactKind, BuilderSpec};
use pinkbombs::registry::{Kind, Locale, RegistryEntry, RegistryError, builtin};

const GRAPH_IDS: [&str; 9] = [
    "salmon-collapse",
    "hyper-growth",
    "hyper-growth-grouped",
    "top-10",
    "evolution-map",
    "top-comp",
    "top-land",
    "mortality-rates",
    "alternatives",
];

#[test]
fn test_builtin_ids() {
    for locale in Locale::ALL {
        let graphs = builtin().registry(locale, Kind::Graph);
        let ids: Vec<&str> = graphs.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, GRAPH_IDS);

        let maps = builtin().registry(locale, Kind::Map);
        assert_eq!(maps.len(), 1);
        assert_eq!(
            maps.lookup("ras-map").unwrap().chart.artifact_kind(),
            ArtifactKind::Html
        );
    }
}

#[test]
fn test_unknown_id() {
    let err = builtin()
        .registry(Locale::En, Kind::Map)
        .lookup("top-10")
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { kind: Kind::Map, .. }));
    assert_eq!(err.to_string(), "maps entry not found: top-10");
}

#[test]
fn test_inverse_mapping() {
    let graphs = builtin().registry(Locale::Fr, Kind::Graph);
    let entry = graphs
        .lookup_by_filename("mortality_rates_4.4_fr.csv")
        .unwrap();
    assert_eq!(entry.id, "mortality-rates");
    assert!(graphs.lookup_by_filename("mortality_rates_4.4.csv").is_none());
}

#[test]
fn test_french_entries_use_french_columns() {
    let entry = builtin()
        .registry(Locale::Fr, Kind::Graph)
        .lookup("top-10")
        .unwrap();
    let BuilderSpec::ColorBar(args) = &entry.chart else {
        panic!("top-10 should be a color bar, got {}", entry.chart.name());
    };
    assert_eq!(args.y1, "Pays");
    assert_eq!(args.y2, "Drapeau");

    let map = builtin().registry(Locale::Fr, Kind::Map).lookup("ras-map").unwrap();
    let BuilderSpec::RasBubbleMap(args) = &map.chart else {
        panic!("ras-map should be the RAS map");
    };
    assert!(args.french);
}

#[test]
fn test_builtin_entries_survive_json() {
    // A JSON registry written from the built-in entries loads back unchanged
    for registry in builtin().registries() {
        for entry in registry.entries() {
            let json = serde_json::to_string(entry).unwrap();
            let back: RegistryEntry = serde_json::from_str(&json).unwrap();
            assert_eq!(&back, entry, "{}", entry.id);
        }
    }
}
