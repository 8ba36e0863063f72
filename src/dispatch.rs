//! Identifier → artifact dispatch.
//!
//! The dispatcher validates an identifier against the catalog, loads the
//! entry's dataset fresh through a [`DatasetSource`], runs the builder and
//! serializes the artifact. Nothing is cached between calls.

use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

use crate::charts::{Artifact, BuildError};
use crate::constants::{DETAIL_GRAPH_NOT_FOUND, DETAIL_INTERNAL, DETAIL_MAP_NOT_FOUND};
use crate::data::{DataError, DataResult, Dataset};
use crate::perf::ScopedTimer;
use crate::registry::{Catalog, Kind, Locale, RegistryEntry};

/// Where entry datasets come from.
pub trait DatasetSource: Send + Sync {
    fn load(&self, entry: &RegistryEntry) -> DataResult<Dataset>;

    /// Location reported back to clients in the `path` field.
    fn describe(&self, entry: &RegistryEntry) -> String;
}

/// Datasets read from files under a data directory
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, entry: &RegistryEntry) -> PathBuf {
        self.root.join(&entry.filename)
    }
}

impl DatasetSource for FsSource {
    fn load(&self, entry: &RegistryEntry) -> DataResult<Dataset> {
        let path = self.path_for(entry);
        let mut dataset = entry.parser.load(&path)?;
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            dataset.name = stem.to_string();
        }
        dataset.source = Some(path);
        Ok(dataset)
    }

    fn describe(&self, entry: &RegistryEntry) -> String {
        self.path_for(entry).display().to_string()
    }
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: Kind, id: String },

    #[error("cannot load data for {id}: {source}")]
    Load {
        id: String,
        #[source]
        source: DataError,
    },

    #[error("cannot build {id}: {source}")]
    Build {
        id: String,
        #[source]
        source: BuildError,
    },

    #[error("cannot serialize {id}: {source}")]
    Serialize {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DispatchError {
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::NotFound { .. } => 404,
            _ => 500,
        }
    }

    /// Client-facing detail; internal causes stay in the logs.
    pub fn detail(&self) -> &'static str {
        match self {
            DispatchError::NotFound {
                kind: Kind::Graph, ..
            } => DETAIL_GRAPH_NOT_FOUND,
            DispatchError::NotFound { kind: Kind::Map, .. } => DETAIL_MAP_NOT_FOUND,
            _ => DETAIL_INTERNAL,
        }
    }
}

/// A built and serialized artifact
#[derive(Debug, Clone)]
pub struct Rendered {
    pub kind: Kind,
    pub id: String,
    pub path: String,
    /// Figure JSON for graphs, HTML for maps
    pub payload: String,
}

impl Rendered {
    /// Response body: `{graph_name, graph, path}` or `{map_name, map, path}`.
    pub fn envelope(&self) -> Value {
        match self.kind {
            Kind::Graph => json!({
                "graph_name": self.id,
                "graph": self.payload,
                "path": self.path,
            }),
            Kind::Map => json!({
                "map_name": self.id,
                "map": self.payload,
                "path": self.path,
            }),
        }
    }
}

pub struct Dispatcher {
    catalog: Arc<Catalog>,
    source: Box<dyn DatasetSource>,
    slow_ms: f64,
}

impl Dispatcher {
    pub fn new(catalog: Arc<Catalog>, source: Box<dyn DatasetSource>, slow_ms: u64) -> Self {
        Self {
            catalog,
            source,
            slow_ms: slow_ms as f64,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn entry(&self, locale: Locale, kind: Kind, id: &str) -> Result<&RegistryEntry, DispatchError> {
        self.catalog
            .registry(locale, kind)
            .lookup(id)
            .map_err(|_| DispatchError::NotFound {
                kind,
                id: id.to_string(),
            })
    }

    /// Load and build without serializing.
    pub fn artifact(&self, entry: &RegistryEntry) -> Result<Artifact, DispatchError> {
        let dataset = {
            let _timer = ScopedTimer::new("load", self.slow_ms);
            self.source.load(entry).map_err(|source| DispatchError::Load {
                id: entry.id.clone(),
                source,
            })?
        };
        debug!(
            id = %entry.id,
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Dataset loaded"
        );

        let _timer = ScopedTimer::new("build", self.slow_ms);
        entry
            .chart
            .build(&dataset)
            .map_err(|source| DispatchError::Build {
                id: entry.id.clone(),
                source,
            })
    }

    pub fn render(&self, locale: Locale, kind: Kind, id: &str) -> Result<Rendered, DispatchError> {
        let entry = self.entry(locale, kind, id)?;
        let result = self.artifact(entry).and_then(|artifact| {
            artifact
                .to_payload()
                .map_err(|source| DispatchError::Serialize {
                    id: entry.id.clone(),
                    source,
                })
        });
        match result {
            Ok(payload) => Ok(Rendered {
                kind,
                id: entry.id.clone(),
                path: self.source.describe(entry),
                payload,
            }),
            Err(e) => {
                error!(%locale, %kind, id, builder = entry.chart.name(), "Render failed: {}", e);
                Err(e)
            }
        }
    }
}
