//! Chart registries
//!
//! A [`Registry`] maps a public identifier such as `top-10` to the data file
//! backing it, the parser that reads the file and the builder (with its
//! arguments) that turns the data into an artifact. The [`Catalog`] holds one
//! registry per locale and content kind.
//!
//! Registries are read-only once built. [`Catalog::validate`] is the single
//! place where entries are checked, both for the built-in catalog and for
//! catalogs read from a JSON file:
//!
//! ```json
//! {
//!   "en": {"graphs": [{"id": "top-10", "filename": "top.csv",
//!                      "chart": {"builder": "bar", "args": {...}}}],
//!          "maps": []},
//!   "fr": {"graphs": [], "maps": []}
//! }
//! ```

mod defaults;

pub use defaults::builtin;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::charts::{ArtifactKind, BuildError, BuilderSpec};
use crate::config::Config;
use crate::data::{DataResult, Dataset, Delimiter, load_delimited, parse_json_file};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    En,
    Fr,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Fr];

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "fr" => Ok(Locale::Fr),
            other => Err(format!("unknown locale: {}", other)),
        }
    }
}

/// Content category served under `/graphs` or `/maps`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Graph,
    Map,
}

impl Kind {
    pub const ALL: [Kind; 2] = [Kind::Graph, Kind::Map];

    /// Path segment and output directory name
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Graph => "graphs",
            Kind::Map => "maps",
        }
    }

    /// Artifact every builder in this registry must produce
    pub fn artifact_kind(self) -> ArtifactKind {
        match self {
            Kind::Graph => ArtifactKind::Chart,
            Kind::Map => ArtifactKind::Html,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// How a data file is read
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parser {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl Parser {
    pub fn load(self, path: &Path) -> DataResult<Dataset> {
        match self {
            Parser::Csv => load_delimited(path, Delimiter::Comma),
            Parser::Tsv => load_delimited(path, Delimiter::Tab),
            Parser::Json => parse_json_file(path),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryEntry {
    pub id: String,
    /// Data file, relative to the data directory
    pub filename: String,
    #[serde(default)]
    pub parser: Parser,
    pub chart: BuilderSpec,
}

impl RegistryEntry {
    pub fn new(id: &str, filename: &str, chart: BuilderSpec) -> Self {
        Self {
            id: id.to_string(),
            filename: filename.to_string(),
            parser: Parser::Csv,
            chart,
        }
    }
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("duplicate id {id:?} in {locale}/{kind}")]
    DuplicateId { locale: Locale, kind: Kind, id: String },

    #[error("entry {id:?} in {locale}/{kind} has an empty filename")]
    EmptyFilename { locale: Locale, kind: Kind, id: String },

    #[error("entry {id:?} uses builder {builder}, which cannot serve {locale}/{kind}")]
    KindMismatch {
        locale: Locale,
        kind: Kind,
        id: String,
        builder: &'static str,
    },

    #[error("entry {id:?} in {locale}/{kind}: {source}")]
    InvalidArguments {
        locale: Locale,
        kind: Kind,
        id: String,
        #[source]
        source: BuildError,
    },

    #[error("cannot read registry file {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("{kind} entry not found: {id}")]
    NotFound { kind: Kind, id: String },
}

/// Entries of one locale and kind, in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct Registry {
    locale: Locale,
    kind: Kind,
    entries: Vec<RegistryEntry>,
}

impl Registry {
    pub fn new(locale: Locale, kind: Kind, entries: Vec<RegistryEntry>) -> Self {
        Self {
            locale,
            kind,
            entries,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, id: &str) -> Result<&RegistryEntry, RegistryError> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| RegistryError::NotFound {
                kind: self.kind,
                id: id.to_string(),
            })
    }

    /// Inverse mapping used by the batch generator's file filters.
    pub fn lookup_by_filename(&self, filename: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.filename == filename)
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        let (locale, kind) = (self.locale, self.kind);
        let mut seen = HashSet::new();
        for entry in &self.entries {
            let id = || entry.id.clone();
            if !seen.insert(entry.id.as_str()) {
                return Err(RegistryError::DuplicateId { locale, kind, id: id() });
            }
            if entry.filename.trim().is_empty() {
                return Err(RegistryError::EmptyFilename { locale, kind, id: id() });
            }
            if entry.chart.artifact_kind() != kind.artifact_kind() {
                return Err(RegistryError::KindMismatch {
                    locale,
                    kind,
                    id: id(),
                    builder: entry.chart.name(),
                });
            }
            entry
                .chart
                .validate()
                .map_err(|source| RegistryError::InvalidArguments {
                    locale,
                    kind,
                    id: id(),
                    source,
                })?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LocaleFile {
    #[serde(default)]
    graphs: Vec<RegistryEntry>,
    #[serde(default)]
    maps: Vec<RegistryEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    en: LocaleFile,
    #[serde(default)]
    fr: LocaleFile,
}

/// Every registry the service knows about
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    en_graphs: Registry,
    en_maps: Registry,
    fr_graphs: Registry,
    fr_maps: Registry,
}

impl Catalog {
    /// Assemble a catalog from per-locale entry lists. Call [`validate`]
    /// before serving from it.
    ///
    /// [`validate`]: Catalog::validate
    pub fn new(
        en_graphs: Vec<RegistryEntry>,
        en_maps: Vec<RegistryEntry>,
        fr_graphs: Vec<RegistryEntry>,
        fr_maps: Vec<RegistryEntry>,
    ) -> Self {
        Self {
            en_graphs: Registry::new(Locale::En, Kind::Graph, en_graphs),
            en_maps: Registry::new(Locale::En, Kind::Map, en_maps),
            fr_graphs: Registry::new(Locale::Fr, Kind::Graph, fr_graphs),
            fr_maps: Registry::new(Locale::Fr, Kind::Map, fr_maps),
        }
    }

    pub fn registry(&self, locale: Locale, kind: Kind) -> &Registry {
        match (locale, kind) {
            (Locale::En, Kind::Graph) => &self.en_graphs,
            (Locale::En, Kind::Map) => &self.en_maps,
            (Locale::Fr, Kind::Graph) => &self.fr_graphs,
            (Locale::Fr, Kind::Map) => &self.fr_maps,
        }
    }

    pub fn registries(&self) -> impl Iterator<Item = &Registry> {
        [&self.en_graphs, &self.en_maps, &self.fr_graphs, &self.fr_maps].into_iter()
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        self.registries().try_for_each(Registry::validate)
    }

    pub fn from_json_str(json: &str, origin: &Path) -> Result<Self, RegistryError> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|e| RegistryError::Unreadable {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            })?;
        let catalog = Self::new(file.en.graphs, file.en.maps, file.fr.graphs, file.fr.maps);
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path).map_err(|e| RegistryError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&json, path)
    }

    /// The catalog named by the configuration, or the built-in one.
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        let catalog = match &config.registry_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading registry file");
                Self::from_json_file(path)?
            }
            None => builtin().clone(),
        };
        catalog.validate()?;
        Ok(catalog)
    }
}
