//! Offline artifact generation.
//!
//! Writes every selected registry entry to
//! `<root>/<locale>/graphs/<id>.json` or `<root>/<locale>/maps/<id>.html`,
//! going through the same dispatcher the HTTP API uses.

use serde_json::json;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

use crate::charts::Artifact;
use crate::dispatch::{DispatchError, Dispatcher};
use crate::perf::{StatsBook, measure};
use crate::registry::{Kind, Locale, Registry, RegistryEntry};

/// Data files to generate, `*` for all of them
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FileFilter {
    #[default]
    All,
    Files(Vec<String>),
}

impl FromStr for FileFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "*" {
            return Ok(FileFilter::All);
        }
        Ok(FileFilter::Files(
            s.split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub root: PathBuf,
    pub locales: Vec<Locale>,
    pub graphs: FileFilter,
    pub maps: FileFilter,
}

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("no {kind} registry knows data file {filename:?}")]
    UnknownFile { kind: Kind, filename: String },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a run produced
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub stats: StatsBook,
}

/// Output path of one entry under `root`.
pub fn output_path(root: &Path, locale: Locale, kind: Kind, id: &str) -> PathBuf {
    let extension = match kind {
        Kind::Graph => "json",
        Kind::Map => "html",
    };
    root.join(locale.as_str())
        .join(kind.as_str())
        .join(format!("{}.{}", id, extension))
}

fn select<'a>(registry: &'a Registry, filter: &FileFilter) -> Vec<&'a RegistryEntry> {
    match filter {
        FileFilter::All => registry.entries().iter().collect(),
        FileFilter::Files(files) => files
            .iter()
            .filter_map(|f| registry.lookup_by_filename(f))
            .collect(),
    }
}

/// Every filename of the filter must be known to at least one selected
/// locale, so typos fail before anything is written.
fn check_filter(
    dispatcher: &Dispatcher,
    locales: &[Locale],
    kind: Kind,
    filter: &FileFilter,
) -> Result<(), BatchError> {
    let FileFilter::Files(files) = filter else {
        return Ok(());
    };
    let known: BTreeSet<&str> = locales
        .iter()
        .flat_map(|&locale| dispatcher.catalog().registry(locale, kind).entries())
        .map(|e| e.filename.as_str())
        .collect();
    match files.iter().find(|f| !known.contains(f.as_str())) {
        Some(filename) => Err(BatchError::UnknownFile {
            kind,
            filename: filename.clone(),
        }),
        None => Ok(()),
    }
}

fn write(path: &Path, contents: &str) -> Result<(), BatchError> {
    let io = |source| BatchError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io)?;
    }
    std::fs::write(path, contents).map_err(io)
}

pub fn generate(dispatcher: &Dispatcher, options: &BatchOptions) -> Result<BatchReport, BatchError> {
    check_filter(dispatcher, &options.locales, Kind::Graph, &options.graphs)?;
    check_filter(dispatcher, &options.locales, Kind::Map, &options.maps)?;

    let mut report = BatchReport::default();
    for &locale in &options.locales {
        for kind in Kind::ALL {
            let filter = match kind {
                Kind::Graph => &options.graphs,
                Kind::Map => &options.maps,
            };
            let registry = dispatcher.catalog().registry(locale, kind);
            for entry in select(registry, filter) {
                let (artifact, elapsed_ms) = measure(|| dispatcher.artifact(entry));
                report.stats.record(kind.as_str(), elapsed_ms);

                let mut artifact = artifact?;
                if let Some(figure) = artifact.as_figure_mut() {
                    figure.update_layout(json!({"hoverlabel": {"bgcolor": "white"}}));
                }
                let payload = match &artifact {
                    Artifact::Chart(figure) => {
                        figure.to_json().map_err(|source| DispatchError::Serialize {
                            id: entry.id.clone(),
                            source,
                        })?
                    }
                    Artifact::Html(html) => html.clone(),
                };

                let path = output_path(&options.root, locale, kind, &entry.id);
                write(&path, &payload)?;
                info!(
                    %locale,
                    %kind,
                    id = %entry.id,
                    path = %path.display(),
                    elapsed_ms = format!("{:.2}", elapsed_ms),
                    "Generated"
                );
                report.written.push(path);
            }
        }
    }

    info!(files = report.written.len(), "Batch complete");
    report.stats.log_summary();
    Ok(report)
}
