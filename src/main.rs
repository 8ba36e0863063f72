use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use pinkbombs::batch::{self, BatchOptions, FileFilter};
use pinkbombs::config::Config;
use pinkbombs::constants::DEFAULT_OUTPUT_ROOT;
use pinkbombs::dispatch::{Dispatcher, FsSource};
use pinkbombs::registry::{Catalog, Locale};
use pinkbombs::server::{self, Router};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the chart API
    Serve {
        /// Listen address, overrides PINKBOMBS_BIND
        #[arg(long)]
        bind: Option<String>,
        /// Worker threads, overrides PINKBOMBS_WORKERS
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Write every artifact to an output tree
    Generate {
        #[arg(long, default_value = DEFAULT_OUTPUT_ROOT)]
        root_dir: PathBuf,
        /// Comma-separated graph data files, `*` for all
        #[arg(long, default_value = "*")]
        graph_data: String,
        /// Comma-separated map data files, `*` for all
        #[arg(long, default_value = "*")]
        map_data: String,
        #[arg(long, value_enum, default_value_t = LocaleArg::All)]
        locale: LocaleArg,
    },
    /// Print every registry entry
    List,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LocaleArg {
    En,
    Fr,
    All,
}

impl LocaleArg {
    fn locales(self) -> Vec<Locale> {
        match self {
            LocaleArg::En => vec![Locale::En],
            LocaleArg::Fr => vec![Locale::Fr],
            LocaleArg::All => Locale::ALL.to_vec(),
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    pinkbombs::init_tracing();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("invalid configuration")?;
    let catalog = Arc::new(Catalog::from_config(&config).context("invalid chart registry")?);

    match cli.command {
        Command::Serve { bind, workers } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(workers) = workers {
                anyhow::ensure!(workers > 0, "--workers must be at least 1");
                config.workers = workers;
            }
            info!(
                data_dir = %config.data_dir.display(),
                cors_origins = config.cors_origins.len(),
                "Starting server"
            );
            let router = Arc::new(Router::from_config(&config, catalog));
            let handle = server::start(&config.bind, config.workers, router)
                .with_context(|| format!("cannot listen on {}", config.bind))?;
            server::shutdown_on_signal(handle.shutdown_flag())
                .context("cannot install signal handlers")?;
            handle.wait();
            info!("Server stopped");
        }
        Command::Generate {
            root_dir,
            graph_data,
            map_data,
            locale,
        } => {
            let dispatcher = Dispatcher::new(
                catalog,
                Box::new(FsSource::new(&config.data_dir)),
                config.slow_ms,
            );
            let options = BatchOptions {
                root: root_dir,
                locales: locale.locales(),
                graphs: graph_data.parse::<FileFilter>()?,
                maps: map_data.parse::<FileFilter>()?,
            };
            let report = batch::generate(&dispatcher, &options).context("generation failed")?;
            println!("{} files written under {}", report.written.len(), options.root.display());
        }
        Command::List => {
            for registry in catalog.registries() {
                for entry in registry.entries() {
                    println!(
                        "{:<3} {:<7} {:<22} {:<20} {}",
                        registry.locale(),
                        registry.kind(),
                        entry.id,
                        entry.chart.name(),
                        entry.filename
                    );
                }
            }
        }
    }
    Ok(())
}
