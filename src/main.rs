use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use trawl_core::{config::Config, Catalog, OfflineLookup, SearchSession, SelectionSet};
use trawl_remote::HttpLookup;

#[derive(Parser)]
#[command(name = "trawl", about = "Token-aware multi-select search over flags, RFMOs and vessels")]
struct Cli {
    /// Write debug logs to /tmp/trawl-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,

    /// JSON array of {"id", "label", "type"} items. Defaults to the built-in
    /// flags and RFMOs.
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Base URL of the vessel search API (overrides `remote.base_url`).
    #[arg(long, value_name = "URL")]
    remote_url: Option<String>,

    /// Vessel dataset to search (overrides `remote.dataset`).
    #[arg(long, value_name = "NAME")]
    dataset: Option<String>,

    /// Never query the vessel API.
    #[arg(long)]
    offline: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/trawl-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("trawl debug log started, tail -f /tmp/trawl-debug.log");
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "config unreadable, using defaults");
        Config::defaults()
    });
    if let Some(url) = cli.remote_url {
        config.remote.base_url = url;
    }
    if let Some(dataset) = cli.dataset {
        config.remote.dataset = dataset;
    }

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => Catalog::builtin(),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;
    let _guard = runtime.enter();

    let mut settings = config.settings();
    for field_type in catalog.field_types() {
        if !settings.field_types.is_known(&field_type) {
            tracing::warn!(%field_type, "catalog type is not a configured field type");
        }
    }
    let selection: SelectionSet = if cli.offline {
        settings.remote_enabled = false;
        let session = SearchSession::new(catalog, settings, Arc::new(OfflineLookup));
        trawl_tui::run(session, config)?
    } else {
        let lookup =
            HttpLookup::from_config(&config.remote).context("invalid [remote] configuration")?;
        let session = SearchSession::new(catalog, settings, Arc::new(lookup));
        trawl_tui::run(session, config)?
    };

    // One line per selection, tab-separated, for shell pipelines.
    for item in &selection {
        println!("{}\t{}\t{}", item.field_type, item.id, item.label);
    }
    Ok(())
}
