//! Yieldcurve CLI — government bond YTM curves from the Bucharest Stock Exchange.
//!
//! One invocation:
//! 1. optionally re-downloads the bond catalog (`--download-index`)
//! 2. resolves a yield per government bond, from the cache or, with
//!    `--update`, from the exchange detail pages
//! 3. saves the cache, prints a per-currency table, optionally exports CSV
//! 4. shows the RON and EUR curves in the terminal (unless `--no-chart`)

mod report;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use yieldcurve_core::data::{download_catalog, run, BvbProvider};
use yieldcurve_core::{prepare_lossy, AcquireMode, AppConfig, DataError, RunOptions};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "yieldcurve.toml";

#[derive(Parser)]
#[command(
    name = "yieldcurve",
    about = "Yield-to-maturity curves for Romanian government bonds"
)]
struct Cli {
    /// Refresh every yield from the exchange instead of trusting the cache.
    #[arg(long, default_value_t = false)]
    update: bool,

    /// Re-download the bond catalog before the run.
    #[arg(long, default_value_t = false)]
    download_index: bool,

    /// TOML config file. Defaults to ./yieldcurve.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog file (overrides the config).
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Yield cache file (overrides the config).
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Write the prepared series to this CSV file.
    #[arg(long)]
    export: Option<PathBuf>,

    /// Skip the terminal chart.
    #[arg(long, default_value_t = false)]
    no_chart: bool,

    /// Debug-level logging (RUST_LOG takes precedence).
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(catalog) = cli.catalog {
        config.paths.catalog = catalog;
    }
    if let Some(cache) = cli.cache {
        config.paths.cache = cache;
    }

    if cli.download_index {
        match download_catalog(&config.source, &config.paths.catalog) {
            Ok(bytes) => println!(
                "Bond list saved as {} ({bytes} bytes)",
                config.paths.catalog.display()
            ),
            Err(e) => tracing::error!(error = %e, "failed to download bond list"),
        }
    }

    let provider = BvbProvider::new(config.source.clone())?;
    let pacer = config.pacing.pacer();
    let opts = RunOptions::from_config(&config, AcquireMode::from_refresh(cli.update));

    let acquisition = match run(&opts, &provider, &pacer) {
        Ok(a) => a,
        Err(e @ DataError::CatalogUnavailable { .. }) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("acquisition failed"),
    };

    let ron = prepare_lossy(&acquisition.ron);
    let eur = prepare_lossy(&acquisition.eur);

    report::print_summary(&acquisition.summary, &ron, &eur);

    if let Some(path) = cli.export {
        report::export_csv(&path, &[&ron, &eur])
            .with_context(|| format!("failed to export {}", path.display()))?;
        println!("Series exported to: {}", path.display());
    }

    if !cli.no_chart {
        yieldcurve_tui::show_curves(&ron, &eur)?;
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.exists() {
                return Ok(AppConfig::default());
            }
            fallback
        }
    };
    tracing::debug!(path = %path.display(), "loading config");
    Ok(AppConfig::from_file(&path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_are_cache_only_with_chart() {
        let cli = Cli::try_parse_from(["yieldcurve"]).unwrap();
        assert!(!cli.update);
        assert!(!cli.download_index);
        assert!(!cli.no_chart);
        assert!(cli.cache.is_none());
    }

    #[test]
    fn flags_and_overrides_parse() {
        let cli = Cli::try_parse_from([
            "yieldcurve",
            "--update",
            "--download-index",
            "--no-chart",
            "--cache",
            "c.json",
            "--export",
            "out.csv",
        ])
        .unwrap();
        assert!(cli.update);
        assert!(cli.download_index);
        assert!(cli.no_chart);
        assert_eq!(cli.cache, Some(PathBuf::from("c.json")));
        assert_eq!(cli.export, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(dir.path().join("nope.toml").as_path())).is_err());
    }
}
