//! # rxdist
//!
//! Command line front end for scheme evaluation and inventory valuation.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          rxdist CLI                                     │
//! │                                                                         │
//! │  args ──► RxdistConfig::load ──► init_tracing ──► Snapshot::load       │
//! │                                                        │                │
//! │                                                        ▼                │
//! │          stdout ◄── serde_json ◄── commands::* ◄── rxdist-core         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Examples
//! ```bash
//! rxdist evaluate --company C-SUN --product P-PAN40 --qty 60 --amount 5880
//! rxdist order --company C-SUN --line P-AMOX500:10:720 --line P-PAN40:20:1960
//! rxdist valuate --product P-DOLO650 --plan-qty 150
//! rxdist report --today 2026-07-01
//! rxdist price --product P-AZEE500 --tier B --cost 119
//! ```

mod args;
mod commands;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use rxdist_core::scheme::SchemeContext;
use rxdist_store::config::LoggingSettings;
use rxdist_store::{RxdistConfig, Snapshot};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config loading logs before the configured filter is known.
    let config = tracing::subscriber::with_default(
        bootstrap_subscriber(cli.verbose, std::io::stderr),
        || load_config(&cli),
    )?;

    init_tracing(&config.logging, cli.verbose);
    info!(snapshot = %config.snapshot_path().display(), "Configuration loaded");

    let (snapshot, load) = Snapshot::load(config.snapshot_path())
        .with_context(|| format!("failed to load {}", config.snapshot_path().display()))?;
    for skipped in &load.skipped_schemes {
        warn!(index = skipped.index, id = ?skipped.id, "Scheme skipped: {}", skipped.reason);
    }

    let valuer = config.valuer();

    match cli.command {
        Commands::Evaluate {
            company,
            product,
            qty,
            amount,
            date,
            order_products,
        } => {
            let mut context = SchemeContext::new(product, qty, amount, date.unwrap_or_else(today));
            if let Some(ids) = order_products {
                context = context.with_order_products(ids);
            }
            print_json(&commands::evaluate(&snapshot, &company, context)?)
        }
        Commands::Order {
            company,
            lines,
            date,
        } => print_json(&commands::order(
            &snapshot,
            &company,
            lines,
            date.unwrap_or_else(today),
        )?),
        Commands::Valuate {
            product,
            today: as_of,
            plan_qty,
        } => print_json(&commands::valuate(
            &snapshot,
            valuer,
            &product,
            as_of.unwrap_or_else(today),
            plan_qty,
        )),
        Commands::Report { today: as_of } => print_json(&commands::report(
            &snapshot,
            load,
            valuer,
            as_of.unwrap_or_else(today),
        )),
        Commands::Price {
            product,
            tier,
            cost,
        } => print_json(&commands::price(&snapshot, &product, tier, cost)?),
    }
}

fn load_config(cli: &Cli) -> Result<RxdistConfig> {
    let mut config = RxdistConfig::load(cli.config.clone()).context("failed to load configuration")?;
    if let Some(path) = &cli.snapshot {
        config.snapshot.path = path.clone();
    }
    Ok(config)
}

/// Local calendar date; the only clock read in rxdist.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Filter directives: `--verbose`, then `RUST_LOG`, then `fallback`.
fn filter_directives(verbose: bool, rust_log: Option<String>, fallback: &str) -> String {
    if verbose {
        return "debug".to_string();
    }
    rust_log
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Short-lived subscriber used while the config itself is loading.
///
/// Without a config the fallback filter is `RXDIST_LOG`, else the default.
fn bootstrap_subscriber<W>(verbose: bool, writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let fallback = std::env::var("RXDIST_LOG").unwrap_or_else(|_| LoggingSettings::default().filter);
    let directives = filter_directives(verbose, std::env::var("RUST_LOG").ok(), &fallback);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_target(true)
        .with_writer(writer)
        .finish()
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Filter Priority
/// - `--verbose` - debug for everything
/// - `RUST_LOG` - standard env filter syntax
/// - `[logging] filter` from rxdist.toml (or `RXDIST_LOG`)
fn init_tracing(settings: &LoggingSettings, verbose: bool) {
    let directives = filter_directives(verbose, std::env::var("RUST_LOG").ok(), &settings.filter);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_target(true)
        .with_writer(std::io::stderr);

    if settings.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_filter_directives() {
        assert_eq!(filter_directives(true, Some("warn".into()), "info"), "debug");
        assert_eq!(filter_directives(false, Some("warn".into()), "info"), "warn");
        assert_eq!(filter_directives(false, Some("  ".into()), "info"), "info");
        assert_eq!(filter_directives(false, None, "rxdist_store=debug"), "rxdist_store=debug");
    }

    #[test]
    fn test_config_load_events_are_logged() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rxdist.toml");
        std::fs::write(&path, "[inventory]\ncritical_window_days = 45\n").unwrap();

        let cli = Cli::try_parse_from([
            "rxdist",
            "--verbose",
            "--config",
            path.to_str().unwrap(),
            "report",
        ])
        .unwrap();

        let captured = Captured::default();
        let sink = captured.clone();
        let config = tracing::subscriber::with_default(
            bootstrap_subscriber(cli.verbose, move || sink.clone()),
            || load_config(&cli),
        )
        .unwrap();

        assert_eq!(config.inventory.critical_window_days, 45);
        assert!(captured.text().contains("Loading config from file"));
    }
}
