mod cli;
mod devices;
mod error_fmt;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use eyre::{Result, WrapErr};
use rice_core::error::CoreError;
use rice_core::hw_error::map_hw_error;
use rice_core::{Calibration, Controller, RunOptions, StartupCfg};
use rice_traits::Scale;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> Result<()> {
    color_eyre::install()?;

    let cfg = load_config(&cli.config)?;
    init_tracing(&cli, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "config loaded");

    let mut calibration = Calibration::from(&cfg.scale);
    if let Some(path) = &cli.calibration {
        let fitted = rice_config::load_calibration_csv(path)?;
        calibration = Calibration::from(&fitted);
        tracing::info!(
            calibration_factor = calibration.calibration_factor,
            zero_counts = calibration.zero_counts,
            "calibration loaded from CSV"
        );
    }

    match cli.cmd {
        Commands::Run {
            ticks,
            tick_ms,
            skip_loading_delay,
        } => {
            let mut startup = StartupCfg::from(&cfg);
            if skip_loading_delay {
                startup.initial_loading_delay_ms = 0;
            }
            let builder = Controller::builder()
                .with_calibration(calibration)
                .with_auto((&cfg.dispense).into())
                .with_startup(startup)
                .with_timeouts((&cfg.scale).into())
                .with_display_cfg((&cfg.display).into());
            let mut controller = devices::attach(builder, &cfg, &calibration, cli.json)?.try_build()?;

            let shutdown = Arc::new(AtomicBool::new(false));
            {
                let flag = shutdown.clone();
                ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
                    .wrap_err("install Ctrl-C handler")?;
            }

            let opts = RunOptions {
                tick: Duration::from_millis(tick_ms.unwrap_or(cfg.tick.tick_ms)),
                max_ticks: ticks,
                shutdown: Some(shutdown),
            };
            let summary = rice_core::run(&mut controller, &opts)?;

            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "ticks": summary.ticks,
                        "mode_changes": summary.mode_changes,
                        "final_mode": summary.final_mode.name(),
                        "last_weight_kg": summary.last_weight_kg,
                    })
                );
            } else {
                println!(
                    "run complete: {} ticks, {} mode changes, final mode {}, weight {:.2} kg",
                    summary.ticks, summary.mode_changes, summary.final_mode, summary.last_weight_kg
                );
            }
        }
        Commands::SelfCheck => {
            let mut scale = devices::open_scale(&cfg, &calibration)?;
            let timeout = Duration::from_millis(cfg.scale.read_timeout_ms);
            let raw = scale
                .read(timeout)
                .map_err(|e| eyre::Report::new(map_hw_error(&*e)))?;
            let kg = calibration.to_kg(raw);
            if cli.json {
                println!("{}", serde_json::json!({ "ok": true, "raw": raw, "weight_kg": kg }));
            } else {
                println!("OK: scale raw={raw} weight={kg:.2} kg");
            }
        }
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<rice_config::Config> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config {}", path.display()))?;
    let cfg: rice_config::Config =
        toml::from_str(&text).wrap_err_with(|| format!("parse config {}", path.display()))?;
    cfg.validate()
        .map_err(|e| eyre::Report::new(CoreError::Config(format!("{e:#}"))))?;
    Ok(cfg)
}

/// Console layer (pretty or JSON) filtered by `RUST_LOG` / `--log-level`,
/// plus an optional JSON file sink from `[logging]`.
fn init_tracing(cli: &Cli, logging: &rice_config::Logging) -> Result<()> {
    // An explicit --log-level wins over [logging] level.
    let level = match logging.level.as_deref() {
        Some(l) if cli.log_level == "info" => l,
        _ => cli.log_level.as_str(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console: Box<dyn Layer<Registry> + Send + Sync> = if cli.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };
    let mut layers = vec![console];

    if let Some(file) = logging.file.as_deref() {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .ok_or_else(|| eyre::eyre!("logging.file has no file name: {file}"))?;
        let appender = match logging.rotation.as_deref().unwrap_or("never") {
            "daily" => tracing_appender::rolling::daily(dir, name),
            "hourly" => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .wrap_err("install tracing subscriber")?;
    Ok(())
}
