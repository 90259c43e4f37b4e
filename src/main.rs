use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use marketarb::app::{App, Config};
use marketarb::cli::{banner, Cli, Commands, RunArgs, StatusArgs};
use marketarb::error::{Error, Result};
use marketarb::{dashboard, scheduler, sinks};
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(args) => run(&cli.config, cli.log_level.as_deref(), args).await,
        Commands::Status(args) => status(&cli.config, args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("marketarb: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config_path: &std::path::Path, log_level_override: Option<&str>, args: &RunArgs) -> Result<()> {
    let mut config = Config::load_or_default(config_path)?;

    if let Some(level) = log_level_override {
        config.logging.level = level.to_string();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    if let Some(min_profit) = args.min_profit_cents {
        config.min_profit_cents = min_profit;
    }
    if let Some(port) = args.dashboard_port {
        config.dashboard_port = port;
    }

    config.init_logging();

    if !args.no_banner {
        banner::print_banner(env!("CARGO_PKG_VERSION"));
    }

    info!(
        poll_interval_seconds = config.poll_interval_seconds,
        dashboard_port = config.dashboard_port,
        "marketarb starting"
    );

    let (app, state_reader) = App::build(&config)?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scan_handle = {
        let app = app.clone();
        let interval = Duration::from_secs(config.poll_interval_seconds);
        tokio::spawn(async move {
            scheduler::run_scan_loop(interval, shutdown_rx, || {
                let app = app.clone();
                async move { app.tick().await }
            })
            .await;
        })
    };

    let dashboard_addr = format!("0.0.0.0:{}", config.dashboard_port);
    let listener = tokio::net::TcpListener::bind(&dashboard_addr)
        .await
        .map_err(Error::Io)?;
    let dashboard_router = dashboard::router(state_reader);
    let dashboard_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, dashboard_router).await {
            error!(error = %e, "dashboard server exited");
        }
    });
    info!(address = %dashboard_addr, "dashboard listening");

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("shutdown signal received (Ctrl+C)");
        }
        _ = scan_handle => {
            info!("scan loop exited on its own");
        }
    }

    let _ = shutdown_tx.send(true);
    dashboard_handle.abort();

    info!("marketarb stopped");
    Ok(())
}

async fn status(config_path: &std::path::Path, args: &StatusArgs) -> Result<()> {
    let config = Config::load_or_default(config_path)?;

    println!("marketarb status ({})", config_path.display());
    println!("  database: {}", config.database_url);
    println!("  csv log:  {}", config.log_file.display());

    match sinks::db::create_pool(&config.database_url) {
        Ok(pool) => {
            let rows = sinks::db::recent_rows(&pool, args.lines as i64)?;
            if rows.is_empty() {
                println!("  no opportunities recorded yet");
            } else {
                println!("  last {} opportunit{}:", rows.len(), if rows.len() == 1 { "y" } else { "ies" });
                for row in rows {
                    println!(
                        "    {} {} {} {}c",
                        row.parsed_timestamp().to_rfc3339(),
                        row.market,
                        row.strategy,
                        row.profit_cents
                    );
                }
            }
        }
        Err(e) => {
            println!("  database unavailable: {e}");
        }
    }

    Ok(())
}
