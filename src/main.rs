//! route-verifier CLI
//!
//! Usage:
//!   route-verifier compare-batch-routes --route-dir <dir> --valhalla-url <url> \
//!       --costing-json <file>

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{Parser, Subcommand};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use route_verifier::compare::{CompareOptions, ShapePolicy};
use route_verifier::error::{BatchError, ConfigError};
use route_verifier::runner::{BatchOptions, ErrorPolicy, load_costing, run_batch};
use route_verifier::simplify::DEFAULT_TOLERANCE;
use route_verifier::valhalla::{ValhallaClient, ValhallaConfig};

#[derive(Parser)]
#[command(name = "route-verifier")]
#[command(about = "Check a routing service against golden routes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay every fixture in a directory and compare the routes
    CompareBatchRoutes {
        /// Directory of expected directions documents (*.json, searched recursively)
        #[arg(long)]
        route_dir: PathBuf,

        /// Route endpoint of the routing service
        #[arg(long, env = "VALHALLA_URL")]
        valhalla_url: String,

        /// JSON costing options sent with motorcycle requests
        #[arg(long)]
        costing_json: PathBuf,

        /// Per-request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout_secs: u64,

        /// Stop at the first failing fixture
        #[arg(long)]
        fail_fast: bool,

        /// Fail fixtures whose simplified shapes differ
        #[arg(long)]
        strict_shape: bool,

        /// Largest tolerated absolute length difference
        #[arg(long, default_value = "0.5")]
        max_length_diff: f64,

        /// Largest tolerated length difference in percent
        #[arg(long, default_value = "5")]
        max_length_diff_percent: f64,

        /// Shape simplification tolerance in degrees
        #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
        tolerance: f64,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::CompareBatchRoutes {
            route_dir,
            valhalla_url,
            costing_json,
            timeout_secs,
            fail_fast,
            strict_shape,
            max_length_diff,
            max_length_diff_percent,
            tolerance,
        } => {
            let options = BatchOptions {
                error_policy: if fail_fast {
                    ErrorPolicy::FailFast
                } else {
                    ErrorPolicy::CollectAll
                },
                compare: CompareOptions {
                    max_length_diff,
                    max_length_diff_percent,
                    simplify_tolerance: tolerance,
                    shape_policy: if strict_shape {
                        ShapePolicy::Enforce
                    } else {
                        ShapePolicy::Advisory
                    },
                    ..CompareOptions::default()
                },
            };
            compare_batch_routes(route_dir, valhalla_url, costing_json, timeout_secs, options)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn compare_batch_routes(
    route_dir: PathBuf,
    url: String,
    costing_json: PathBuf,
    timeout_secs: u64,
    options: BatchOptions,
) -> Result<bool, BatchError> {
    let costing = load_costing(&costing_json)?;
    let client =
        ValhallaClient::new(ValhallaConfig { url, timeout_secs }).map_err(ConfigError::from)?;

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    if let Err(err) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        warn!("could not install ctrl-c handler: {}", err);
    }

    let stdout = io::stdout();
    let report = run_batch(&route_dir, &client, &costing, &options, &cancel, &mut stdout.lock())?;

    if let Some(first) = report.first_failure() {
        error!(path = %first.path.display(), "first failure: {}", first.detail());
    }
    Ok(report.is_success())
}
