//! Batch replay of golden route fixtures.
//!
//! Each `.json` file under the route directory is an expected directions
//! document. Its origin, destination, departure time and travel type are
//! replayed against a [`RouteProvider`] and the answer is compared with the
//! fixture. Fixtures run one at a time; cancellation is honoured between
//! fixtures, never mid-request.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::value::RawValue;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::compare::{CompareOptions, Comparison, Mismatch, Side, compare};
use crate::diagnostics::{REFERENCE_POINT, distance_stats};
use crate::error::{BatchError, ConfigError, FixtureError, RunError};
use crate::route::{RouteDocument, RouteRequest};
use crate::traits::RouteProvider;

/// What to do after a fixture fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first failing fixture.
    FailFast,
    /// Run every fixture and report all failures.
    #[default]
    CollectAll,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub error_policy: ErrorPolicy,
    pub compare: CompareOptions,
}

#[derive(Debug)]
pub struct FixtureReport {
    /// Path relative to the route directory.
    pub path: PathBuf,
    pub outcome: Result<Comparison, RunError>,
}

impl FixtureReport {
    pub fn is_pass(&self) -> bool {
        matches!(&self.outcome, Ok(comparison) if comparison.is_pass())
    }

    /// The report line for this fixture, without the path.
    pub fn detail(&self) -> String {
        match &self.outcome {
            Ok(comparison) => comparison.to_string(),
            Err(err) => err.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub fixtures: Vec<FixtureReport>,
    /// Set when the run stopped early on a cancellation request.
    pub cancelled: bool,
}

impl BatchReport {
    pub fn passed(&self) -> usize {
        self.fixtures.iter().filter(|f| f.is_pass()).count()
    }

    pub fn failed(&self) -> usize {
        self.fixtures.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        !self.cancelled && self.failed() == 0
    }

    pub fn first_failure(&self) -> Option<&FixtureReport> {
        self.fixtures.iter().find(|f| !f.is_pass())
    }
}

/// All `.json` files below `dir`, in file-name order. Symlinks are followed,
/// both to files and to directories.
pub fn discover_fixtures(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if !dir.is_dir() {
        return Err(ConfigError::MissingRouteDir(dir.to_path_buf()).into());
    }

    let mut fixtures = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "json")
        {
            fixtures.push(entry.into_path());
        }
    }

    Ok(fixtures)
}

/// Reads the costing options file, rejecting anything that is not JSON.
pub fn load_costing(path: &Path) -> Result<Box<RawValue>, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::CostingIo {
        path: path.to_path_buf(),
        source,
    })?;

    RawValue::from_string(raw.trim().to_string()).map_err(|source| ConfigError::CostingJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Replays one fixture and compares the service answer with it.
pub fn evaluate_fixture<P: RouteProvider>(
    path: &Path,
    provider: &P,
    costing: &RawValue,
    options: &CompareOptions,
) -> Result<Comparison, RunError> {
    let expected_json = fs::read_to_string(path).map_err(FixtureError::from)?;
    let expected = RouteDocument::from_json(&expected_json).map_err(FixtureError::from)?;
    let query = expected.route_query()?;
    debug!(path = %path.display(), costing = query.costing.as_str(), "replaying fixture");

    let request = RouteRequest::for_query(&query, costing);
    let actual_json = provider.route(&request)?;
    let actual = match RouteDocument::from_json(&actual_json) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(body = %actual_json, "unparseable routing response");
            return Err(RunError::Response(err));
        }
    };

    let comparison = compare(&expected, &actual, options);
    log_comparison(path, &comparison, &actual_json);
    Ok(comparison)
}

fn log_comparison(path: &Path, comparison: &Comparison, actual_json: &str) {
    for failure in &comparison.failures {
        if let Mismatch::ShapeExtraction {
            side: Side::Actual, ..
        } = failure
        {
            warn!(body = %actual_json, "no usable shape in routing response");
        }
    }

    let shape_differs = comparison
        .failures
        .iter()
        .chain(&comparison.advisories)
        .any(|m| matches!(m, Mismatch::Shape { .. }));
    if !shape_differs {
        return;
    }

    for advisory in &comparison.advisories {
        warn!(path = %path.display(), "{}", advisory);
    }
    if let (Some(want), Some(got)) = (
        distance_stats(REFERENCE_POINT, &comparison.expected_shape),
        distance_stats(REFERENCE_POINT, &comparison.actual_shape),
    ) {
        debug!(
            expected_mean_km = want.mean_km,
            expected_std_dev_km = want.std_dev_km,
            actual_mean_km = got.mean_km,
            actual_std_dev_km = got.std_dev_km,
            "shape spread around reference point"
        );
    }
}

/// Runs every fixture under `route_dir`, writing one line per fixture and a
/// closing tally to `out`.
pub fn run_batch<P, W>(
    route_dir: &Path,
    provider: &P,
    costing: &RawValue,
    options: &BatchOptions,
    cancel: &AtomicBool,
    out: &mut W,
) -> Result<BatchReport, BatchError>
where
    P: RouteProvider,
    W: Write,
{
    let fixtures = discover_fixtures(route_dir)?;
    info!(count = fixtures.len(), dir = %route_dir.display(), "running route fixtures");

    let mut report = BatchReport::default();
    for path in fixtures {
        if cancel.load(Ordering::SeqCst) {
            warn!("cancelled, skipping remaining fixtures");
            report.cancelled = true;
            break;
        }

        let outcome = evaluate_fixture(&path, provider, costing, &options.compare);
        let relative = path.strip_prefix(route_dir).unwrap_or(&path).to_path_buf();
        let fixture = FixtureReport {
            path: relative,
            outcome,
        };

        writeln!(out, "{} {}", fixture.path.display(), fixture.detail())?;
        let failed = !fixture.is_pass();
        report.fixtures.push(fixture);

        if failed && options.error_policy == ErrorPolicy::FailFast {
            break;
        }
    }

    writeln!(out, "{} passed, {} failed", report.passed(), report.failed())?;
    info!(passed = report.passed(), failed = report.failed(), "batch finished");
    Ok(report)
}
