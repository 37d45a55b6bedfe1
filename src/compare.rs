//! Tolerance-based equivalence between an expected and an actual route.
//!
//! Every criterion is evaluated and every mismatch reported. Summary flags
//! and length are always hard failures; the simplified-shape check is
//! governed by [`ShapePolicy`].

use std::fmt;

use thiserror::Error;
use tracing::warn;

use crate::polyline::{self, DecodeError};
use crate::route::RouteDocument;
use crate::simplify::{DEFAULT_TOLERANCE, simplify};

/// How a difference between the simplified shapes affects the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapePolicy {
    /// Reported as an advisory; the comparison still passes.
    #[default]
    Advisory,
    /// Reported as a failure.
    Enforce,
}

#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Largest tolerated absolute length difference (service length units).
    pub max_length_diff: f64,
    /// Largest tolerated length difference relative to the mean, in percent.
    pub max_length_diff_percent: f64,
    /// Simplification tolerance in degrees.
    pub simplify_tolerance: f64,
    pub high_quality: bool,
    pub shape_policy: ShapePolicy,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            max_length_diff: 0.5,
            max_length_diff_percent: 5.0,
            simplify_tolerance: DEFAULT_TOLERANCE,
            high_quality: true,
            shape_policy: ShapePolicy::Advisory,
        }
    }
}

/// Which of the two documents a problem belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Expected,
    Actual,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Expected => f.write_str("expected"),
            Side::Actual => f.write_str("actual"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("shape is empty")]
    Empty,
    #[error("shape could not be decoded: {0}")]
    Decode(#[from] DecodeError),
}

/// A single reason two routes are not equivalent.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    Toll { expected: bool, got: bool },
    Ferry { expected: bool, got: bool },
    Highway { expected: bool, got: bool },
    LengthAbsolute { expected: f64, got: f64 },
    LengthRelative { expected: f64, got: f64, percent: f64 },
    ShapeExtraction { side: Side, error: ShapeError },
    Shape {
        expected_points: usize,
        got_points: usize,
        first_divergence: usize,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Toll { expected, got } => {
                write!(f, "has_toll is different, got {}, expected {}", got, expected)
            }
            Mismatch::Ferry { expected, got } => {
                write!(f, "has_ferry is different, got {}, expected {}", got, expected)
            }
            Mismatch::Highway { expected, got } => {
                write!(f, "has_highway is different, got {}, expected {}", got, expected)
            }
            Mismatch::LengthAbsolute { expected, got } => {
                write!(f, "length is different, got {:.6}, expected {:.6}", got, expected)
            }
            Mismatch::LengthRelative {
                expected,
                got,
                percent,
            } => write!(
                f,
                "length is different by {:.2} percent, got {:.6}, expected {:.6}",
                percent, got, expected
            ),
            Mismatch::ShapeExtraction { side, error } => {
                write!(f, "failed to extract {} shape: {}", side, error)
            }
            Mismatch::Shape {
                expected_points,
                got_points,
                first_divergence,
            } => write!(
                f,
                "simplified shape differs at point {}, got {} points, expected {}",
                first_divergence, got_points, expected_points
            ),
        }
    }
}

/// Outcome of comparing one expected route with one actual route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    pub failures: Vec<Mismatch>,
    pub advisories: Vec<Mismatch>,
    /// Simplified expected shape, empty when it could not be extracted.
    pub expected_shape: Vec<(f64, f64)>,
    /// Simplified actual shape, empty when it could not be extracted.
    pub actual_shape: Vec<(f64, f64)>,
}

impl Comparison {
    pub fn is_pass(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            return f.write_str("OK");
        }
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

/// Decodes the first-leg shape of a document and simplifies it.
pub fn extract_shape(
    doc: &RouteDocument,
    tolerance: f64,
    high_quality: bool,
) -> Result<Vec<(f64, f64)>, ShapeError> {
    let encoded = doc.first_shape();
    if encoded.is_empty() {
        return Err(ShapeError::Empty);
    }
    let points = polyline::decode(encoded)?;
    Ok(simplify(&points, tolerance, high_quality))
}

pub fn compare(
    expected: &RouteDocument,
    actual: &RouteDocument,
    options: &CompareOptions,
) -> Comparison {
    let mut comparison = Comparison::default();
    let want = expected.summary();
    let got = actual.summary();

    if want.has_toll != got.has_toll {
        comparison.failures.push(Mismatch::Toll {
            expected: want.has_toll,
            got: got.has_toll,
        });
    }
    if want.has_ferry != got.has_ferry {
        comparison.failures.push(Mismatch::Ferry {
            expected: want.has_ferry,
            got: got.has_ferry,
        });
    }
    if want.has_highway != got.has_highway {
        comparison.failures.push(Mismatch::Highway {
            expected: want.has_highway,
            got: got.has_highway,
        });
    }

    comparison
        .failures
        .extend(compare_lengths(want.length, got.length, options));
    if comparison
        .failures
        .iter()
        .any(|m| matches!(m, Mismatch::LengthAbsolute { .. } | Mismatch::LengthRelative { .. }))
    {
        warn!(shape = actual.first_shape(), "actual shape of length mismatch");
    }

    let expected_shape = extract_shape(expected, options.simplify_tolerance, options.high_quality);
    let actual_shape = extract_shape(actual, options.simplify_tolerance, options.high_quality);

    match (expected_shape, actual_shape) {
        (Ok(want_shape), Ok(got_shape)) => {
            if let Some(mismatch) = compare_shapes(&want_shape, &got_shape) {
                match options.shape_policy {
                    ShapePolicy::Advisory => comparison.advisories.push(mismatch),
                    ShapePolicy::Enforce => comparison.failures.push(mismatch),
                }
            }
            comparison.expected_shape = want_shape;
            comparison.actual_shape = got_shape;
        }
        (want_shape, got_shape) => {
            if let Err(error) = want_shape {
                comparison.failures.push(Mismatch::ShapeExtraction {
                    side: Side::Expected,
                    error,
                });
            }
            if let Err(error) = got_shape {
                comparison.failures.push(Mismatch::ShapeExtraction {
                    side: Side::Actual,
                    error,
                });
            }
        }
    }

    comparison
}

/// Absolute and relative length checks; both use strict `>`.
pub fn compare_lengths(expected: f64, got: f64, options: &CompareOptions) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();
    let diff = (got - expected).abs();

    if diff > options.max_length_diff {
        mismatches.push(Mismatch::LengthAbsolute { expected, got });
    }

    let mean = (expected + got) / 2.0;
    if mean > 0.0 {
        let percent = diff * 100.0 / mean;
        if percent > options.max_length_diff_percent {
            mismatches.push(Mismatch::LengthRelative {
                expected,
                got,
                percent,
            });
        }
    }

    mismatches
}

/// Point-by-point equality of two simplified shapes.
///
/// Both sides come out of the same fixed-point decoder, so equal fixed-point
/// coordinates always yield bit-identical floats.
pub fn compare_shapes(expected: &[(f64, f64)], got: &[(f64, f64)]) -> Option<Mismatch> {
    if expected == got {
        return None;
    }

    let first_divergence = expected
        .iter()
        .zip(got)
        .position(|(a, b)| a != b)
        .unwrap_or(expected.len().min(got.len()));

    Some(Mismatch::Shape {
        expected_points: expected.len(),
        got_points: got.len(),
        first_divergence,
    })
}
