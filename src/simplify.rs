//! Curve simplification for route shapes.
//!
//! Two passes over planar (lat, lon) coordinates: an optional radial-distance
//! pass that drops points crowding their predecessor, then Douglas-Peucker.
//! Distances are Euclidean in degree space; the default tolerance is tuned
//! for that, not for meters.

/// Tolerance used when comparing route shapes.
pub const DEFAULT_TOLERANCE: f64 = 0.0005;

/// Simplify `points` so that no dropped point lies farther than `tolerance`
/// from the simplified path.
///
/// With `high_quality` the radial pre-pass is skipped. The first and last
/// points are always kept and the output is an ordered subsequence of the
/// input.
pub fn simplify(points: &[(f64, f64)], tolerance: f64, high_quality: bool) -> Vec<(f64, f64)> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let sq_tolerance = tolerance * tolerance;

    if high_quality {
        douglas_peucker(points, sq_tolerance)
    } else {
        let reduced = radial_distance(points, sq_tolerance);
        douglas_peucker(&reduced, sq_tolerance)
    }
}

fn sq_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}

/// Squared distance from `p` to the segment `a`-`b`.
fn sq_segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (mut x, mut y) = a;
    let dx = b.0 - x;
    let dy = b.1 - y;

    if dx != 0.0 || dy != 0.0 {
        let t = ((p.0 - x) * dx + (p.1 - y) * dy) / (dx * dx + dy * dy);
        if t > 1.0 {
            (x, y) = b;
        } else if t > 0.0 {
            x += dx * t;
            y += dy * t;
        }
    }

    sq_distance(p, (x, y))
}

fn radial_distance(points: &[(f64, f64)], sq_tolerance: f64) -> Vec<(f64, f64)> {
    let mut prev = points[0];
    let mut reduced = vec![prev];

    for &point in &points[1..points.len() - 1] {
        if sq_distance(point, prev) > sq_tolerance {
            reduced.push(point);
            prev = point;
        }
    }

    reduced.push(points[points.len() - 1]);
    reduced
}

fn douglas_peucker(points: &[(f64, f64)], sq_tolerance: f64) -> Vec<(f64, f64)> {
    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    // (first, last) anchor pairs still to split
    let mut stack = vec![(0, last)];
    while let Some((first, last)) = stack.pop() {
        let mut max_sq_dist = sq_tolerance;
        let mut index = None;

        for i in first + 1..last {
            let d = sq_segment_distance(points[i], points[first], points[last]);
            if d > max_sq_dist {
                max_sq_dist = d;
                index = Some(i);
            }
        }

        if let Some(i) = index {
            keep[i] = true;
            stack.push((i, last));
            stack.push((first, i));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(point, kept)| kept.then_some(*point))
        .collect()
}
