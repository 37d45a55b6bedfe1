//! Distance statistics of a shape around a fixed reference point.
//!
//! Purely diagnostic: when two shapes diverge, the spread of their points
//! around a landmark gives a rough sense of how far apart the routes wander.
//! Nothing here influences whether a comparison passes.

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Landmark in Ho Chi Minh City District 1 that the bundled fixtures circle.
pub const REFERENCE_POINT: (f64, f64) = (10.777064553034846, 106.69569180740099);

/// Great-circle distance between two (lat, lon) points in kilometers.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceStats {
    pub mean_km: f64,
    /// Population standard deviation.
    pub std_dev_km: f64,
}

/// Mean and standard deviation of the distances from `reference` to each
/// point. `None` for an empty shape.
pub fn distance_stats(reference: (f64, f64), points: &[(f64, f64)]) -> Option<DistanceStats> {
    if points.is_empty() {
        return None;
    }

    let distances: Vec<f64> = points.iter().map(|p| haversine_km(*p, reference)).collect();
    let n = distances.len() as f64;
    let mean_km = distances.iter().sum::<f64>() / n;
    let variance = distances.iter().map(|d| (d - mean_km).powi(2)).sum::<f64>() / n;

    Some(DistanceStats {
        mean_km,
        std_dev_km: variance.sqrt(),
    })
}
