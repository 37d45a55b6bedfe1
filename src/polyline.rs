//! Polyline representation for route geometries.
//!
//! Shapes travel between the routing service and the comparator as encoded
//! polyline strings: every axis is scaled to a fixed-point integer,
//! delta-encoded against the previous point, zig-zag mapped to an unsigned
//! value and written as 5-bit chunks offset by 63. Valhalla uses six digits
//! of precision, Google-style polylines use five.

use thiserror::Error;

/// Fixed-point scale used when encoding and decoding a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Precision(f64);

impl Precision {
    /// Five decimal digits (Google encoded polyline).
    pub const FIVE: Precision = Precision(1e5);
    /// Six decimal digits (Valhalla `polyline6`).
    pub const SIX: Precision = Precision(1e6);

    pub fn scale(self) -> f64 {
        self.0
    }
}

impl Default for Precision {
    fn default() -> Self {
        Precision::SIX
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },
    #[error("polyline ended in the middle of a value at offset {offset}")]
    Truncated { offset: usize },
    #[error("polyline value starting at offset {offset} does not fit in 64 bits")]
    Overflow { offset: usize },
}

/// A polyline representing a route geometry as decoded coordinates.
///
/// Each point is a (latitude, longitude) tuple in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Decodes an encoded polyline string.
    ///
    /// An empty string yields an empty polyline.
    pub fn decode(encoded: &str, precision: Precision) -> Result<Self, DecodeError> {
        let bytes = encoded.as_bytes();
        let scale = precision.scale();
        let mut points = Vec::new();
        let mut offset = 0;
        let mut lat: i64 = 0;
        let mut lon: i64 = 0;

        while offset < bytes.len() {
            let (dlat, next) = read_value(bytes, offset)?;
            if next >= bytes.len() {
                return Err(DecodeError::Truncated { offset: next });
            }
            let (dlon, next) = read_value(bytes, next)?;
            offset = next;

            lat = lat.wrapping_add(dlat);
            lon = lon.wrapping_add(dlon);
            points.push((lat as f64 / scale, lon as f64 / scale));
        }

        Ok(Self { points })
    }

    /// Encodes the points, rounding each scaled axis half away from zero.
    pub fn encode(&self, precision: Precision) -> String {
        let scale = precision.scale();
        let mut out = String::with_capacity(self.points.len() * 8);
        let mut prev_lat: i64 = 0;
        let mut prev_lon: i64 = 0;

        for &(lat, lon) in &self.points {
            let lat = (lat * scale).round() as i64;
            let lon = (lon * scale).round() as i64;
            write_value(&mut out, lat - prev_lat);
            write_value(&mut out, lon - prev_lon);
            prev_lat = lat;
            prev_lon = lon;
        }

        out
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Decodes a six-digit polyline into (lat, lon) points.
pub fn decode(encoded: &str) -> Result<Vec<(f64, f64)>, DecodeError> {
    Polyline::decode(encoded, Precision::SIX).map(Polyline::into_points)
}

/// Encodes (lat, lon) points as a six-digit polyline.
pub fn encode(points: &[(f64, f64)]) -> String {
    Polyline::new(points.to_vec()).encode(Precision::SIX)
}

fn read_value(bytes: &[u8], start: usize) -> Result<(i64, usize), DecodeError> {
    let mut result: u64 = 0;
    let mut shift = 0u32;
    let mut offset = start;

    loop {
        let Some(&byte) = bytes.get(offset) else {
            return Err(DecodeError::Truncated { offset });
        };
        if !(63..=126).contains(&byte) {
            return Err(DecodeError::InvalidByte { byte, offset });
        }

        let chunk = u64::from(byte - 63);
        // only the low 4 payload bits fit once shift reaches 60
        if shift >= 64 || (shift == 60 && (chunk & 0x1f) >> 4 != 0) {
            return Err(DecodeError::Overflow { offset: start });
        }
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        offset += 1;

        if chunk < 0x20 {
            break;
        }
    }

    // zig-zag
    let value = if result & 1 == 1 {
        !((result >> 1) as i64)
    } else {
        (result >> 1) as i64
    };
    Ok((value, offset))
}

fn write_value(out: &mut String, value: i64) {
    let mut v = if value < 0 {
        !((value as u64) << 1)
    } else {
        (value as u64) << 1
    };

    while v >= 0x20 {
        out.push(char::from(((0x20 | (v & 0x1f)) + 63) as u8));
        v >>= 5;
    }
    out.push(char::from((v + 63) as u8));
}
