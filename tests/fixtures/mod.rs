//! Test fixtures for route-verifier.
//!
//! Provides:
//! - Encoded shapes around Thu Duc / Binh Thanh (Ho Chi Minh City)
//! - A builder for directions documents
//! - A stub routing service that records requests

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use route_verifier::error::ClientError;
use route_verifier::route::{RouteDocument, RouteRequest};
use route_verifier::traits::RouteProvider;
use serde_json::json;

/// Seven points with a duplicate and a collinear run; simplifies to
/// `SHAPE_SIMPLIFIED`.
pub const SHAPE: &str = "_pasS{nfpjEoOrS??owHvsM_pRnh\\_pRnh\\olZluY";

pub const SHAPE_SIMPLIFIED: [(f64, f64); 3] = [
    (10.814736, 106.71283),
    (10.84, 106.675),
    (10.85404, 106.661329),
];

/// Same endpoints as `SHAPE` through a different middle point.
pub const DETOUR_SHAPE: &str = "_pasS{nfpjE_y\\z`Xo}m@|ojA";

pub const COSTING_JSON: &str = r#"{"use_highways":0.3,"use_trails":0.0}"#;

/// Builder for directions documents with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestRoute {
    pub has_toll: bool,
    pub has_ferry: bool,
    pub has_highway: bool,
    pub length: f64,
    pub shape: String,
    pub travel_type: String,
    pub origin: (f64, f64),
    pub destination: (f64, f64),
    pub depart_at: String,
}

impl TestRoute {
    pub fn new() -> Self {
        Self {
            has_toll: false,
            has_ferry: false,
            has_highway: true,
            length: 12.0,
            shape: SHAPE.to_string(),
            travel_type: "car".to_string(),
            origin: (10.814736, 106.71283),
            destination: (10.85404, 106.661329),
            depart_at: "2023-10-19T21:26".to_string(),
        }
    }

    pub fn toll(mut self, has_toll: bool) -> Self {
        self.has_toll = has_toll;
        self
    }

    pub fn ferry(mut self, has_ferry: bool) -> Self {
        self.has_ferry = has_ferry;
        self
    }

    pub fn highway(mut self, has_highway: bool) -> Self {
        self.has_highway = has_highway;
        self
    }

    pub fn length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    pub fn shape(mut self, shape: &str) -> Self {
        self.shape = shape.to_string();
        self
    }

    pub fn travel_type(mut self, travel_type: &str) -> Self {
        self.travel_type = travel_type.to_string();
        self
    }

    pub fn to_json(&self) -> String {
        json!({
            "trip": {
                "locations": [
                    {
                        "type": "break",
                        "lat": self.origin.0,
                        "lon": self.origin.1,
                        "date_time": self.depart_at,
                        "original_index": 0
                    },
                    {
                        "type": "break",
                        "lat": self.destination.0,
                        "lon": self.destination.1,
                        "original_index": 1
                    }
                ],
                "legs": [{
                    "maneuvers": [{
                        "type": 1,
                        "instruction": "Drive north.",
                        "travel_mode": "drive",
                        "travel_type": self.travel_type,
                        "begin_shape_index": 0,
                        "end_shape_index": 6
                    }],
                    "summary": {
                        "length": self.length,
                        "has_toll": self.has_toll,
                        "has_ferry": self.has_ferry,
                        "has_highway": self.has_highway
                    },
                    "shape": self.shape
                }],
                "summary": {
                    "time": 1275.2,
                    "length": self.length,
                    "cost": 1500.4,
                    "has_toll": self.has_toll,
                    "has_ferry": self.has_ferry,
                    "has_highway": self.has_highway
                },
                "status_message": "Found route between points",
                "status": 0,
                "units": "kilometers",
                "language": "en-US"
            }
        })
        .to_string()
    }

    pub fn document(&self) -> RouteDocument {
        RouteDocument::from_json(&self.to_json()).expect("builder emits valid documents")
    }

    pub fn write_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture dir");
        }
        fs::write(path, self.to_json()).expect("write fixture");
    }
}

/// Routing service stand-in answering every request through `respond`.
pub struct StubProvider<F> {
    respond: F,
    pub requests: RefCell<Vec<serde_json::Value>>,
}

impl<F> StubProvider<F>
where
    F: Fn(&RouteRequest) -> Result<String, ClientError>,
{
    pub fn new(respond: F) -> Self {
        Self {
            respond,
            requests: RefCell::new(Vec::new()),
        }
    }
}

/// Stub that always answers with the given route.
pub fn answering(
    route: TestRoute,
) -> StubProvider<impl Fn(&RouteRequest) -> Result<String, ClientError>> {
    let body = route.to_json();
    StubProvider::new(move |_| Ok(body.clone()))
}

impl<F> RouteProvider for StubProvider<F>
where
    F: Fn(&RouteRequest) -> Result<String, ClientError>,
{
    fn route(&self, request: &RouteRequest) -> Result<String, ClientError> {
        let recorded = serde_json::to_value(request).expect("request serializes");
        self.requests.borrow_mut().push(recorded);
        (self.respond)(request)
    }
}
