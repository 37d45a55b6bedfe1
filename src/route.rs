//! Valhalla route request and directions response model.
//!
//! Only the fields the comparison consumes are strongly typed; everything else
//! in a directions document is ignored when parsing. Summary flags and length
//! default to false/0 because the routing service omits them when unset.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::FixtureError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_of_street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_index: Option<u32>,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ..Self::default()
        }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Summary {
    pub time: f64,
    pub length: f64,
    pub cost: f64,
    pub has_time_restrictions: bool,
    pub has_toll: bool,
    pub has_highway: bool,
    pub has_ferry: bool,
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Maneuver {
    #[serde(rename = "type")]
    pub kind: u32,
    pub instruction: String,
    pub street_names: Vec<String>,
    pub time: f64,
    pub length: f64,
    pub cost: f64,
    pub begin_shape_index: usize,
    pub end_shape_index: usize,
    pub travel_mode: String,
    pub travel_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Leg {
    pub summary: Summary,
    pub maneuvers: Vec<Maneuver>,
    pub shape: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub summary: Summary,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub language: String,
}

/// A parsed directions document: a fixture on disk or a service response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDocument {
    #[serde(default)]
    pub id: Option<String>,
    pub trip: Trip,
}

impl RouteDocument {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Trip-level summary.
    pub fn summary(&self) -> &Summary {
        &self.trip.summary
    }

    /// Encoded shape of the first leg, empty when there is none.
    pub fn first_shape(&self) -> &str {
        self.trip
            .legs
            .first()
            .map(|leg| leg.shape.as_str())
            .unwrap_or_default()
    }

    /// Travel type of the first maneuver of the first leg.
    pub fn first_travel_type(&self) -> Option<&str> {
        self.trip
            .legs
            .first()
            .and_then(|leg| leg.maneuvers.first())
            .map(|maneuver| maneuver.travel_type.as_str())
    }

    /// Extracts what is needed to replay this document against the service.
    pub fn route_query(&self) -> Result<RouteQuery, FixtureError> {
        let [origin, destination, ..] = self.trip.locations.as_slice() else {
            return Err(FixtureError::MissingField("trip.locations[0..1]"));
        };

        Ok(RouteQuery {
            origin: origin.coords(),
            destination: destination.coords(),
            depart_at: origin.date_time.clone().unwrap_or_default(),
            costing: Costing::from_travel_type(self.first_travel_type().unwrap_or_default()),
        })
    }
}

/// Routing profile sent to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Costing {
    Auto,
    Motorcycle,
}

impl Costing {
    /// Motorcycle fixtures replay with motorcycle costing, all others with auto.
    pub fn from_travel_type(travel_type: &str) -> Self {
        match travel_type {
            "motorcycle" => Costing::Motorcycle,
            _ => Costing::Auto,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Costing::Auto => "auto",
            Costing::Motorcycle => "motorcycle",
        }
    }
}

/// Request inputs extracted from a fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    pub origin: (f64, f64),
    pub destination: (f64, f64),
    pub depart_at: String,
    pub costing: Costing,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CostingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motorcycle: Option<Box<RawValue>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateTimeOptions {
    #[serde(rename = "type")]
    pub kind: u8,
    pub value: String,
}

impl DateTimeOptions {
    /// Depart at the given local time.
    pub fn depart_at(value: impl Into<String>) -> Self {
        Self {
            kind: 1,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteRequest {
    pub locations: Vec<Location>,
    pub costing: Costing,
    pub costing_options: CostingOptions,
    pub date_time: DateTimeOptions,
}

impl RouteRequest {
    /// Builds the service request for a query; `costing_json` is attached
    /// verbatim only for motorcycle costing.
    pub fn for_query(query: &RouteQuery, costing_json: &RawValue) -> Self {
        let motorcycle = match query.costing {
            Costing::Motorcycle => Some(costing_json.to_owned()),
            Costing::Auto => None,
        };

        Self {
            locations: vec![
                Location::new(query.origin.0, query.origin.1),
                Location::new(query.destination.0, query.destination.1),
            ],
            costing: query.costing,
            costing_options: CostingOptions { motorcycle },
            date_time: DateTimeOptions::depart_at(query.depart_at.clone()),
        }
    }
}
