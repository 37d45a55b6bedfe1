//! Seams between the fixture runner and the outside world.
//!
//! The runner only needs a way to turn a route request into a directions
//! document; tests substitute canned responses for the live service.

use crate::error::ClientError;
use crate::route::RouteRequest;

/// Computes a route for a request.
///
/// Returns the raw response body so the expected and actual documents go
/// through the same parser.
pub trait RouteProvider {
    fn route(&self, request: &RouteRequest) -> Result<String, ClientError>;
}
