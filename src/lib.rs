//! route-verifier core
//!
//! Replays golden route fixtures against a routing service and decides
//! whether the answers still match within tolerance.

pub mod compare;
pub mod diagnostics;
pub mod error;
pub mod polyline;
pub mod route;
pub mod runner;
pub mod simplify;
pub mod traits;
pub mod valhalla;
