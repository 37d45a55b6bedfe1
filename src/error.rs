use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures talking to the routing service.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request to routing service failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("routing service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to encode route request: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failures reading or interpreting a single fixture.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("failed to read fixture: {0}")]
    Io(#[from] io::Error),

    #[error("malformed fixture json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fixture is missing {0}")]
    MissingField(&'static str),
}

/// Problems with the batch inputs, detected before any fixture runs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read costing file {path}: {source}")]
    CostingIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("costing file {path} is not valid json: {source}")]
    CostingJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("route directory {0} does not exist")]
    MissingRouteDir(PathBuf),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to walk route directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to write report: {0}")]
    Report(#[from] io::Error),
}

/// Why a single fixture could not be compared at all.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("unparseable routing service response: {0}")]
    Response(#[source] serde_json::Error),
}
