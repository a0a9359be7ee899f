//! Failure kinds for a single ingestion run.
//!
//! Every variant is terminal for the run: nothing is retried and the ledger is
//! left untouched unless the failure happened while appending.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobError {
    /// The quotes page answered without the anti-forgery cookie.
    #[error("no {cookie} cookie after loading {url} (page changed or request blocked)")]
    Auth { cookie: String, url: String },

    /// Transport error, timeout or non-2xx status.
    #[error("{stage} request failed: {source}")]
    Network {
        stage: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The API body was not valid JSON.
    #[error("{stage} returned an undecodable body: {source}")]
    Decode {
        stage: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("API response has no results (top-level keys: {keys:?})")]
    EmptyResult { keys: Vec<String> },

    #[error("no table with both \"Contract\" and \"Latest\" headers on {url}")]
    TableNotFound { url: String },

    #[error("expected {expected} {root} contract rows, found {found}")]
    InsufficientRows {
        root: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid selector {css:?}: {reason}")]
    Selector { css: &'static str, reason: String },

    #[error("ledger {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl JobError {
    pub fn network(stage: &'static str) -> impl FnOnce(reqwest::Error) -> JobError {
        move |source| JobError::Network { stage, source }
    }

    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> JobError {
        let path = path.into();
        move |source| JobError::Io { path, source }
    }
}
