//! Response observation.
//!
//! # Responsibilities
//! - Inspect the backend's response head before it is relayed
//! - Log a dump of status line and headers
//!
//! # Design Decisions
//! - Observers see `&Parts` only; they cannot alter the bytes sent
//! - An observer error fails that one response with 500

use std::fmt::{self, Write};

use axum::http::response::Parts;
use thiserror::Error;
use url::Url;

/// Failure raised by a [`ResponseObserver`].
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ObserveError(String);

impl ObserveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<fmt::Error> for ObserveError {
    fn from(_: fmt::Error) -> Self {
        Self::new("failed to format response dump")
    }
}

/// Hook invoked once the backend's status and headers have arrived.
pub trait ResponseObserver: Send + Sync + fmt::Debug {
    fn observe(&self, target: &Url, response: &Parts) -> Result<(), ObserveError>;
}

/// Logs every response head at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl ResponseObserver for LoggingObserver {
    fn observe(&self, target: &Url, response: &Parts) -> Result<(), ObserveError> {
        let dump = dump_response_head(response)?;
        tracing::info!(
            backend = %target,
            status = response.status.as_u16(),
            "RESPONSE:\r\n{}",
            dump
        );
        Ok(())
    }
}

/// Render a response head the way it appears on an HTTP/1.x wire.
///
/// Header values that are not valid UTF-8 are rendered lossily.
pub fn dump_response_head(response: &Parts) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write!(out, "{:?} {}\r\n", response.version, response.status)?;
    for (name, value) in response.headers.iter() {
        write!(out, "{}: {}\r\n", name, String::from_utf8_lossy(value.as_bytes()))?;
    }
    out.push_str("\r\n");
    Ok(out)
}
