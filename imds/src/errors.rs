use hyper::StatusCode;
use std::net::IpAddr;
use thiserror::Error;

/// Result type alias for metadata service operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while resolving and rendering a request
#[derive(Error, Debug)]
pub enum Error {
    #[error("no identity for peer {0}: no ARP table entry")]
    IdentityNotFound(IpAddr),

    #[error("identity {0:?} is not a valid document name")]
    InvalidIdentity(String),

    #[error("failed to read configuration for {identity}: {source}")]
    ConfigRead {
        identity: String,
        source: std::io::Error,
    },

    #[error("malformed configuration document: {0}")]
    Parse(String),

    #[error("document has no {0} section")]
    MissingSection(&'static str),

    #[error("failed to serialize user-data: {0}")]
    Render(String),

    #[error("not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Status code this failure maps to on the HTTP surface.
    ///
    /// Only an unmatched path or a missing metadata key is client-facing;
    /// everything else is a server error.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::Parse("bad".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::IdentityNotFound("10.0.0.1".parse().unwrap()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::MissingSection("meta-data").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
