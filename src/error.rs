//! Crate-level error types.

use std::fmt;

/// Errors produced by the panoview crate.
///
/// Store actions never catch these; they surface unchanged to the caller.
#[derive(Debug)]
pub enum PanoError {
    /// Connection or transport failure talking to the scene API.
    Transport(String),
    /// The scene API answered with a non-2xx HTTP status.
    Status {
        /// HTTP status code.
        status: u16,
        /// Endpoint path that was requested.
        path: String,
    },
    /// The backend envelope reported a failure code.
    Api {
        /// Envelope `code` field.
        code: i64,
        /// Envelope `msg` field.
        message: String,
    },
    /// Response body was not the expected JSON shape.
    Decode(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML config parsing/serialization failure.
    ConfigParse(String),
    /// A route URL could not be parsed.
    InvalidUrl(url::ParseError),
}

impl fmt::Display for PanoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Status { status, path } => {
                write!(f, "scene API returned HTTP {status} for {path}")
            }
            Self::Api { code, message } => {
                write!(f, "scene API error {code}: {message}")
            }
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ConfigParse(msg) => {
                write!(f, "config parse error: {msg}")
            }
            Self::InvalidUrl(e) => write!(f, "invalid route URL: {e}"),
        }
    }
}

impl std::error::Error for PanoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::InvalidUrl(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PanoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for PanoError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<url::ParseError> for PanoError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidUrl(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failing_endpoint() {
        let err = PanoError::Status {
            status: 404,
            path: "/system/scene/get".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "scene API returned HTTP 404 for /system/scene/get"
        );
    }

    #[test]
    fn io_errors_keep_their_source() {
        use std::error::Error;

        let err = PanoError::from(std::io::Error::other("disk gone"));
        assert!(err.source().is_some());
        assert!(PanoError::Decode("x".to_owned()).source().is_none());
    }
}
