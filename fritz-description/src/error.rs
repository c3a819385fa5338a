//! Error types for description loading.

use std::fmt;

use soap_client::SoapError;

/// Error type for description loading.
///
/// Separates documents that could not be fetched from documents that were
/// fetched but could not be understood. Only the former is ever treated as
/// optional by callers.
#[derive(Debug)]
pub enum DescriptionError {
    /// The document could not be fetched (connect failure, timeout, error status)
    Unreachable { url: String, source: SoapError },
    /// The device answered with its HTML login page instead of XML
    LoginRequired(String),
    /// The document is not a well-formed description
    ParseError(String),
}

impl DescriptionError {
    /// Whether the underlying fetch failed because of the configured timeout
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            DescriptionError::Unreachable {
                source: SoapError::Timeout(_),
                ..
            }
        )
    }
}

impl fmt::Display for DescriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptionError::Unreachable { url, source } => {
                write!(f, "Description {} unreachable: {}", url, source)
            }
            DescriptionError::LoginRequired(url) => {
                write!(f, "Login required to read {}", url)
            }
            DescriptionError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for DescriptionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DescriptionError::Unreachable { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience Result type alias for description operations.
pub type Result<T> = std::result::Result<T, DescriptionError>;
