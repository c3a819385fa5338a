//! Error types for the SOAP client

use thiserror::Error;

/// A SOAP fault reported by the device.
///
/// `fault_code` and `fault_string` are taken verbatim from the envelope; the
/// UPnP fields come from `<detail><UPnPError>` when the device provides them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    pub fault_code: String,
    pub fault_string: String,
    pub upnp_error_code: Option<u16>,
    pub upnp_error_description: Option<String>,
}

impl std::fmt::Display for SoapFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.fault_string, self.fault_code)?;
        if let Some(code) = self.upnp_error_code {
            write!(f, ", UPnP error {}", code)?;
        }
        if let Some(description) = &self.upnp_error_description {
            write!(f, ": {}", description)?;
        }
        Ok(())
    }
}

/// Errors that can occur during SOAP communication
#[derive(Debug, Error)]
pub enum SoapError {
    /// The device could not be reached (refused, DNS, TLS handshake, ...)
    #[error("Connection error: {0}")]
    Connect(String),

    /// The device did not answer within the configured timeout
    #[error("Timed out: {0}")]
    Timeout(String),

    /// A plain GET was answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String },

    /// XML parsing error
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// SOAP fault returned by the device
    #[error("SOAP fault: {0}")]
    Fault(SoapFault),

    /// The session could not be built from the given configuration
    #[error("Transport configuration error: {0}")]
    Config(String),
}
