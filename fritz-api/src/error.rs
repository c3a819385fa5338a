//! Error types for the FRITZ!Box API

use fritz_description::DescriptionError;
use soap_client::{SoapError, SoapFault};
use thiserror::Error;

/// Errors returned by the FRITZ!Box API
///
/// Every variant carries the service, action or URL it concerns, so a failure
/// can be diagnosed from its message alone.
#[derive(Debug, Error)]
pub enum FritzError {
    /// A top-level description document could not be fetched
    ///
    /// Only absorbed while bootstrapping a connection, where the TR-064
    /// description is optional.
    #[error("Description {url} unreachable: {reason}")]
    UnreachableDescription { url: String, reason: String },

    /// The device advertised a service but its description could not be fetched
    #[error("Description of service {service} unavailable at {url}: {reason}")]
    ServiceDescriptionUnavailable {
        service: String,
        url: String,
        reason: String,
    },

    /// Malformed XML in a description or a response
    #[error("Parse error: {0}")]
    Parse(String),

    /// The device answered with its login page
    #[error("Login required to access {0}")]
    LoginRequired(String),

    /// No service with this (normalized) name
    #[error("Unknown service: {0}")]
    ServiceNotFound(String),

    /// The service exists but does not offer this action
    #[error("Unknown action {action} for service {service}")]
    ActionNotFound { service: String, action: String },

    /// The call arguments do not fit the action's input arguments
    #[error("Argument {argument} of action {action}: {reason}")]
    ArgumentMismatch {
        action: String,
        argument: String,
        reason: String,
    },

    /// The device rejected the call
    #[error("Action failed: {0}")]
    Action(ActionFault),

    /// An output argument does not match its declared type
    #[error("Cannot decode {argument} as {data_type}: {value:?}")]
    Decode {
        argument: String,
        data_type: String,
        value: String,
    },

    /// The device could not be reached
    #[error("Connection error: {0}")]
    Connect(String),

    /// The device did not answer within the configured timeout
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Invalid connection settings
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for results that can return a FritzError
pub type Result<T> = std::result::Result<T, FritzError>;

/// Classification of the UPnP error code carried by a SOAP fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpnpErrorKind {
    InvalidAction,
    InvalidArguments,
    ActionFailed,
    ArgumentValueInvalid,
    ArgumentValueOutOfRange,
    ActionNotAuthorized,
    ArrayIndexInvalid,
    NoSuchEntry,
    InternalError,
    Other,
}

impl UpnpErrorKind {
    pub fn from_code(code: u16) -> Self {
        match code {
            401 => UpnpErrorKind::InvalidAction,
            402 => UpnpErrorKind::InvalidArguments,
            501 => UpnpErrorKind::ActionFailed,
            600 => UpnpErrorKind::ArgumentValueInvalid,
            601 => UpnpErrorKind::ArgumentValueOutOfRange,
            606 => UpnpErrorKind::ActionNotAuthorized,
            713 => UpnpErrorKind::ArrayIndexInvalid,
            714 => UpnpErrorKind::NoSuchEntry,
            820 => UpnpErrorKind::InternalError,
            _ => UpnpErrorKind::Other,
        }
    }
}

/// A rejected action call, with the fault reported by the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFault {
    pub service: String,
    pub action: String,
    pub fault_code: String,
    pub fault_string: String,
    pub upnp_error_code: Option<u16>,
    pub upnp_error_description: Option<String>,
}

impl ActionFault {
    pub fn new(service: &str, action: &str, fault: SoapFault) -> Self {
        Self {
            service: service.to_string(),
            action: action.to_string(),
            fault_code: fault.fault_code,
            fault_string: fault.fault_string,
            upnp_error_code: fault.upnp_error_code,
            upnp_error_description: fault.upnp_error_description,
        }
    }

    /// Classified UPnP error, if the device sent an error code
    pub fn kind(&self) -> Option<UpnpErrorKind> {
        self.upnp_error_code.map(UpnpErrorKind::from_code)
    }
}

impl std::fmt::Display for ActionFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}: {} ({})",
            self.service, self.action, self.fault_string, self.fault_code
        )?;
        if let Some(code) = self.upnp_error_code {
            write!(f, ", UPnP error {}", code)?;
        }
        if let Some(description) = &self.upnp_error_description {
            write!(f, ": {}", description)?;
        }
        Ok(())
    }
}

/// Convert from SoapError to FritzError
///
/// Faults should be converted with [`ActionFault::new`] where the service and
/// action are known; this conversion is the fallback.
impl From<SoapError> for FritzError {
    fn from(error: SoapError) -> Self {
        match error {
            SoapError::Connect(msg) => FritzError::Connect(msg),
            SoapError::Timeout(msg) => FritzError::Timeout(msg),
            SoapError::Http { status, url } => FritzError::Connect(format!("HTTP {} for {}", status, url)),
            SoapError::Parse(msg) => FritzError::Parse(msg),
            SoapError::Fault(fault) => FritzError::Action(ActionFault::new("", "", fault)),
            SoapError::Config(msg) => FritzError::Config(msg),
        }
    }
}

/// Convert from DescriptionError to FritzError
impl From<DescriptionError> for FritzError {
    fn from(error: DescriptionError) -> Self {
        match error {
            DescriptionError::Unreachable { url, source } => FritzError::UnreachableDescription {
                url,
                reason: source.to_string(),
            },
            DescriptionError::LoginRequired(url) => FritzError::LoginRequired(url),
            DescriptionError::ParseError(msg) => FritzError::Parse(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fault(code: Option<u16>) -> SoapFault {
        SoapFault {
            fault_code: "s:Client".to_string(),
            fault_string: "UPnPError".to_string(),
            upnp_error_code: code,
            upnp_error_description: code.map(|_| "NoSuchEntryInArray".to_string()),
        }
    }

    #[test]
    fn test_soap_error_conversion() {
        let error: FritzError = SoapError::Connect("connection refused".to_string()).into();
        assert!(matches!(error, FritzError::Connect(_)));

        let error: FritzError = SoapError::Timeout("read timed out".to_string()).into();
        assert!(matches!(error, FritzError::Timeout(_)));

        let error: FritzError = SoapError::Parse("invalid XML".to_string()).into();
        assert!(matches!(error, FritzError::Parse(_)));

        let error: FritzError = SoapError::Config("bad certificate".to_string()).into();
        assert!(matches!(error, FritzError::Config(_)));
    }

    #[test]
    fn test_description_error_conversion() {
        let error: FritzError = DescriptionError::Unreachable {
            url: "http://169.254.1.1:49000/tr64desc.xml".to_string(),
            source: SoapError::Http {
                status: 404,
                url: "http://169.254.1.1:49000/tr64desc.xml".to_string(),
            },
        }
        .into();
        match error {
            FritzError::UnreachableDescription { url, reason } => {
                assert!(url.ends_with("tr64desc.xml"));
                assert!(reason.contains("404"));
            }
            other => panic!("Expected UnreachableDescription, got {:?}", other),
        }

        let error: FritzError = DescriptionError::ParseError("unexpected EOF".to_string()).into();
        assert!(matches!(error, FritzError::Parse(_)));
    }

    #[test]
    fn test_action_fault_kind_and_display() {
        let action_fault = ActionFault::new("Hosts1", "GetGenericHostEntry", fault(Some(713)));
        assert_eq!(action_fault.kind(), Some(UpnpErrorKind::ArrayIndexInvalid));
        assert_eq!(
            action_fault.to_string(),
            "Hosts1.GetGenericHostEntry: UPnPError (s:Client), UPnP error 713: NoSuchEntryInArray"
        );

        let action_fault = ActionFault::new("Hosts1", "GetGenericHostEntry", fault(None));
        assert_eq!(action_fault.kind(), None);
        assert_eq!(action_fault.to_string(), "Hosts1.GetGenericHostEntry: UPnPError (s:Client)");
    }

    #[test]
    fn test_upnp_error_kinds() {
        assert_eq!(UpnpErrorKind::from_code(401), UpnpErrorKind::InvalidAction);
        assert_eq!(UpnpErrorKind::from_code(402), UpnpErrorKind::InvalidArguments);
        assert_eq!(UpnpErrorKind::from_code(606), UpnpErrorKind::ActionNotAuthorized);
        assert_eq!(UpnpErrorKind::from_code(714), UpnpErrorKind::NoSuchEntry);
        assert_eq!(UpnpErrorKind::from_code(999), UpnpErrorKind::Other);
    }

    #[test]
    fn test_error_display() {
        let error = FritzError::ServiceNotFound("Foo1".to_string());
        assert_eq!(error.to_string(), "Unknown service: Foo1");

        let error = FritzError::ActionNotFound {
            service: "Hosts1".to_string(),
            action: "Reboot".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown action Reboot for service Hosts1");
    }
}
