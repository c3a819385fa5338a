//! Client library for AVM FRITZ!Box routers
//!
//! The router describes its services in TR-064/IGD description documents.
//! [`FritzConnection`] reads those documents once, builds a registry of the
//! available services and their actions, and then dispatches action calls as
//! SOAP requests with typed arguments and results.
//!
//! ```rust,no_run
//! use fritz_api::{CallArguments, ConnectionConfig, FritzConnection};
//!
//! let fc = FritzConnection::new(ConnectionConfig::new().password("secret"))?;
//!
//! // Service names are normalized: "Hosts" is "Hosts1"
//! let entry = fc.call_action(
//!     "Hosts",
//!     "GetGenericHostEntry",
//!     CallArguments::new().keyword("NewIndex", 0),
//! )?;
//! println!("{:?}", entry.get("NewHostName"));
//! # Ok::<(), fritz_api::FritzError>(())
//! ```

pub mod config;
pub mod connection;
pub mod devices;
pub mod error;
pub mod logging;
pub mod service;
pub mod soaper;
pub mod value;

pub use config::{resolve_credentials, ConnectionConfig, Credentials, Protocol, Settings};
pub use connection::FritzConnection;
pub use devices::{DescriptionStatus, DeviceManager};
pub use error::{ActionFault, FritzError, Result, UpnpErrorKind};
pub use fritz_description::SystemVersion;
pub use logging::{init_logging, init_logging_from_env, LoggingError, LoggingMode};
pub use service::{normalize_name, ActionDescriptor, ArgumentSpec, Direction, ServiceDescriptor, StateVariable};
pub use soap_client::{HttpTransport, Transport, TransportConfig};
pub use soaper::{ActionResponse, Soaper};
pub use value::{Arguments, CallArguments, DataType, Value};
