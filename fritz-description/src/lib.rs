//! Device and service descriptions of TR-064/IGD routers
//!
//! A router advertises its structure in UPnP-style XML documents: device
//! descriptions (`igddesc.xml`, `tr64desc.xml`) listing nested devices and
//! the services they expose, and one service description (SCPD) per service
//! listing its actions, their arguments and the state variables that type
//! them.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use fritz_description::DescriptionLoader;
//! use soap_client::{HttpTransport, TransportConfig};
//!
//! let transport = HttpTransport::new(&TransportConfig::default()).unwrap();
//! let loader = DescriptionLoader::new(Arc::new(transport));
//!
//! let description = loader.load_device("http://169.254.1.1:49000/igddesc.xml").unwrap();
//! for service in description.device.all_services() {
//!     println!("{} at {}", service.service_type, service.control_url);
//! }
//! ```

mod error;
mod loader;
pub mod device;
pub mod scpd;

pub use device::{Description, DeviceDescription, ServiceEntry, SystemVersion};
pub use error::{DescriptionError, Result};
pub use loader::DescriptionLoader;
pub use scpd::{ActionEntry, ArgumentEntry, ServiceDescription, StateVariableEntry};
