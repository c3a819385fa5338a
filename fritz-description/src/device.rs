//! Device description parsing.
//!
//! This module handles parsing UPnP device description XML into a tree of
//! devices, each with the services it exposes.

use crate::error::{DescriptionError, Result};
use serde::Deserialize;

/// UPnP device description root element.
#[derive(Debug, Deserialize)]
struct Root {
    #[serde(rename = "systemVersion")]
    system_version: Option<SystemVersion>,
    device: DeviceDescription,
}

/// A parsed description document together with the URL it was read from.
#[derive(Debug, Clone)]
pub struct Description {
    pub source: String,
    pub system_version: Option<SystemVersion>,
    pub device: DeviceDescription,
}

impl Description {
    /// Parse a device description document.
    ///
    /// # Errors
    ///
    /// Returns `DescriptionError::ParseError` if the XML is malformed or has
    /// no root `device` element.
    pub fn from_xml(source: &str, xml: &str) -> Result<Self> {
        let root: Root = quick_xml::de::from_str(xml).map_err(|e| {
            DescriptionError::ParseError(format!("Failed to parse device description {}: {}", source, e))
        })?;

        Ok(Self {
            source: source.to_string(),
            system_version: root.system_version,
            device: root.device,
        })
    }

    /// Model name of the root device
    pub fn model_name(&self) -> Option<&str> {
        Some(self.device.model_name.as_str()).filter(|name| !name.is_empty())
    }
}

/// Firmware information, only present in the TR-064 description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SystemVersion {
    #[serde(rename = "HW")]
    pub hardware: Option<String>,
    #[serde(rename = "Major")]
    pub major: Option<String>,
    #[serde(rename = "Minor")]
    pub minor: Option<String>,
    #[serde(rename = "Patch")]
    pub patch: Option<String>,
    #[serde(rename = "Buildnumber")]
    pub build_number: Option<String>,
    #[serde(rename = "Display")]
    pub display: Option<String>,
}

impl SystemVersion {
    /// The human readable version, e.g. `164.07.29`.
    ///
    /// Falls back to `major.minor.patch` when the device omits `Display`.
    pub fn version(&self) -> Option<String> {
        if let Some(display) = &self.display {
            return Some(display.clone());
        }
        match (&self.major, &self.minor, &self.patch) {
            (Some(major), Some(minor), Some(patch)) => Some(format!("{}.{}.{}", major, minor, patch)),
            _ => None,
        }
    }
}

/// One device of the description tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescription {
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub friendly_name: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub model_name: String,
    #[serde(rename = "UDN")]
    pub udn: Option<String>,
    #[serde(default)]
    service_list: ServiceList,
    #[serde(default)]
    device_list: DeviceList,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ServiceList {
    #[serde(rename = "service", default)]
    services: Vec<ServiceEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DeviceList {
    #[serde(rename = "device", default)]
    devices: Vec<DeviceDescription>,
}

/// A service reference inside a device description.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceEntry {
    #[serde(rename = "serviceType")]
    pub service_type: String,
    #[serde(rename = "serviceId")]
    pub service_id: Option<String>,
    #[serde(rename = "controlURL")]
    pub control_url: String,
    #[serde(rename = "SCPDURL")]
    pub scpd_url: String,
    #[serde(rename = "eventSubURL")]
    pub event_sub_url: Option<String>,
}

impl ServiceEntry {
    /// The unnormalized service name.
    ///
    /// Taken from the last component of the service id
    /// (`urn:WANIPConnection-com:serviceId:WANIPConn1` gives `WANIPConn1`),
    /// else from the service type after `service:`
    /// (`urn:schemas-upnp-org:service:Layer3Forwarding:1` gives
    /// `Layer3Forwarding:1`), else the raw service type.
    pub fn short_name(&self) -> &str {
        if let Some(id) = self.service_id.as_deref() {
            if let Some(name) = id.rsplit(':').next().filter(|name| !name.is_empty()) {
                return name;
            }
        }
        match self.service_type.split_once(":service:") {
            Some((_, name)) => name,
            None => &self.service_type,
        }
    }
}

impl DeviceDescription {
    /// Services declared directly on this device
    pub fn services(&self) -> &[ServiceEntry] {
        &self.service_list.services
    }

    /// Embedded sub-devices
    pub fn devices(&self) -> &[DeviceDescription] {
        &self.device_list.devices
    }

    /// Services of this device and all nested devices, depth-first.
    pub fn all_services(&self) -> Vec<&ServiceEntry> {
        let mut services = Vec::new();
        self.collect_services(&mut services);
        services
    }

    fn collect_services<'a>(&'a self, services: &mut Vec<&'a ServiceEntry>) {
        services.extend(self.services());
        for device in self.devices() {
            device.collect_services(services);
        }
    }
}
