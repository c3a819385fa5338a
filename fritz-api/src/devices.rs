//! The device manager: everything known about one physical device and the
//! services it exposes.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use fritz_description::{Description, DescriptionError, DescriptionLoader, SystemVersion};
use soap_client::{SoapError, Transport};

use crate::config::Protocol;
use crate::service::ServiceDescriptor;
use crate::{FritzError, Result};

/// Outcome of [`DeviceManager::add_description`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionStatus {
    /// The document was fetched and merged
    Added,
    /// The document was added before; nothing was fetched
    AlreadyLoaded,
    /// The document could not be fetched and was skipped
    Unreachable,
}

/// Aggregate model built from one or more description documents.
///
/// Populated in three phases, in this order: [`add_description`] for each
/// entry document, [`scan`] to flatten the device trees into named services,
/// and [`load_service_descriptions`] to fetch each service's actions.
///
/// [`add_description`]: DeviceManager::add_description
/// [`scan`]: DeviceManager::scan
/// [`load_service_descriptions`]: DeviceManager::load_service_descriptions
#[derive(Debug)]
pub struct DeviceManager {
    loader: DescriptionLoader,
    descriptions: Vec<Description>,
    unreachable: HashSet<String>,
    services: BTreeMap<String, ServiceDescriptor>,
    model_name: Option<String>,
    system_version: Option<SystemVersion>,
}

impl DeviceManager {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            loader: DescriptionLoader::new(transport),
            descriptions: Vec::new(),
            unreachable: HashSet::new(),
            services: BTreeMap::new(),
            model_name: None,
            system_version: None,
        }
    }

    /// Fetch a device description and merge it into the model.
    ///
    /// A document that cannot be fetched is recorded and skipped, since a
    /// device only serves some descriptions depending on its configuration.
    /// A document that cannot be parsed is an error.
    pub fn add_description(&mut self, source: &str) -> Result<DescriptionStatus> {
        if self.unreachable.contains(source) {
            return Ok(DescriptionStatus::Unreachable);
        }
        if self.descriptions.iter().any(|d| d.source == source) {
            return Ok(DescriptionStatus::AlreadyLoaded);
        }

        let description = match self.loader.load_device(source) {
            Ok(description) => description,
            Err(DescriptionError::Unreachable { url, source: reason }) => {
                tracing::info!("Skipping description {}: {}", url, reason);
                self.unreachable.insert(url);
                return Ok(DescriptionStatus::Unreachable);
            }
            Err(e) => return Err(e.into()),
        };

        if self.model_name.is_none() {
            self.model_name = description.model_name().map(str::to_string);
        }
        if self.system_version.is_none() {
            self.system_version = description.system_version.clone();
        }
        self.descriptions.push(description);
        Ok(DescriptionStatus::Added)
    }

    /// Flatten all added device trees into the service map.
    ///
    /// When two services normalize to the same name, the one seen last wins.
    pub fn scan(&mut self) {
        for description in &self.descriptions {
            for entry in description.device.all_services() {
                let service = ServiceDescriptor::from_entry(entry);
                if let Some(previous) = self.services.get(service.name()) {
                    tracing::warn!(
                        "Service {} from {} replaces {} ({})",
                        service.name(),
                        description.source,
                        previous.service_type(),
                        previous.control_url()
                    );
                }
                self.services.insert(service.name().to_string(), service);
            }
        }
        tracing::debug!("Scanned {} services", self.services.len());
    }

    /// Fetch the description of every service and load its actions.
    ///
    /// Services are loaded in name order. The first failure is returned;
    /// services loaded before it keep their actions, the rest stay unloaded.
    pub fn load_service_descriptions(&mut self, address: &str, protocol: Protocol, port: u16) -> Result<()> {
        for (name, service) in self.services.iter_mut() {
            if service.is_loaded() {
                continue;
            }
            let path = service.scpd_url();
            let url = if path.starts_with('/') {
                format!("{}://{}:{}{}", protocol, address, port, path)
            } else {
                format!("{}://{}:{}/{}", protocol, address, port, path)
            };

            let description = self.loader.load_service(&url).map_err(|e| match e {
                DescriptionError::Unreachable {
                    source: SoapError::Timeout(msg),
                    ..
                } => FritzError::Timeout(msg),
                DescriptionError::Unreachable { url, source } => FritzError::ServiceDescriptionUnavailable {
                    service: name.clone(),
                    url,
                    reason: source.to_string(),
                },
                other => other.into(),
            })?;
            service.load(&description);
        }
        Ok(())
    }

    /// Model name of the first description that names one
    pub fn modelname(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    /// Firmware version, e.g. `154.07.29`, if any description provides it
    pub fn system_version(&self) -> Option<String> {
        self.system_version.as_ref().and_then(SystemVersion::version)
    }

    /// Full firmware information
    pub fn system_info(&self) -> Option<&SystemVersion> {
        self.system_version.as_ref()
    }

    pub fn services(&self) -> &BTreeMap<String, ServiceDescriptor> {
        &self.services
    }

    /// Look up a service by its normalized name
    pub fn service(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.get(name)
    }

    pub fn descriptions(&self) -> &[Description] {
        &self.descriptions
    }
}
