//! Fetching description documents through the shared transport.

use std::sync::Arc;

use soap_client::Transport;

use crate::device::Description;
use crate::error::{DescriptionError, Result};
use crate::scpd::ServiceDescription;

/// Fetches and parses description documents.
///
/// The loader does not decide which failures are acceptable: it reports an
/// unreachable document as [`DescriptionError::Unreachable`] and leaves the
/// decision to the caller.
#[derive(Debug, Clone)]
pub struct DescriptionLoader {
    transport: Arc<dyn Transport>,
}

impl DescriptionLoader {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch and parse a device description (`igddesc.xml`, `tr64desc.xml`).
    pub fn load_device(&self, url: &str) -> Result<Description> {
        let xml = self.fetch(url)?;
        let description = Description::from_xml(url, &xml)?;
        tracing::debug!(
            "Loaded device description {} ({} services)",
            url,
            description.device.all_services().len()
        );
        Ok(description)
    }

    /// Fetch and parse the SCPD document of one service.
    pub fn load_service(&self, url: &str) -> Result<ServiceDescription> {
        let xml = self.fetch(url)?;
        let description = ServiceDescription::from_xml(url, &xml)?;
        tracing::debug!(
            "Loaded service description {} ({} actions)",
            url,
            description.actions().len()
        );
        Ok(description)
    }

    fn fetch(&self, url: &str) -> Result<String> {
        let fetched = self
            .transport
            .fetch(url)
            .map_err(|source| DescriptionError::Unreachable {
                url: url.to_string(),
                source,
            })?;

        // The device serves its login page instead of the document when the
        // resource needs authentication
        if fetched
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("text/html"))
        {
            return Err(DescriptionError::LoginRequired(url.to_string()));
        }

        String::from_utf8(fetched.body)
            .map_err(|e| DescriptionError::ParseError(format!("{} is not valid UTF-8: {}", url, e)))
    }
}
