//! Action dispatch: marshal arguments, send the SOAP request, decode the answer

use std::collections::BTreeMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use soap_client::{SoapError, SoapFault, Transport};
use xmltree::Element;

use crate::config::{Credentials, Protocol};
use crate::error::ActionFault;
use crate::service::{ActionDescriptor, ServiceDescriptor};
use crate::value::{Arguments, DataType, Value};
use crate::{FritzError, Result};

/// Output arguments of an action, keyed by argument name
pub type ActionResponse = BTreeMap<String, Value>;

/// Sends action calls to one device
#[derive(Debug, Clone)]
pub struct Soaper {
    transport: Arc<dyn Transport>,
    base_url: String,
    authorization: Option<String>,
}

impl Soaper {
    pub fn new(
        transport: Arc<dyn Transport>,
        address: &str,
        protocol: Protocol,
        port: u16,
        credentials: &Credentials,
    ) -> Self {
        // Without a password the device only serves unauthenticated actions
        let authorization = credentials.has_password().then(|| {
            let token = STANDARD.encode(format!("{}:{}", credentials.user, credentials.password));
            format!("Basic {}", token)
        });

        Self {
            transport,
            base_url: format!("{}://{}:{}", protocol, address, port),
            authorization,
        }
    }

    /// Execute `action_name` on `service`.
    ///
    /// # Errors
    ///
    /// * `ActionNotFound` if the service does not declare the action
    /// * `ArgumentMismatch` if an input argument is missing, has the wrong
    ///   type, or (for strict argument sets) is not declared
    /// * `Action` if the device answers with a fault or an error status
    /// * `Decode` if an output argument does not match its declared type
    pub fn execute(&self, service: &ServiceDescriptor, action_name: &str, arguments: &Arguments) -> Result<ActionResponse> {
        let action = service
            .action(action_name)
            .ok_or_else(|| FritzError::ActionNotFound {
                service: service.name().to_string(),
                action: action_name.to_string(),
            })?;

        let payload = marshal(action, arguments)?;
        let url = format!("{}{}", self.base_url, service.control_url());
        let request = soap_client::request(
            &url,
            service.namespace(),
            &action.name,
            &payload,
            self.authorization.as_deref(),
        );

        tracing::debug!("Calling {}.{} at {}", service.name(), action.name, url);
        let response = self.transport.post(&request)?;

        if !response.is_success() {
            let fault = soap_client::parse_fault(&response.body).unwrap_or_else(|| SoapFault {
                fault_code: format!("HTTP {}", response.status),
                fault_string: String::from_utf8_lossy(&response.body).trim().to_string(),
                upnp_error_code: None,
                upnp_error_description: None,
            });
            return Err(FritzError::Action(ActionFault::new(service.name(), &action.name, fault)));
        }

        let element = soap_client::parse_response(&response.body, &action.name).map_err(|e| match e {
            SoapError::Fault(fault) => FritzError::Action(ActionFault::new(service.name(), &action.name, fault)),
            other => other.into(),
        })?;

        unmarshal(action, &element)
    }
}

/// Serialize the input arguments in declaration order
fn marshal(action: &ActionDescriptor, arguments: &Arguments) -> Result<String> {
    let mismatch = |argument: &str, reason: &str| FritzError::ArgumentMismatch {
        action: action.name.clone(),
        argument: argument.to_string(),
        reason: reason.to_string(),
    };

    if !arguments.is_lenient() {
        if let Some(unknown) = arguments
            .names()
            .find(|name| !action.in_arguments().any(|a| a.name == *name))
        {
            return Err(mismatch(unknown, "not an input argument of this action"));
        }
    }

    let mut payload = String::new();
    for spec in action.in_arguments() {
        let value = arguments
            .get(&spec.name)
            .ok_or_else(|| mismatch(&spec.name, "missing"))?;
        if !spec.data_type.accepts(value) {
            return Err(mismatch(
                &spec.name,
                &format!("expected {}, got {:?}", spec.data_type, value),
            ));
        }

        let text = match (spec.data_type, value) {
            (DataType::Boolean, Value::Integer(i)) => Value::Boolean(*i != 0).to_wire(),
            // Validated after trimming, so sent trimmed
            (DataType::Integer | DataType::Boolean, Value::String(s)) => s.trim().to_string(),
            (_, value) => value.to_wire(),
        };
        payload.push_str(&format!(
            "<{name}>{text}</{name}>",
            name = spec.name,
            text = quick_xml::escape::escape(text.as_str())
        ));
    }
    Ok(payload)
}

/// Decode the children of the response element by their declared types
fn unmarshal(action: &ActionDescriptor, element: &Element) -> Result<ActionResponse> {
    let mut result = ActionResponse::new();
    for child in element.children.iter().filter_map(|node| node.as_element()) {
        let raw = child.get_text().map(|t| t.into_owned()).unwrap_or_default();
        let data_type = action
            .argument(&child.name)
            .map(|spec| spec.data_type)
            .unwrap_or(DataType::String);

        let value = data_type.decode(&raw).ok_or_else(|| FritzError::Decode {
            argument: child.name.clone(),
            data_type: data_type.to_string(),
            value: raw.clone(),
        })?;
        result.insert(child.name.clone(), value);
    }
    Ok(result)
}
