//! Private SOAP client for TR-064 device communication
//!
//! This crate provides the transport collaborator of the fritz-sdk: a shared
//! HTTP session for fetching description documents and posting SOAP requests,
//! plus the envelope handling around those requests.

mod error;
mod transport;

pub use error::{SoapError, SoapFault};
pub use transport::{Fetched, HttpTransport, RawResponse, SoapRequest, Transport, TransportConfig};

use xmltree::Element;

/// Content type sent with every SOAP request
pub const CONTENT_TYPE: &str = "text/xml; charset=\"utf-8\"";

/// Wrap an action payload into a SOAP 1.1 envelope.
///
/// `payload` must already be serialized XML for the action's in-arguments.
pub fn envelope(namespace: &str, action: &str, payload: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/"><s:Body><u:{action} xmlns:u="{namespace}">{payload}</u:{action}></s:Body></s:Envelope>"#,
        action = action,
        namespace = namespace,
        payload = payload
    )
}

/// Value of the `SOAPACTION` header for an action of the given service type
pub fn soap_action(namespace: &str, action: &str) -> String {
    format!("\"{}#{}\"", namespace, action)
}

/// Build the POST for an action, ready to be handed to a [`Transport`].
pub fn request(
    url: &str,
    namespace: &str,
    action: &str,
    payload: &str,
    authorization: Option<&str>,
) -> SoapRequest {
    let mut headers = vec![
        ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
        ("SOAPACTION".to_string(), soap_action(namespace, action)),
    ];
    if let Some(value) = authorization {
        headers.push(("Authorization".to_string(), value.to_string()));
    }
    SoapRequest {
        url: url.to_string(),
        headers,
        body: envelope(namespace, action, payload),
    }
}

/// Parse a SOAP response body and return the action's response element.
///
/// A `<Fault>` inside the body is returned as [`SoapError::Fault`]. Otherwise
/// the `{action}Response` element is returned, or the first element in the
/// body when the device names it differently.
pub fn parse_response(body: &[u8], action: &str) -> Result<Element, SoapError> {
    let xml = Element::parse(body).map_err(|e| SoapError::Parse(e.to_string()))?;
    extract_response(&xml, action)
}

/// Look for a SOAP fault in a body that may or may not be an envelope.
///
/// Used for non-success HTTP answers, where the body is often a fault but can
/// be anything.
pub fn parse_fault(body: &[u8]) -> Option<SoapFault> {
    let xml = Element::parse(body).ok()?;
    xml.get_child("Body")?.get_child("Fault").map(fault_from)
}

fn extract_response(xml: &Element, action: &str) -> Result<Element, SoapError> {
    let body = xml
        .get_child("Body")
        .ok_or_else(|| SoapError::Parse("Missing SOAP Body".to_string()))?;

    // Check for SOAP fault first
    if let Some(fault) = body.get_child("Fault") {
        return Err(SoapError::Fault(fault_from(fault)));
    }

    let response_name = format!("{}Response", action);
    body.get_child(response_name.as_str())
        .or_else(|| body.children.iter().find_map(|node| node.as_element()))
        .cloned()
        .ok_or_else(|| SoapError::Parse(format!("Missing {} element", response_name)))
}

fn fault_from(fault: &Element) -> SoapFault {
    let text = |element: Option<&Element>| {
        element
            .and_then(|e| e.get_text())
            .map(|t| t.trim().to_string())
    };
    let upnp_error = fault.get_child("detail").and_then(|d| {
        d.get_child("UPnPError").or_else(|| d.get_child("UpnPError"))
    });

    SoapFault {
        fault_code: text(fault.get_child("faultcode")).unwrap_or_default(),
        fault_string: text(fault.get_child("faultstring")).unwrap_or_default(),
        upnp_error_code: text(upnp_error.and_then(|e| e.get_child("errorCode")))
            .and_then(|c| c.parse::<u16>().ok()),
        upnp_error_description: text(upnp_error.and_then(|e| e.get_child("errorDescription"))),
    }
}
