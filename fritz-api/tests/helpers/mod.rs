//! Test helpers: fixtures and an in-memory device

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use fritz_api::{ConnectionConfig, Protocol, Settings};
use soap_client::{Fetched, RawResponse, SoapError, SoapRequest, Transport};

pub const BASE_URL: &str = "http://192.168.178.1:49000";

/// Load a fixture from the fixtures directory
pub fn load_fixture(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);

    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e))
}

/// Wrap an action response payload into a SOAP envelope
pub fn envelope(body: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
<s:Body>{}</s:Body>
</s:Envelope>"#,
        body
    )
}

/// Settings for the mock device, with or without a password
pub fn settings(password: Option<&str>) -> Settings {
    let mut config = ConnectionConfig::new()
        .address("192.168.178.1")
        .protocol(Protocol::Http);
    if let Some(password) = password {
        config = config.password(password);
    }
    // Keep the host environment out of the tests
    config.resolve(|_| None)
}

#[derive(Debug, Clone)]
enum Document {
    Xml(String),
    Html(String),
    Timeout,
}

#[derive(Debug, Default)]
struct State {
    documents: HashMap<String, Document>,
    responses: HashMap<String, RawResponse>,
    fetched: Vec<String>,
    requests: Vec<SoapRequest>,
}

/// In-memory device answering GETs with registered documents and POSTs with
/// registered responses, keyed by path. Unknown paths answer 404.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full TR-064 and IGD fixture set
    pub fn fritzbox() -> Self {
        let transport = Self::new();
        for (path, fixture) in [
            ("/igddesc.xml", "igddesc.xml"),
            ("/tr64desc.xml", "tr64desc.xml"),
            ("/any.xml", "anySCPD.xml"),
            ("/igdicfgSCPD.xml", "igdicfgSCPD.xml"),
            ("/igdconnSCPD.xml", "igdconnSCPD.xml"),
            ("/deviceinfoSCPD.xml", "deviceinfoSCPD.xml"),
            ("/hostsSCPD.xml", "hostsSCPD.xml"),
            ("/wlanconfigSCPD.xml", "wlanconfigSCPD.xml"),
        ] {
            transport.document(path, &load_fixture(fixture));
        }
        transport
    }

    pub fn document(&self, path: &str, xml: &str) -> &Self {
        self.set_document(path, Document::Xml(xml.to_string()));
        self
    }

    pub fn login_page(&self, path: &str) -> &Self {
        self.set_document(path, Document::Html("<html><body>Login</body></html>".to_string()));
        self
    }

    pub fn timeout(&self, path: &str) -> &Self {
        self.set_document(path, Document::Timeout);
        self
    }

    pub fn remove(&self, path: &str) -> &Self {
        self.lock().documents.remove(&format!("{}{}", BASE_URL, path));
        self
    }

    /// Answer POSTs to `control_path`
    pub fn respond(&self, control_path: &str, status: u16, body: &str) -> &Self {
        self.lock().responses.insert(
            format!("{}{}", BASE_URL, control_path),
            RawResponse {
                status,
                body: body.as_bytes().to_vec(),
            },
        );
        self
    }

    /// URLs fetched so far, in order
    pub fn fetched(&self) -> Vec<String> {
        self.lock().fetched.clone()
    }

    /// SOAP requests sent so far, in order
    pub fn requests(&self) -> Vec<SoapRequest> {
        self.lock().requests.clone()
    }

    pub fn last_request(&self) -> SoapRequest {
        self.requests().pop().expect("no request was sent")
    }

    pub fn shared(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }

    fn set_document(&self, path: &str, document: Document) {
        self.lock()
            .documents
            .insert(format!("{}{}", BASE_URL, path), document);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("mock state poisoned")
    }
}

impl Transport for MockTransport {
    fn fetch(&self, url: &str) -> Result<Fetched, SoapError> {
        let mut state = self.lock();
        state.fetched.push(url.to_string());
        match state.documents.get(url).cloned() {
            Some(Document::Xml(xml)) => Ok(Fetched {
                content_type: Some("text/xml".to_string()),
                body: xml.into_bytes(),
            }),
            Some(Document::Html(html)) => Ok(Fetched {
                content_type: Some("text/html; charset=utf-8".to_string()),
                body: html.into_bytes(),
            }),
            Some(Document::Timeout) => Err(SoapError::Timeout(format!("{} timed out", url))),
            None => Err(SoapError::Http {
                status: 404,
                url: url.to_string(),
            }),
        }
    }

    fn post(&self, request: &SoapRequest) -> Result<RawResponse, SoapError> {
        let mut state = self.lock();
        state.requests.push(request.clone());
        Ok(state.responses.get(&request.url).cloned().unwrap_or(RawResponse {
            status: 404,
            body: Vec::new(),
        }))
    }
}
