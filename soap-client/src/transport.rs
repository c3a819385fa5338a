//! Shared HTTP session used for every request issued against one device.

use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::SoapError;

/// Body of a successful GET together with its declared content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// A SOAP POST ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Raw answer to a SOAP POST. Non-success statuses are returned here rather
/// than raised, because SOAP faults travel with HTTP 500.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The transport collaborator: fetch a resource, or send a SOAP request.
///
/// Implementations carry their own timeout and trust configuration, so every
/// call issued through one instance behaves the same way.
pub trait Transport: std::fmt::Debug {
    /// GET `url` and return its body.
    fn fetch(&self, url: &str) -> Result<Fetched, SoapError>;

    /// POST a SOAP request and return the status and body.
    fn post(&self, request: &SoapRequest) -> Result<RawResponse, SoapError>;
}

/// Session settings for [`HttpTransport`]
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Applied to every request; `None` blocks indefinitely
    pub timeout: Option<Duration>,
    /// PEM file added to the trusted roots
    pub certificate: Option<PathBuf>,
    /// When false, TLS certificates are still validated against the trusted
    /// roots but the hostname they are issued for is not checked. Routers
    /// commonly present certificates bound to an internal name.
    pub verify_hostname: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            certificate: None,
            verify_hostname: true,
        }
    }
}

impl TransportConfig {
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn certificate(mut self, certificate: Option<PathBuf>) -> Self {
        self.certificate = certificate;
        self
    }

    pub fn verify_hostname(mut self, verify: bool) -> Self {
        self.verify_hostname = verify;
        self
    }
}

/// [`Transport`] backed by a pooled `ureq` agent
#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    /// Build a session from the given configuration
    pub fn new(config: &TransportConfig) -> Result<Self, SoapError> {
        let mut tls = native_tls::TlsConnector::builder();
        tls.danger_accept_invalid_hostnames(!config.verify_hostname);
        if let Some(path) = &config.certificate {
            let pem = std::fs::read(path).map_err(|e| {
                SoapError::Config(format!("cannot read certificate {}: {}", path.display(), e))
            })?;
            let certificate = native_tls::Certificate::from_pem(&pem).map_err(|e| {
                SoapError::Config(format!("invalid certificate {}: {}", path.display(), e))
            })?;
            tls.add_root_certificate(certificate);
        }
        let connector = tls
            .build()
            .map_err(|e| SoapError::Config(format!("cannot set up TLS: {}", e)))?;

        let mut builder = ureq::AgentBuilder::new().tls_connector(Arc::new(connector));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            agent: builder.build(),
        })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<Fetched, SoapError> {
        tracing::debug!("GET {}", url);
        match self.agent.get(url).call() {
            Ok(response) => {
                let content_type = response.header("Content-Type").map(str::to_string);
                let body = read_body(url, response)?;
                Ok(Fetched { content_type, body })
            }
            Err(ureq::Error::Status(status, _)) => Err(SoapError::Http {
                status,
                url: url.to_string(),
            }),
            Err(ureq::Error::Transport(transport)) => Err(transport_error(url, transport)),
        }
    }

    fn post(&self, request: &SoapRequest) -> Result<RawResponse, SoapError> {
        tracing::debug!("POST {}", request.url);
        let mut call = self.agent.post(&request.url);
        for (name, value) in &request.headers {
            call = call.set(name, value);
        }

        let response = match call.send_string(&request.body) {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => {
                return Err(transport_error(&request.url, transport))
            }
        };
        let status = response.status();
        let body = read_body(&request.url, response)?;
        Ok(RawResponse { status, body })
    }
}

fn read_body(url: &str, response: ureq::Response) -> Result<Vec<u8>, SoapError> {
    let mut body = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut body)
        .map_err(|e| io_error(url, &e))?;
    Ok(body)
}

fn is_timeout(error: &io::Error) -> bool {
    matches!(error.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

fn io_error(url: &str, error: &io::Error) -> SoapError {
    if is_timeout(error) {
        SoapError::Timeout(format!("{}: {}", url, error))
    } else {
        SoapError::Connect(format!("{}: {}", url, error))
    }
}

fn transport_error(url: &str, transport: ureq::Transport) -> SoapError {
    let timed_out = std::error::Error::source(&transport)
        .and_then(|source| source.downcast_ref::<io::Error>())
        .map(is_timeout)
        .unwrap_or(false);

    // The transport error already names the URL when it knows it
    let message = match transport.url() {
        Some(_) => transport.to_string(),
        None => format!("{}: {}", url, transport),
    };
    if timed_out {
        SoapError::Timeout(message)
    } else {
        SoapError::Connect(message)
    }
}
