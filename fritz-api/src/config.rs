//! Connection settings and credential resolution

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use soap_client::TransportConfig;

use crate::{FritzError, Result};

/// Default address of a FRITZ!Box, reachable from any attached host
pub const DEFAULT_ADDRESS: &str = "169.254.1.1";
/// TR-064 port for plain HTTP
pub const DEFAULT_PORT: u16 = 49000;
/// TR-064 port for HTTPS
pub const DEFAULT_TLS_PORT: u16 = 49443;
/// Username used when neither the caller nor the environment provides one
pub const DEFAULT_USERNAME: &str = "dslf-config";
/// Environment variable consulted for the username
pub const USERNAME_ENV: &str = "FRITZ_USERNAME";
/// Environment variable consulted for the password
pub const PASSWORD_ENV: &str = "FRITZ_PASSWORD";
/// IGD description, readable without authentication
pub const IGD_DESCRIPTION: &str = "igddesc.xml";
/// TR-064 description, only useful with credentials
pub const TR64_DESCRIPTION: &str = "tr64desc.xml";

/// Transport protocol used to reach the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    /// Port used when the caller does not give one
    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => DEFAULT_PORT,
            Protocol::Https => DEFAULT_TLS_PORT,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = FritzError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(FritzError::Config(format!(
                "unsupported protocol '{}', expected http or https",
                other
            ))),
        }
    }
}

/// Resolved username and password
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }
}

// Keep the password out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &if self.has_password() { "***" } else { "" })
            .finish()
    }
}

/// Resolve credentials: explicit values win over the environment, which wins
/// over [`DEFAULT_USERNAME`] and an empty password.
///
/// `env` looks up an environment variable by name, e.g.
/// `|name| std::env::var(name).ok()`.
pub fn resolve_credentials<F>(user: Option<&str>, password: Option<&str>, env: F) -> Credentials
where
    F: Fn(&str) -> Option<String>,
{
    let user = user
        .map(str::to_string)
        .or_else(|| env(USERNAME_ENV))
        .unwrap_or_else(|| DEFAULT_USERNAME.to_string());
    let password = password
        .map(str::to_string)
        .or_else(|| env(PASSWORD_ENV))
        .unwrap_or_default();

    Credentials { user, password }
}

/// Connection parameters as given by the caller.
///
/// Every field is optional; [`ConnectionConfig::resolve`] fills in defaults.
///
/// ```
/// use fritz_api::{ConnectionConfig, Protocol};
/// use std::time::Duration;
///
/// let config = ConnectionConfig::new()
///     .address("192.168.178.1")
///     .protocol(Protocol::Https)
///     .password("secret")
///     .timeout(Duration::from_secs(10));
/// let settings = config.resolve(|_| None);
/// assert_eq!(settings.port, 49443);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConnectionConfig {
    address: Option<String>,
    port: Option<u16>,
    protocol: Protocol,
    certificate: Option<PathBuf>,
    user: Option<String>,
    password: Option<String>,
    timeout: Option<Duration>,
    verify_hostname: Option<bool>,
}

impl ConnectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// PEM file trusted in addition to the system roots
    pub fn certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.certificate = Some(path.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Applied to every request; without it requests block indefinitely
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether the TLS certificate must be issued for the device address.
    ///
    /// Off by default for HTTPS: FRITZ!Box certificates are self-issued for
    /// internal names such as `fritz.box`. The certificate itself is still
    /// checked against the trusted roots.
    pub fn verify_hostname(mut self, verify: bool) -> Self {
        self.verify_hostname = Some(verify);
        self
    }

    /// Fill in defaults, reading missing credentials through `env`.
    pub fn resolve<F>(self, env: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = resolve_credentials(self.user.as_deref(), self.password.as_deref(), env);
        let verify_hostname = self
            .verify_hostname
            .unwrap_or(self.protocol == Protocol::Http);

        Settings {
            address: self.address.unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            port: self.port.unwrap_or_else(|| self.protocol.default_port()),
            protocol: self.protocol,
            certificate: self.certificate,
            credentials,
            timeout: self.timeout,
            verify_hostname,
        }
    }

    /// Fill in defaults from the process environment
    pub fn resolve_from_env(self) -> Settings {
        self.resolve(|name| std::env::var(name).ok())
    }
}

/// Fully resolved connection settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub address: String,
    pub port: u16,
    pub protocol: Protocol,
    pub certificate: Option<PathBuf>,
    pub credentials: Credentials,
    pub timeout: Option<Duration>,
    pub verify_hostname: bool,
}

impl Settings {
    /// `{protocol}://{address}:{port}`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.address, self.port)
    }

    /// URL of a document served from the device root
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url(), path)
        } else {
            format!("{}/{}", self.base_url(), path)
        }
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig::default()
            .timeout(self.timeout)
            .certificate(self.certificate.clone())
            .verify_hostname(self.verify_hostname)
    }
}
