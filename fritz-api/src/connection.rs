//! The connection facade: bootstrap from the device descriptions, then call actions by name

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use fritz_description::SystemVersion;
use soap_client::{HttpTransport, Transport};

use crate::config::{ConnectionConfig, Protocol, Settings, IGD_DESCRIPTION, TR64_DESCRIPTION};
use crate::devices::DeviceManager;
use crate::service::{self, ServiceDescriptor};
use crate::soaper::{ActionResponse, Soaper};
use crate::value::CallArguments;
use crate::{FritzError, Result};

/// Connection to one FRITZ!Box
///
/// Creating a connection reads the device descriptions and the description
/// of every service the device offers, so it issues many requests. Create it
/// once per device and reuse it.
///
/// # Example
///
/// ```rust,no_run
/// use fritz_api::{Arguments, ConnectionConfig, FritzConnection};
///
/// let fc = FritzConnection::new(ConnectionConfig::new().address("192.168.178.1").password("secret"))?;
/// println!("{}", fc);
///
/// let info = fc.call_action("WANIPConn", "GetStatusInfo", Arguments::new())?;
/// println!("{:?}", info.get("NewConnectionStatus"));
/// # Ok::<(), fritz_api::FritzError>(())
/// ```
#[derive(Debug)]
pub struct FritzConnection {
    settings: Settings,
    soaper: Soaper,
    device_manager: DeviceManager,
}

impl FritzConnection {
    /// Connect using the HTTP transport; missing credentials are read from
    /// `FRITZ_USERNAME` and `FRITZ_PASSWORD`.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let settings = config.resolve_from_env();
        let transport = HttpTransport::new(&settings.transport_config())?;
        Self::from_settings(settings, Arc::new(transport))
    }

    /// Connect through the given transport, resolving credentials from the
    /// process environment.
    pub fn with_transport(config: ConnectionConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::from_settings(config.resolve_from_env(), transport)
    }

    /// Connect with fully resolved settings through the given transport.
    ///
    /// The IGD description is always requested; the TR-064 description only
    /// when a password is set. Either may be missing on the device.
    pub fn from_settings(settings: Settings, transport: Arc<dyn Transport>) -> Result<Self> {
        let soaper = Soaper::new(
            Arc::clone(&transport),
            &settings.address,
            settings.protocol,
            settings.port,
            &settings.credentials,
        );
        let mut device_manager = DeviceManager::new(transport);

        let mut descriptions = vec![IGD_DESCRIPTION];
        if settings.credentials.has_password() {
            descriptions.push(TR64_DESCRIPTION);
        }
        for description in descriptions {
            device_manager.add_description(&settings.url_for(description))?;
        }

        device_manager.scan();
        device_manager.load_service_descriptions(&settings.address, settings.protocol, settings.port)?;
        tracing::info!(
            "Connected to {} at {} ({} services)",
            device_manager.modelname().unwrap_or("unknown device"),
            settings.address,
            device_manager.services().len()
        );

        Ok(Self {
            settings,
            soaper,
            device_manager,
        })
    }

    /// See [`crate::normalize_name`]
    pub fn normalize_name(name: &str) -> String {
        service::normalize_name(name)
    }

    /// Execute an action of a service.
    ///
    /// `service_name` is normalized first, so `WLANConfiguration`,
    /// `WLANConfiguration:1` and `WLANConfiguration1` name the same service.
    /// Arguments can be an [`Arguments`](crate::Arguments) map or a
    /// [`CallArguments`] with keyword arguments.
    pub fn call_action(
        &self,
        service_name: &str,
        action_name: &str,
        arguments: impl Into<CallArguments>,
    ) -> Result<ActionResponse> {
        let service_name = Self::normalize_name(service_name);
        let service = self
            .device_manager
            .service(&service_name)
            .ok_or_else(|| FritzError::ServiceNotFound(service_name.clone()))?;
        let arguments = arguments.into().resolve();
        self.soaper.execute(service, action_name, &arguments)
    }

    /// Drop the internet connection so the provider assigns a new address.
    pub fn reconnect(&self) -> Result<()> {
        self.call_action("WANIPConn1", "ForceTermination", CallArguments::new())
            .map(|_| ())
    }

    /// All services, keyed by normalized name
    pub fn services(&self) -> &BTreeMap<String, ServiceDescriptor> {
        self.device_manager.services()
    }

    pub fn modelname(&self) -> Option<&str> {
        self.device_manager.modelname()
    }

    /// Firmware version if known
    pub fn system_version(&self) -> Option<String> {
        self.device_manager.system_version()
    }

    pub fn system_info(&self) -> Option<&SystemVersion> {
        self.device_manager.system_info()
    }

    pub fn device_manager(&self) -> &DeviceManager {
        &self.device_manager
    }

    pub fn address(&self) -> &str {
        &self.settings.address
    }

    pub fn port(&self) -> u16 {
        self.settings.port
    }

    pub fn protocol(&self) -> Protocol {
        self.settings.protocol
    }
}

impl fmt::Display for FritzConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at ip {}\nFRITZ!OS: {}",
            self.modelname().unwrap_or("unknown model"),
            self.settings.address,
            self.system_version().as_deref().unwrap_or("unknown")
        )
    }
}
