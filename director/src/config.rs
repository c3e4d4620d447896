use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use thiserror::Error;

pub const SERVICE_DOMAIN_ENV: &str = "NIMBUS_IO_SERVICE_DOMAIN";
pub const READ_PORT_ENV: &str = "NIMBUSIO_WEB_PUBLIC_READER_PORT";
pub const WRITE_PORT_ENV: &str = "NIMBUSIO_WEB_WRITER_PORT";

const DEFAULT_PROBE_TIMEOUT_MS: u64 = 500;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Service domain cannot be empty")]
    EmptyServiceDomain,

    #[error("Environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("Environment variable {var} is not a valid port: '{value}'")]
    InvalidPortValue { var: &'static str, value: String },

    #[error("At least one management API destination is required")]
    EmptyDestinations,

    #[error("Collection '{0}' lists an empty host name")]
    EmptyHostName(String),

    #[error("Collection '{0}' lists a host more than once")]
    DuplicateHost(String),

    #[error("Probe timeout cannot be 0")]
    InvalidProbeTimeout,
}

/// Decision service configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Listener answering routing decisions
    pub listener: Listener,
    /// Admin listener for health and readiness probes
    pub admin_listener: Listener,
    /// Service domain and destination ports. Read from the environment when absent.
    #[serde(default)]
    pub router: Option<RouterConfig>,
    pub management_api: ManagementApiConfig,
    /// Maps each collection name to the hosts that serve it
    #[serde(default)]
    pub collections: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub availability: AvailabilityConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        self.admin_listener.validate()?;
        self.router_config()?;

        if self.management_api.destinations.is_empty() {
            return Err(ValidationError::EmptyDestinations);
        }

        for (collection, hosts) in &self.collections {
            let mut seen = HashSet::new();
            for host in hosts {
                if host.is_empty() {
                    return Err(ValidationError::EmptyHostName(collection.clone()));
                }
                if !seen.insert(host) {
                    return Err(ValidationError::DuplicateHost(collection.clone()));
                }
            }
        }

        if self.availability.probe_timeout_ms == 0 {
            return Err(ValidationError::InvalidProbeTimeout);
        }

        Ok(())
    }

    /// The configured router section, or one built from the process environment.
    pub fn router_config(&self) -> Result<RouterConfig, ValidationError> {
        let router = match &self.router {
            Some(router) => router.clone(),
            None => RouterConfig::from_env()?,
        };
        router.validate()?;
        Ok(router)
    }
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

/// Settings the router needs to take a decision. Fixed for the life of the process.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RouterConfig {
    /// DNS zone of the service, e.g. "nimbus.io"
    pub service_domain: String,
    /// Destination port for GET and HEAD
    pub read_port: u16,
    /// Destination port for POST, PUT, PATCH and DELETE
    pub write_port: u16,
}

impl RouterConfig {
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from any key/value source shaped like the environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_domain =
            lookup(SERVICE_DOMAIN_ENV).ok_or(ValidationError::MissingEnv(SERVICE_DOMAIN_ENV))?;

        let port = |var: &'static str| -> Result<u16, ValidationError> {
            let value = lookup(var).ok_or(ValidationError::MissingEnv(var))?;
            value
                .trim()
                .parse()
                .map_err(|_| ValidationError::InvalidPortValue { var, value })
        };

        Ok(Self {
            service_domain,
            read_port: port(READ_PORT_ENV)?,
            write_port: port(WRITE_PORT_ENV)?,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.service_domain.trim().is_empty() {
            return Err(ValidationError::EmptyServiceDomain);
        }
        if self.read_port == 0 || self.write_port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ManagementApiConfig {
    /// `host:port` destinations for requests addressed to the bare service domain
    pub destinations: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AvailabilityConfig {
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

impl AvailabilityConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }
}

fn default_probe_timeout_ms() -> u64 {
    DEFAULT_PROBE_TIMEOUT_MS
}
