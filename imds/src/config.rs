use crate::document::DocumentFormat;
use crate::store::DEFAULT_DOCUMENT;
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("store base_dir {0} does not exist or is not a directory")]
    MissingBaseDir(PathBuf),

    #[error("store base_dir {0} has no {DEFAULT_DOCUMENT} document")]
    MissingDefaultDocument(PathBuf),
}

/// Service configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Listener for incoming metadata requests
    #[serde(default)]
    pub listener: Listener,
    /// Backing document store
    pub store: StoreConfig,
    /// How the requesting client is identified
    #[serde(default)]
    pub identity: IdentityConfig,
    /// How user-data responses are encoded
    #[serde(default)]
    pub user_data: UserDataConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }

    /// Validates fatal startup conditions before the listener binds.
    ///
    /// A store directory without a `default` document would fail every
    /// request from an unknown identity, so it is rejected here instead.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.listener.port == 0 {
            return Err(ValidationError::InvalidPort);
        }

        let base_dir = &self.store.base_dir;
        if !base_dir.is_dir() {
            return Err(ValidationError::MissingBaseDir(base_dir.clone()));
        }

        if !base_dir.join(DEFAULT_DOCUMENT).is_file() {
            return Err(ValidationError::MissingDefaultDocument(base_dir.clone()));
        }

        Ok(())
    }
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    /// Host address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

/// Document store configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Directory holding one document per client identity plus `default`
    pub base_dir: PathBuf,
    /// Encoding of the stored documents, fixed per deployment
    #[serde(default)]
    pub format: DocumentFormat,
}

/// Identity resolution strategy, selected once at startup.
///
/// The forwarding header is client-spoofable unless a reverse proxy strips
/// it, so `forwarded_header` is an explicit opt-in rather than a default.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum IdentityConfig {
    /// Peer IP address, port stripped
    Peer,
    /// Trusted forwarding header, falling back to the peer address
    ForwardedHeader {
        #[serde(default = "default_forwarded_header")]
        header: String,
    },
    /// Peer IP translated to a hardware address via an ARP table
    Arp {
        #[serde(default = "default_arp_table_path")]
        table_path: PathBuf,
    },
}

impl Default for IdentityConfig {
    fn default() -> Self {
        IdentityConfig::Peer
    }
}

fn default_forwarded_header() -> String {
    "X-Forwarded-For".into()
}

fn default_arp_table_path() -> PathBuf {
    "/proc/net/arp".into()
}

/// Response encoding for the user-data endpoint
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UserDataOutput {
    /// YAML body prefixed with the `#cloud-config` header line
    #[default]
    CloudConfig,
    Json,
}

/// User-data rendering configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UserDataConfig {
    #[serde(default)]
    pub output: UserDataOutput,
    /// Inject the datasource directive telling cloud-init not to treat
    /// this datasource as strict
    #[serde(default = "default_inject_datasource")]
    pub inject_datasource: bool,
}

impl Default for UserDataConfig {
    fn default() -> Self {
        UserDataConfig {
            output: UserDataOutput::default(),
            inject_datasource: true,
        }
    }
}

fn default_inject_datasource() -> bool {
    true
}
