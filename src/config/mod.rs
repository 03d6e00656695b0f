use std::ffi::OsString;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use log::{debug, warn};

use crate::errors::EditorError;

/// Port the server listens on unless `MDPAD_PORT` says otherwise
pub const DEFAULT_PORT: u16 = 8000;

/// Largest request body accepted by `/save` and `/preview`
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Application configuration and constants
#[derive(Debug, Clone)]
pub struct Config {
    pub root_dir: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_bytes: usize,
}

impl Config {
    /// Create a new configuration serving `root_dir` with default values
    pub fn new(root_dir: PathBuf) -> Self {
        Self {
            root_dir,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Build the configuration from the environment.
    ///
    /// `MDPAD_ROOT` overrides the served directory (default: the working
    /// directory) and `MDPAD_PORT` overrides the port.
    pub fn from_env() -> Result<Self, EditorError> {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Build the configuration from `lookup`, which maps a variable name to its value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Result<Self, EditorError> {
        let root_dir = match lookup("MDPAD_ROOT") {
            Some(root) => PathBuf::from(root),
            None => std::env::current_dir()?,
        };
        let mut config = Self::new(root_dir);

        if let Some(raw) = lookup("MDPAD_PORT") {
            let raw = raw.to_string_lossy();
            match raw.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => warn!("Ignoring invalid MDPAD_PORT '{}', using {}", raw, DEFAULT_PORT),
            }
        }

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Check that the root directory exists and is a directory
    pub fn validate(&self) -> Result<(), EditorError> {
        if !self.root_dir.exists() {
            return Err(EditorError::InvalidRoot(format!(
                "{} does not exist",
                self.root_dir.display()
            )));
        }
        if !self.root_dir.is_dir() {
            return Err(EditorError::InvalidRoot(format!(
                "{} is not a directory",
                self.root_dir.display()
            )));
        }
        Ok(())
    }

    /// Get the socket address for binding
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
