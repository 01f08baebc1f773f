//! Service configuration.
//!
//! Resolution order, later wins:
//!
//! 1. built-in defaults
//! 2. YAML file (`--config path/to/config.yaml`)
//! 3. environment (`CONTACT_US_BIND_ADDR`, `CONTACT_US_STORE_PATH`,
//!    `CONTACT_US_TEMPLATES_DIR`)
//! 4. command line flags
//!
//! ```yaml
//! bind_addr: 0.0.0.0:8080
//! store:
//!   kind: json_lines
//!   path: /var/lib/contact_us/requests.jsonl
//! templates_dir: /etc/contact_us/templates
//! ```

use crate::store::{ContactUsStore, InMemoryStore, JsonLinesStore};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// `host:port` to listen on
    pub bind_addr: String,
    pub store: StoreConfig,
    /// Directory whose templates override the built-in ones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
}

/// Where accepted requests are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Process memory; lost on restart
    #[default]
    Memory,
    /// Append-only JSON lines file
    JsonLines { path: PathBuf },
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            store: StoreConfig::default(),
            templates_dir: None,
        }
    }
}

impl ServiceConfig {
    /// Defaults, overlaid with the YAML file at `path` if one is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `CONTACT_US_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(addr) = lookup("CONTACT_US_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(path) = lookup("CONTACT_US_STORE_PATH") {
            self.store = StoreConfig::JsonLines {
                path: PathBuf::from(path),
            };
        }
        if let Some(dir) = lookup("CONTACT_US_TEMPLATES_DIR") {
            self.templates_dir = Some(PathBuf::from(dir));
        }
    }

    /// Reject configurations that cannot start a server.
    pub fn validate(&self) -> Result<()> {
        let Some((host, port)) = self.bind_addr.rsplit_once(':') else {
            bail!("bind_addr '{}' must be host:port", self.bind_addr);
        };
        if host.is_empty() {
            bail!("bind_addr '{}' is missing a host", self.bind_addr);
        }
        port.parse::<u16>()
            .with_context(|| format!("bind_addr '{}' has an invalid port", self.bind_addr))?;
        if let StoreConfig::JsonLines { path } = &self.store {
            if path.as_os_str().is_empty() {
                bail!("store path must not be empty");
            }
        }
        Ok(())
    }

    pub fn build_store(&self) -> Result<Arc<dyn ContactUsStore>> {
        match &self.store {
            StoreConfig::Memory => Ok(Arc::new(InMemoryStore::new())),
            StoreConfig::JsonLines { path } => {
                let store = JsonLinesStore::open(path)
                    .with_context(|| format!("Failed to open store {}", path.display()))?;
                Ok(Arc::new(store))
            }
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
