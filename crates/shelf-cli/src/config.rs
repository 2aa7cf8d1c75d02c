//! # Configuration
//!
//! Resolves who administers the library and which items it starts with.
//!
//! Sources, in order of precedence:
//!
//! 1. `SHELF_ADMIN` environment variable (admin only).
//! 2. YAML config file passed with `--config`.
//!
//! ```yaml
//! admin: librarian
//! seed:
//!   - name: Dune
//!     author: Herbert
//!     copies: 6
//! ```
//!
//! Resolution fails when neither source names an admin.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use shelf_core::Principal;

/// Environment variable overriding the configured admin.
pub const ADMIN_ENV_VAR: &str = "SHELF_ADMIN";

/// An item admitted by the admin before any script step runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedItem {
    pub name: String,
    pub author: String,
    #[serde(default = "default_copies")]
    pub copies: u32,
}

fn default_copies() -> u32 {
    1
}

/// On-disk shape of the config file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub admin: Option<Principal>,
    #[serde(default)]
    pub seed: Vec<SeedItem>,
}

impl ConfigFile {
    /// Read and parse a YAML config file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfConfig {
    pub admin: Principal,
    pub seed: Vec<SeedItem>,
}

impl ShelfConfig {
    /// Load from an optional config file plus the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = path.map(ConfigFile::read).transpose()?;
        let env_admin = std::env::var(ADMIN_ENV_VAR).ok();
        Self::resolve(file, env_admin)
    }

    /// Merge a parsed file with an environment override.
    pub fn resolve(file: Option<ConfigFile>, env_admin: Option<String>) -> Result<Self> {
        let file = file.unwrap_or_default();
        let admin = match env_admin.filter(|s| !s.is_empty()) {
            Some(admin) => {
                tracing::debug!(admin = %admin, "admin taken from {ADMIN_ENV_VAR}");
                Principal::new(admin)
            }
            None => match file.admin {
                Some(admin) => admin,
                None => bail!("no admin configured: set `admin` in the config file or {ADMIN_ENV_VAR}"),
            },
        };
        if admin.as_str().is_empty() {
            bail!("admin principal must not be empty");
        }
        Ok(Self {
            admin,
            seed: file.seed,
        })
    }
}
