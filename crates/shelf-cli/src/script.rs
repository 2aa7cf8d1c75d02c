//! # Operation Scripts
//!
//! A script is an ordered YAML list of ledger operations, each naming the
//! principal that performs it:
//!
//! ```yaml
//! steps:
//!   - op: add_item
//!     caller: librarian
//!     name: Dune
//!     author: Herbert
//!     copies: 6
//!   - op: borrow
//!     caller: alice
//!     name: Dune
//!     author: Herbert
//!   - op: history
//!     name: Dune
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use shelf_core::{ItemId, Principal};

/// One scripted operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    AddItem {
        caller: Principal,
        name: String,
        author: String,
        #[serde(default)]
        copies: u32,
    },
    TransferAdmin {
        caller: Principal,
        to: Principal,
    },
    Borrow {
        caller: Principal,
        name: String,
        author: String,
    },
    ReturnItem {
        caller: Principal,
        name: String,
        author: String,
    },
    ListAvailable,
    History {
        name: String,
    },
}

impl Step {
    /// The operation name as written in scripts.
    pub fn op(&self) -> &'static str {
        match self {
            Self::AddItem { .. } => "add_item",
            Self::TransferAdmin { .. } => "transfer_admin",
            Self::Borrow { .. } => "borrow",
            Self::ReturnItem { .. } => "return_item",
            Self::ListAvailable => "list_available",
            Self::History { .. } => "history",
        }
    }

    /// The item a borrow or return targets.
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            Self::Borrow { name, author, .. } | Self::ReturnItem { name, author, .. } => {
                Some(ItemId::derive(name.as_str(), author.as_str()))
            }
            _ => None,
        }
    }
}

/// A parsed script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    /// Parse a script from YAML text.
    pub fn parse(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("malformed script")
    }

    /// Read and parse a script file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Number of steps per operation name.
    pub fn op_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for step in &self.steps {
            *counts.entry(step.op()).or_insert(0) += 1;
        }
        counts
    }
}
