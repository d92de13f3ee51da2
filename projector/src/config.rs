//! TOML configuration for the balancer and the decoration policy.
//!
//! ```toml
//! [balancer]
//! max_children = [12, 8]   # per depth; the last entry applies below
//! label_truncation = 24
//!
//! [style.class-with-instances]
//! background = "#ffefd5"
//! foreground = 0x000000
//! icon = "classwithinstances.png"
//!
//! [labels]
//! instances = "members"
//! ```
//!
//! Every table and key is optional.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::decoration::{GroupLabel, NodeRole};
use crate::tree::{NodeStyle, Rgb};

/// Default per-depth fan-out used when no table is configured.
pub const DEFAULT_MAX_CHILDREN: usize = 12;

/// Default number of characters kept from a label in a group name.
pub const DEFAULT_LABEL_TRUNCATION: usize = 24;

/// Failure to load a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read configuration {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The file is not valid TOML for this schema.
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
    /// A value is syntactically valid but unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Complete projector configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectorConfig {
    /// Child-list balancing.
    pub balancer: BalancerConfig,
    /// Style overrides by role.
    pub style: BTreeMap<NodeRole, StyleOverride>,
    /// Group label overrides.
    pub labels: BTreeMap<GroupLabel, String>,
}

impl ProjectorConfig {
    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] for malformed input and
    /// [`ConfigError::Invalid`] for a fan-out below 2.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        if let Some(&bad) = config.balancer.max_children.iter().find(|&&n| n < 2) {
            return Err(ConfigError::Invalid(format!(
                "balancer.max_children entries must be at least 2, got {bad}"
            )));
        }
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`ProjectorConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

/// Balancer settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BalancerConfig {
    /// Maximum children per node, indexed by the node's depth.
    pub max_children: Vec<usize>,
    /// Characters kept from member labels when naming a group.
    pub label_truncation: usize,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            max_children: vec![DEFAULT_MAX_CHILDREN],
            label_truncation: DEFAULT_LABEL_TRUNCATION,
        }
    }
}

/// Partial style; unset keys keep the built-in value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleOverride {
    /// Fill color.
    pub background: Option<Rgb>,
    /// Text color.
    pub foreground: Option<Rgb>,
    /// Edge color.
    pub edge: Option<Rgb>,
    /// Image file name.
    pub icon: Option<String>,
}

impl StyleOverride {
    /// Writes every set key into `style`.
    pub fn apply(&self, style: &mut NodeStyle) {
        if self.background.is_some() {
            style.background = self.background;
        }
        if self.foreground.is_some() {
            style.foreground = self.foreground;
        }
        if self.edge.is_some() {
            style.edge = self.edge;
        }
        if let Some(icon) = &self.icon {
            style.icon = Some(icon.clone());
        }
    }
}
