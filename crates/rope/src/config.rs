//! Tunables for rope sessions, loaded from TOML

use crate::arena::Arena;
use crate::error::{Result, RopeError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RopeConfig {
    /// Node slots reserved by each session arena
    #[serde(default = "default_arena_capacity")]
    pub arena_capacity: usize,
    /// Leaf size used when loading text
    #[serde(default = "default_max_leaf_bytes")]
    pub max_leaf_bytes: usize,
    /// Undo steps kept per document
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for RopeConfig {
    fn default() -> Self {
        Self {
            arena_capacity: default_arena_capacity(),
            max_leaf_bytes: default_max_leaf_bytes(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_arena_capacity() -> usize {
    65_536
}

fn default_max_leaf_bytes() -> usize {
    1024
}

fn default_history_limit() -> usize {
    100
}

impl RopeConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        debug!(?config, "rope config parsed");
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading rope config");
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if self.arena_capacity == 0 {
            return Err(RopeError::InvalidConfig("arena_capacity must be positive".into()));
        }
        if self.max_leaf_bytes == 0 {
            return Err(RopeError::InvalidConfig("max_leaf_bytes must be positive".into()));
        }
        Ok(())
    }

    /// Fresh root arena sized by `arena_capacity`
    pub fn arena(&self) -> Result<Arena<'static>> {
        Arena::new(self.arena_capacity)
    }
}
