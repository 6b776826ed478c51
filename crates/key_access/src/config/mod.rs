//! Gate configuration.
//!
//! Integrations tune the deny-list and cache from a TOML document:
//!
//! ```toml
//! [deny]
//! extend_defaults = true
//! keys = ["password"]
//! allow = ["hash"]
//!
//! [cache]
//! enabled = true
//! shards = 16
//! max_entries = 65536
//! ```

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Upper bound on cache shards.
pub const MAX_SHARDS: usize = 1024;

/// Top-level gate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
	pub deny: DenyConfig,
	pub cache: CacheConfig,
}

/// Deny-list configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DenyConfig {
	/// Start from [`DEFAULT_DENIED_KEYS`](crate::DEFAULT_DENIED_KEYS).
	pub extend_defaults: bool,
	/// Additional denied keys.
	pub keys: Vec<String>,
	/// Default keys to re-allow. Applied after `keys`.
	pub allow: Vec<String>,
}

impl Default for DenyConfig {
	fn default() -> Self {
		Self {
			extend_defaults: true,
			keys: Vec::new(),
			allow: Vec::new(),
		}
	}
}

/// Verdict cache configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
	pub enabled: bool,
	/// Lock shards; rounded up to a power of two.
	pub shards: usize,
	/// Entries stored before new verdicts stop being cached.
	pub max_entries: usize,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			shards: 16,
			max_entries: 65_536,
		}
	}
}

impl CacheConfig {
	/// Checks shard and capacity bounds.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.shards == 0 || self.shards > MAX_SHARDS {
			return Err(ConfigError::InvalidShards(self.shards));
		}
		if self.enabled && self.max_entries == 0 {
			return Err(ConfigError::ZeroCapacity);
		}
		Ok(())
	}
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// The config file could not be read.
	#[error("failed to read {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The document is not valid TOML or does not match the schema.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("cache shards must be between 1 and {MAX_SHARDS}, got {0}")]
	InvalidShards(usize),

	#[error("cache max_entries must be non-zero when the cache is enabled")]
	ZeroCapacity,
}

impl GateConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		let config: GateConfig = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses and validates a TOML file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content)
	}

	/// Checks every section.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.cache.validate()
	}
}
