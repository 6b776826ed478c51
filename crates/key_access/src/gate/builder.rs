use std::sync::Arc;

use super::{GateError, KeyAccessGate};
use crate::cache::VerdictCache;
use crate::config::{CacheConfig, GateConfig};
use crate::deny::DenyList;
use crate::registry::CapabilityRegistry;

/// Assembles a [`KeyAccessGate`].
///
/// Defaults to the process-wide derived registry, the default deny-list and
/// the default cache settings.
#[derive(Debug, Default)]
pub struct GateBuilder {
	registry: Option<Arc<CapabilityRegistry>>,
	deny: Option<Arc<DenyList>>,
	cache: CacheConfig,
}

impl GateBuilder {
	/// Uses `registry` instead of the process-wide one.
	pub fn registry(mut self, registry: impl Into<Arc<CapabilityRegistry>>) -> Self {
		self.registry = Some(registry.into());
		self
	}

	/// Uses `deny` instead of the default deny-list.
	pub fn deny_list(mut self, deny: impl Into<Arc<DenyList>>) -> Self {
		self.deny = Some(deny.into());
		self
	}

	/// Sets the verdict cache configuration.
	pub fn cache(mut self, cache: CacheConfig) -> Self {
		self.cache = cache;
		self
	}

	/// Applies the deny-list and cache sections of `config`.
	pub fn config(self, config: &GateConfig) -> Self {
		self.deny_list(DenyList::from_config(&config.deny)).cache(config.cache)
	}

	/// Validates cache settings and builds the gate.
	pub fn build(self) -> Result<KeyAccessGate, GateError> {
		self.cache.validate()?;

		let registry = self.registry.unwrap_or_else(CapabilityRegistry::global);
		let deny = self.deny.unwrap_or_default();

		for (_, caps) in registry.iter() {
			for member in caps.members().filter(|m| deny.contains(m)) {
				tracing::warn!(
					type_name = caps.name(),
					member,
					"declared member shadowed by deny-list; it will never be readable"
				);
			}
		}

		tracing::debug!(
			types = registry.len(),
			denied = deny.len(),
			cache_enabled = self.cache.enabled,
			shards = self.cache.shards,
			max_entries = self.cache.max_entries,
			"key access gate ready"
		);
		Ok(KeyAccessGate::with_cache(registry, deny, VerdictCache::new(&self.cache)))
	}
}
