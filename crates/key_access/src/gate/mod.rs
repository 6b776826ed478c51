//! The safe key access gate.
//!
//! # Role
//!
//! Answers "may this key be read from this subject?" for every path segment a
//! renderer resolves. Decisions are introspection only: the subject's accessor
//! is never run to decide.
//!
//! # Invariants
//!
//! - No subject: denied.
//! - Built-in mapping or sequence: allowed for any key.
//! - Deny-listed key: denied, even if the type declares the member.
//! - Otherwise allowed iff the registry declares the key for the subject's
//!   runtime type. Unregistered types and undeclared keys are denied.
//! - Verdicts depend only on (runtime type, key, registry, deny-list).

mod builder;
mod path;

use std::any::TypeId;
use std::sync::Arc;

pub use self::builder::GateBuilder;
use crate::cache::{CacheStats, VerdictCache};
use crate::config::{ConfigError, GateConfig};
use crate::deny::DenyList;
use crate::queryable::{Queryable, subject_type_id};
use crate::registry::{CapabilityRegistry, RegistryError};
use crate::value::Value;

/// Why a key was allowed or denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
	/// There was no subject to read from.
	NoSubject,
	/// The subject is a built-in container; a miss reads as missing.
	Container,
	/// The key is on the deny-list.
	Denied,
	/// The subject's type declares the key.
	Declared,
	/// The subject's type is registered but does not declare the key.
	Undeclared,
	/// The subject's type was never registered.
	UnregisteredType,
}

impl Verdict {
	/// Returns true if the key may be read.
	pub const fn is_safe(self) -> bool {
		matches!(self, Verdict::Container | Verdict::Declared)
	}
}

/// Errors while assembling a gate.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
	#[error(transparent)]
	Registry(#[from] RegistryError),

	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Fail-closed predicate guarding reflective key lookups.
///
/// Shared by reference across render threads.
#[derive(Debug)]
pub struct KeyAccessGate {
	registry: Arc<CapabilityRegistry>,
	deny: Arc<DenyList>,
	cache: VerdictCache,
}

impl KeyAccessGate {
	/// Starts building a gate.
	pub fn builder() -> GateBuilder {
		GateBuilder::default()
	}

	/// Creates a gate with the default cache.
	pub fn new(registry: Arc<CapabilityRegistry>, deny: Arc<DenyList>) -> Self {
		Self::with_cache(registry, deny, VerdictCache::default())
	}

	pub(crate) fn with_cache(registry: Arc<CapabilityRegistry>, deny: Arc<DenyList>, cache: VerdictCache) -> Self {
		Self { registry, deny, cache }
	}

	/// Creates a gate over the process-wide derived registry, configured by
	/// `config`.
	pub fn from_config(config: &GateConfig) -> Result<Self, GateError> {
		GateBuilder::default().config(config).build()
	}

	/// Returns true if `key` may be read from `subject`.
	///
	/// Total and side-effect free apart from cache population.
	#[inline]
	pub fn is_safe(&self, key: &str, subject: Option<&dyn Queryable>) -> bool {
		let Some(subject) = subject else {
			return false;
		};
		if subject.shape().is_container() {
			return true;
		}

		let type_id = subject_type_id(subject);
		if let Some(verdict) = self.cache.get(type_id, key) {
			return verdict;
		}

		let verdict = self.decide(type_id, key).is_safe();
		tracing::trace!(key, verdict, type_name = ?self.registry.type_name(type_id), "key access verdict");
		self.cache.insert(type_id, key, verdict);
		verdict
	}

	/// Explains the decision for `key` on `subject` without touching the cache.
	pub fn verdict(&self, key: &str, subject: Option<&dyn Queryable>) -> Verdict {
		let Some(subject) = subject else {
			return Verdict::NoSubject;
		};
		if subject.shape().is_container() {
			return Verdict::Container;
		}
		self.decide(subject_type_id(subject), key)
	}

	fn decide(&self, type_id: TypeId, key: &str) -> Verdict {
		if self.deny.contains(key) {
			return Verdict::Denied;
		}
		match self.registry.get(type_id) {
			None => Verdict::UnregisteredType,
			Some(caps) if caps.declares(key) => Verdict::Declared,
			Some(_) => Verdict::Undeclared,
		}
	}

	/// Reads `key` from `subject` if the gate allows it.
	///
	/// Denied keys read as missing, exactly like keys the subject lacks.
	pub fn lookup(&self, key: &str, subject: Option<&dyn Queryable>) -> Option<Value> {
		let subject = subject?;
		if !self.is_safe(key, Some(subject)) {
			return None;
		}
		subject.get(key)
	}

	/// Returns the registry this gate consults.
	pub fn registry(&self) -> &Arc<CapabilityRegistry> {
		&self.registry
	}

	/// Returns the deny-list this gate consults.
	pub fn deny_list(&self) -> &Arc<DenyList> {
		&self.deny
	}

	/// Returns verdict cache counters.
	pub fn stats(&self) -> CacheStats {
		self.cache.stats()
	}

	/// Drops cached verdicts. Subsequent answers are unchanged.
	pub fn clear_cache(&self) {
		self.cache.clear();
	}
}
