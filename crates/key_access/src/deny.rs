//! Keys that are never safe, whatever the subject.
//!
//! Every type inherits identity, reflection, description and lifecycle
//! accessors from a universal base. Those names resolve to engine plumbing
//! rather than domain data, so they are denied before the registry is asked.

use rustc_hash::FxHashSet as HashSet;

use crate::config::DenyConfig;

/// Conservative default deny-list.
///
/// Common domain field names such as `id` and `type` are left out; add them
/// through `[deny] keys` when a host model exposes them as plumbing.
pub const DEFAULT_DENIED_KEYS: &[&str] = &[
	// Identity
	"self",
	"hash",
	"isEqual",
	"isProxy",
	// Reflection
	"class",
	"superclass",
	"classForCoder",
	"classForKeyedArchiver",
	"type_id",
	"type_name",
	"as_any",
	"methods",
	"properties",
	// Generic description
	"description",
	"debugDescription",
	"fmt",
	"to_string",
	// Lifecycle
	"init",
	"dealloc",
	"retain",
	"release",
	"autorelease",
	"retainCount",
	"copy",
	"mutableCopy",
	"clone",
	"drop",
	"zone",
	"observationInfo",
];

/// Immutable set of keys unsafe for every subject type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenyList {
	keys: HashSet<Box<str>>,
}

impl Default for DenyList {
	fn default() -> Self {
		DEFAULT_DENIED_KEYS.iter().copied().collect()
	}
}

impl DenyList {
	/// Creates a deny-list that denies nothing.
	pub fn empty() -> Self {
		Self { keys: HashSet::default() }
	}

	/// Builds the deny-list described by configuration.
	pub fn from_config(config: &DenyConfig) -> Self {
		let base = if config.extend_defaults { Self::default() } else { Self::empty() };
		base.with_keys(config.keys.iter().map(String::as_str))
			.without_keys(config.allow.iter().map(String::as_str))
	}

	/// Returns this list with `keys` added.
	pub fn with_keys<'a, I: IntoIterator<Item = &'a str>>(mut self, keys: I) -> Self {
		self.keys.extend(keys.into_iter().map(Box::from));
		self
	}

	/// Returns this list with `keys` removed.
	pub fn without_keys<'a, I: IntoIterator<Item = &'a str>>(mut self, keys: I) -> Self {
		for key in keys {
			self.keys.remove(key);
		}
		self
	}

	/// Returns true if `key` is denied for every subject.
	#[inline]
	pub fn contains(&self, key: &str) -> bool {
		self.keys.contains(key)
	}

	/// Iterates over denied keys in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
		self.keys.iter().map(AsRef::as_ref)
	}

	pub fn len(&self) -> usize {
		self.keys.len()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}
}

impl<'a> FromIterator<&'a str> for DenyList {
	fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
		Self::empty().with_keys(iter)
	}
}
