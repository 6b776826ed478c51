//! Sharded (type, key) verdict memo.
//!
//! # Role
//!
//! Speeds up repeated gate decisions. The registry and deny-list remain the
//! source of truth; dropping or clearing the cache never changes a verdict.
//!
//! # Invariants
//!
//! - Lookups take a shard read lock; inserts take the shard write lock and
//!   never overwrite an existing entry.
//! - Entries for one type always live in the same shard.
//! - The entry count is bounded by `max_entries` plus at most one in-flight
//!   insert per racing thread.
//! - Keys longer than [`MAX_CACHED_KEY_LEN`] bytes are never stored, so memory
//!   stays bounded by `max_entries * MAX_CACHED_KEY_LEN`.

use std::any::TypeId;
use std::hash::BuildHasher;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use parking_lot::RwLock;
use rustc_hash::{FxBuildHasher, FxHashMap as HashMap};

use crate::config::{CacheConfig, MAX_SHARDS};

/// Longest key, in bytes, whose verdict is memoised.
pub const MAX_CACHED_KEY_LEN: usize = 256;

type Shard = RwLock<HashMap<TypeId, HashMap<Box<str>, bool>>>;

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
	pub hits: u64,
	pub misses: u64,
	pub entries: usize,
}

/// Concurrent memo of gate verdicts, sharded by runtime type.
#[derive(Debug)]
pub struct VerdictCache {
	shards: Box<[Shard]>,
	mask: usize,
	enabled: bool,
	max_entries: usize,
	len: AtomicUsize,
	hits: AtomicU64,
	misses: AtomicU64,
	saturated: AtomicBool,
}

impl Default for VerdictCache {
	fn default() -> Self {
		Self::new(&CacheConfig::default())
	}
}

impl VerdictCache {
	/// Creates a cache from configuration. Shard counts are clamped to
	/// `1..=MAX_SHARDS` and round up to a power of two; call
	/// [`CacheConfig::validate`] first to reject out-of-range values instead.
	pub fn new(config: &CacheConfig) -> Self {
		let count = config.shards.clamp(1, MAX_SHARDS).next_power_of_two();
		let shards = (0..count).map(|_| RwLock::new(HashMap::default())).collect();
		Self {
			shards,
			mask: count - 1,
			enabled: config.enabled,
			max_entries: config.max_entries,
			len: AtomicUsize::new(0),
			hits: AtomicU64::new(0),
			misses: AtomicU64::new(0),
			saturated: AtomicBool::new(false),
		}
	}

	/// Creates a cache that stores nothing.
	pub fn disabled() -> Self {
		Self::new(&CacheConfig {
			enabled: false,
			..CacheConfig::default()
		})
	}

	#[inline]
	fn shard(&self, type_id: TypeId) -> &Shard {
		let hash = FxBuildHasher.hash_one(type_id) as usize;
		&self.shards[hash & self.mask]
	}

	/// Returns the stored verdict, recording a hit or miss.
	#[inline]
	pub fn get(&self, type_id: TypeId, key: &str) -> Option<bool> {
		if !self.enabled {
			self.misses.fetch_add(1, Ordering::Relaxed);
			return None;
		}
		let found = self.shard(type_id).read().get(&type_id).and_then(|keys| keys.get(key).copied());
		let counter = if found.is_some() { &self.hits } else { &self.misses };
		counter.fetch_add(1, Ordering::Relaxed);
		found
	}

	/// Stores a verdict unless one is already present, the cache is full or
	/// the key is longer than [`MAX_CACHED_KEY_LEN`].
	pub fn insert(&self, type_id: TypeId, key: &str, verdict: bool) {
		if !self.enabled || key.len() > MAX_CACHED_KEY_LEN {
			return;
		}
		if self.len.load(Ordering::Relaxed) >= self.max_entries {
			if !self.saturated.swap(true, Ordering::Relaxed) {
				tracing::debug!(max_entries = self.max_entries, "verdict cache full; further verdicts are computed uncached");
			}
			return;
		}

		let mut shard = self.shard(type_id).write();
		let keys = shard.entry(type_id).or_default();
		if !keys.contains_key(key) {
			keys.insert(Box::from(key), verdict);
			self.len.fetch_add(1, Ordering::Relaxed);
		}
	}

	/// Drops every entry. Counters are kept.
	pub fn clear(&self) {
		for shard in self.shards.iter() {
			let mut shard = shard.write();
			let removed: usize = shard.values().map(HashMap::len).sum();
			shard.clear();
			self.len.fetch_sub(removed, Ordering::Relaxed);
		}
		self.saturated.store(false, Ordering::Relaxed);
	}

	/// Returns the number of stored verdicts.
	pub fn len(&self) -> usize {
		self.len.load(Ordering::Relaxed)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	/// Returns the number of lock shards.
	pub fn shard_count(&self) -> usize {
		self.shards.len()
	}

	/// Returns hit, miss and entry counts.
	pub fn stats(&self) -> CacheStats {
		CacheStats {
			hits: self.hits.load(Ordering::Relaxed),
			misses: self.misses.load(Ordering::Relaxed),
			entries: self.len(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn small(max_entries: usize) -> VerdictCache {
		VerdictCache::new(&CacheConfig {
			enabled: true,
			shards: 3,
			max_entries,
		})
	}

	#[test]
	fn shards_round_up_to_power_of_two() {
		assert_eq!(small(8).shard_count(), 4);
		assert_eq!(VerdictCache::default().shard_count(), 16);
	}

	#[test]
	fn shard_count_is_clamped_without_validation() {
		let huge = VerdictCache::new(&CacheConfig {
			shards: usize::MAX,
			..CacheConfig::default()
		});
		assert_eq!(huge.shard_count(), MAX_SHARDS);
		huge.insert(TypeId::of::<String>(), "len", true);
		assert_eq!(huge.get(TypeId::of::<String>(), "len"), Some(true));

		let zero = VerdictCache::new(&CacheConfig {
			shards: 0,
			..CacheConfig::default()
		});
		assert_eq!(zero.shard_count(), 1);
	}

	#[test]
	fn long_keys_are_not_stored() {
		let cache = small(8);
		let ty = TypeId::of::<String>();
		let at_cap = "k".repeat(MAX_CACHED_KEY_LEN);
		let over_cap = "k".repeat(MAX_CACHED_KEY_LEN + 1);
		cache.insert(ty, &at_cap, true);
		cache.insert(ty, &over_cap, true);
		assert_eq!(cache.get(ty, &at_cap), Some(true));
		assert_eq!(cache.get(ty, &over_cap), None);
		assert_eq!(cache.len(), 1);
	}

	#[test]
	fn insert_then_get() {
		let cache = small(8);
		let ty = TypeId::of::<String>();
		assert_eq!(cache.get(ty, "len"), None);
		cache.insert(ty, "len", false);
		assert_eq!(cache.get(ty, "len"), Some(false));
		assert_eq!(cache.get(TypeId::of::<u8>(), "len"), None);
		assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 2, entries: 1 });
	}

	#[test]
	fn first_verdict_wins() {
		let cache = small(8);
		let ty = TypeId::of::<String>();
		cache.insert(ty, "name", true);
		cache.insert(ty, "name", false);
		assert_eq!(cache.get(ty, "name"), Some(true));
		assert_eq!(cache.len(), 1);
	}

	#[test]
	fn stops_storing_at_capacity() {
		let cache = small(2);
		let ty = TypeId::of::<String>();
		cache.insert(ty, "a", true);
		cache.insert(ty, "b", true);
		cache.insert(ty, "c", true);
		assert_eq!(cache.len(), 2);
		assert_eq!(cache.get(ty, "c"), None);
	}

	#[test]
	fn clear_resets_entries() {
		let cache = small(2);
		let ty = TypeId::of::<String>();
		cache.insert(ty, "a", true);
		cache.insert(ty, "b", false);
		cache.clear();
		assert!(cache.is_empty());
		cache.insert(ty, "c", true);
		assert_eq!(cache.get(ty, "c"), Some(true));
	}

	#[test]
	fn disabled_cache_stores_nothing() {
		let cache = VerdictCache::disabled();
		let ty = TypeId::of::<String>();
		cache.insert(ty, "a", true);
		assert_eq!(cache.get(ty, "a"), None);
		assert!(cache.is_empty());
		assert!(!cache.is_enabled());
	}
}
