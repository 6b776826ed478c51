//! Fail-closed key access gate for template context lookups.
//!
//! A renderer resolving `{{user.name}}` asks the [`KeyAccessGate`] whether each
//! path segment may be read from the current subject before it reads anything.
//! The gate answers from three immutable inputs and one cache:
//!
//! * [`CapabilityRegistry`] - per-type sets of declared, zero-argument readable
//!   members. Built once from explicit declarations or from
//!   `#[derive(Queryable)]` submissions collected through `inventory`.
//! * [`DenyList`] - keys that are unsafe for every type (identity, reflection,
//!   description and lifecycle accessors). Checked before the registry.
//! * [`Shape`] - built-in mappings and sequences are always safe to query; a
//!   miss there reads as missing, never as denied.
//! * [`VerdictCache`] - sharded memo of (type, key) verdicts owned by the gate.
//!
//! Anything the gate cannot classify is denied.
//!
//! ```ignore
//! #[derive(Queryable)]
//! struct User {
//!     name: String,
//! }
//!
//! let gate = KeyAccessGate::builder().build()?;
//! let user = User { name: "Ada".into() };
//! assert!(gate.is_safe("name", Some(&user)));
//! assert!(!gate.is_safe("class", Some(&user)));
//! ```

extern crate self as stencil_key_access;

pub mod cache;
pub mod config;
pub mod deny;
pub mod gate;
pub mod queryable;
pub mod registry;
pub mod value;

pub use cache::{CacheStats, MAX_CACHED_KEY_LEN, VerdictCache};
pub use config::{CacheConfig, ConfigError, DenyConfig, GateConfig};
pub use deny::{DEFAULT_DENIED_KEYS, DenyList};
pub use gate::{GateBuilder, GateError, KeyAccessGate, Verdict};
pub use queryable::{DeclaredMembers, Queryable, Shape};
pub use registry::{CapabilityRegistry, ParentRef, RegistryBuilder, RegistryError, TypeCapabilities, TypeDecl};
/// Derives [`Queryable`] and [`DeclaredMembers`] for a named struct.
pub use stencil_macros::Queryable;
pub use value::{ToValue, Value};

#[doc(hidden)]
pub mod __private {
	pub use inventory;
}
