//! Capability registry: the authoritative map from runtime type to its safely
//! readable members.
//!
//! # Role
//!
//! Declarations come from [`RegistryBuilder`] calls or from
//! `#[derive(Queryable)]` submissions collected via `inventory`. Building
//! flattens each type's ancestry into a single member set so queries are one
//! hash lookup per level.
//!
//! # Invariants
//!
//! - A built registry is never mutated; share it through `Arc`.
//! - Members inherited only from a universal base type do not belong here;
//!   those names live in the [`DenyList`](crate::DenyList).

mod build;
mod error;
#[cfg(test)]
mod tests;

use std::any::TypeId;
use std::sync::{Arc, LazyLock};

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub use self::build::{DeclBuilder, RegistryBuilder};
pub use self::error::RegistryError;
use crate::queryable::DeclaredMembers;

/// Reference to an ancestor type in a [`TypeDecl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParentRef {
	pub type_id: TypeId,
	pub name: &'static str,
}

impl ParentRef {
	/// Returns a reference to `T`.
	pub fn of<T: 'static>() -> Self {
		Self {
			type_id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
		}
	}
}

/// Unflattened declaration of one type's readable members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
	pub type_id: TypeId,
	/// Diagnostic type name.
	pub name: &'static str,
	/// Own zero-argument readable members.
	pub members: Vec<Box<str>>,
	/// Direct ancestors whose members are inherited.
	pub parents: Vec<ParentRef>,
}

/// `inventory` registration emitted by `#[derive(Queryable)]`.
pub struct DeclReg(pub fn() -> TypeDecl);

inventory::collect!(DeclReg);

/// Flattened capabilities of one type.
#[derive(Debug, Clone)]
pub struct TypeCapabilities {
	name: &'static str,
	members: HashSet<Box<str>>,
	ancestors: Vec<TypeId>,
}

impl TypeCapabilities {
	/// Returns the diagnostic type name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Returns true if `key` is a readable member, own or inherited.
	#[inline]
	pub fn declares(&self, key: &str) -> bool {
		self.members.contains(key)
	}

	/// Iterates over every readable member, own and inherited.
	pub fn members(&self) -> impl Iterator<Item = &str> + '_ {
		self.members.iter().map(AsRef::as_ref)
	}

	/// Returns every transitive ancestor.
	pub fn ancestors(&self) -> &[TypeId] {
		&self.ancestors
	}
}

/// Immutable map from runtime type to [`TypeCapabilities`].
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
	types: HashMap<TypeId, TypeCapabilities>,
}

static GLOBAL: LazyLock<Arc<CapabilityRegistry>> = LazyLock::new(|| match CapabilityRegistry::from_inventory() {
	Ok(registry) => Arc::new(registry),
	Err(error) => {
		tracing::error!(%error, "derived capability declarations rejected; every object key will be denied");
		Arc::new(CapabilityRegistry::default())
	}
});

impl CapabilityRegistry {
	/// Starts an explicit registry declaration.
	pub fn builder() -> RegistryBuilder {
		RegistryBuilder::new()
	}

	/// Builds a registry from every `#[derive(Queryable)]` type linked into
	/// the process.
	pub fn from_inventory() -> Result<Self, RegistryError> {
		let mut builder = RegistryBuilder::new();
		builder.extend_inventory();
		builder.build()
	}

	/// Returns the process-wide registry of derived types.
	///
	/// Built on first use and read-only afterwards. A rejected inventory yields
	/// an empty registry so every object key fails closed.
	pub fn global() -> Arc<CapabilityRegistry> {
		GLOBAL.clone()
	}

	/// Returns the capabilities of a runtime type.
	#[inline]
	pub fn get(&self, type_id: TypeId) -> Option<&TypeCapabilities> {
		self.types.get(&type_id)
	}

	/// Returns the capabilities of `T`.
	pub fn get_type<T: DeclaredMembers>(&self) -> Option<&TypeCapabilities> {
		self.get(TypeId::of::<T>())
	}

	/// Returns true if `key` is a readable member of the type.
	#[inline]
	pub fn declares(&self, type_id: TypeId, key: &str) -> bool {
		self.types.get(&type_id).is_some_and(|caps| caps.declares(key))
	}

	/// Returns true if `ancestor` appears in the declared ancestry of `type_id`.
	pub fn inherits(&self, type_id: TypeId, ancestor: TypeId) -> bool {
		self.types
			.get(&type_id)
			.is_some_and(|caps| caps.ancestors.contains(&ancestor))
	}

	/// Returns the diagnostic name of a registered type.
	pub fn type_name(&self, type_id: TypeId) -> Option<&'static str> {
		self.types.get(&type_id).map(|caps| caps.name)
	}

	/// Iterates over all registered types.
	pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeCapabilities)> + '_ {
		self.types.iter().map(|(id, caps)| (*id, caps))
	}

	/// Returns the number of registered types.
	pub fn len(&self) -> usize {
		self.types.len()
	}

	/// Returns true if no types are registered.
	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}
}
