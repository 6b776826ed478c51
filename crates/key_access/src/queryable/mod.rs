//! Subjects the gate can classify and the renderer can read.
//!
//! # Role
//!
//! [`Queryable`] replaces duck-typed reflective lookup: a subject reports its
//! [`Shape`] (so built-in containers can be recognized) and answers `get`.
//! [`DeclaredMembers`] is the type-level half, listing the zero-argument
//! readable members that feed the [`CapabilityRegistry`].
//!
//! # Invariants
//!
//! - The gate never calls [`Queryable::get`] while deciding safety.
//! - Only [`Shape::Mapping`] and [`Shape::Sequence`] bypass the registry.
//!
//! [`CapabilityRegistry`]: crate::CapabilityRegistry

mod containers;

use std::any::{Any, TypeId};

use crate::registry::{ParentRef, TypeDecl};
use crate::value::Value;

/// Container classification used by the gate's container recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
	/// Keyed container with native lookup; a miss yields nothing.
	Mapping,
	/// Indexed container with native lookup; a miss yields nothing.
	Sequence,
	/// Domain object whose readable members come from the registry.
	Object,
	/// Value without keys.
	Scalar,
}

impl Shape {
	/// Returns true for built-in keyed or indexed containers.
	pub const fn is_container(self) -> bool {
		matches!(self, Shape::Mapping | Shape::Sequence)
	}
}

/// A value a template may read keys from.
pub trait Queryable: Any + Send + Sync {
	/// Returns how the gate should classify this subject.
	///
	/// Returning [`Shape::Mapping`] or [`Shape::Sequence`] opts the subject out
	/// of the deny-list and the registry: every key, `class` included, is
	/// allowed and `get` alone decides what is read. Only containers whose
	/// `get` exposes stored entries, never engine internals, should claim a
	/// container shape. The default is [`Shape::Object`], which keeps full
	/// protection.
	///
	/// The answer may vary per instance (a JSON value is a mapping or a
	/// scalar depending on its variant); container verdicts are never cached.
	fn shape(&self) -> Shape {
		Shape::Object
	}

	/// Reads `key`, returning `None` when the subject has no such member.
	fn get(&self, key: &str) -> Option<Value>;
}

/// Static member declaration for a [`Queryable`] type.
///
/// Usually generated by `#[derive(Queryable)]`. Members must be readable
/// without arguments and without side effects.
pub trait DeclaredMembers: Queryable + Sized {
	/// Names of the type's own readable members.
	const MEMBERS: &'static [&'static str];

	/// Types whose members this type inherits.
	fn parents() -> Vec<ParentRef> {
		Vec::new()
	}

	/// Builds the registry declaration for this type.
	fn type_decl() -> TypeDecl {
		TypeDecl {
			type_id: TypeId::of::<Self>(),
			name: std::any::type_name::<Self>(),
			members: Self::MEMBERS.iter().map(|m| Box::from(*m)).collect(),
			parents: Self::parents(),
		}
	}
}

/// Returns the runtime type of a subject.
///
/// Upcasts to `dyn Any` so the concrete type's id is reported rather than the
/// id of the trait object itself.
#[inline]
pub fn subject_type_id(subject: &dyn Queryable) -> TypeId {
	let any: &dyn Any = subject;
	any.type_id()
}
