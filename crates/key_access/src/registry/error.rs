/// Fatal errors while building a [`CapabilityRegistry`](super::CapabilityRegistry).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// The same runtime type was declared twice.
	#[error("duplicate type declaration: {name}")]
	DuplicateType { name: &'static str },

	/// A declaration names a parent that was never declared.
	#[error("type {name} extends undeclared type {parent}")]
	UnknownParent { name: &'static str, parent: &'static str },

	/// Ancestry loops back onto itself.
	#[error("inheritance cycle through {name}")]
	InheritanceCycle { name: &'static str },
}
