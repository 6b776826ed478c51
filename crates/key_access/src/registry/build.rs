use std::any::TypeId;

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use super::{CapabilityRegistry, DeclReg, ParentRef, RegistryError, TypeCapabilities, TypeDecl};
use crate::queryable::{DeclaredMembers, Queryable};

/// Builder for constructing a [`CapabilityRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
	decls: Vec<TypeDecl>,
}

/// Handle for refining a declaration added with [`RegistryBuilder::declare`].
pub struct DeclBuilder<'a> {
	decl: &'a mut TypeDecl,
}

impl DeclBuilder<'_> {
	/// Inherits every member of `P`. `P` must be declared before building.
	pub fn extends<P: 'static>(self) -> Self {
		self.decl.parents.push(ParentRef::of::<P>());
		self
	}

	/// Adds one more readable member.
	pub fn member(self, name: &str) -> Self {
		self.decl.members.push(Box::from(name));
		self
	}
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
	Unvisited,
	Visiting,
	Done,
}

impl RegistryBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the number of declarations added so far.
	pub fn len(&self) -> usize {
		self.decls.len()
	}

	/// Returns true if nothing has been declared.
	pub fn is_empty(&self) -> bool {
		self.decls.is_empty()
	}

	/// Declares the readable members of `T` explicitly.
	///
	/// Only list members that can be read without arguments and without side
	/// effects.
	pub fn declare<T: Queryable>(&mut self, members: &[&str]) -> DeclBuilder<'_> {
		let idx = self.decls.len();
		self.decls.push(TypeDecl {
			type_id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
			members: members.iter().map(|m| Box::from(*m)).collect(),
			parents: Vec::new(),
		});
		DeclBuilder {
			decl: &mut self.decls[idx],
		}
	}

	/// Declares `T` from its static [`DeclaredMembers`] impl.
	pub fn register<T: DeclaredMembers>(&mut self) -> &mut Self {
		self.decls.push(T::type_decl());
		self
	}

	/// Adds a prepared declaration.
	pub fn push(&mut self, decl: TypeDecl) -> &mut Self {
		self.decls.push(decl);
		self
	}

	/// Adds every declaration submitted by `#[derive(Queryable)]`.
	pub fn extend_inventory(&mut self) -> &mut Self {
		for reg in inventory::iter::<DeclReg> {
			self.decls.push((reg.0)());
		}
		self
	}

	/// Validates declarations and flattens ancestry into per-type member sets.
	pub fn build(self) -> Result<CapabilityRegistry, RegistryError> {
		let decls = self.decls;

		let mut index: HashMap<TypeId, usize> = HashMap::with_capacity_and_hasher(decls.len(), Default::default());
		for (idx, decl) in decls.iter().enumerate() {
			if index.insert(decl.type_id, idx).is_some() {
				return Err(RegistryError::DuplicateType { name: decl.name });
			}
		}

		for decl in &decls {
			if let Some(parent) = decl.parents.iter().find(|p| !index.contains_key(&p.type_id)) {
				return Err(RegistryError::UnknownParent {
					name: decl.name,
					parent: parent.name,
				});
			}
		}

		let mut marks = vec![Mark::Unvisited; decls.len()];
		let mut flat: Vec<Option<TypeCapabilities>> = vec![None; decls.len()];
		for idx in 0..decls.len() {
			flatten(idx, &decls, &index, &mut marks, &mut flat)?;
		}

		let types: HashMap<TypeId, TypeCapabilities> = decls
			.iter()
			.zip(flat)
			.filter_map(|(decl, caps)| caps.map(|caps| (decl.type_id, caps)))
			.collect();

		tracing::debug!(types = types.len(), "capability registry built");
		Ok(CapabilityRegistry { types })
	}
}

/// Depth-first ancestry flattening with cycle detection.
fn flatten(
	idx: usize,
	decls: &[TypeDecl],
	index: &HashMap<TypeId, usize>,
	marks: &mut [Mark],
	flat: &mut [Option<TypeCapabilities>],
) -> Result<(), RegistryError> {
	let decl = &decls[idx];
	match marks[idx] {
		Mark::Done => return Ok(()),
		Mark::Visiting => return Err(RegistryError::InheritanceCycle { name: decl.name }),
		Mark::Unvisited => {}
	}
	marks[idx] = Mark::Visiting;

	let mut members: HashSet<Box<str>> = decl.members.iter().cloned().collect();
	let mut ancestors: Vec<TypeId> = Vec::new();

	for parent in &decl.parents {
		let Some(&parent_idx) = index.get(&parent.type_id) else {
			return Err(RegistryError::UnknownParent {
				name: decl.name,
				parent: parent.name,
			});
		};
		flatten(parent_idx, decls, index, marks, flat)?;

		if let Some(parent_caps) = &flat[parent_idx] {
			members.extend(parent_caps.members.iter().cloned());
			for ancestor in std::iter::once(&parent.type_id).chain(&parent_caps.ancestors) {
				if !ancestors.contains(ancestor) {
					ancestors.push(*ancestor);
				}
			}
		}
	}

	marks[idx] = Mark::Done;
	flat[idx] = Some(TypeCapabilities {
		name: decl.name,
		members,
		ancestors,
	});
	Ok(())
}
