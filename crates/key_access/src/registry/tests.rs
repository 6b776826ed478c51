use std::any::TypeId;

use super::*;
use crate::{Queryable, Value};

struct Person;
struct Employee;
struct Manager;
struct Stranger;

macro_rules! opaque_subject {
	($($ty:ident),*) => {
		$(
			impl Queryable for $ty {
				fn get(&self, _key: &str) -> Option<Value> {
					None
				}
			}
		)*
	};
}

opaque_subject!(Person, Employee, Manager, Stranger);

impl DeclaredMembers for Person {
	const MEMBERS: &'static [&'static str] = &["name", "email"];
}

impl DeclaredMembers for Employee {
	const MEMBERS: &'static [&'static str] = &["badge"];

	fn parents() -> Vec<ParentRef> {
		vec![ParentRef::of::<Person>()]
	}
}

fn hierarchy() -> CapabilityRegistry {
	let mut builder = CapabilityRegistry::builder();
	builder.declare::<Person>(&["name", "email"]);
	builder.declare::<Employee>(&["badge"]).extends::<Person>();
	builder.declare::<Manager>(&["reports"]).extends::<Employee>();
	builder.declare::<Stranger>(&["alias"]);
	builder.build().expect("hierarchy is valid")
}

#[test]
fn declared_members_are_readable() {
	let registry = hierarchy();
	assert!(registry.declares(TypeId::of::<Person>(), "name"));
	assert!(registry.declares(TypeId::of::<Person>(), "email"));
	assert!(!registry.declares(TypeId::of::<Person>(), "badge"));
	assert_eq!(registry.len(), 4);
}

#[test]
fn members_are_inherited_transitively() {
	let registry = hierarchy();
	let manager = TypeId::of::<Manager>();
	assert!(registry.declares(manager, "reports"));
	assert!(registry.declares(manager, "badge"));
	assert!(registry.declares(manager, "name"));
	assert!(registry.inherits(manager, TypeId::of::<Person>()));
	assert!(registry.inherits(manager, TypeId::of::<Employee>()));
	assert!(!registry.inherits(TypeId::of::<Person>(), manager));
}

#[test]
fn unrelated_types_do_not_share_members() {
	let registry = hierarchy();
	assert!(!registry.declares(TypeId::of::<Stranger>(), "name"));
	assert!(!registry.inherits(TypeId::of::<Stranger>(), TypeId::of::<Person>()));
}

#[test]
fn unregistered_types_declare_nothing() {
	let registry = hierarchy();
	assert!(!registry.declares(TypeId::of::<String>(), "len"));
	assert!(registry.get(TypeId::of::<String>()).is_none());
	assert!(registry.type_name(TypeId::of::<String>()).is_none());
}

#[test]
fn empty_key_is_an_ordinary_key() {
	let mut builder = CapabilityRegistry::builder();
	builder.declare::<Person>(&[""]);
	let registry = builder.build().unwrap();
	assert!(registry.declares(TypeId::of::<Person>(), ""));
	assert!(!hierarchy().declares(TypeId::of::<Person>(), ""));
}

#[test]
fn register_uses_static_declarations() {
	let mut builder = RegistryBuilder::new();
	builder.register::<Person>().register::<Employee>();
	let registry = builder.build().unwrap();

	let employee = registry.get_type::<Employee>().expect("employee registered");
	let mut members: Vec<_> = employee.members().collect();
	members.sort_unstable();
	assert_eq!(members, ["badge", "email", "name"]);
	assert_eq!(employee.ancestors(), [TypeId::of::<Person>()]);
	assert!(employee.name().ends_with("Employee"));
}

#[test]
fn duplicate_declarations_are_rejected() {
	let mut builder = RegistryBuilder::new();
	builder.declare::<Person>(&["name"]);
	builder.declare::<Person>(&["email"]);
	assert!(matches!(builder.build(), Err(RegistryError::DuplicateType { .. })));
}

#[test]
fn unknown_parent_is_rejected() {
	let mut builder = RegistryBuilder::new();
	builder.declare::<Employee>(&["badge"]).extends::<Person>();
	let err = builder.build().unwrap_err();
	assert!(matches!(err, RegistryError::UnknownParent { .. }));
	assert!(err.to_string().contains("Person"));
}

#[test]
fn inheritance_cycles_are_rejected() {
	let mut builder = RegistryBuilder::new();
	builder.declare::<Person>(&["name"]).extends::<Employee>();
	builder.declare::<Employee>(&["badge"]).extends::<Person>();
	assert!(matches!(builder.build(), Err(RegistryError::InheritanceCycle { .. })));

	let mut builder = RegistryBuilder::new();
	builder.declare::<Person>(&["name"]).extends::<Person>();
	assert!(matches!(builder.build(), Err(RegistryError::InheritanceCycle { .. })));
}

#[test]
fn diamond_ancestry_is_flattened_once() {
	let mut builder = RegistryBuilder::new();
	builder.declare::<Person>(&["name"]);
	builder.declare::<Employee>(&["badge"]).extends::<Person>();
	builder.declare::<Stranger>(&["alias"]).extends::<Person>();
	builder
		.declare::<Manager>(&[])
		.extends::<Employee>()
		.extends::<Stranger>()
		.member("reports");
	let registry = builder.build().unwrap();

	let manager = registry.get_type_id(TypeId::of::<Manager>());
	assert_eq!(manager.ancestors().len(), 3);
	for key in ["name", "badge", "alias", "reports"] {
		assert!(manager.declares(key), "{key} should be inherited");
	}
}

impl CapabilityRegistry {
	fn get_type_id(&self, type_id: TypeId) -> &TypeCapabilities {
		self.get(type_id).expect("type registered")
	}
}
