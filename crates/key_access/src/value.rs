//! Values handed back to the renderer after a gated read.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::Queryable;

/// Result of reading a key from a [`Queryable`] subject.
///
/// Containers are reference counted so values can be cloned cheaply while a
/// renderer walks a dotted path.
#[derive(Clone, Default)]
pub enum Value {
	/// Explicit null.
	#[default]
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(Arc<str>),
	/// Ordered sequence with native index lookup.
	List(Arc<Vec<Value>>),
	/// String-keyed mapping with native key lookup.
	Map(Arc<BTreeMap<String, Value>>),
	/// Domain object; reads go through the gate.
	Object(Arc<dyn Queryable>),
}

impl Value {
	/// Wraps a domain object.
	pub fn object<T: Queryable>(value: T) -> Self {
		Value::Object(Arc::new(value))
	}

	/// Returns the subject to query for the next path segment.
	///
	/// Scalars have no keys and return `None`, which the gate denies.
	pub fn as_queryable(&self) -> Option<&dyn Queryable> {
		match self {
			Value::List(list) => Some(&**list),
			Value::Map(map) => Some(&**map),
			Value::Object(object) => Some(&**object),
			Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) => None,
		}
	}

	/// Returns the string value if this is a `String` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the type name of this value.
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "bool",
			Value::Int(_) => "int",
			Value::Float(_) => "float",
			Value::String(_) => "string",
			Value::List(_) => "list",
			Value::Map(_) => "map",
			Value::Object(_) => "object",
		}
	}
}

impl std::fmt::Debug for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Null => f.write_str("Null"),
			Value::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
			Value::Int(v) => f.debug_tuple("Int").field(v).finish(),
			Value::Float(v) => f.debug_tuple("Float").field(v).finish(),
			Value::String(v) => f.debug_tuple("String").field(v).finish(),
			Value::List(v) => f.debug_tuple("List").field(v).finish(),
			Value::Map(v) => f.debug_tuple("Map").field(v).finish(),
			Value::Object(_) => f.write_str("Object(..)"),
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) => true,
			(Value::Bool(a), Value::Bool(b)) => a == b,
			(Value::Int(a), Value::Int(b)) => a == b,
			(Value::Float(a), Value::Float(b)) => a == b,
			(Value::String(a), Value::String(b)) => a == b,
			(Value::List(a), Value::List(b)) => a == b,
			(Value::Map(a), Value::Map(b)) => a == b,
			// Objects compare by identity.
			(Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}
}

/// Conversion used by derived [`Queryable`] impls to expose field values.
pub trait ToValue {
	/// Converts a borrowed value into a [`Value`].
	fn to_value(&self) -> Value;
}

impl ToValue for Value {
	fn to_value(&self) -> Value {
		self.clone()
	}
}

impl ToValue for bool {
	fn to_value(&self) -> Value {
		Value::Bool(*self)
	}
}

macro_rules! int_to_value {
	($($ty:ty),* $(,)?) => {
		$(
			impl ToValue for $ty {
				fn to_value(&self) -> Value {
					Value::Int(i64::from(*self))
				}
			}
		)*
	};
}

int_to_value!(i8, i16, i32, i64, u8, u16, u32);

impl ToValue for u64 {
	fn to_value(&self) -> Value {
		i64::try_from(*self).map_or(Value::Float(*self as f64), Value::Int)
	}
}

impl ToValue for usize {
	fn to_value(&self) -> Value {
		i64::try_from(*self).map_or(Value::Float(*self as f64), Value::Int)
	}
}

impl ToValue for f32 {
	fn to_value(&self) -> Value {
		Value::Float(f64::from(*self))
	}
}

impl ToValue for f64 {
	fn to_value(&self) -> Value {
		Value::Float(*self)
	}
}

impl ToValue for str {
	fn to_value(&self) -> Value {
		Value::String(Arc::from(self))
	}
}

impl ToValue for String {
	fn to_value(&self) -> Value {
		Value::String(Arc::from(self.as_str()))
	}
}

impl ToValue for &str {
	fn to_value(&self) -> Value {
		Value::String(Arc::from(*self))
	}
}

impl<T: ToValue> ToValue for Option<T> {
	fn to_value(&self) -> Value {
		self.as_ref().map_or(Value::Null, ToValue::to_value)
	}
}

impl<T: ToValue> ToValue for Vec<T> {
	fn to_value(&self) -> Value {
		Value::List(Arc::new(self.iter().map(ToValue::to_value).collect()))
	}
}

impl<T: ToValue> ToValue for BTreeMap<String, T> {
	fn to_value(&self) -> Value {
		Value::Map(Arc::new(self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect()))
	}
}

impl<T: ToValue, S> ToValue for HashMap<String, T, S> {
	fn to_value(&self) -> Value {
		Value::Map(Arc::new(self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect()))
	}
}

impl<T: Queryable> ToValue for Arc<T> {
	fn to_value(&self) -> Value {
		Value::Object(self.clone())
	}
}

impl ToValue for serde_json::Value {
	fn to_value(&self) -> Value {
		match self {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(*b),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => Value::Int(i),
				None => n.as_f64().map_or(Value::Null, Value::Float),
			},
			serde_json::Value::String(s) => s.to_value(),
			serde_json::Value::Array(items) => Value::List(Arc::new(items.iter().map(ToValue::to_value).collect())),
			serde_json::Value::Object(map) => {
				Value::Map(Arc::new(map.iter().map(|(k, v)| (k.clone(), v.to_value())).collect()))
			}
		}
	}
}

impl<T: ToValue + ?Sized> From<&T> for Value {
	fn from(value: &T) -> Self {
		value.to_value()
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::String(Arc::from(v))
	}
}
