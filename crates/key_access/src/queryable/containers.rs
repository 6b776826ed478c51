//! Built-in container subjects.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use super::{Queryable, Shape};
use crate::value::{ToValue, Value};

impl<V, S> Queryable for HashMap<String, V, S>
where
	V: ToValue + Send + Sync + 'static,
	S: BuildHasher + Send + Sync + 'static,
{
	fn shape(&self) -> Shape {
		Shape::Mapping
	}

	fn get(&self, key: &str) -> Option<Value> {
		HashMap::get(self, key).map(ToValue::to_value)
	}
}

impl<V> Queryable for BTreeMap<String, V>
where
	V: ToValue + Send + Sync + 'static,
{
	fn shape(&self) -> Shape {
		Shape::Mapping
	}

	fn get(&self, key: &str) -> Option<Value> {
		BTreeMap::get(self, key).map(ToValue::to_value)
	}
}

impl<V> Queryable for Vec<V>
where
	V: ToValue + Send + Sync + 'static,
{
	fn shape(&self) -> Shape {
		Shape::Sequence
	}

	fn get(&self, key: &str) -> Option<Value> {
		sequence_get(self, key)
	}
}

impl Queryable for serde_json::Value {
	fn shape(&self) -> Shape {
		match self {
			serde_json::Value::Object(_) => Shape::Mapping,
			serde_json::Value::Array(_) => Shape::Sequence,
			_ => Shape::Scalar,
		}
	}

	fn get(&self, key: &str) -> Option<Value> {
		match self {
			serde_json::Value::Object(map) => map.get(key).map(ToValue::to_value),
			serde_json::Value::Array(items) => sequence_get(items, key),
			_ => None,
		}
	}
}

/// Index and collection-property lookup shared by sequence subjects.
///
/// Accepts decimal indices plus `first`, `last` and `count`.
fn sequence_get<V: ToValue>(items: &[V], key: &str) -> Option<Value> {
	match key {
		"first" => items.first().map(ToValue::to_value),
		"last" => items.last().map(ToValue::to_value),
		"count" => Some(items.len().to_value()),
		_ => {
			let index: usize = key.parse().ok()?;
			items.get(index).map(ToValue::to_value)
		}
	}
}
