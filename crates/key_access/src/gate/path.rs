use super::KeyAccessGate;
use crate::value::Value;

impl KeyAccessGate {
	/// Resolves a dotted key such as `user.address.city` against `root`.
	///
	/// Each segment is gated against the value reached so far. A denied,
	/// missing or empty segment ends resolution with `None`; `"."` names the
	/// root itself.
	pub fn resolve_path(&self, path: &str, root: &Value) -> Option<Value> {
		if path == "." {
			return Some(root.clone());
		}

		let mut segments = path.split('.');
		let first = segments.next()?;
		let mut current = self.step(root, first)?;
		for segment in segments {
			current = self.step(&current, segment)?;
		}
		Some(current)
	}

	fn step(&self, value: &Value, segment: &str) -> Option<Value> {
		if segment.is_empty() {
			return None;
		}
		self.lookup(segment, value.as_queryable())
	}
}
