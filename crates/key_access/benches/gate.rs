//! Benchmarks for the key access hot path.
//!
//! Run with: cargo bench -p stencil-key-access

use std::collections::{BTreeMap, HashMap};
use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use stencil_key_access::{CacheConfig, KeyAccessGate, Queryable, RegistryBuilder, Value};

#[derive(Queryable)]
struct Profile {
	name: String,
	email: String,
	age: u32,
}

#[derive(Queryable)]
struct Member {
	#[key(flatten)]
	profile: Profile,
	role: String,
}

const KEYS: &[&str] = &["name", "email", "age", "role", "class", "missing"];

fn gate(enabled: bool) -> KeyAccessGate {
	let mut builder = RegistryBuilder::new();
	builder.register::<Profile>().register::<Member>();
	KeyAccessGate::builder()
		.registry(builder.build().expect("bench registry is valid"))
		.cache(CacheConfig {
			enabled,
			..CacheConfig::default()
		})
		.build()
		.expect("bench gate builds")
}

fn member() -> Member {
	Member {
		profile: Profile {
			name: "Ada".to_string(),
			email: "ada@example.com".to_string(),
			age: 36,
		},
		role: "admin".to_string(),
	}
}

fn bench_is_safe(c: &mut Criterion) {
	let mut group = c.benchmark_group("is_safe");
	let subject = member();

	for enabled in [true, false] {
		let gate = gate(enabled);
		let label = if enabled { "cached" } else { "uncached" };
		group.bench_with_input(BenchmarkId::new("object", label), &gate, |b, gate| {
			b.iter(|| {
				for key in KEYS {
					black_box(gate.is_safe(black_box(key), Some(&subject)));
				}
			});
		});
	}

	let gate = gate(true);
	let map: HashMap<String, Value> = KEYS.iter().map(|k| (k.to_string(), Value::Bool(true))).collect();
	group.bench_function("mapping", |b| {
		b.iter(|| {
			for key in KEYS {
				black_box(gate.is_safe(black_box(key), Some(&map)));
			}
		});
	});

	group.finish();
}

fn bench_resolve_path(c: &mut Criterion) {
	let gate = gate(true);
	let mut root = BTreeMap::new();
	root.insert("member".to_string(), Value::object(member()));
	let root = Value::Map(Arc::new(root));

	c.bench_function("resolve_path/member.name", |b| {
		b.iter(|| black_box(gate.resolve_path(black_box("member.name"), &root)));
	});
}

criterion_group!(benches, bench_is_safe, bench_resolve_path);
criterion_main!(benches);
