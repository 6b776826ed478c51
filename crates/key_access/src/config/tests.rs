use std::io::Write;

use pretty_assertions::assert_eq;

use super::*;

const CONFIG: &str = r#"
	[deny]
	extend_defaults = false
	keys = ["password", "token"]

	[cache]
	shards = 4
	max_entries = 128
"#;

#[test]
fn test_parse_full_config() {
	let config = GateConfig::from_toml_str(CONFIG).unwrap();
	assert_eq!(
		config,
		GateConfig {
			deny: DenyConfig {
				extend_defaults: false,
				keys: vec!["password".into(), "token".into()],
				allow: Vec::new(),
			},
			cache: CacheConfig {
				enabled: true,
				shards: 4,
				max_entries: 128,
			},
		}
	);
}

#[test]
fn test_empty_document_uses_defaults() {
	let config = GateConfig::from_toml_str("").unwrap();
	assert_eq!(config, GateConfig::default());
	assert!(config.deny.extend_defaults);
	assert!(config.cache.enabled);
}

#[test]
fn test_unknown_fields_are_rejected() {
	let err = GateConfig::from_toml_str("[deny]\nkey = [\"x\"]\n").unwrap_err();
	assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_shard_bounds() {
	let err = GateConfig::from_toml_str("[cache]\nshards = 0\n").unwrap_err();
	assert!(matches!(err, ConfigError::InvalidShards(0)));

	let err = GateConfig::from_toml_str("[cache]\nshards = 4096\n").unwrap_err();
	assert!(matches!(err, ConfigError::InvalidShards(4096)));
}

#[test]
fn test_zero_capacity_only_matters_when_enabled() {
	let err = GateConfig::from_toml_str("[cache]\nmax_entries = 0\n").unwrap_err();
	assert!(matches!(err, ConfigError::ZeroCapacity));

	let config = GateConfig::from_toml_str("[cache]\nenabled = false\nmax_entries = 0\n").unwrap();
	assert!(!config.cache.enabled);
}

#[test]
fn test_load_from_file() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	file.write_all(CONFIG.as_bytes()).unwrap();
	let config = GateConfig::load(file.path()).unwrap();
	assert_eq!(config.cache.shards, 4);
}

#[test]
fn test_missing_file_reports_path() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("gate.toml");
	let err = GateConfig::load(&path).unwrap_err();
	assert!(matches!(err, ConfigError::Io { .. }));
	assert!(err.to_string().contains("gate.toml"));
}
