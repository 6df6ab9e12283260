use std::io::Write;

use tb_model::{UnmappedPolicy, ValidationGate};
use tb_standards::{
    StandardsError, load_chart, load_default_chart, load_default_mapping_rules,
    load_default_system_config, load_mapping_rules, load_system_config,
};

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn default_standards_load() {
    let config = load_default_system_config().expect("system config");
    assert_eq!(config.materiality_threshold, 0.01);
    assert_eq!(config.mri_defaults.source, "GA");
    assert_eq!(config.validation_gate, ValidationGate::Block);
    assert!(config.entity_config.default_entity_id.is_none());

    let rules = load_default_mapping_rules().expect("mapping rules");
    assert_eq!(
        rules.account_mappings.get("83105").map(String::as_str),
        Some("GM83105")
    );
    assert_eq!(rules.transformation_rules.default_prefix, "GM");

    let chart = load_default_chart().expect("chart");
    for target in rules.account_mappings.values() {
        assert!(chart.contains(target), "{target} missing from chart");
    }
}

#[test]
fn json_config_is_accepted() {
    let file = write_temp(
        ".json",
        r#"{"materiality_threshold": 1.0, "unmapped_policy": "fail", "mri_defaults": {"source": "TB"}}"#,
    );
    let config = load_system_config(file.path()).expect("json config");
    assert_eq!(config.unmapped_policy, UnmappedPolicy::Fail);
    assert_eq!(config.mri_defaults.source, "TB");
    assert_eq!(config.mri_defaults.department, "@");
}

#[test]
fn invalid_config_values_are_rejected() {
    let file = write_temp(".toml", "materiality_threshold = -1.0\n");
    let err = load_system_config(file.path()).expect_err("negative threshold");
    assert!(matches!(err, StandardsError::InvalidConfig { .. }));
}

#[test]
fn unknown_extension_is_rejected() {
    let file = write_temp(".yaml", "materiality_threshold: 1\n");
    let err = load_system_config(file.path()).expect_err("yaml");
    assert!(matches!(err, StandardsError::UnsupportedFormat { .. }));
}

#[test]
fn rules_parse_errors_name_the_file() {
    let file = write_temp(".toml", "[account_mappings\n");
    let err = load_mapping_rules(file.path()).expect_err("bad toml");
    assert!(matches!(err, StandardsError::Toml { .. }));
    assert!(err.to_string().contains(&file.path().display().to_string()));
}

#[test]
fn missing_chart_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_chart(&dir.path().join("absent.csv")).expect_err("missing");
    assert!(matches!(err, StandardsError::Io { .. }));
}
