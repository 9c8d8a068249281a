use std::io::Write;

use queryeval_common::error::ErrorKind;

use crate::OptimizerConfig;

#[test]
fn test_defaults() {
    let config = OptimizerConfig::default();
    assert!(config.enabled);
    assert_eq!(config.min_bit_vectors, 2);
    assert_eq!(OptimizerConfig::from_json("{}").unwrap(), config);
}

#[test]
fn test_from_json() {
    let config = OptimizerConfig::from_json(r#"{"enabled": false, "min_bit_vectors": 3}"#).unwrap();
    assert!(!config.enabled);
    assert_eq!(config.min_bit_vectors, 3);
}

#[test]
fn test_from_json_rejects_single_bit_vector_fusion() {
    let err = OptimizerConfig::from_json(r#"{"min_bit_vectors": 1}"#).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument { name, .. } if name == "min_bit_vectors"));
}

#[test]
fn test_from_json_rejects_malformed_input() {
    let err = OptimizerConfig::from_json(r#"{"enabled": "yes"}"#).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidConfig { .. }));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"min_bit_vectors": 4}"#).unwrap();
    file.flush().unwrap();
    let config = OptimizerConfig::load(file.path()).unwrap();
    assert!(config.enabled);
    assert_eq!(config.min_bit_vectors, 4);

    let serialized = serde_json::to_string(&config).unwrap();
    assert_eq!(OptimizerConfig::from_json(&serialized).unwrap(), config);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = OptimizerConfig::load(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Io { .. }));
}
