use std::fs;

use sdl_merge::{ConfigError, MergeConfig, SortOrder, merge_to_document};

#[test]
fn test_load_yaml_and_merge_with_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("merge.yaml");
    fs::write(
        &path,
        "sort: true\nexclusions:\n  - Internal\n  - User.secret\nuse_schema_definition: false\n",
    )
    .unwrap();

    let config = MergeConfig::load(&path).unwrap();
    assert!(matches!(config.sort, SortOrder::Lexical));
    assert!(!config.use_schema_definition);
    assert!(!config.throw_on_conflict);

    let doc = merge_to_document(
        "type User { id: ID secret: String } type Internal { x: Int } type Query { me: User }",
        &config,
    )
    .unwrap();
    assert_eq!(doc.names(), vec!["Query", "User"]);
    assert!(doc.schema_definition().is_none());
}

#[test]
fn test_load_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("merge.json");
    fs::write(
        &path,
        r#"{"throw_on_conflict": true, "force_schema_definition": true}"#,
    )
    .unwrap();

    let config = MergeConfig::load(&path).unwrap();
    assert!(config.throw_on_conflict);
    assert!(config.force_schema_definition);
    assert!(config.use_schema_definition);
}

#[test]
fn test_load_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("merge.toml");
    fs::write(&path, "sort = true\n").unwrap();

    let err = MergeConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownFormat(_)));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = MergeConfig::load(dir.path().join("absent.yml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_load_malformed_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("merge.yml");
    fs::write(&path, "sort: [not, a, bool]\n").unwrap();

    let err = MergeConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
    assert!(err.to_string().starts_with("YAML error"));
}
