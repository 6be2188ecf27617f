use std::fs;

use assert_matches::assert_matches;

use scivault::config::{ConfigLoader, wallet_key_from_env};
use scivault::error::ScivaultError;

#[test]
fn resolve_explicit_config_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("scivault.json");
    fs::write(
        &path,
        r#"{"graphql_url": "https://node.example/graphql", "chunk_count": 7}"#,
    )
    .unwrap();

    let resolved = ConfigLoader::resolve(path.to_str()).unwrap();
    assert_eq!(resolved.graphql_url, "https://node.example/graphql");
    assert_eq!(resolved.chunk_count, 7);
    assert_eq!(resolved.gateway_url, "https://gateway.irys.xyz");
}

#[test]
fn explicit_config_path_must_exist() {
    let err = ConfigLoader::resolve(Some("/nonexistent/scivault.json")).unwrap_err();
    assert_matches!(err, ScivaultError::ConfigRead(_));
}

#[test]
fn invalid_config_json_is_a_parse_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("scivault.json");
    fs::write(&path, "{not json").unwrap();

    let err = ConfigLoader::resolve(path.to_str()).unwrap_err();
    assert_matches!(err, ScivaultError::ConfigParse(_));
}

#[test]
fn wallet_key_resolution_order() {
    unsafe {
        std::env::remove_var("SCIVAULT_PRIVATE_KEY");
        std::env::remove_var("PRIVATE_KEY");
    }
    assert_matches!(
        wallet_key_from_env().unwrap_err(),
        ScivaultError::MissingPrivateKey
    );

    unsafe {
        std::env::set_var("PRIVATE_KEY", " generic-key ");
    }
    assert_eq!(wallet_key_from_env().unwrap(), "generic-key");

    unsafe {
        std::env::set_var("SCIVAULT_PRIVATE_KEY", "scoped-key");
    }
    assert_eq!(wallet_key_from_env().unwrap(), "scoped-key");

    unsafe {
        std::env::remove_var("SCIVAULT_PRIVATE_KEY");
        std::env::remove_var("PRIVATE_KEY");
    }
}
