use std::fs;
use tempfile::TempDir;

/// Document matching the cloud-init bootstrap scenario used across tests
pub const SAMPLE_JSON: &str =
    r#"{"meta-data":{"local-hostname":"vm1"},"user-data":{"packages":["curl"]}}"#;

/// Creates a store directory with a `default` document plus any
/// identity-specific documents.
pub fn store_dir(default: &str, documents: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("default"), default).unwrap();
    for (name, contents) in documents {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    dir
}
