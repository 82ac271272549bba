use crate::fixtures::test_pubkey;
use regsync_core::infrastructure::exclusions::{load_exclusion_file, ExclusionStore};
use regsync_core::RegsyncError;
use tempfile::tempdir;

#[test]
fn test_load_exclusion_file_when_blank_then_empty_table() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("exclusions.json");
    std::fs::write(&path, "  \n").expect("write");

    let table = load_exclusion_file(&path, 3).expect("blank file");

    assert!(table.is_empty());
    assert_eq!(table.version(), 3);
}

#[test]
fn test_load_exclusion_file_when_missing_then_exclusion_list_error() {
    let dir = tempdir().expect("tempdir");

    let err = load_exclusion_file(&dir.path().join("absent.json"), 1).expect_err("missing file");

    assert!(matches!(err, RegsyncError::ExclusionListError { .. }));
}

#[test]
fn test_load_exclusion_file_when_key_repeated_then_last_record_wins() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("exclusions.json");
    let key = test_pubkey(1);
    std::fs::write(
        &path,
        format!(
            r#"[
                {{"pubkey":"{key}","exclude_registry":true}},
                {{"pubkey":"{key}","exclude_native_delegation":true}}
            ]"#
        ),
    )
    .expect("write");

    let entry = load_exclusion_file(&path, 1).expect("parse").entry(&key);

    assert!(!entry.exclude_registry);
    assert!(entry.exclude_native_delegation);
}

#[test]
fn test_reload_from_file_when_successive_then_versions_increase() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("exclusions.json");
    std::fs::write(&path, "[]").expect("write");
    let store = ExclusionStore::empty();

    let first = store.reload_from_file(&path).expect("first load");
    let second = store.reload_from_file(&path).expect("second load");

    assert!(second.version() > first.version());
    assert!(first.version() > 0);
}
