use recordforge::retry::retry_transient;
use recordforge::{
    LocalStorage, MemoryStorage, RetryPolicy, StorageClient, StorageError, StorageErrorKind,
};
use std::io::Write;

fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_delay_ms: 0,
        max_delay_ms: 0,
    }
}

#[test]
fn local_storage_reads_plain_paths_and_file_uris() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("object.bin");
    std::fs::File::create(&path)?.write_all(b"payload")?;

    let storage = LocalStorage::new();
    let plain = storage.open(path.to_str().unwrap()).unwrap();
    assert_eq!(plain, b"payload");

    let uri = format!("file://{}", path.display());
    assert_eq!(storage.open(&uri).unwrap(), b"payload");
    Ok(())
}

#[test]
fn local_storage_missing_object_is_not_found() {
    let err = LocalStorage::new().open("/no/such/object.bin").unwrap_err();
    assert_eq!(err.kind, StorageErrorKind::NotFound);
    assert!(!err.is_transient());
}

#[test]
fn rooted_local_storage_resolves_relative_references() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::File::create(dir.path().join("img.png"))?.write_all(b"x")?;

    let storage = LocalStorage::rooted(dir.path());
    assert_eq!(storage.open("img.png").unwrap(), b"x");
    Ok(())
}

#[test]
fn memory_storage_serves_inserted_objects() {
    let storage = MemoryStorage::new();
    storage.insert("gs://b/a.jpg", b"bytes".to_vec());
    assert_eq!(storage.open("gs://b/a.jpg").unwrap(), b"bytes");
    assert_eq!(
        storage.open("gs://b/missing.jpg").unwrap_err().kind,
        StorageErrorKind::NotFound
    );
}

#[test]
fn scripted_transient_failures_are_survived_by_retry() {
    let storage = MemoryStorage::new();
    storage.insert("gs://b/a.jpg", b"bytes".to_vec());
    storage.fail_with(
        "gs://b/a.jpg",
        StorageError::new(StorageErrorKind::Network, "flaky"),
        2,
    );

    let bytes = retry_transient(&fast_retry(3), || storage.open("gs://b/a.jpg")).unwrap();
    assert_eq!(bytes, b"bytes");
}

#[test]
fn retry_does_not_mask_not_found() {
    let storage = MemoryStorage::new();
    storage.insert("gs://b/a.jpg", b"bytes".to_vec());
    storage.fail_with(
        "gs://b/a.jpg",
        StorageError::new(StorageErrorKind::NotFound, "gone"),
        1,
    );

    // Non-transient, so the scripted failure surfaces on the first attempt
    // even though the object would be served next.
    let err = retry_transient(&fast_retry(5), || storage.open("gs://b/a.jpg")).unwrap_err();
    assert_eq!(err.kind, StorageErrorKind::NotFound);
}

#[test]
fn exhausted_retries_return_the_last_error() {
    let storage = MemoryStorage::new();
    storage.fail_with(
        "gs://b/a.jpg",
        StorageError::new(StorageErrorKind::Unavailable, "down"),
        10,
    );

    let err = retry_transient(&fast_retry(3), || storage.open("gs://b/a.jpg")).unwrap_err();
    assert_eq!(err.kind, StorageErrorKind::Unavailable);
}
