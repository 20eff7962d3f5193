use recordforge::{read_shard, shard_path, write_shards};
use std::collections::HashSet;

#[test]
fn shard_paths_follow_the_index_of_total_convention() {
    let path = shard_path("out/part", 3, 20);
    assert_eq!(path.to_str().unwrap(), "out/part-00003-of-00020.records");
}

#[test]
fn thousand_records_across_twenty_shards_conserve_every_record() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let prefix = dir.path().join("part").to_str().unwrap().to_string();

    let records: Vec<Vec<u8>> = (0..1000u32).map(|i| i.to_le_bytes().to_vec()).collect();
    let files = write_shards(&records, &prefix, 20)?;
    assert_eq!(files.len(), 20);

    let mut seen = HashSet::new();
    let mut total = 0;
    for file in &files {
        for payload in read_shard(file)? {
            total += 1;
            assert!(seen.insert(payload), "record duplicated across shards");
        }
    }
    assert_eq!(total, 1000);
    assert_eq!(seen.len(), 1000);
    Ok(())
}

#[test]
fn empty_input_still_creates_the_full_file_set() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let prefix = dir.path().join("part").to_str().unwrap().to_string();

    let files = write_shards(&[], &prefix, 3)?;
    assert_eq!(files.len(), 3);
    for file in &files {
        assert!(file.exists());
        assert!(read_shard(file)?.is_empty());
    }
    Ok(())
}

#[test]
fn fewer_records_than_shards_leaves_trailing_shards_empty() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let prefix = dir.path().join("part").to_str().unwrap().to_string();

    let records = vec![b"one".to_vec(), b"two".to_vec()];
    let files = write_shards(&records, &prefix, 5)?;
    let total: usize = files
        .iter()
        .map(|f| read_shard(f).map(|r| r.len()))
        .sum::<anyhow::Result<usize>>()?;
    assert_eq!(total, 2);
    Ok(())
}

#[test]
fn zero_shards_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("part").to_str().unwrap().to_string();
    assert!(write_shards(&[b"x".to_vec()], &prefix, 0).is_err());
}

#[test]
fn parent_directories_are_created() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let prefix = dir
        .path()
        .join("nested/deeper/part")
        .to_str()
        .unwrap()
        .to_string();
    let files = write_shards(&[b"x".to_vec()], &prefix, 1)?;
    assert!(files[0].exists());
    Ok(())
}
