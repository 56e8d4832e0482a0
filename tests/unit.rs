use ctxsync::{
    BinaryDetection, ENTRY_OVERHEAD, FileEntry, ScanBuilder, build_batches, scan, walk,
};
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;
#[test]
fn test_basic_scan() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("hello.txt"), "hello world").unwrap();
    let options = ScanBuilder::new(dir.path()).build();
    let result = scan(&options).unwrap();
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].path, "hello.txt");
    assert_eq!(result.files[0].content, "hello world");
    assert_eq!(result.files[0].content_hash.len(), 64);
}
#[test]
fn test_ignore_patterns() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    fs::write(dir.path().join("b.log"), "b").unwrap();
    let options = ScanBuilder::new(dir.path())
        .ignore_patterns(vec!["*.log".into()])
        .build();
    let result = scan(&options).unwrap();
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].path, "a.txt");
}
#[test]
fn test_file_size_limit() {
    let dir = tempdir().unwrap();
    let mut f = File::create(dir.path().join("big.txt")).unwrap();
    write!(f, "{}", "A".repeat(5000)).unwrap();
    let options = ScanBuilder::new(dir.path()).max_file_size(100).build();
    let result = scan(&options).unwrap();
    assert!(result.files.is_empty());
    assert_eq!(result.files_skipped, 1);
}
#[test]
fn test_binary_detection_simple() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), vec![b'a', 0, b'b']).unwrap();
    let options = ScanBuilder::new(dir.path())
        .binary_detection(BinaryDetection::Simple)
        .build();
    let result = scan(&options).unwrap();
    assert!(result.files.is_empty());
    assert_eq!(result.files_skipped, 1);
}
#[test]
fn test_binary_detection_accurate() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("blob.dat"), vec![0u8, 159, 146, 150, 0, 0]).unwrap();
    fs::write(dir.path().join("text.dat"), "plain text").unwrap();
    let options = ScanBuilder::new(dir.path())
        .binary_detection(BinaryDetection::Accurate)
        .build();
    let result = scan(&options).unwrap();
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].path, "text.dat");
}
#[test]
fn test_whitespace_only_file_is_skipped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("blank.txt"), " \n\t\n  ").unwrap();
    fs::write(dir.path().join("empty.txt"), "").unwrap();
    let result = scan(&ScanBuilder::new(dir.path()).build()).unwrap();
    assert!(result.files.is_empty());
    assert_eq!(result.files_skipped, 2);
}
#[test]
fn test_invalid_utf8_is_decoded_lossily() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("latin1.txt"), vec![b'c', b'a', b'f', 0xE9]).unwrap();
    let result = scan(&ScanBuilder::new(dir.path()).build()).unwrap();
    assert_eq!(result.files[0].content, "caf\u{FFFD}");
}
#[test]
fn test_default_ignore_reincluded_by_tool_ignore_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
    fs::write(dir.path().join("app.js.map"), "{\"version\":3}").unwrap();
    let before = scan(&ScanBuilder::new(dir.path()).build()).unwrap();
    assert_eq!(before.files.len(), 1);

    fs::write(dir.path().join(".ctxsyncignore"), "!*.map\n").unwrap();
    let after = scan(&ScanBuilder::new(dir.path()).build()).unwrap();
    let paths: Vec<_> = after.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec![".ctxsyncignore", "app.js", "app.js.map"]);
}
#[test]
fn test_gitignore_is_respected() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".gitignore"), "secret/\n").unwrap();
    fs::create_dir(dir.path().join("secret")).unwrap();
    fs::write(dir.path().join("secret/key.txt"), "hunter2").unwrap();
    fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();
    let result = scan(&ScanBuilder::new(dir.path()).build()).unwrap();
    let paths: Vec<_> = result.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec![".gitignore", "main.rs"]);
}
#[test]
fn test_batches_respect_ceiling() {
    let ceiling = 10_000;
    let entries: Vec<FileEntry> = (0..50)
        .map(|i| FileEntry {
            path: format!("f{i}.txt"),
            content_hash: String::new(),
            content: "x".repeat((i * 397) % 4000),
        })
        .collect();
    let total = entries.len();
    let batches = build_batches(entries, ceiling);
    for batch in &batches {
        assert!(!batch.is_empty());
        let sum: usize = batch
            .files()
            .iter()
            .map(|f| f.content.len() + ENTRY_OVERHEAD)
            .sum();
        assert_eq!(sum, batch.estimated_bytes());
        assert!(sum <= ceiling);
    }
    assert_eq!(batches.iter().map(|b| b.len()).sum::<usize>(), total);
}
#[cfg(unix)]
#[test]
fn test_ignored_directory_is_never_opened() {
    use std::os::unix::fs::PermissionsExt;
    let dir = tempdir().unwrap();
    let trap = dir.path().join("node_modules/locked");
    fs::create_dir_all(&trap).unwrap();
    fs::write(trap.join("x.js"), "x").unwrap();
    fs::set_permissions(&trap, fs::Permissions::from_mode(0o000)).unwrap();
    fs::write(dir.path().join("index.js"), "x").unwrap();

    let outcome = walk(&ScanBuilder::new(dir.path()).build()).unwrap();
    fs::set_permissions(&trap, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(outcome.files, vec![dir.path().join("index.js")]);
    assert_eq!(outcome.unreadable, 0);
}
#[cfg(unix)]
#[test]
fn test_unreadable_directory_does_not_abort_walk() {
    use std::os::unix::fs::PermissionsExt;
    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("inner.txt"), "x").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    fs::write(dir.path().join("open.txt"), "x").unwrap();

    let result = scan(&ScanBuilder::new(dir.path()).build());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let result = result.unwrap();
    assert!(result.files.iter().any(|f| f.path == "open.txt"));
}
