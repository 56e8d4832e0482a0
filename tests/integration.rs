use ctxsync::{
    BatchSink, CtxsyncError, FileEntry, ScanBuilder, SubmitOutcome, build_batches, scan,
    upload_batches,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// In-memory server that answers 413 to any request above `limit` files.
struct FakeServer {
    limit: usize,
    requests: Vec<Vec<FileEntry>>,
    stored: Vec<FileEntry>,
}

impl FakeServer {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            requests: Vec::new(),
            stored: Vec::new(),
        }
    }
}

impl BatchSink for FakeServer {
    fn submit(&mut self, files: &[FileEntry]) -> Result<SubmitOutcome, CtxsyncError> {
        self.requests.push(files.to_vec());
        if files.len() > self.limit {
            return Ok(SubmitOutcome::TooLarge);
        }
        self.stored.extend_from_slice(files);
        Ok(SubmitOutcome::Accepted)
    }
}

fn project(root: &Path) {
    fs::create_dir_all(root.join("src/util")).unwrap();
    fs::write(root.join("src/main.rs"), "fn main() { util::run(); }").unwrap();
    fs::write(root.join("src/util/mod.rs"), "pub fn run() {}").unwrap();
    fs::write(root.join("README.md"), "# demo\n").unwrap();
    fs::create_dir_all(root.join("target/debug")).unwrap();
    fs::write(root.join("target/debug/demo.d"), "deps").unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join(".git/HEAD"), "ref: refs/heads/main").unwrap();
}

#[test]
fn integration_end_to_end_scenario() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "0123456789").unwrap();
    fs::write(dir.path().join("b.bin"), b"bin\0ary").unwrap();
    fs::write(dir.path().join("empty.txt"), "").unwrap();
    fs::create_dir(dir.path().join("node_modules")).unwrap();
    fs::write(dir.path().join("node_modules/x.js"), "module.exports = 1").unwrap();

    let result = scan(&ScanBuilder::new(dir.path()).build()).unwrap();
    assert_eq!(result.files_discovered(), 1);
    assert_eq!(result.files[0].path, "a.txt");
    assert_eq!(result.files[0].content, "0123456789");
    assert_eq!(result.files_walked, 3);
    assert_eq!(result.files_skipped, 2);
}

#[test]
fn integration_rescan_is_identical() {
    let dir = tempdir().unwrap();
    project(dir.path());
    let options = ScanBuilder::new(dir.path()).build();
    let first = scan(&options).unwrap();
    let second = scan(&options).unwrap();
    assert_eq!(first.files, second.files);
    let paths: Vec<_> = first.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["README.md", "src/main.rs", "src/util/mod.rs"]);
}

#[test]
fn integration_scan_and_upload() {
    let dir = tempdir().unwrap();
    project(dir.path());
    let options = ScanBuilder::new(dir.path()).build();
    let result = scan(&options).unwrap();
    let expected = result.files.clone();
    let batches = build_batches(result.files, options.max_batch_bytes);
    assert_eq!(batches.len(), 1);

    let mut server = FakeServer::new(100);
    let mut progress = Vec::new();
    let summary = upload_batches(&mut server, &batches, |p| progress.push(*p)).unwrap();
    assert_eq!(summary.files_indexed, 3);
    assert_eq!(server.stored, expected);
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].files_done, 3);
}

#[test]
fn integration_split_on_413_sends_two_halves() {
    let n = 4;
    let entries: Vec<FileEntry> = (0..2 * n)
        .map(|i| FileEntry {
            path: format!("file{i}.rs"),
            content_hash: format!("{i:064x}"),
            content: format!("// file {i}"),
        })
        .collect();
    let batches = build_batches(entries.clone(), usize::MAX);
    assert_eq!(batches.len(), 1);

    let mut server = FakeServer::new(n);
    let summary = upload_batches(&mut server, &batches, |_| {}).unwrap();

    let accepted: Vec<_> = server
        .requests
        .iter()
        .filter(|r| r.len() <= n)
        .collect();
    assert_eq!(accepted.len(), 2);
    assert!(accepted.iter().all(|r| r.len() == n));
    assert_eq!(server.stored, entries);
    assert_eq!(summary.files_indexed, 2 * n);
    assert_eq!(summary.splits, 1);
}
