use crate::error::CtxsyncError;
use crate::ignore_rules::IgnoreRules;
use crate::options::{BINARY_SNIFF_LEN, BinaryDetection, ScanOptions};
use crate::types::{FileEntry, ScanResult};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Files found by [`walk`], in depth-first, name-sorted order.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub files: Vec<PathBuf>,
    /// Files left out for exceeding the size limit.
    pub oversized: usize,
    /// Directories or entries that could not be read.
    pub unreadable: usize,
}

struct Walker {
    inner: ignore::Walk,
    root: PathBuf,
    include: Option<GlobSet>,
    max_file_size: u64,
}
impl Walker {
    fn new(options: &ScanOptions, rules: IgnoreRules) -> Result<Self, CtxsyncError> {
        let include = if !options.include_patterns.is_empty() {
            let mut glob_builder = GlobSetBuilder::new();
            for pattern in &options.include_patterns {
                let glob = Glob::new(pattern)
                    .map_err(|e| CtxsyncError::pattern(pattern.as_str(), e))?;
                glob_builder.add(glob);
            }
            Some(
                glob_builder
                    .build()
                    .map_err(|e| CtxsyncError::Walk(format!("Failed to build glob set: {}", e)))?,
            )
        } else {
            None
        };
        let mut builder = WalkBuilder::new(&options.root);
        builder
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b));
        let root = options.root.clone();
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            if rules.is_ignored(relative, is_dir) {
                tracing::debug!("Ignored: {}", relative.display());
                return false;
            }
            true
        });
        Ok(Self {
            inner: builder.build(),
            root: options.root.clone(),
            include,
            max_file_size: options.max_file_size,
        })
    }

    /// Depth-first, name-sorted. Ignored directories are pruned by the
    /// entry filter, so the walk never descends into them.
    fn walk(self) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();
        for result in self.inner {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry: {}", e);
                    outcome.unreadable += 1;
                    continue;
                }
            };
            // Links are not followed, so symlinks never report `is_file`.
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            if let Some(ref include) = self.include {
                if !include.is_match(relative) {
                    continue;
                }
            }
            match entry.metadata() {
                Ok(meta) if meta.len() > self.max_file_size => {
                    tracing::debug!(
                        "File too large ({} > {}): {}",
                        meta.len(),
                        self.max_file_size,
                        relative.display()
                    );
                    outcome.oversized += 1;
                }
                Ok(_) => outcome.files.push(path.to_path_buf()),
                Err(e) => {
                    tracing::debug!("Cannot stat {}: {}", path.display(), e);
                    outcome.unreadable += 1;
                }
            }
        }
        outcome
    }
}

/// Converts `path` to a `/`-separated path relative to `root`.
pub(crate) fn relative_path(root: &Path, path: &Path) -> Result<String, CtxsyncError> {
    let relative = path.strip_prefix(root).map_err(|_| {
        CtxsyncError::InvalidPath(format!(
            "{} is not under {}",
            path.display(),
            root.display()
        ))
    })?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Ok(parts.join("/"))
}

/// Reads and hashes one file. `Ok(None)` means the file is binary or blank.
pub(crate) fn read_file_entry(
    root: &Path,
    path: &Path,
    binary_detection: BinaryDetection,
) -> Result<Option<FileEntry>, CtxsyncError> {
    let file = File::open(path).map_err(|e| CtxsyncError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut bytes = Vec::with_capacity(BINARY_SNIFF_LEN as usize);
    let _ = reader
        .by_ref()
        .take(BINARY_SNIFF_LEN)
        .read_to_end(&mut bytes)
        .map_err(|e| CtxsyncError::io(path, e))?;
    let is_binary = match binary_detection {
        BinaryDetection::Simple => bytes.contains(&0),
        BinaryDetection::Accurate => content_inspector::inspect(&bytes).is_binary(),
        BinaryDetection::None => false,
    };
    if is_binary {
        tracing::debug!("Binary file detected: {}", path.display());
        return Ok(None);
    }
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| CtxsyncError::io(path, e))?;
    let content = String::from_utf8_lossy(&bytes).into_owned();
    if content.trim().is_empty() {
        tracing::debug!("Empty file: {}", path.display());
        return Ok(None);
    }
    let content_hash = format!("{:x}", Sha256::digest(content.as_bytes()));
    Ok(Some(FileEntry {
        path: relative_path(root, path)?,
        content_hash,
        content,
    }))
}

fn check_root(options: &ScanOptions) -> Result<(), CtxsyncError> {
    if !options.root.is_dir() {
        return Err(CtxsyncError::InvalidPath(format!(
            "{} is not a directory",
            options.root.display()
        )));
    }
    Ok(())
}

/// Lists the files a scan would read, after ignore rules and the size limit.
pub fn walk(options: &ScanOptions) -> Result<WalkOutcome, CtxsyncError> {
    check_root(options)?;
    let rules = IgnoreRules::new(
        &options.root,
        &options.ignore_patterns,
        options.respect_gitignore,
    )?;
    Ok(Walker::new(options, rules)?.walk())
}

/// Walks `options.root` and returns every admitted file with its hash.
///
/// Unreadable, binary and blank files are counted in
/// [`ScanResult::files_skipped`] rather than reported as errors.
pub fn scan(options: &ScanOptions) -> Result<ScanResult, CtxsyncError> {
    tracing::debug!("Starting scan with root: {}", options.root.display());
    let walked = walk(options)?;
    let mut files = Vec::with_capacity(walked.files.len());
    let mut skipped = walked.oversized;
    for path in &walked.files {
        match read_file_entry(&options.root, path, options.binary_detection) {
            Ok(Some(entry)) => files.push(entry),
            Ok(None) => skipped += 1,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", path.display(), e);
                skipped += 1;
            }
        }
    }
    tracing::info!(
        "Scanned {}: {} files admitted, {} skipped",
        options.root.display(),
        files.len(),
        skipped
    );
    Ok(ScanResult {
        files,
        files_walked: walked.files.len() + walked.oversized,
        files_skipped: skipped,
    })
}
