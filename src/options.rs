use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Files above this size are left out at walk time (512 KiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 512 * 1024;
/// Ceiling on the estimated size of one upload request (4 MiB).
pub const DEFAULT_MAX_BATCH_BYTES: usize = 4 * 1024 * 1024;
/// Bytes inspected when deciding whether a file is binary.
pub const BINARY_SNIFF_LEN: u64 = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryDetection {
    /// A NUL byte in the first 8 KiB marks the file as binary.
    Simple,
    /// Let `content_inspector` classify the first 8 KiB.
    Accurate,
    None,
}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOptions {
    pub root: PathBuf,
    pub respect_gitignore: bool,
    pub ignore_patterns: Vec<String>,
    pub include_patterns: Vec<String>,
    pub max_file_size: u64,
    pub max_batch_bytes: usize,
    pub binary_detection: BinaryDetection,
}
impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            respect_gitignore: true,
            ignore_patterns: Vec::new(),
            include_patterns: Vec::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_batch_bytes: DEFAULT_MAX_BATCH_BYTES,
            binary_detection: BinaryDetection::Simple,
        }
    }
}
#[derive(Debug, Default)]
pub struct ScanBuilder {
    options: ScanOptions,
}
impl ScanBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: ScanOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }
    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.options.respect_gitignore = yes;
        self
    }
    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.options.ignore_patterns = patterns;
        self
    }
    pub fn include_patterns(mut self, patterns: Vec<String>) -> Self {
        self.options.include_patterns = patterns;
        self
    }
    pub fn max_file_size(mut self, limit: u64) -> Self {
        self.options.max_file_size = limit;
        self
    }
    pub fn max_batch_bytes(mut self, limit: usize) -> Self {
        self.options.max_batch_bytes = limit;
        self
    }
    pub fn binary_detection(mut self, method: BinaryDetection) -> Self {
        self.options.binary_detection = method;
        self
    }
    pub fn build(self) -> ScanOptions {
        self.options
    }
}
