use serde::{Deserialize, Serialize};

/// Fixed per-entry allowance for the path, hash and JSON framing of one
/// entry inside an upload request.
pub const ENTRY_OVERHEAD: usize = 256;

/// One admitted file, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Path relative to the scan root, always `/`-separated.
    pub path: String,
    /// Lowercase hex SHA-256 of `content`.
    pub content_hash: String,
    /// The full text of the file.
    pub content: String,
}

impl FileEntry {
    /// Size this entry is assumed to occupy in a request body.
    pub fn estimated_size(&self) -> usize {
        self.content.len() + ENTRY_OVERHEAD
    }
}

/// Outcome of walking and filtering a tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Admitted files in walk order.
    pub files: Vec<FileEntry>,
    /// Files produced by the walk, before admission.
    pub files_walked: usize,
    /// Files dropped as binary, empty, unreadable or over the size limit.
    pub files_skipped: usize,
}

impl ScanResult {
    /// Number of files that will be indexed.
    pub fn files_discovered(&self) -> usize {
        self.files.len()
    }

    /// Sum of the estimated request sizes of all admitted files.
    pub fn estimated_bytes(&self) -> usize {
        self.files.iter().map(FileEntry::estimated_size).sum()
    }
}

/// Totals reported once every batch has been accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSummary {
    pub files_indexed: usize,
    pub batches_sent: usize,
    /// HTTP requests issued, including rejected ones.
    pub requests_made: usize,
    /// Times a rejected slice was halved and resent.
    pub splits: usize,
}
