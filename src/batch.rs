//! Grouping admitted files into size-bounded upload batches.

use crate::types::FileEntry;
use serde::Serialize;

/// A non-empty run of entries sent in one request.
///
/// Only [`build_batches`] creates these.
#[derive(Debug, Clone, Serialize)]
pub struct Batch {
    files: Vec<FileEntry>,
    #[serde(skip)]
    estimated_bytes: usize,
}

impl Batch {
    fn start(entry: FileEntry) -> Self {
        Self {
            estimated_bytes: entry.estimated_size(),
            files: vec![entry],
        }
    }

    fn push(&mut self, entry: FileEntry) {
        self.estimated_bytes += entry.estimated_size();
        self.files.push(entry);
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Sum of [`FileEntry::estimated_size`] over the entries.
    pub fn estimated_bytes(&self) -> usize {
        self.estimated_bytes
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Greedily packs `entries` into batches of at most `max_bytes` estimated
/// bytes, preserving order.
///
/// An entry that alone exceeds `max_bytes` still gets sent, as a batch of one.
pub fn build_batches(entries: Vec<FileEntry>, max_bytes: usize) -> Vec<Batch> {
    let mut batches = Vec::new();
    let mut current: Option<Batch> = None;
    for entry in entries {
        current = Some(match current.take() {
            Some(batch) if batch.estimated_bytes + entry.estimated_size() > max_bytes => {
                batches.push(batch);
                Batch::start(entry)
            }
            Some(mut batch) => {
                batch.push(entry);
                batch
            }
            None => Batch::start(entry),
        });
    }
    batches.extend(current);
    batches
}
