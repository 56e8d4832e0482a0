//! Sequential batch submission with halving on "payload too large".

use crate::batch::Batch;
use crate::error::CtxsyncError;
use crate::types::{FileEntry, UploadSummary};

/// Server verdict on one submitted slice of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    /// HTTP 413: the request body was too large.
    TooLarge,
}

/// Destination for upload requests.
///
/// Any error other than [`SubmitOutcome::TooLarge`] aborts the run.
pub trait BatchSink {
    fn submit(&mut self, files: &[FileEntry]) -> Result<SubmitOutcome, CtxsyncError>;
}

/// Reported after each batch has been fully accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    /// 1-based index of the batch just completed.
    pub batch: usize,
    pub batch_count: usize,
    pub files_done: usize,
    pub files_total: usize,
}

/// Sends every batch in order, waiting for each before the next.
///
/// A rejected slice with more than one entry is split in half by count and
/// both halves are resent, first half first; halving repeats until a single
/// entry remains, which is then an error. Batches already accepted stay
/// accepted when a later one fails.
pub fn upload_batches<S, F>(
    sink: &mut S,
    batches: &[Batch],
    mut on_progress: F,
) -> Result<UploadSummary, CtxsyncError>
where
    S: BatchSink + ?Sized,
    F: FnMut(&UploadProgress),
{
    let files_total = batches.iter().map(Batch::len).sum();
    let mut summary = UploadSummary::default();
    for (index, batch) in batches.iter().enumerate() {
        submit_with_split(sink, batch.files(), &mut summary)?;
        summary.files_indexed += batch.len();
        summary.batches_sent += 1;
        let progress = UploadProgress {
            batch: index + 1,
            batch_count: batches.len(),
            files_done: summary.files_indexed,
            files_total,
        };
        tracing::info!(
            "Batch {}/{} accepted ({}/{} files)",
            progress.batch,
            progress.batch_count,
            progress.files_done,
            progress.files_total
        );
        on_progress(&progress);
    }
    Ok(summary)
}

fn submit_with_split<S>(
    sink: &mut S,
    files: &[FileEntry],
    summary: &mut UploadSummary,
) -> Result<(), CtxsyncError>
where
    S: BatchSink + ?Sized,
{
    let mut pending = vec![files];
    while let Some(slice) = pending.pop() {
        if slice.is_empty() {
            continue;
        }
        summary.requests_made += 1;
        match sink.submit(slice)? {
            SubmitOutcome::Accepted => {}
            SubmitOutcome::TooLarge if slice.len() > 1 => {
                let (first, second) = slice.split_at(slice.len() / 2);
                tracing::warn!(
                    "Request of {} files was too large, retrying as {} + {}",
                    slice.len(),
                    first.len(),
                    second.len()
                );
                summary.splits += 1;
                pending.push(second);
                pending.push(first);
            }
            SubmitOutcome::TooLarge => {
                let (path, bytes) = slice
                    .first()
                    .map(|e| (e.path.clone(), e.content.len()))
                    .unwrap_or_default();
                return Err(CtxsyncError::PayloadTooLarge { path, bytes });
            }
        }
    }
    Ok(())
}
