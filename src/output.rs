//! Output formatting for scan and upload results.
//!
//! Both plain text for a terminal and JSON for scripting.

use crate::batch::Batch;
use crate::tree::build_tree_from_paths;
use crate::{CtxsyncError, ScanResult, UploadSummary};
use serde::Serialize;
use std::path::Path;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Machine-readable summary of a dry-run scan.
#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
    pub root: String,
    pub files_walked: usize,
    pub files_discovered: usize,
    pub files_skipped: usize,
    pub batches: Vec<BatchReport<'a>>,
    pub estimated_bytes: usize,
}

#[derive(Debug, Serialize)]
pub struct BatchReport<'a> {
    pub files: Vec<&'a str>,
    pub estimated_bytes: usize,
}

impl<'a> ScanReport<'a> {
    pub fn new(root: &Path, result: &ScanResult, batches: &'a [Batch]) -> Self {
        Self {
            root: root.display().to_string(),
            files_walked: result.files_walked,
            files_discovered: result.files_discovered(),
            files_skipped: result.files_skipped,
            batches: batches
                .iter()
                .map(|b| BatchReport {
                    files: b.files().iter().map(|f| f.path.as_str()).collect(),
                    estimated_bytes: b.estimated_bytes(),
                })
                .collect(),
            estimated_bytes: result.estimated_bytes(),
        }
    }
}

/// Formats a scan and its batch plan.
pub fn format_scan(
    report: &ScanReport<'_>,
    format: OutputFormat,
    show_tree: bool,
) -> Result<String, CtxsyncError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(format_scan_text(report, show_tree)),
    }
}

/// Formats the totals of a finished upload.
pub fn format_upload(
    summary: &UploadSummary,
    format: OutputFormat,
) -> Result<String, CtxsyncError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
        OutputFormat::Text => {
            let mut out = format!(
                "Indexed {} files in {} batches",
                summary.files_indexed, summary.batches_sent
            );
            if summary.splits > 0 {
                out.push_str(&format!(
                    " ({} requests, {} splits after 413)",
                    summary.requests_made, summary.splits
                ));
            }
            Ok(out)
        }
    }
}

fn format_scan_text(report: &ScanReport<'_>, show_tree: bool) -> String {
    let mut out = String::with_capacity(1024);
    if show_tree {
        let paths: Vec<&str> = report
            .batches
            .iter()
            .flat_map(|b| b.files.iter().copied())
            .collect();
        out.push_str(&build_tree_from_paths(Path::new(&report.root), &paths));
        out.push_str("\n\n");
    }
    out.push_str(&format!(
        "Walked:     {}\nAdmitted:   {}\nSkipped:    {}\nBatches:    {}\nEst. size:  {}",
        report.files_walked,
        report.files_discovered,
        report.files_skipped,
        report.batches.len(),
        human_bytes(report.estimated_bytes)
    ));
    out
}

fn human_bytes(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b >= KIB * KIB {
        format!("{:.1} MiB", b / (KIB * KIB))
    } else if b >= KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{} B", bytes)
    }
}
