//! # ctxsync
//!
//! `ctxsync` prepares a codebase for a remote context API and uploads it for
//! indexing. A scan walks the tree with layered ignore rules, drops binary,
//! blank and oversized files, and hashes the rest; the admitted files are then
//! packed into size-bounded batches and posted one request at a time.
//!
//! Everything runs on the calling thread, in order.
//!
//! # Example
//!
//! ```no_run
//! use ctxsync::{Config, IndexClient, ScanBuilder, build_batches, scan, upload_batches};
//!
//! let options = ScanBuilder::new(".").build();
//! let result = scan(&options).expect("Failed to scan directory");
//! let batches = build_batches(result.files, options.max_batch_bytes);
//!
//! let config = Config::load(None).expect("Failed to load config");
//! let mut client = IndexClient::new(&config).expect("Incomplete config");
//! let summary = upload_batches(&mut client, &batches, |p| {
//!     eprintln!("[batch {}/{}] {}/{} files", p.batch, p.batch_count, p.files_done, p.files_total);
//! })
//! .expect("Upload failed");
//! println!("indexed {} files", summary.files_indexed);
//! ```

mod batch;
mod client;
pub mod config;
mod engine;
mod error;
pub mod ignore_rules;
mod options;
pub mod output;
mod tree;
mod types;
mod upload;

pub use batch::{Batch, build_batches};
pub use client::IndexClient;
pub use config::Config;
pub use engine::{WalkOutcome, scan, walk};
pub use error::CtxsyncError;
pub use ignore_rules::IgnoreRules;
pub use options::{
    BinaryDetection, DEFAULT_MAX_BATCH_BYTES, DEFAULT_MAX_FILE_SIZE, ScanBuilder, ScanOptions,
};
pub use tree::build_tree_from_paths;
pub use types::{ENTRY_OVERHEAD, FileEntry, ScanResult, UploadSummary};
pub use upload::{BatchSink, SubmitOutcome, UploadProgress, upload_batches};
