//! Command-line interface for ctxsync.
//!
//! `ctxsync scan` shows what would be indexed; `ctxsync index` uploads it.
//! Flags, config file and environment are resolved into a request struct up
//! front, and the run functions only consume that struct.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ctxsync::output::{self, OutputFormat, ScanReport};
use ctxsync::{
    BinaryDetection, Config, DEFAULT_MAX_BATCH_BYTES, DEFAULT_MAX_FILE_SIZE, IndexClient,
    ScanBuilder, ScanOptions, build_batches, scan, upload_batches,
};
use std::path::PathBuf;
use std::process::exit;
use tracing_subscriber::EnvFilter;

/// ctxsync — upload a codebase to a context API for indexing
#[derive(Parser)]
#[command(name = "ctxsync", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Walk the tree and show the files and batches an index run would send
    Scan {
        #[command(flatten)]
        scan: ScanArgs,

        /// Print the tree of admitted files
        #[arg(long)]
        tree: bool,
    },
    /// Walk the tree and upload every admitted file
    Index {
        #[command(flatten)]
        scan: ScanArgs,

        #[command(flatten)]
        remote: RemoteArgs,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Root directory (default current dir)
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Extra ignore patterns, gitignore syntax (can be repeated)
    #[arg(short = 'I', long = "ignore")]
    ignore_patterns: Vec<String>,

    /// Only index paths matching these globs (can be repeated)
    #[arg(long = "include")]
    include_patterns: Vec<String>,

    /// Do not read the root .gitignore
    #[arg(long)]
    no_gitignore: bool,

    /// Binary detection strategy
    #[arg(long, value_enum, default_value_t = Detection::Simple)]
    binary_detection: Detection,

    /// Skip files larger than this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,

    /// Upper bound on the estimated size of one request, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BATCH_BYTES)]
    max_batch_bytes: usize,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RemoteArgs {
    /// Config file (default: <config dir>/ctxsync/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Bearer token
    #[arg(long)]
    token: Option<String>,

    /// Project to index into
    #[arg(short, long)]
    project: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Detection {
    Simple,
    Accurate,
    None,
}

impl From<Detection> for BinaryDetection {
    fn from(d: Detection) -> Self {
        match d {
            Detection::Simple => BinaryDetection::Simple,
            Detection::Accurate => BinaryDetection::Accurate,
            Detection::None => BinaryDetection::None,
        }
    }
}

impl ScanArgs {
    fn into_options(self) -> (ScanOptions, OutputFormat) {
        let options = ScanBuilder::new(self.root)
            .respect_gitignore(!self.no_gitignore)
            .ignore_patterns(self.ignore_patterns)
            .include_patterns(self.include_patterns)
            .binary_detection(self.binary_detection.into())
            .max_file_size(self.max_file_size)
            .max_batch_bytes(self.max_batch_bytes)
            .build();
        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };
        (options, format)
    }
}

impl RemoteArgs {
    fn resolve(self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref()).context("Failed to load config")?;
        if let Some(url) = self.api_url {
            config.api_url = url;
        }
        if let Some(token) = self.token {
            config.token = Some(token);
        }
        if let Some(project) = self.project {
            config.project_id = Some(project);
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        config.validate_for_upload()?;
        Ok(config)
    }
}

/// Everything an index run needs, already validated.
struct IndexRequest {
    options: ScanOptions,
    format: OutputFormat,
    config: Config,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Scan { scan, tree } => {
            let (options, format) = scan.into_options();
            run_scan(&options, format, tree)
        }
        Command::Index { scan, remote } => {
            let (options, format) = scan.into_options();
            let config = remote.resolve()?;
            run_index(IndexRequest {
                options,
                format,
                config,
            })
        }
    }
}

fn run_scan(options: &ScanOptions, format: OutputFormat, show_tree: bool) -> Result<()> {
    let result = scan(options)?;
    let batches = build_batches(result.files.clone(), options.max_batch_bytes);
    let report = ScanReport::new(&options.root, &result, &batches);
    println!("{}", output::format_scan(&report, format, show_tree)?);
    Ok(())
}

fn run_index(request: IndexRequest) -> Result<()> {
    let mut client = IndexClient::new(&request.config)?;
    let result = scan(&request.options)?;
    if result.files.is_empty() {
        eprintln!("Nothing to index under {}", request.options.root.display());
        return Ok(());
    }
    eprintln!(
        "Found {} files ({} skipped), uploading to {}",
        result.files_discovered(),
        result.files_skipped,
        client.url()
    );
    let batches = build_batches(result.files, request.options.max_batch_bytes);
    let summary = upload_batches(&mut client, &batches, |p| {
        eprintln!(
            "[batch {}/{}] indexed {}/{} files",
            p.batch, p.batch_count, p.files_done, p.files_total
        );
    })
    .context("Indexing aborted")?;
    println!("{}", output::format_upload(&summary, request.format)?);
    Ok(())
}
