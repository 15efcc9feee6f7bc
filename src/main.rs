// chunkstream/src/main.rs

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};

use chunkstream::{
    BufferPool, DEFAULT_BUFFER_COUNT, DEFAULT_THRESHOLD, DirStore, HashAlgorithm, NamingScheme,
    PoolConfig, SplitterConfig, ingest,
};

#[derive(Parser)]
#[command(name = "chunkstream", version)]
#[command(about = "Split documents into fixed-size, content-addressed chunk files", long_about = None)]
struct Cli {
    /// Files to split. PDF, DOC/DOCX, ODT and RTF go through external converters.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory [default: <tmp>/chunked/chunked_<unix-seconds>]
    #[arg(short, long, env = "CHUNKSTREAM_OUTPUT")]
    output: Option<PathBuf>,

    /// Chunk size in bytes
    #[arg(long, env = "CHUNKSTREAM_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
    threshold: usize,

    /// Number of pooled buffers
    #[arg(long, env = "CHUNKSTREAM_BUFFERS", default_value_t = DEFAULT_BUFFER_COUNT)]
    buffers: usize,

    /// Digest used to name chunks (sha512 or blake3)
    #[arg(long, env = "CHUNKSTREAM_HASH", default_value = "sha512")]
    hash: HashAlgorithm,

    /// Name chunks <digest>_<n> with a per-input sequence number instead of a timestamp
    #[arg(long)]
    sequence_names: bool,

    /// Write <n>_<input-name>.manifest listing each input's chunks in order
    #[arg(long)]
    manifest: bool,
}

#[derive(Debug, Default)]
struct RunSummary {
    inputs: usize,
    failed_inputs: usize,
    chunks: usize,
    bytes: u64,
    failed_writes: usize,
}

impl RunSummary {
    fn all_failed(&self) -> bool {
        self.failed_inputs == self.inputs
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let output = cli.output.clone().unwrap_or_else(default_output_dir);
    let store = DirStore::create(&output)
        .with_context(|| format!("creating output directory {}", output.display()))?;
    info!("writing chunks to {}", store.root().display());

    let pool = BufferPool::new(PoolConfig::new(cli.buffers, cli.threshold)?)?;
    let naming = if cli.sequence_names {
        NamingScheme::Sequence
    } else {
        NamingScheme::Timestamp
    };
    let config = SplitterConfig::new(cli.threshold)?
        .with_hash(cli.hash)
        .with_naming(naming);

    let summary = run(&cli.inputs, &pool, &store, &config, cli.manifest)?;

    println!("\nDone:");
    println!("  Inputs:         {}", summary.inputs);
    println!("  Failed inputs:  {}", summary.failed_inputs);
    println!("  Chunks:         {}", summary.chunks);
    println!("  Bytes:          {}", summary.bytes);
    println!("  Failed writes:  {}", summary.failed_writes);
    println!("  Output:         {}", store.root().display());

    if summary.all_failed() {
        bail!("no input could be processed");
    }
    Ok(())
}

/// Splits every input in turn. A fatal error aborts the run; any other
/// failure is logged and counted against its input.
fn run(
    inputs: &[PathBuf],
    pool: &BufferPool,
    store: &DirStore,
    config: &SplitterConfig,
    write_manifests: bool,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for (index, input) in inputs.iter().enumerate() {
        summary.inputs += 1;
        let report = match ingest::split_path(input, pool, store, config) {
            Ok(report) => report,
            Err(e) if e.is_fatal() => {
                return Err(e).with_context(|| format!("aborting run at {}", input.display()));
            }
            Err(e) => {
                warn!("{}: {e}", input.display());
                summary.failed_inputs += 1;
                continue;
            }
        };

        let manifest = &report.manifest;
        info!(
            "{}: {} chunks, {} bytes",
            input.display(),
            manifest.len(),
            manifest.total_bytes()
        );
        summary.chunks += manifest.len();
        summary.bytes += manifest.total_bytes();
        summary.failed_writes += manifest.failed_writes();

        if let Some(e) = &report.error {
            warn!("{e}");
            summary.failed_inputs += 1;
        }

        if write_manifests && (report.is_complete() || !manifest.is_empty()) {
            let name = manifest_name(index, input);
            if let Err(e) = store.write_manifest(&name, manifest) {
                warn!("failed to write manifest {name}: {e}");
            }
        }
    }

    Ok(summary)
}

fn default_output_dir() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    std::env::temp_dir()
        .join("chunked")
        .join(format!("chunked_{now}"))
}

/// `<position>_<file name>.manifest`, unique within one run.
fn manifest_name(index: usize, input: &Path) -> String {
    let name = input
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    format!("{index}_{name}.manifest")
}
