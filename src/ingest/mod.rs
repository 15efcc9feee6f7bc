//! Extraction collaborators that feed a [`ChunkSplitter`].
//!
//! Each collaborator delivers the byte content of one document through
//! repeated `push()` calls, in order, and reports whether extraction worked.
//! Plain files are read directly; PDF, DOC/DOCX, ODT and RTF are converted to
//! text by an external tool whose stdout is streamed in.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use chunkstream::{ingest, BufferPool, ChunkSplitter, MemoryStore, PoolConfig, SplitterConfig};
//!
//! let pool = BufferPool::new(PoolConfig::new(2, 4)?)?;
//! let store = MemoryStore::new();
//! let mut splitter = ChunkSplitter::new(&pool, &store, SplitterConfig::new(4)?)?;
//!
//! let n = ingest::stream_reader(Cursor::new(b"0123456789"), &mut splitter)?;
//! assert_eq!(n, 10);
//! assert_eq!(splitter.finish()?.len(), 3);
//! # Ok::<(), chunkstream::ChunkError>(())
//! ```

mod kind;

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};

use log::{debug, warn};

use crate::buffer::BufferPool;
use crate::chunker::{ChunkSplitter, Manifest};
use crate::config::SplitterConfig;
use crate::error::ChunkError;
use crate::store::ChunkStore;

pub use kind::DocumentKind;

/// Read granularity for files and subprocess output (64 KiB).
pub const READ_BLOCK_SIZE: usize = 64 * 1024;

/// Outcome of splitting one input.
///
/// Chunks flushed before an extraction failure are kept in `manifest`; they
/// are already persisted.
#[derive(Debug)]
pub struct InputReport {
    /// Every chunk produced for the input, in order.
    pub manifest: Manifest,
    /// The non-fatal extraction error, if extraction stopped early.
    pub error: Option<ChunkError>,
}

impl InputReport {
    /// Returns `true` if extraction delivered the whole input.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Splits the document at `path` with a fresh splitter.
///
/// See [`split_with`] for the error policy.
pub fn split_path<S: ChunkStore>(
    path: &Path,
    pool: &BufferPool,
    store: S,
    config: &SplitterConfig,
) -> Result<InputReport, ChunkError> {
    split_with(pool, store, config, |splitter| extract_path(path, splitter))
}

/// Runs `extract` against a fresh splitter and flushes it afterwards, even
/// when extraction failed.
///
/// # Errors
///
/// Fatal errors ([`ChunkError::is_fatal`]) and failures to create the
/// splitter are returned as `Err`. A non-fatal extraction error is reported
/// in [`InputReport::error`] next to the chunks flushed before it.
pub fn split_with<'p, S, F>(
    pool: &'p BufferPool,
    store: S,
    config: &SplitterConfig,
    extract: F,
) -> Result<InputReport, ChunkError>
where
    S: ChunkStore,
    F: FnOnce(&mut ChunkSplitter<'p, S>) -> Result<u64, ChunkError>,
{
    let mut splitter = ChunkSplitter::new(pool, store, config.clone())?;
    let extracted = extract(&mut splitter);
    let manifest = splitter.finish()?;

    match extracted {
        Ok(_) => Ok(InputReport {
            manifest,
            error: None,
        }),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => Ok(InputReport {
            manifest,
            error: Some(e),
        }),
    }
}

/// Extracts the content of `path` into `splitter`, choosing the collaborator
/// by [`DocumentKind::sniff`]. Returns the number of bytes pushed.
///
/// # Errors
///
/// Open, spawn and read failures become [`ChunkError::Extraction`]; fatal
/// splitter errors pass through unchanged.
pub fn extract_path<S: ChunkStore>(
    path: &Path,
    splitter: &mut ChunkSplitter<'_, S>,
) -> Result<u64, ChunkError> {
    let kind = DocumentKind::sniff(path);
    debug!("extracting {} as {:?}", path.display(), kind);

    match kind.command(path) {
        Some(mut command) => stream_command(&mut command, splitter)
            .map_err(|e| with_input(path, e)),
        None => {
            let file = File::open(path).map_err(|e| with_input(path, e.into()))?;
            stream_reader(file, splitter).map_err(|e| with_input(path, e))
        }
    }
}

/// Pushes everything `reader` yields into `splitter`, in
/// [`READ_BLOCK_SIZE`] reads. Returns the number of bytes pushed.
pub fn stream_reader<R: Read, S: ChunkStore>(
    mut reader: R,
    splitter: &mut ChunkSplitter<'_, S>,
) -> Result<u64, ChunkError> {
    let mut block = vec![0u8; READ_BLOCK_SIZE];
    let mut total = 0u64;

    loop {
        match reader.read(&mut block) {
            Ok(0) => return Ok(total),
            Ok(n) => {
                splitter.push(&block[..n])?;
                total += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Runs `command` and streams its stdout into `splitter`.
///
/// A non-zero exit status is only logged: some converters exit non-zero
/// after producing usable output.
pub fn stream_command<S: ChunkStore>(
    command: &mut Command,
    splitter: &mut ChunkSplitter<'_, S>,
) -> Result<u64, ChunkError> {
    let program = command.get_program().to_string_lossy().into_owned();

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|e| ChunkError::Extraction {
            input: program.clone(),
            message: format!("failed to spawn: {e}"),
        })?;

    let Some(stdout) = child.stdout.take() else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(ChunkError::Extraction {
            input: program,
            message: "stdout was not captured".to_string(),
        });
    };

    let total = match stream_reader(stdout, splitter) {
        Ok(total) => total,
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
    };

    let status = child.wait()?;
    if !status.success() {
        warn!("command exited with {status}: {program}");
    }
    Ok(total)
}

/// Attaches the input name to non-fatal errors.
fn with_input(path: &Path, err: ChunkError) -> ChunkError {
    match err {
        ChunkError::Io(e) => ChunkError::Extraction {
            input: path.display().to_string(),
            message: e.to_string(),
        },
        ChunkError::Extraction { message, .. } => ChunkError::Extraction {
            input: path.display().to_string(),
            message,
        },
        other => other,
    }
}
