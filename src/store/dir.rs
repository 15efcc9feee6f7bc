//! Directory-backed chunk store.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::ChunkStore;
use crate::chunk::ChunkId;
use crate::chunker::Manifest;

/// Stores each chunk as `<root>/<digest>_<stamp>.<ext>`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// chunk file is either complete or absent.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Uses an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    /// Creates the directory (and parents) if needed.
    pub fn create(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The output directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the ordered chunk file names of `manifest` to `<root>/<name>`,
    /// one per line.
    pub fn write_manifest(&self, name: &str, manifest: &Manifest) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        let mut body = String::new();
        for file_name in manifest.file_names() {
            body.push_str(&file_name);
            body.push('\n');
        }
        write_atomic(&path, body.as_bytes())?;
        Ok(path)
    }

    /// Reads a manifest written by [`DirStore::write_manifest`].
    pub fn read_manifest(&self, name: &str) -> io::Result<Vec<ChunkId>> {
        let body = fs::read_to_string(self.root.join(name))?;
        body.lines()
            .filter(|line| !line.is_empty())
            .map(|line| {
                ChunkId::parse(line).ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("bad manifest entry: {line}"),
                    )
                })
            })
            .collect()
    }
}

impl ChunkStore for DirStore {
    fn put(&self, id: &ChunkId, data: &[u8]) -> io::Result<()> {
        write_atomic(&self.locate(id), data)
    }

    fn get(&self, id: &ChunkId) -> io::Result<Vec<u8>> {
        fs::read(self.locate(id))
    }

    fn locate(&self, id: &ChunkId) -> PathBuf {
        self.root.join(id.file_name())
    }
}

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Writes through a temp file unique to this call, then renames.
fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let temp_path = path.with_file_name(format!(
        ".{}.{}.{}.tmp",
        file_name.to_string_lossy(),
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    let result = File::create(&temp_path)
        .and_then(|mut file| {
            file.write_all(data)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&temp_path, path));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}
