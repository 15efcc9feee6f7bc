//! Splitting engine for processing byte streams.
//!
//! - [`ChunkSplitter`] - Fixed-threshold splitter with `push()`/`finish()` API
//! - [`Manifest`] - Chunks of one stream in flush order

mod finalize;
mod manifest;
mod splitter;

pub use manifest::Manifest;
pub use splitter::ChunkSplitter;
