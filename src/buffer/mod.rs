//! Fixed-capacity buffers and the pool that owns them.
//!
//! All buffer memory is allocated once, when the [`BufferPool`] is built.
//! A [`Buffer`] is moved out of the pool by `acquire` and moved back in by
//! `release`, so at any instant it has exactly one holder.

mod buf;
mod pool;

pub use buf::Buffer;
pub use pool::BufferPool;
