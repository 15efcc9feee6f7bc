//! Bounded pool of pre-allocated buffers.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, warn};
use parking_lot::{Condvar, Mutex};

use super::Buffer;
use crate::config::{AcquirePolicy, PoolConfig};
use crate::error::ChunkError;

static NEXT_POOL_ID: AtomicUsize = AtomicUsize::new(0);

/// A fixed set of reusable [`Buffer`]s.
///
/// Every buffer is allocated in [`BufferPool::new`]; none is created later.
/// `acquire` moves a buffer out, `release` moves it back. The free set sits
/// behind a mutex so several streams may share one pool across threads.
///
/// Buffers remember which pool allocated them; `release` drops a buffer
/// that belongs to another pool instead of adopting it.
#[derive(Debug)]
pub struct BufferPool {
    id: usize,
    free: Mutex<Vec<Buffer>>,
    released: Condvar,
    buffer_count: usize,
    buffer_capacity: usize,
    policy: AcquirePolicy,
}

impl BufferPool {
    /// Allocates all buffers up front.
    pub fn new(config: PoolConfig) -> Result<Self, ChunkError> {
        config.validate()?;

        let id = NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed);
        let free = (0..config.buffer_count())
            .map(|i| Buffer::new(id, i, config.buffer_capacity()))
            .collect();

        Ok(Self {
            id,
            free: Mutex::new(free),
            released: Condvar::new(),
            buffer_count: config.buffer_count(),
            buffer_capacity: config.buffer_capacity(),
            policy: config.acquire_policy(),
        })
    }

    /// Takes a cleared buffer out of the free set.
    ///
    /// With [`AcquirePolicy::FailFast`] an empty free set fails at once with
    /// [`ChunkError::PoolExhausted`]. With [`AcquirePolicy::Wait`] the call
    /// blocks until a buffer is released or the timeout elapses.
    pub fn acquire(&self) -> Result<Buffer, ChunkError> {
        let mut free = self.free.lock();

        if free.is_empty() {
            if let AcquirePolicy::Wait(timeout) = self.policy {
                self.released
                    .wait_while_for(&mut free, |free| free.is_empty(), timeout);
            }
        }

        let mut buffer = free.pop().ok_or(ChunkError::PoolExhausted {
            buffers: self.buffer_count,
        })?;
        buffer.clear();
        debug!(
            "acquired buffer {} ({} of {} free)",
            buffer.index(),
            free.len(),
            self.buffer_count
        );
        Ok(buffer)
    }

    /// Clears `buffer` and returns it to the free set.
    ///
    /// A buffer allocated by a different pool is dropped with a warning; the
    /// free set never grows past `buffer_count`.
    pub fn release(&self, mut buffer: Buffer) {
        if buffer.pool_id() != self.id {
            warn!(
                "dropping buffer {} of pool {} released into pool {}",
                buffer.index(),
                buffer.pool_id(),
                self.id
            );
            return;
        }
        buffer.clear();

        let mut free = self.free.lock();
        debug!("returned buffer {} to pool", buffer.index());
        free.push(buffer);
        drop(free);

        self.released.notify_one();
    }

    /// Total number of buffers owned by the pool.
    pub fn buffer_count(&self) -> usize {
        self.buffer_count
    }

    /// Capacity of every buffer in bytes.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// Number of buffers currently in the free set.
    pub fn available(&self) -> usize {
        self.free.lock().len()
    }

    /// Number of buffers currently checked out.
    pub fn in_use(&self) -> usize {
        self.buffer_count.saturating_sub(self.available())
    }

    /// Peak memory the pool can hold: count times capacity.
    pub fn memory_ceiling(&self) -> usize {
        self.buffer_count * self.buffer_capacity
    }
}
