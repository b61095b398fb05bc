//! Fixed-capacity, thread-safe FIFO of [`Message`]s.
//!
//! A ring of `capacity` slots guarded by one mutex, plus two counting
//! semaphores: `write_slots` (free slots, starts at `capacity`) and
//! `read_slots` (filled slots, starts at zero). Both `insert` and `remove`
//! take their permit *before* the ring lock, so no thread ever sleeps while
//! holding the lock.
//!
//! ```text
//!   insert:  write_slots.acquire ─► lock ─► slots[tail] = msg ─► unlock ─► read_slots.release
//!   remove:  read_slots.acquire  ─► lock ─► msg = slots[head] ─► unlock ─► write_slots.release
//! ```

use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::semaphore::Semaphore;
use crate::types::Message;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Ring storage; only touched while the buffer lock is held.
#[derive(Debug)]
struct Ring {
    slots: Box<[Option<Message>]>,
    head: usize,
    tail: usize,
}

impl Ring {
    fn push(&mut self, msg: Message) {
        let slot = &mut self.slots[self.tail];
        debug_assert!(slot.is_none(), "insert would overwrite an occupied slot");
        *slot = Some(msg);
        self.tail = (self.tail + 1) % self.slots.len();
    }

    fn pop(&mut self) -> Message {
        let Some(msg) = self.slots[self.head].take() else {
            // A read permit is only released after a push under the same lock.
            unreachable!("read permit granted for an empty slot");
        };
        self.head = (self.head + 1) % self.slots.len();
        msg
    }
}

/// Bounded blocking buffer shared between the two stages around it.
#[derive(Debug)]
pub struct BoundedBuffer {
    name: String,
    ring: Mutex<Ring>,
    write_slots: Semaphore,
    read_slots: Semaphore,
    /// Occupancy hint, updated under the ring lock and read without it.
    len: AtomicUsize,
}

impl BoundedBuffer {
    /// Create an empty buffer holding at most `capacity` messages.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ZeroCapacity`] if `capacity` is 0.
    pub fn new(name: impl Into<String>, capacity: usize) -> PipelineResult<Self> {
        let name = name.into();
        if capacity == 0 {
            return Err(PipelineError::ZeroCapacity { buffer: name });
        }

        Ok(Self {
            name,
            ring: Mutex::new(Ring {
                slots: (0..capacity).map(|_| None).collect(),
                head: 0,
                tail: 0,
            }),
            write_slots: Semaphore::new(capacity),
            read_slots: Semaphore::new(0),
            len: AtomicUsize::new(0),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Ring> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `msg` at the tail, blocking while the buffer is full.
    pub fn insert(&self, msg: Message) {
        self.write_slots.acquire();
        {
            let mut ring = self.lock();
            ring.push(msg);
            self.len.fetch_add(1, Ordering::Release);
        }
        self.read_slots.release();
    }

    /// Remove the head message, blocking while the buffer is empty.
    pub fn remove(&self) -> Message {
        self.read_slots.acquire();
        self.take_head()
    }

    /// Remove the head message if one is available, without waiting for one.
    pub fn try_remove(&self) -> Option<Message> {
        if !self.read_slots.try_acquire() {
            return None;
        }
        Some(self.take_head())
    }

    /// Caller must already hold a read permit.
    fn take_head(&self) -> Message {
        let msg = {
            let mut ring = self.lock();
            let msg = ring.pop();
            self.len.fetch_sub(1, Ordering::Release);
            msg
        };
        self.write_slots.release();
        msg
    }

    /// Number of queued messages.
    ///
    /// A hint only: it may already be stale when the caller looks at it.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Label used in logs and errors.
    pub fn name(&self) -> &str {
        &self.name
    }
}
