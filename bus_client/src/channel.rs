//! Exclusive access to one boundary.
//!
//! The far side's parameter FIFO carries no transaction ids, so two
//! interleaved push…pop sequences would corrupt each other. A
//! [`BusChannel`] owns its boundary behind a lock and hands out
//! [`Transaction`]s that hold the lock until dropped. Whatever a
//! transaction leaves pending on the far side is popped and discarded
//! before the lock is released, so the next transaction starts on an empty
//! FIFO.
//!
//! The lock is a spin lock held across the whole transaction, remote
//! invocation included: waiting callers busy-spin, and taking a second
//! transaction on a thread that already holds one never returns.

use crate::codec::ParamCodec;
use bus_abi::{Boundary, Result};
use log::debug;
use spin::{Mutex, MutexGuard};

/// A boundary shared between callers.
pub struct BusChannel<B> {
    boundary: Mutex<B>,
}

impl<B: Boundary> BusChannel<B> {
    /// Creates a channel over a boundary.
    pub const fn new(boundary: B) -> Self {
        Self {
            boundary: Mutex::new(boundary),
        }
    }

    /// Starts a transaction. Other callers spin until it is dropped.
    ///
    /// Must not be called while the same thread holds a transaction,
    /// directly or through a resolution.
    pub fn transaction(&self) -> Transaction<'_, B> {
        Transaction {
            guard: self.boundary.lock(),
        }
    }

    /// Runs `f` inside one transaction.
    ///
    /// `f` must not start another transaction or resolve a name on this
    /// channel; either would spin forever on the held lock.
    pub fn call<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut ParamCodec<'_, B>) -> Result<R>,
    {
        let mut transaction = self.transaction();
        let mut codec = transaction.codec();
        f(&mut codec)
    }

    /// Gives direct access to the boundary.
    ///
    /// Must not be called while the same thread holds a transaction.
    pub fn with_boundary<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut B) -> R,
    {
        let mut boundary = self.boundary.lock();
        f(&mut *boundary)
    }

    /// Consumes the channel, returning the boundary.
    pub fn into_inner(self) -> B {
        self.boundary.into_inner()
    }
}

/// Exclusive use of a channel for one push…pop sequence.
///
/// Dropping it discards any parameters still pending on the far side.
pub struct Transaction<'a, B: Boundary> {
    guard: MutexGuard<'a, B>,
}

impl<'a, B: Boundary> Transaction<'a, B> {
    /// Borrows a codec over the locked boundary.
    pub fn codec(&mut self) -> ParamCodec<'_, B> {
        ParamCodec::new(&mut *self.guard)
    }
}

impl<'a, B: Boundary> Drop for Transaction<'a, B> {
    fn drop(&mut self) {
        let discarded = self.codec().discard_pending();
        if discarded > 0 {
            debug!("transaction left {} parameters pending", discarded);
        }
    }
}
