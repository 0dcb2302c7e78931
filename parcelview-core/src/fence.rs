//! Request fencing for single-slot result stores
//!
//! Every resolver call takes a ticket before it suspends on the network.
//! When the response arrives the store applies it only if the ticket is still
//! the latest one issued, so a slow response can never overwrite the result
//! of a request that was issued after it.

use std::sync::atomic::{AtomicU64, Ordering};

/// Sequence number handed out by a [`RequestFence`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Monotonic ticket counter for one result slot
#[derive(Debug, Default)]
pub struct RequestFence {
    latest: AtomicU64,
}

impl RequestFence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, superseding all previously issued ones
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True only for the most recently issued ticket
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Sequence of the latest ticket (0 when none issued)
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}
