//! Advisory byte-range lock table --- [`LockTable`].
//!
//! Vocabulary borrowed from the teacher's Network Lock Manager
//! (`nlm::Holder`, `nlm::LockRequest`: offset/length/exclusive), reduced
//! to the synchronous, in-process overlap check spec.md §4.5 describes:
//! no blocking, reclaim, or grace-period states, just immediate
//! grant-or-deny.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

/// Identifies the channel that requested a lock, for close-time release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(u64);

impl ChannelId {
    /// Allocates a fresh id, unique for the lifetime of the process.
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ChannelId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a single acquired lock, used to release it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockId(u64);

struct Entry {
    id: LockId,
    channel: ChannelId,
    start: u64,
    len: u64,
    shared: bool,
}

/// A description of a currently-held lock, returned by introspection.
#[derive(Debug, Clone, Copy)]
pub struct LockInfo {
    pub start: u64,
    pub len: u64,
    pub shared: bool,
}

/// Per-File table of currently-valid advisory byte-range locks.
#[derive(Default)]
pub struct LockTable {
    next_lock_id: u64,
    entries: Vec<Entry>,
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to acquire a lock over `[start, start + len)`.
    ///
    /// Fails with [`Error::OverlappingFileLock`] if any currently-valid
    /// lock on this table overlaps the requested range, regardless of
    /// which channel holds it. The implementation treats every
    /// acquisition as exclusive with respect to this check: `shared` is
    /// stored and returned via [`LockTable::info`] but does not relax
    /// the overlap test (see the Open Question in spec.md §9 --- this is
    /// the documented, intentional behavior, not an oversight to fix).
    pub fn try_acquire(
        &mut self,
        channel: ChannelId,
        start: u64,
        len: u64,
        shared: bool,
    ) -> Result<LockId> {
        let end = start.saturating_add(len);
        let overlaps = self.entries.iter().any(|entry| {
            let entry_end = entry.start.saturating_add(entry.len);
            ranges_overlap(start, end, entry.start, entry_end)
        });
        if overlaps {
            return Err(Error::OverlappingFileLock);
        }

        self.next_lock_id += 1;
        let id = LockId(self.next_lock_id);
        self.entries.push(Entry { id, channel, start, len, shared });
        Ok(id)
    }

    /// Releases a single lock. Idempotent: releasing an id that is no
    /// longer present (already released, or never valid) is a no-op.
    pub fn release(&mut self, id: LockId) {
        self.entries.retain(|entry| entry.id != id);
    }

    /// Invalidates every lock held through `channel`, used when the
    /// owning channel closes.
    pub fn release_channel(&mut self, channel: ChannelId) {
        self.entries.retain(|entry| entry.channel != channel);
    }

    /// Returns the info for a still-valid lock, if any.
    pub fn info(&self, id: LockId) -> Option<LockInfo> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| LockInfo { start: entry.start, len: entry.len, shared: entry.shared })
    }

    /// Whether any lock is currently valid on this table.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn ranges_overlap(a_start: u64, a_end: u64, b_start: u64, b_end: u64) -> bool {
    // A zero-length range locks no bytes and so never overlaps anything.
    if a_start == a_end || b_start == b_end {
        return false;
    }
    a_start < b_end && b_start < a_end
}
