//! # In-Flight Lookups
//!
//! Maps each outstanding correlation id to the caller waiting for its reply.
//!
//! Flow:
//! 1. The bridge calls [`PendingTable::register`] and keeps the returned receiver.
//! 2. It publishes the request.
//! 3. The reply listener calls [`PendingTable::fulfill`], which wakes the caller.
//! 4. Or the caller's deadline passes and it calls [`PendingTable::expire`].
//!
//! Every path removes the entry, so the table only ever holds calls that are still
//! waiting.

use crate::bridge::{CorrelationId, LookupReply, ReplyDisposition};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingState {
    Waiting,
    Fulfilled,
    TimedOut,
}

/// One in-flight lookup.
struct PendingRequest {
    subject_id: String,
    issued_at: Instant,
    state: PendingState,
    /// Taken by whichever of reply or timeout resolves the request first.
    slot: Option<oneshot::Sender<LookupReply>>,
}

#[derive(Debug, Default)]
struct Counters {
    registered: AtomicU64,
    fulfilled: AtomicU64,
    timed_out: AtomicU64,
    stale: AtomicU64,
    cancelled: AtomicU64,
}

/// Snapshot of the table's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeStats {
    pub registered: u64,
    pub fulfilled: u64,
    pub timed_out: u64,
    /// Replies that matched no waiting request: late, duplicated or unknown.
    pub stale: u64,
    /// Requests abandoned by their caller before any outcome.
    pub cancelled: u64,
    pub in_flight: usize,
}

#[derive(Default)]
pub struct PendingTable {
    entries: DashMap<CorrelationId, PendingRequest>,
    counters: Counters,
}

impl PendingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a waiting request and returns the receiver its reply arrives on.
    pub fn register(&self, correlation_id: CorrelationId, subject_id: &str) -> oneshot::Receiver<LookupReply> {
        let (slot, receiver) = oneshot::channel();
        self.entries.insert(
            correlation_id,
            PendingRequest {
                subject_id: subject_id.to_string(),
                issued_at: Instant::now(),
                state: PendingState::Waiting,
                slot: Some(slot),
            },
        );
        self.counters.registered.fetch_add(1, Ordering::Relaxed);
        debug!(%correlation_id, subject_id, "Registered pending lookup");
        receiver
    }

    /// Resolves the request `correlation_id` names with `reply`.
    ///
    /// Only a `WAITING` entry is resolved. Anything else, including an id that was
    /// never registered, is stale and has no effect.
    pub fn fulfill(&self, correlation_id: &CorrelationId, reply: LookupReply) -> ReplyDisposition {
        let removed = self
            .entries
            .remove_if(correlation_id, |_, entry| entry.state == PendingState::Waiting);

        let Some((_, mut entry)) = removed else {
            self.counters.stale.fetch_add(1, Ordering::Relaxed);
            debug!(%correlation_id, "Stale reply discarded");
            return ReplyDisposition::Stale;
        };

        entry.state = PendingState::Fulfilled;
        let elapsed = entry.issued_at.elapsed();
        let delivered = entry.slot.take().is_some_and(|slot| slot.send(reply).is_ok());
        if delivered {
            self.counters.fulfilled.fetch_add(1, Ordering::Relaxed);
            debug!(
                %correlation_id,
                subject_id = %entry.subject_id,
                elapsed_ms = elapsed.as_millis() as u64,
                "Lookup fulfilled"
            );
            ReplyDisposition::Delivered
        } else {
            // The caller stopped listening between its deadline and this reply.
            self.counters.stale.fetch_add(1, Ordering::Relaxed);
            debug!(%correlation_id, "Reply arrived after caller left");
            ReplyDisposition::Stale
        }
    }

    /// Marks the request timed out and removes it.
    ///
    /// Returns how long it waited, or `None` when a reply already resolved it.
    pub fn expire(&self, correlation_id: &CorrelationId) -> Option<Duration> {
        {
            let mut entry = self.entries.get_mut(correlation_id)?;
            if entry.state != PendingState::Waiting {
                return None;
            }
            entry.state = PendingState::TimedOut;
        }
        let (_, entry) = self.entries.remove(correlation_id)?;
        self.counters.timed_out.fetch_add(1, Ordering::Relaxed);
        Some(entry.issued_at.elapsed())
    }

    /// Takes back a request that was never published. It is not counted anywhere.
    pub fn withdraw(&self, correlation_id: &CorrelationId) -> bool {
        if self.entries.remove(correlation_id).is_some() {
            self.counters.registered.fetch_sub(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Drops the request without an outcome. Returns false if it was already gone.
    pub fn cancel(&self, correlation_id: &CorrelationId) -> bool {
        if self.entries.remove(correlation_id).is_some() {
            self.counters.cancelled.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, correlation_id: &CorrelationId) -> bool {
        self.entries.contains_key(correlation_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> BridgeStats {
        BridgeStats {
            registered: self.counters.registered.load(Ordering::Relaxed),
            fulfilled: self.counters.fulfilled.load(Ordering::Relaxed),
            timed_out: self.counters.timed_out.load(Ordering::Relaxed),
            stale: self.counters.stale.load(Ordering::Relaxed),
            cancelled: self.counters.cancelled.load(Ordering::Relaxed),
            in_flight: self.entries.len(),
        }
    }
}

/// Removes the entry when the waiting future is dropped.
///
/// Resolved entries are already gone, so on normal completion this is a no-op.
pub(crate) struct PendingGuard<'a> {
    table: &'a PendingTable,
    correlation_id: CorrelationId,
}

impl<'a> PendingGuard<'a> {
    pub(crate) fn new(table: &'a PendingTable, correlation_id: CorrelationId) -> Self {
        Self {
            table,
            correlation_id,
        }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.table.cancel(&self.correlation_id) {
            debug!(correlation_id = %self.correlation_id, "Pending lookup abandoned");
        }
    }
}
