//! Upload tickets.
//!
//! Image uploads are asynchronous and may overlap: a second upload can start
//! before the first one answers. Every upload is issued a ticket, and a
//! completion is only applied while its ticket is still pending. Completions
//! land on the *current* document in the order they arrive, so a slow
//! response never discards a widget added by a faster one; the last response
//! to arrive is simply the last widget appended.

use std::collections::BTreeSet;

/// Token identifying one in-flight upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UploadTicket(u64);

impl UploadTicket {
    pub fn token(&self) -> u64 {
        self.0
    }
}

/// Pending-upload bookkeeping for one editor.
#[derive(Debug, Default)]
pub(crate) struct UploadQueue {
    next: u64,
    pending: BTreeSet<u64>,
}

impl UploadQueue {
    pub fn issue(&mut self) -> UploadTicket {
        self.next += 1;
        self.pending.insert(self.next);
        UploadTicket(self.next)
    }

    /// Mark a ticket complete. False if it was cancelled or never issued.
    pub fn complete(&mut self, ticket: UploadTicket) -> bool {
        self.pending.remove(&ticket.0)
    }

    pub fn cancel(&mut self, ticket: UploadTicket) -> bool {
        self.pending.remove(&ticket.0)
    }

    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_are_monotonic() {
        let mut queue = UploadQueue::default();
        let a = queue.issue();
        let b = queue.issue();
        assert!(b > a);
        assert_eq!(queue.pending(), 2);
    }

    #[test]
    fn ticket_completes_once() {
        let mut queue = UploadQueue::default();
        let t = queue.issue();
        assert!(queue.complete(t));
        assert!(!queue.complete(t));
    }

    #[test]
    fn cancelled_ticket_does_not_complete() {
        let mut queue = UploadQueue::default();
        let t = queue.issue();
        assert!(queue.cancel(t));
        assert!(!queue.complete(t));
        assert_eq!(queue.pending(), 0);
    }
}
