//! Last-request-wins sequencing.
//!
//! Every refresh takes a [`RequestTicket`] from a shared
//! [`RequestSequencer`]. A completion is applied through [`LatestSlot`] only
//! while its ticket is still the most recently issued one; anything older
//! is discarded.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Sequence number of one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Raw sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues monotonically increasing request tickets.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    last_issued: AtomicU64,
}

impl RequestSequencer {
    /// Creates a sequencer that has issued nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next ticket. The first ticket is `#1`.
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.last_issued.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Most recently issued ticket, if any.
    pub fn latest(&self) -> Option<RequestTicket> {
        match self.last_issued.load(Ordering::Acquire) {
            0 => None,
            n => Some(RequestTicket(n)),
        }
    }

    /// Whether `ticket` is still the most recently issued one.
    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.last_issued.load(Ordering::Acquire) == ticket.0
    }
}

/// Result of offering a completion to a [`LatestSlot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The value was stored.
    Applied(RequestTicket),
    /// A newer request was issued; the value was discarded.
    Stale {
        /// Ticket of the discarded completion.
        ticket: RequestTicket,
        /// Newest issued ticket at the time of the check.
        latest: Option<RequestTicket>,
    },
}

impl ApplyOutcome {
    /// Whether the value was stored.
    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

struct Stored<T> {
    ticket: RequestTicket,
    value: Arc<T>,
}

/// Holds the value produced by the latest request.
///
/// # Examples
///
/// ```rust
/// use folio_risk::sequencing::{LatestSlot, RequestSequencer};
/// use std::sync::Arc;
///
/// let sequencer = Arc::new(RequestSequencer::new());
/// let slot = LatestSlot::new(Arc::clone(&sequencer));
///
/// let old = sequencer.issue();
/// let new = sequencer.issue();
///
/// assert!(slot.apply(new, "fresh").is_applied());
/// assert!(!slot.apply(old, "stale").is_applied());
/// assert_eq!(*slot.current().unwrap(), "fresh");
/// ```
pub struct LatestSlot<T> {
    sequencer: Arc<RequestSequencer>,
    stored: Mutex<Option<Stored<T>>>,
}

impl<T> LatestSlot<T> {
    /// Creates an empty slot guarded by `sequencer`.
    pub fn new(sequencer: Arc<RequestSequencer>) -> Self {
        Self {
            sequencer,
            stored: Mutex::new(None),
        }
    }

    /// Sequencer guarding this slot.
    pub fn sequencer(&self) -> &Arc<RequestSequencer> {
        &self.sequencer
    }

    fn lock(&self) -> MutexGuard<'_, Option<Stored<T>>> {
        // A panic while holding the lock cannot leave a half-written value.
        self.stored.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stores `value` if `ticket` is still the latest issued ticket.
    pub fn apply(&self, ticket: RequestTicket, value: T) -> ApplyOutcome {
        self.apply_with(ticket, || value)
    }

    /// Like [`LatestSlot::apply`], but builds the value only when it will be
    /// stored. The builder runs under the slot lock.
    pub fn apply_with<F>(&self, ticket: RequestTicket, build: F) -> ApplyOutcome
    where
        F: FnOnce() -> T,
    {
        let mut stored = self.lock();
        let newer_stored = stored.as_ref().is_some_and(|s| s.ticket > ticket);
        if newer_stored || !self.sequencer.is_latest(ticket) {
            return ApplyOutcome::Stale {
                ticket,
                latest: self.sequencer.latest(),
            };
        }
        *stored = Some(Stored {
            ticket,
            value: Arc::new(build()),
        });
        ApplyOutcome::Applied(ticket)
    }

    /// Current value.
    pub fn current(&self) -> Option<Arc<T>> {
        self.lock().as_ref().map(|s| Arc::clone(&s.value))
    }

    /// Ticket of the current value.
    pub fn current_ticket(&self) -> Option<RequestTicket> {
        self.lock().as_ref().map(|s| s.ticket)
    }
}

impl<T> fmt::Debug for LatestSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LatestSlot")
            .field("latest_issued", &self.sequencer.latest())
            .field("current", &self.current_ticket())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_increase() {
        let sequencer = RequestSequencer::new();
        assert_eq!(sequencer.latest(), None);

        let a = sequencer.issue();
        let b = sequencer.issue();
        assert!(b > a);
        assert_eq!(a.sequence(), 1);
        assert_eq!(sequencer.latest(), Some(b));
        assert!(sequencer.is_latest(b));
        assert!(!sequencer.is_latest(a));
        assert_eq!(b.to_string(), "#2");
    }

    #[test]
    fn test_stale_completion_discarded() {
        let sequencer = Arc::new(RequestSequencer::new());
        let slot = LatestSlot::new(Arc::clone(&sequencer));

        let first = sequencer.issue();
        let second = sequencer.issue();

        let outcome = slot.apply(first, 1);
        assert_eq!(
            outcome,
            ApplyOutcome::Stale {
                ticket: first,
                latest: Some(second)
            }
        );
        assert!(slot.current().is_none());

        assert!(slot.apply(second, 2).is_applied());
        assert_eq!(*slot.current().unwrap(), 2);
        assert_eq!(slot.current_ticket(), Some(second));
    }

    #[test]
    fn test_builder_not_run_for_stale() {
        let sequencer = Arc::new(RequestSequencer::new());
        let slot: LatestSlot<u32> = LatestSlot::new(Arc::clone(&sequencer));
        let stale = sequencer.issue();
        sequencer.issue();

        let mut ran = false;
        slot.apply_with(stale, || {
            ran = true;
            0
        });
        assert!(!ran);
    }

    #[test]
    fn test_older_ticket_never_overwrites_newer_value() {
        let sequencer = Arc::new(RequestSequencer::new());
        let slot = LatestSlot::new(Arc::clone(&sequencer));
        let ticket = sequencer.issue();
        assert!(slot.apply(ticket, "a").is_applied());
        // Re-applying the same latest ticket replaces the value.
        assert!(slot.apply(ticket, "b").is_applied());
        assert_eq!(*slot.current().unwrap(), "b");
    }

    #[test]
    fn test_concurrent_issue_is_unique() {
        let sequencer = Arc::new(RequestSequencer::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sequencer = Arc::clone(&sequencer);
                std::thread::spawn(move || (0..100).map(|_| sequencer.issue()).collect::<Vec<_>>())
            })
            .collect();
        let mut all: Vec<RequestTicket> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 800);
        assert_eq!(sequencer.latest().unwrap().sequence(), 800);
    }
}
