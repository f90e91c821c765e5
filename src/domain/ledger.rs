//! Reference-counted visibility ledger
//!
//! Pure counting state machine with no knowledge of the host surface.
//! The ledger only decides *when* an overlay must be inserted or removed;
//! performing the insertion or removal is the coordinator's job.

/// Host-surface action implied by a ledger transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The overlay was hidden and a surface must now be inserted
    Insert,
    /// The last pending task released (or a force-clear ran); the surface
    /// must be removed
    Remove,
    /// Only the count moved; the surface stays as it is
    None,
}

/// Counts outstanding visibility requests for the single busy overlay
///
/// Two states: hidden (`pending == 0`) and showing (`pending > 0`).
/// The count never goes negative; releases beyond the number of
/// acquisitions clamp at zero and are safe no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilityLedger {
    pending: u32,
}

impl VisibilityLedger {
    /// Creates an empty ledger in the hidden state
    pub fn new() -> Self {
        Self { pending: 0 }
    }

    /// Number of callers that requested visibility and have not released it
    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// True while at least one pending task holds the overlay visible
    pub fn is_active(&self) -> bool {
        self.pending > 0
    }

    /// Registers one caller that wants the overlay visible
    ///
    /// # Returns
    /// `Transition::Insert` when this acquisition moves the ledger from
    /// hidden to showing, `Transition::None` when the overlay was already
    /// up and only the count incremented.
    pub fn acquire(&mut self) -> Transition {
        self.pending = self.pending.saturating_add(1);
        if self.pending == 1 {
            Transition::Insert
        } else {
            Transition::None
        }
    }

    /// Releases one caller, or every caller at once when `force` is set
    ///
    /// A forced release resets the count to zero unconditionally; the
    /// releases of callers that still believe they own a pending task then
    /// clamp harmlessly at zero.
    ///
    /// # Returns
    /// `Transition::Remove` when the ledger moved from showing to hidden,
    /// `Transition::None` otherwise (count still positive, or the ledger
    /// was already hidden).
    pub fn release(&mut self, force: bool) -> Transition {
        let was_active = self.pending > 0;

        if force {
            self.pending = 0;
        } else {
            self.pending = self.pending.saturating_sub(1);
        }

        if was_active && self.pending == 0 {
            Transition::Remove
        } else {
            Transition::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ledger_is_hidden() {
        let ledger = VisibilityLedger::new();
        assert_eq!(ledger.pending(), 0);
        assert!(!ledger.is_active());
    }

    #[test]
    fn first_acquire_inserts() {
        let mut ledger = VisibilityLedger::new();
        assert_eq!(ledger.acquire(), Transition::Insert);
        assert_eq!(ledger.pending(), 1);
        assert!(ledger.is_active());
    }

    #[test]
    fn nested_acquires_only_count() {
        let mut ledger = VisibilityLedger::new();
        assert_eq!(ledger.acquire(), Transition::Insert);
        assert_eq!(ledger.acquire(), Transition::None);
        assert_eq!(ledger.acquire(), Transition::None);
        assert_eq!(ledger.pending(), 3);
    }

    #[test]
    fn release_removes_only_at_zero() {
        let mut ledger = VisibilityLedger::new();
        ledger.acquire();
        ledger.acquire();

        assert_eq!(ledger.release(false), Transition::None);
        assert_eq!(ledger.pending(), 1);
        assert!(ledger.is_active());

        assert_eq!(ledger.release(false), Transition::Remove);
        assert_eq!(ledger.pending(), 0);
        assert!(!ledger.is_active());
    }

    #[test]
    fn release_on_empty_ledger_is_noop() {
        let mut ledger = VisibilityLedger::new();
        assert_eq!(ledger.release(false), Transition::None);
        assert_eq!(ledger.pending(), 0);
    }

    #[test]
    fn over_release_clamps_at_zero() {
        let mut ledger = VisibilityLedger::new();
        ledger.acquire();

        assert_eq!(ledger.release(false), Transition::Remove);
        // Extra releases beyond the single acquisition stay no-ops
        assert_eq!(ledger.release(false), Transition::None);
        assert_eq!(ledger.release(false), Transition::None);
        assert_eq!(ledger.pending(), 0);
    }

    #[test]
    fn force_release_clears_all_pending_tasks() {
        let mut ledger = VisibilityLedger::new();
        ledger.acquire();
        ledger.acquire();
        ledger.acquire();

        assert_eq!(ledger.release(true), Transition::Remove);
        assert_eq!(ledger.pending(), 0);
        assert!(!ledger.is_active());
    }

    #[test]
    fn force_release_on_empty_ledger_is_noop() {
        let mut ledger = VisibilityLedger::new();
        assert_eq!(ledger.release(true), Transition::None);
        assert_eq!(ledger.pending(), 0);
    }

    #[test]
    fn releases_after_force_clear_stay_noops() {
        let mut ledger = VisibilityLedger::new();
        ledger.acquire();
        ledger.acquire();
        ledger.release(true);

        // The two original acquirers eventually release; neither may
        // trigger a second removal
        assert_eq!(ledger.release(false), Transition::None);
        assert_eq!(ledger.release(false), Transition::None);
        assert_eq!(ledger.pending(), 0);
    }

    #[test]
    fn ledger_can_reopen_after_clearing() {
        let mut ledger = VisibilityLedger::new();
        ledger.acquire();
        ledger.release(false);

        assert_eq!(ledger.acquire(), Transition::Insert);
        assert_eq!(ledger.pending(), 1);
    }
}
