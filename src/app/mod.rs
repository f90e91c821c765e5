//! Coordination layer
//!
//! This module arbitrates overlay visibility between any number of
//! concurrent callers and drives the host surface accordingly.

pub mod coordinator;
pub mod guard;

pub use coordinator::{OverlayCoordinator, ShowOptions};
pub use guard::BusyGuard;
