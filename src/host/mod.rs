//! Host surface seam
//!
//! Abstracts the platform capability that can place an opaque visual
//! element into the live view hierarchy. The coordinator talks only to
//! these traits, which keeps the arbitration logic testable without a
//! real windowing system.

use crate::domain::content::OverlayContent;
use thiserror::Error;

/// Errors surfaced by a host implementation
///
/// Hosts are expected to normally never fail; when they do, the error
/// propagates to the caller of `show`/`hide` while the coordinator keeps
/// its counter and handle consistent.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to insert overlay surface: {reason}")]
    InsertFailed { reason: String },

    #[error("failed to remove overlay surface: {reason}")]
    RemoveFailed { reason: String },
}

/// Live overlay element inserted into the host view hierarchy
///
/// A handle is removable exactly once; implementations must treat a
/// second `remove` call as a no-op rather than an error. Dropping a
/// handle without removing it should detach the element as a last
/// resort.
pub trait SurfaceHandle: Send {
    fn remove(&mut self) -> Result<(), SurfaceError>;
}

/// Capability that inserts overlay content into the active view hierarchy
///
/// The coordinator guarantees `insert` is called at most once between a
/// matching `remove`; implementations never see two live handles at the
/// same time.
pub trait HostSurface: Send + Sync {
    fn insert(&self, content: &OverlayContent) -> Result<Box<dyn SurfaceHandle>, SurfaceError>;
}
