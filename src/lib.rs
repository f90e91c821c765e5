//! busyveil — process-wide busy-overlay visibility coordination
//!
//! Arbitrates a single modal "busy" surface shared by any number of
//! concurrent asynchronous operations. Callers wrap their work in
//! matching `show`/`hide` pairs (or a [`BusyGuard`]); the coordinator
//! reference-counts them so the user sees one continuous overlay spanning
//! the union of all overlapping operations, never two overlays and never
//! one left stuck.
//!
//! The crate owns visibility arbitration only. Rendering is behind the
//! [`HostSurface`] seam; a Win32 layered-window implementation ships in
//! [`platform`] on Windows, and tests inject their own.
//!
//! ```no_run
//! use std::sync::Arc;
//! # fn surface() -> Arc<dyn busyveil::HostSurface> { unimplemented!() }
//!
//! let coordinator = busyveil::init(surface(), busyveil::AppearanceConfig::default());
//!
//! let guard = coordinator.begin()?;
//! // ... long-running work; overlay stays up even if other callers
//! // show and hide around this window ...
//! guard.release()?;
//! # Ok::<(), busyveil::SurfaceError>(())
//! ```

pub mod app;
pub mod config;
pub mod domain;
pub mod host;
#[cfg(windows)]
pub mod platform;

pub use app::coordinator::{OverlayCoordinator, ShowOptions};
pub use app::guard::BusyGuard;
pub use config::appearance::AppearanceConfig;
pub use domain::content::{
    Backdrop, CustomBody, IndicatorStyle, OverlayBody, OverlayContent, TextBody, Tint,
};
pub use host::{HostSurface, SurfaceError, SurfaceHandle};

use std::sync::{Arc, OnceLock};

static COORDINATOR: OnceLock<Arc<OverlayCoordinator>> = OnceLock::new();

/// Installs the process-wide coordinator
///
/// The first call wins; later calls return the already-installed instance
/// and ignore their arguments. Code that needs an isolated coordinator
/// (tests, embedded reuse) constructs [`OverlayCoordinator`] directly
/// instead of going through the global.
pub fn init(surface: Arc<dyn HostSurface>, appearance: AppearanceConfig) -> Arc<OverlayCoordinator> {
    COORDINATOR
        .get_or_init(|| Arc::new(OverlayCoordinator::new(surface, appearance)))
        .clone()
}

/// Resolves the process-wide coordinator
///
/// # Panics
/// Panics if [`init`] has not been called.
pub fn coordinator() -> Arc<OverlayCoordinator> {
    COORDINATOR
        .get()
        .expect("busy overlay coordinator not initialized, call busyveil::init() first")
        .clone()
}
