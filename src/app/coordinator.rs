//! Overlay visibility coordinator
//!
//! Arbitrates a single modal busy surface shared by any number of
//! concurrent operations. Every caller wraps its work in a matching
//! `show`/`hide` pair; the coordinator counts them and keeps exactly one
//! overlay inserted for the union of all overlapping windows.

use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::config::appearance::AppearanceConfig;
use crate::domain::content::{Backdrop, CustomBody, OverlayBody, OverlayContent};
use crate::domain::ledger::{Transition, VisibilityLedger};
use crate::host::{HostSurface, SurfaceError, SurfaceHandle};

use super::guard::BusyGuard;

/// Per-call overrides for `show_with`
///
/// Fields left `None` fall back to the coordinator's [`AppearanceConfig`].
/// Overrides only take effect when the call actually opens a new overlay
/// window; while one is already up, the first writer's content wins.
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    pub backdrop: Option<Backdrop>,
    pub body: Option<OverlayBody>,
}

impl ShowOptions {
    pub fn with_backdrop(backdrop: Backdrop) -> Self {
        Self {
            backdrop: Some(backdrop),
            ..Self::default()
        }
    }

    pub fn with_body(body: OverlayBody) -> Self {
        Self {
            body: Some(body),
            ..Self::default()
        }
    }
}

/// The live overlay plus the content it was created from
///
/// The content is retained only so it never has to be re-derived; it does
/// not outlive the handle.
struct ActiveOverlay {
    handle: Box<dyn SurfaceHandle>,
    content: OverlayContent,
}

/// Mutable coordinator state, guarded as one unit
///
/// The count check and the surface insert/remove must happen inside the
/// same critical section; splitting them reopens the classic double-insert
/// race between two callers that both observe a count of zero.
struct Inner {
    ledger: VisibilityLedger,
    active: Option<ActiveOverlay>,
}

/// Process-wide arbiter for the single busy overlay
///
/// Caller obligation: every `show` must be matched by exactly one `hide`
/// on all exit paths (success, error, cancellation). [`BusyGuard`] gives
/// that guarantee for scoped work; `force_hide` is the recovery hatch for
/// callers that abandoned their task.
pub struct OverlayCoordinator {
    surface: Arc<dyn HostSurface>,
    appearance: AppearanceConfig,
    inner: Mutex<Inner>,
}

impl OverlayCoordinator {
    pub fn new(surface: Arc<dyn HostSurface>, appearance: AppearanceConfig) -> Self {
        Self {
            surface,
            appearance,
            inner: Mutex::new(Inner {
                ledger: VisibilityLedger::new(),
                active: None,
            }),
        }
    }

    /// Requests the overlay with the configured default content
    pub fn show(&self) -> Result<(), SurfaceError> {
        self.show_with(ShowOptions::default())
    }

    /// Requests the overlay with per-call styling overrides
    ///
    /// Opens the overlay when no task holds it yet; otherwise only the
    /// pending count moves and `options` is ignored until the overlay
    /// fully clears (first-writer-wins).
    pub fn show_with(&self, options: ShowOptions) -> Result<(), SurfaceError> {
        let mut inner = self.inner.lock().unwrap();

        if inner.ledger.is_active() {
            inner.ledger.acquire();
            debug!(
                "overlay already active, pending tasks now {}",
                inner.ledger.pending()
            );
            return Ok(());
        }

        // Insert before touching the ledger so a failing host leaves the
        // coordinator hidden with a count of zero.
        let content = self.compose(options);
        let handle = self.surface.insert(&content)?;
        inner.ledger.acquire();
        inner.active = Some(ActiveOverlay { handle, content });
        debug!("overlay inserted, pending tasks now 1");
        Ok(())
    }

    /// Requests the overlay with a custom body
    ///
    /// Same first-writer-wins semantics as `show_with`.
    pub fn show_custom(
        &self,
        body: Arc<dyn CustomBody>,
        backdrop: Option<Backdrop>,
    ) -> Result<(), SurfaceError> {
        self.show_with(ShowOptions {
            backdrop,
            body: Some(OverlayBody::Custom(body)),
        })
    }

    /// Releases one pending task, removing the overlay at zero
    ///
    /// Calling `hide` with no overlay active is a safe no-op.
    pub fn hide(&self) -> Result<(), SurfaceError> {
        self.release(false)
    }

    /// Unconditionally clears the counter and removes the overlay
    ///
    /// Escape hatch for screen teardown and error recovery. Tasks that
    /// still believe they own a pending `show` see their later `hide`
    /// calls become no-ops; nothing is re-inserted on their behalf.
    pub fn force_hide(&self) -> Result<(), SurfaceError> {
        self.release(true)
    }

    /// Convenience dispatch: `show()` when active, `hide()` otherwise
    pub fn toggle(&self, active: bool) -> Result<(), SurfaceError> {
        if active { self.show() } else { self.hide() }
    }

    /// Acquires the overlay and returns a guard that releases it on drop
    pub fn begin(self: &Arc<Self>) -> Result<BusyGuard, SurfaceError> {
        self.begin_with(ShowOptions::default())
    }

    /// `begin` with per-call styling overrides
    pub fn begin_with(self: &Arc<Self>, options: ShowOptions) -> Result<BusyGuard, SurfaceError> {
        self.show_with(options)?;
        Ok(BusyGuard::new(Arc::clone(self)))
    }

    /// True iff an overlay surface is currently inserted
    pub fn is_showing(&self) -> bool {
        self.inner.lock().unwrap().active.is_some()
    }

    /// Number of `show` calls not yet matched by a `hide`
    pub fn pending_tasks(&self) -> u32 {
        self.inner.lock().unwrap().ledger.pending()
    }

    /// Content of the currently displayed overlay, if any
    pub fn active_content(&self) -> Option<OverlayContent> {
        self.inner
            .lock()
            .unwrap()
            .active
            .as_ref()
            .map(|active| active.content.clone())
    }

    fn release(&self, force: bool) -> Result<(), SurfaceError> {
        let mut inner = self.inner.lock().unwrap();

        if force && inner.ledger.pending() > 1 {
            warn!(
                "force-clear discarding {} still-pending tasks",
                inner.ledger.pending() - 1
            );
        }

        match inner.ledger.release(force) {
            Transition::Remove => {
                // Clear state before calling into the host so a failing
                // remove cannot leave the counter and handle disagreeing.
                if let Some(mut active) = inner.active.take() {
                    active.handle.remove()?;
                    debug!("overlay removed");
                }
                Ok(())
            }
            Transition::None | Transition::Insert => Ok(()),
        }
    }

    fn compose(&self, options: ShowOptions) -> OverlayContent {
        let backdrop = options.backdrop.unwrap_or(self.appearance.backdrop);
        match options.body {
            Some(body) => OverlayContent { backdrop, body },
            None => OverlayContent {
                backdrop,
                ..self.appearance.default_content()
            },
        }
    }
}
