//! Scoped release guard for busy overlay acquisitions
//!
//! Every `show` must be matched by exactly one `hide` on all exit paths.
//! `BusyGuard` encodes that obligation in the type system: the guard is
//! created by `OverlayCoordinator::begin` after a successful `show` and
//! performs the matching `hide` when it goes out of scope, including
//! during panic unwinding.

use std::sync::Arc;

use log::error;

use crate::host::SurfaceError;

use super::coordinator::OverlayCoordinator;

/// One pending task, released on drop
pub struct BusyGuard {
    coordinator: Arc<OverlayCoordinator>,
    released: bool,
}

impl BusyGuard {
    pub(crate) fn new(coordinator: Arc<OverlayCoordinator>) -> Self {
        Self {
            coordinator,
            released: false,
        }
    }

    /// Releases the pending task early
    ///
    /// Equivalent to dropping the guard, but surfaces a host removal
    /// error that a plain drop would only log.
    pub fn release(mut self) -> Result<(), SurfaceError> {
        self.released = true;
        self.coordinator.hide()
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if !self.released {
            if let Err(err) = self.coordinator.hide() {
                error!("failed to release busy overlay: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::{Arc, Mutex};

    use crate::config::appearance::AppearanceConfig;
    use crate::domain::content::OverlayContent;
    use crate::host::{HostSurface, SurfaceError, SurfaceHandle};

    use super::*;

    struct CountingSurface {
        live: Mutex<u32>,
    }

    struct CountingHandle {
        surface: Arc<CountingSurface>,
    }

    impl SurfaceHandle for CountingHandle {
        fn remove(&mut self) -> Result<(), SurfaceError> {
            *self.surface.live.lock().unwrap() -= 1;
            Ok(())
        }
    }

    impl HostSurface for Arc<CountingSurface> {
        fn insert(&self, _content: &OverlayContent) -> Result<Box<dyn SurfaceHandle>, SurfaceError> {
            *self.live.lock().unwrap() += 1;
            Ok(Box::new(CountingHandle {
                surface: Arc::clone(self),
            }))
        }
    }

    fn coordinator() -> (Arc<OverlayCoordinator>, Arc<CountingSurface>) {
        let surface = Arc::new(CountingSurface {
            live: Mutex::new(0),
        });
        let coordinator = Arc::new(OverlayCoordinator::new(
            Arc::new(Arc::clone(&surface)),
            AppearanceConfig::default(),
        ));
        (coordinator, surface)
    }

    #[test]
    fn guard_releases_on_drop() {
        let (coordinator, surface) = coordinator();

        {
            let _guard = coordinator.begin().unwrap();
            assert!(coordinator.is_showing());
            assert_eq!(*surface.live.lock().unwrap(), 1);
        }

        assert!(!coordinator.is_showing());
        assert_eq!(coordinator.pending_tasks(), 0);
        assert_eq!(*surface.live.lock().unwrap(), 0);
    }

    #[test]
    fn nested_guards_release_once_each() {
        let (coordinator, _surface) = coordinator();

        let outer = coordinator.begin().unwrap();
        {
            let _inner = coordinator.begin().unwrap();
            assert_eq!(coordinator.pending_tasks(), 2);
        }
        assert!(coordinator.is_showing());
        assert_eq!(coordinator.pending_tasks(), 1);

        drop(outer);
        assert!(!coordinator.is_showing());
    }

    #[test]
    fn explicit_release_consumes_the_guard() {
        let (coordinator, _surface) = coordinator();

        let guard = coordinator.begin().unwrap();
        guard.release().unwrap();

        assert!(!coordinator.is_showing());
        assert_eq!(coordinator.pending_tasks(), 0);
    }

    #[test]
    fn guard_releases_during_panic_unwind() {
        let (coordinator, surface) = coordinator();

        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = coordinator.begin().unwrap();
            panic!("caller work failed");
        }));

        assert!(result.is_err());
        assert!(!coordinator.is_showing());
        assert_eq!(coordinator.pending_tasks(), 0);
        assert_eq!(*surface.live.lock().unwrap(), 0);
    }
}
