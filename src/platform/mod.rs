//! Platform-specific Windows implementation of the host surface seam
//!
//! This module encapsulates all Win32 API interactions. The rest of the
//! crate only sees the [`crate::host::HostSurface`] trait.

pub mod render;
pub mod window;

pub use window::{LayeredSurface, PlatformError};
