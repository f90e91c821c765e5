//! Domain logic and core data structures
//!
//! This module contains pure business logic that is independent
//! of host-surface APIs and platform-specific implementations.

pub mod content;
pub mod ledger;

pub use content::{
    Backdrop, CustomBody, IndicatorStyle, OverlayBody, OverlayContent, TextBody, Tint,
};
pub use ledger::{Transition, VisibilityLedger};
