//! Configuration module for busyveil
//!
//! Concentrates the user-facing defaults applied when callers request the
//! overlay without supplying explicit styling.

pub mod appearance;

pub use appearance::AppearanceConfig;
