//! Overlay content descriptors
//!
//! Plain data describing what the host surface should display: a backdrop
//! tint plus either the built-in busy indicator or an opaque custom body.
//! These types carry no rendering logic; interpretation is entirely up to
//! the host surface implementation.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Solid tint color, sRGB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Tint {
    pub const BLACK: Tint = Tint { r: 0, g: 0, b: 0 };
    pub const WHITE: Tint = Tint { r: 255, g: 255, b: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Backdrop drawn behind the overlay body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backdrop {
    pub color: Tint,
    pub opacity: f32,
}

impl Backdrop {
    /// Creates a backdrop, clamping opacity into `0.0..=1.0`
    pub fn new(color: Tint, opacity: f32) -> Self {
        Self {
            color,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

/// Styling for the built-in spinner body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndicatorStyle {
    /// Optional text shown beneath the spinner
    pub label: Option<String>,
}

impl IndicatorStyle {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }
}

/// Opaque caller-supplied overlay body
///
/// The coordinator never inspects custom bodies; it hands them to the host
/// surface unchanged. Hosts that understand a concrete body type downcast
/// through [`CustomBody::as_any`] and fall back to the backdrop alone for
/// bodies they do not recognize.
pub trait CustomBody: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

/// Ready-made custom body carrying a single line of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBody {
    pub text: String,
}

impl TextBody {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl CustomBody for TextBody {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Body of the overlay: the default busy indicator or a custom payload
#[derive(Clone)]
pub enum OverlayBody {
    Indicator(IndicatorStyle),
    Custom(Arc<dyn CustomBody>),
}

impl fmt::Debug for OverlayBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayBody::Indicator(style) => f.debug_tuple("Indicator").field(style).finish(),
            OverlayBody::Custom(_) => f.debug_tuple("Custom").field(&"..").finish(),
        }
    }
}

/// Complete visual payload handed to the host surface on insertion
#[derive(Debug, Clone)]
pub struct OverlayContent {
    pub backdrop: Backdrop,
    pub body: OverlayBody,
}

impl OverlayContent {
    /// Default indicator content over the given backdrop
    pub fn indicator(backdrop: Backdrop, style: IndicatorStyle) -> Self {
        Self {
            backdrop,
            body: OverlayBody::Indicator(style),
        }
    }

    /// Custom-body content over the given backdrop
    pub fn custom(backdrop: Backdrop, body: Arc<dyn CustomBody>) -> Self {
        Self {
            backdrop,
            body: OverlayBody::Custom(body),
        }
    }

    /// Label of the built-in indicator, if this content uses one
    pub fn indicator_label(&self) -> Option<&str> {
        match &self.body {
            OverlayBody::Indicator(style) => style.label.as_deref(),
            OverlayBody::Custom(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backdrop_clamps_opacity() {
        let too_high = Backdrop::new(Tint::BLACK, 1.7);
        assert_eq!(too_high.opacity, 1.0);

        let negative = Backdrop::new(Tint::BLACK, -0.3);
        assert_eq!(negative.opacity, 0.0);

        let in_range = Backdrop::new(Tint::BLACK, 0.45);
        assert_eq!(in_range.opacity, 0.45);
    }

    #[test]
    fn indicator_content_exposes_label() {
        let content = OverlayContent::indicator(
            Backdrop::new(Tint::BLACK, 0.5),
            IndicatorStyle::labeled("Loading..."),
        );
        assert_eq!(content.indicator_label(), Some("Loading..."));
    }

    #[test]
    fn unlabeled_indicator_has_no_label() {
        let content =
            OverlayContent::indicator(Backdrop::new(Tint::BLACK, 0.5), IndicatorStyle::default());
        assert_eq!(content.indicator_label(), None);
    }

    #[test]
    fn custom_body_downcasts_to_concrete_type() {
        let body: Arc<dyn CustomBody> = Arc::new(TextBody::new("Syncing"));
        let content = OverlayContent::custom(Backdrop::new(Tint::BLACK, 0.5), body);

        assert_eq!(content.indicator_label(), None);
        match &content.body {
            OverlayBody::Custom(custom) => {
                let text = custom
                    .as_any()
                    .downcast_ref::<TextBody>()
                    .expect("should downcast back to TextBody");
                assert_eq!(text.text, "Syncing");
            }
            OverlayBody::Indicator(_) => panic!("expected custom body"),
        }
    }
}
