use crate::domain::content::{Backdrop, IndicatorStyle, OverlayContent, Tint};

/// Default look of the busy overlay when `show()` is called with no options
///
/// Individual `show` calls can override the backdrop or supply a custom
/// body; this struct only decides what a plain `show()` displays.
#[derive(Debug, Clone, PartialEq)]
pub struct AppearanceConfig {
    pub backdrop: Backdrop,
    pub label: Option<String>,
}

impl AppearanceConfig {
    pub const DEFAULT_TINT: Tint = Tint::BLACK;
    pub const DEFAULT_OPACITY: f32 = 0.45;

    pub fn new(backdrop: Backdrop, label: Option<String>) -> Self {
        Self { backdrop, label }
    }

    /// Replaces the default label shown under the spinner
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builds the content a plain `show()` inserts
    pub fn default_content(&self) -> OverlayContent {
        OverlayContent::indicator(
            self.backdrop,
            IndicatorStyle {
                label: self.label.clone(),
            },
        )
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            backdrop: Backdrop::new(Self::DEFAULT_TINT, Self::DEFAULT_OPACITY),
            label: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_appearance_uses_dim_black_backdrop() {
        let appearance = AppearanceConfig::default();
        assert_eq!(appearance.backdrop.color, Tint::BLACK);
        assert_eq!(appearance.backdrop.opacity, AppearanceConfig::DEFAULT_OPACITY);
        assert_eq!(appearance.label, None);
    }

    #[test]
    fn default_content_carries_configured_label() {
        let appearance = AppearanceConfig::default().with_label("Working...");
        let content = appearance.default_content();
        assert_eq!(content.indicator_label(), Some("Working..."));
        assert_eq!(content.backdrop, appearance.backdrop);
    }
}
