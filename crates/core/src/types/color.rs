//! Theme colors stored as HSL triples.
//!
//! Colors are persisted in the settings store in the CSS custom property
//! shape `"H S% L%"` (e.g. `"210 98% 73%"`), which drops straight into
//! `hsl(var(--primary))` in the stylesheet.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static HSL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s+(\d+)%\s+(\d+)%").expect("HSL pattern is a valid regex")
});

/// A color expressed as hue (0-360), saturation (0-100) and lightness (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HslColor {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

impl HslColor {
    pub const MAX_HUE: u16 = 360;
    pub const MAX_PERCENT: u8 = 100;

    /// Create a color, clamping each component into range.
    #[must_use]
    pub fn new(h: u16, s: u8, l: u8) -> Self {
        Self {
            h: h.min(Self::MAX_HUE),
            s: s.min(Self::MAX_PERCENT),
            l: l.min(Self::MAX_PERCENT),
        }
    }

    /// Parse the stored `"H S% L%"` form.
    ///
    /// Returns `None` when the input doesn't match the pattern. Components
    /// that overflow their range are clamped.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let caps = HSL_PATTERN.captures(s)?;
        let component = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
        let (h, s, l) = (component(1)?, component(2)?, component(3)?);

        Some(Self::clamped(h, s, l))
    }

    fn clamped(h: u32, s: u32, l: u32) -> Self {
        Self::new(
            u16::try_from(h).unwrap_or(Self::MAX_HUE),
            u8::try_from(s).unwrap_or(Self::MAX_PERCENT),
            u8::try_from(l).unwrap_or(Self::MAX_PERCENT),
        )
    }

    /// Parse a stored value, falling back to black (`0 0% 0%`) if unparseable.
    #[must_use]
    pub fn parse_or_black(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Build a color from three raw form inputs.
    ///
    /// A component that isn't a valid integer keeps its value from `previous`.
    /// Out-of-range numbers are clamped, the same as [`HslColor::parse`].
    #[must_use]
    pub fn from_inputs(h: &str, s: &str, l: &str, previous: Self) -> Self {
        let component = |raw: &str, previous: u32| raw.trim().parse::<u32>().unwrap_or(previous);
        Self::clamped(
            component(h, u32::from(previous.h)),
            component(s, u32::from(previous.s)),
            component(l, u32::from(previous.l)),
        )
    }

    /// CSS functional notation, e.g. `hsl(210, 98%, 73%)`.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!("hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}% {}%", self.h, self.s, self.l)
    }
}

/// The four customizable site colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub background: HslColor,
    pub foreground: HslColor,
    pub primary: HslColor,
    pub accent: HslColor,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            background: HslColor::new(210, 100, 97),
            foreground: HslColor::new(180, 25, 37),
            primary: HslColor::new(210, 98, 73),
            accent: HslColor::new(120, 25, 65),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stored_form() {
        assert_eq!(
            HslColor::parse("210 98% 73%"),
            Some(HslColor::new(210, 98, 73))
        );
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        assert_eq!(
            HslColor::parse("  120   25%  65% "),
            Some(HslColor::new(120, 25, 65))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(HslColor::parse("blue"), None);
        assert_eq!(HslColor::parse("210, 98, 73"), None);
        assert_eq!(HslColor::parse_or_black("nope"), HslColor::new(0, 0, 0));
    }

    #[test]
    fn test_parse_clamps_out_of_range() {
        assert_eq!(
            HslColor::parse("999 150% 101%"),
            Some(HslColor::new(360, 100, 100))
        );
    }

    #[test]
    fn test_display_matches_stored_form() {
        let color = HslColor::new(180, 25, 37);
        assert_eq!(color.to_string(), "180 25% 37%");
        assert_eq!(HslColor::parse(&color.to_string()), Some(color));
    }

    #[test]
    fn test_from_inputs_keeps_previous_on_invalid_component() {
        let previous = HslColor::new(210, 100, 97);
        let updated = HslColor::from_inputs("200", "abc", "", previous);
        assert_eq!(updated, HslColor::new(200, 100, 97));
    }

    #[test]
    fn test_from_inputs_clamps_large_numbers() {
        let previous = HslColor::new(10, 20, 30);
        let updated = HslColor::from_inputs("70000", "300", "256", previous);
        assert_eq!(updated, HslColor::new(360, 100, 100));
    }

    #[test]
    fn test_to_css() {
        assert_eq!(HslColor::new(1, 2, 3).to_css(), "hsl(1, 2%, 3%)");
    }

    #[test]
    fn test_default_theme() {
        let theme = ThemeColors::default();
        assert_eq!(theme.background.to_string(), "210 100% 97%");
        assert_eq!(theme.accent.to_string(), "120 25% 65%");
    }
}
