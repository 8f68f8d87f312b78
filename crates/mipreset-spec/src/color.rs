//! Linear RGBA color used by vector parameters.

use serde::{Deserialize, Serialize};

fn default_alpha() -> f32 {
    1.0
}

/// Linear RGBA color with f32 components, serialized as `{"r","g","b","a"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "default_alpha")]
    pub a: f32,
}

impl LinearColor {
    /// Create a new color with alpha = 1.0.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a new color with alpha.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color with every component set to `value`, alpha included.
    pub const fn splat(value: f32) -> Self {
        Self::rgba(value, value, value, value)
    }

    /// Create white.
    pub const fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    /// Components in `[r, g, b, a]` order.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns true if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|c| c.is_finite())
    }
}

impl Default for LinearColor {
    fn default() -> Self {
        Self::white()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_defaults_to_one() {
        let c: LinearColor = serde_json::from_str(r#"{"r": 0.2, "g": 0.4, "b": 0.6}"#).unwrap();
        assert_eq!(c, LinearColor::rgb(0.2, 0.4, 0.6));
    }

    #[test]
    fn test_is_finite() {
        assert!(LinearColor::white().is_finite());
        assert!(!LinearColor::rgba(0.0, f32::NAN, 0.0, 1.0).is_finite());
    }
}
