//! Color and coefficient triples.

use glam::DVec3;

/// Linear RGB color. Channels use a 0-255 scale; values above 255 are
/// allowed while shading and clamped only when an image is written.
pub type Color = DVec3;

/// Per-channel coefficient triple, typically in [0, 1].
pub type Double3 = DVec3;

/// Returns true when every channel of `k` is below `threshold`.
#[inline]
pub fn below(k: Double3, threshold: f64) -> bool {
    k.x < threshold && k.y < threshold && k.z < threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_requires_every_channel() {
        assert!(below(Double3::new(0.0001, 0.0005, 0.0), 0.001));
        assert!(!below(Double3::new(0.0001, 0.5, 0.0), 0.001));
        assert!(!below(Double3::ONE, 0.001));
    }

    #[test]
    fn test_color_arithmetic() {
        let c = Color::new(100.0, 50.0, 25.0);
        let k = Double3::new(0.5, 1.0, 0.0);
        assert_eq!(c * k, Color::new(50.0, 50.0, 0.0));
        assert_eq!(c + c, Color::new(200.0, 100.0, 50.0));
    }
}
