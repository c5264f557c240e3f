//! RGBA pixel type and the color-difference metric

/// An 8-bit RGBA pixel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (ignored by all metrics)
    pub a: u8,
}

impl Rgba {
    /// Create a pixel from its four channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque pixel from its color channels
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Squared difference between two pixels
///
/// The square of the signed sum `(r1-r2) + (g1-g2) + (b1-b2)`. Differences in
/// distinct channels can cancel, so this is zero whenever the signed channel
/// sums of the two pixels match, not only when the pixels are equal. Alpha
/// never contributes. Symmetric and non-negative.
pub fn squared_difference(first: Rgba, second: Rgba) -> u64 {
    let sum = i64::from(first.r) - i64::from(second.r) + i64::from(first.g)
        - i64::from(second.g)
        + i64::from(first.b)
        - i64::from(second.b);

    (sum * sum) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squared_difference_is_symmetric() {
        let a = Rgba::opaque(13, 200, 91);
        let b = Rgba::opaque(240, 7, 111);

        assert_eq!(squared_difference(a, b), squared_difference(b, a));
    }

    #[test]
    fn test_squared_difference_zero_for_equal_pixels() {
        let px = Rgba::opaque(65, 65, 65);
        assert_eq!(squared_difference(px, px), 0);
    }

    // Channel differences cancel in the signed sum, so distinct pixels can
    // still compare as zero
    #[test]
    fn test_squared_difference_cancels_across_channels() {
        let a = Rgba::opaque(10, 0, 0);
        let b = Rgba::opaque(0, 10, 0);

        assert_eq!(squared_difference(a, b), 0);
    }

    #[test]
    fn test_squared_difference_ignores_alpha() {
        let a = Rgba::new(50, 60, 70, 0);
        let b = Rgba::new(50, 60, 70, 255);

        assert_eq!(squared_difference(a, b), 0);
    }

    #[test]
    fn test_squared_difference_squares_the_signed_sum() {
        let a = Rgba::opaque(3, 0, 0);
        let b = Rgba::opaque(0, 0, 0);

        assert_eq!(squared_difference(a, b), 9);

        let c = Rgba::opaque(255, 255, 255);
        assert_eq!(squared_difference(c, b), 765 * 765);
    }
}
