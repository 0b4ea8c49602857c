//! Per-frame hue-rotation palette
//!
//! The palette is a pure function of the frame counter: eight hues spaced
//! eight degrees apart that drift one degree per frame.

/// Number of colors in every palette
pub const PALETTE_SIZE: usize = 8;

/// Hue distance between neighbouring palette slots, in degrees
const HUE_STEP: u64 = 8;

/// 8-bit ARGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_argb(0, 0, 0, 0);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(255, r, g, b)
    }

    /// Normalized `[r, g, b, a]` for GPU consumption
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Fully saturated, full-value color for a hue in degrees
    ///
    /// Six 60-degree sectors, each ramping one channel linearly while the
    /// other two sit at 0 and 255. Ramped channels truncate toward zero.
    pub fn from_hue(hue: u16) -> Self {
        let hue = u32::from(hue) % 360;
        let scaled = hue * 6;
        let fraction = f64::from(scaled % 360) / 360.0;
        let falling = (255.0 * (1.0 - fraction)) as u8;
        let rising = (255.0 * fraction) as u8;

        match scaled / 360 {
            0 => Color::opaque(255, rising, 0),
            1 => Color::opaque(falling, 255, 0),
            2 => Color::opaque(0, 255, rising),
            3 => Color::opaque(0, falling, 255),
            4 => Color::opaque(rising, 0, 255),
            _ => Color::opaque(255, 0, falling),
        }
    }
}

/// One palette slot: the hue it was generated from and the resulting color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Swatch {
    pub hue: u16,
    pub color: Color,
}

/// The eight colors used to draw one frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    swatches: [Swatch; PALETTE_SIZE],
}

impl Palette {
    /// Generate the palette for `frame_counter`
    pub fn generate(frame_counter: u64) -> Self {
        let swatches = std::array::from_fn(|slot| {
            let hue = ((frame_counter % 360 + slot as u64 * HUE_STEP) % 360) as u16;
            Swatch {
                hue,
                color: Color::from_hue(hue),
            }
        });
        Self { swatches }
    }

    pub fn swatches(&self) -> &[Swatch; PALETTE_SIZE] {
        &self.swatches
    }

    /// Color for a palette slot, wrapping out-of-range slots
    pub fn color(&self, slot: usize) -> Color {
        self.swatches[slot % PALETTE_SIZE].color
    }

    pub fn colors(&self) -> [Color; PALETTE_SIZE] {
        self.swatches.map(|swatch| swatch.color)
    }

    pub fn len(&self) -> usize {
        PALETTE_SIZE
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_deterministic() {
        for frame in [0, 1, 359, 360, 12_345, u64::MAX] {
            assert_eq!(Palette::generate(frame), Palette::generate(frame));
        }
    }

    #[test]
    fn test_palette_hue_wraps() {
        for frame in [0u64, 7, 300, 352, 359, 360, 719, 1_000_003, u64::MAX] {
            let palette = Palette::generate(frame);
            for (slot, swatch) in palette.swatches().iter().enumerate() {
                let expected = ((frame as u128 + slot as u128 * 8) % 360) as u16;
                assert_eq!(swatch.hue, expected, "frame {frame} slot {slot}");
            }
        }
    }

    #[test]
    fn test_hue_sector_boundaries() {
        assert_eq!(Color::from_hue(0), Color::opaque(255, 0, 0));
        assert_eq!(Color::from_hue(60), Color::opaque(255, 255, 0));
        assert_eq!(Color::from_hue(120), Color::opaque(0, 255, 0));
        assert_eq!(Color::from_hue(180), Color::opaque(0, 255, 255));
        assert_eq!(Color::from_hue(240), Color::opaque(0, 0, 255));
        assert_eq!(Color::from_hue(300), Color::opaque(255, 0, 255));
    }

    #[test]
    fn test_hue_ramps_linearly_inside_sector() {
        assert_eq!(Color::from_hue(30), Color::opaque(255, 127, 0));
        assert_eq!(Color::from_hue(90), Color::opaque(127, 255, 0));
        assert_eq!(Color::from_hue(330), Color::opaque(255, 0, 127));
        assert!((0..360).all(|hue| Color::from_hue(hue).a == 255));
    }

    #[test]
    fn test_ramped_channels_truncate() {
        // 4.25 and 250.75 before conversion
        assert_eq!(Color::from_hue(1), Color::opaque(255, 4, 0));
        assert_eq!(Color::from_hue(59), Color::opaque(255, 250, 0));
        assert_eq!(Color::from_hue(61), Color::opaque(250, 255, 0));
    }

    #[test]
    fn test_color_lookup_wraps_slot() {
        let palette = Palette::generate(42);
        assert_eq!(palette.color(9), palette.color(1));
        assert_eq!(palette.colors()[3], palette.swatches()[3].color);
    }
}
