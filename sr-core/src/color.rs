//! Packed 32-bit ARGB colors
//!
//! Layout: `[alpha:24..31][red:16..23][green:8..15][blue:0..7]`.

/// Pack four channels into one ARGB word
#[inline]
pub fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Split an ARGB word into `(a, r, g, b)`
#[inline]
pub fn channels(color: u32) -> (u8, u8, u8, u8) {
    (
        (color >> 24) as u8,
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
    )
}

/// Convert a float channel in `0.0..=255.0` to the nearest byte, saturating
#[inline]
pub(crate) fn channel_from_f32(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_layout() {
        assert_eq!(argb(0xFF, 0x12, 0x34, 0x56), 0xFF12_3456);
        assert_eq!(argb(0, 0, 0, 1), 1);
    }

    #[test]
    fn test_channels() {
        assert_eq!(channels(0x80FF_4001), (0x80, 0xFF, 0x40, 0x01));
    }

    #[test]
    fn test_channel_saturates() {
        assert_eq!(channel_from_f32(-3.0), 0);
        assert_eq!(channel_from_f32(300.0), 255);
        assert_eq!(channel_from_f32(127.9), 128);
        assert_eq!(channel_from_f32(229.99998), 230);
        assert_eq!(channel_from_f32(f32::NAN), 0);
    }
}
