/*
 * The color value carried by the `color` option and returned by
 * `select_color`, plus the text forms the helper programs speak.
 */
use super::error::{DialogError, Result};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Rgb { red, green, blue }
    }

    // Scales each channel to the 0..=1 range JXA colors use.
    pub(crate) fn to_unit_channels(self) -> [f64; 3] {
        [self.red, self.green, self.blue].map(|c| f64::from(c) / 255.0)
    }

    /// Out-of-range channels are clamped; callers reject non-finite values first.
    pub(crate) fn from_unit_channels(channels: [f64; 3]) -> Self {
        let [r, g, b] = channels.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        Rgb::new(r, g, b)
    }

    /// Win32 `COLORREF` layout: 0x00BBGGRR.
    pub fn to_colorref(self) -> u32 {
        u32::from(self.red) | (u32::from(self.green) << 8) | (u32::from(self.blue) << 16)
    }

    pub fn from_colorref(value: u32) -> Self {
        Rgb::new(
            (value & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            ((value >> 16) & 0xff) as u8,
        )
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({},{},{})", self.red, self.green, self.blue)
    }
}

/*
 * Parses `rgb(r,g,b)`, `rgba(r,g,b,a)` (alpha ignored) and `#rrggbb`.
 * zenity prints the first two forms; the CLI also accepts the hex form.
 */
impl FromStr for Rgb {
    type Err = DialogError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let malformed = || DialogError::Decode(format!("invalid color {text:?}"));

        if let Some(hex) = text.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(malformed());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| malformed());
            return Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?));
        }

        let inner = text
            .strip_prefix("rgba(")
            .or_else(|| text.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(malformed)?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() < 3 || parts.len() > 4 {
            return Err(malformed());
        }
        let channel = |p: &str| p.parse::<u8>().map_err(|_| malformed());
        Ok(Rgb::new(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_zenity_color_forms() {
        assert_eq!("rgb(255,128,0)".parse::<Rgb>().unwrap(), Rgb::new(255, 128, 0));
        assert_eq!(
            "rgba(1, 2, 3, 0.5)\n".parse::<Rgb>().unwrap(),
            Rgb::new(1, 2, 3)
        );
        assert_eq!("#0a0B0c".parse::<Rgb>().unwrap(), Rgb::new(10, 11, 12));
    }

    #[test]
    fn test_parse_rejects_malformed_colors() {
        for bad in ["", "rgb(1,2)", "rgb(256,0,0)", "#12345", "blue", "rgb(1,2,3"] {
            assert!(
                matches!(bad.parse::<Rgb>(), Err(DialogError::Decode(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_colorref_layout_is_bgr() {
        let color = Rgb::new(0x11, 0x22, 0x33);
        assert_eq!(color.to_colorref(), 0x0033_2211);
        assert_eq!(Rgb::from_colorref(0x0033_2211), color);
    }

    #[test]
    fn test_unit_channels_scale_to_eight_bits() {
        let color = Rgb::new(255, 0, 51);
        assert_eq!(color.to_unit_channels(), [1.0, 0.0, 0.2]);
        assert_eq!(Rgb::from_unit_channels([1.0, 0.0, 0.2]), color);
        assert_eq!(Rgb::from_unit_channels([1.5, -0.1, 0.5]), Rgb::new(255, 0, 128));
    }
}
