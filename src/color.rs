use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue in degrees [0, 360), saturation and lightness as percentages [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

/// Text formats offered by the copy buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyFormat {
    Hex,
    Rgb,
    Css,
}

impl std::str::FromStr for CopyFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(CopyFormat::Hex),
            "rgb" => Ok(CopyFormat::Rgb),
            "css" => Ok(CopyFormat::Css),
            _ => Err(()),
        }
    }
}

/// A color held in all three representations at once.
///
/// Values are never edited in place; a new color replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Color {
    hex: String,
    rgb: Rgb,
    hsl: Hsl,
}

impl Color {
    pub fn from_rgb(rgb: Rgb) -> Self {
        Self {
            hex: rgb_to_hex(rgb.r, rgb.g, rgb.b).to_ascii_uppercase(),
            rgb,
            hsl: rgb_to_hsl(rgb.r, rgb.g, rgb.b),
        }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        hex_to_rgb(hex).map(Self::from_rgb)
    }

    /// Builds a color from fractional HSL components, the way palettes are generated.
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        Self::from_rgb(hsl_to_rgb(h, s, l))
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    pub fn hsl(&self) -> Hsl {
        self.hsl
    }

    pub fn rgb_label(&self) -> String {
        format!("RGB({}, {}, {})", self.rgb.r, self.rgb.g, self.rgb.b)
    }

    pub fn hsl_label(&self) -> String {
        format!("HSL({}°, {}%, {}%)", self.hsl.h, self.hsl.s, self.hsl.l)
    }

    pub fn copy_text(&self, format: CopyFormat) -> String {
        match format {
            CopyFormat::Hex => self.hex.clone(),
            CopyFormat::Rgb => format!("rgb({}, {}, {})", self.rgb.r, self.rgb.g, self.rgb.b),
            CopyFormat::Css => format!("background-color: {};", self.hex),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::from_rgb(Rgb { r: 255, g: 255, b: 255 })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

/// Converts user-typed hex into a full color, or `None` when the input is not `#RRGGBB`.
pub fn convert(input: &str) -> Option<Color> {
    Color::from_hex(input.trim())
}

pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;
    let (h, s);
    if d == 0.0 {
        h = 0.0;
        s = 0.0;
    } else {
        s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        } / 6.0;
    }
    // 359.5 and up rounds onto 360, which is the same hue as 0.
    let hue = (h * 360.0).round() as u16 % 360;
    Hsl {
        h: hue,
        s: (s * 100.0).round() as u8,
        l: (l * 100.0).round() as u8,
    }
}

/// `h` in degrees (any value, taken modulo 360), `s` and `l` in percent.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let h = h.rem_euclid(360.0);
    let s = s.clamp(0.0, 100.0) / 100.0;
    let l = l.clamp(0.0, 100.0) / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = match (h / 60.0) as u8 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let scale = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb {
        r: scale(r),
        g: scale(g),
        b: scale(b),
    }
}

pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let rgb = hsl_to_rgb(h, s, l);
    rgb_to_hex(rgb.r, rgb.g, rgb.b)
}
