use crate::color::{Color, Hsl};
use rand::RngCore;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub type Palette = Vec<Color>;

/// Number of colors in a random palette; their hues split the wheel evenly.
pub const RANDOM_PALETTE_SIZE: usize = 5;

const HUE_STEP: f64 = 360.0 / RANDOM_PALETTE_SIZE as f64;

/// A uniform source of numbers in [0, 1).
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// Uniform draw in [low, high).
    fn next_in(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_unit() * (high - low)
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        rand::Rng::gen_range(self, 0.0..1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeKind {
    Analogous,
    Complementary,
    Triadic,
    Monochromatic,
}

impl SchemeKind {
    pub const ALL: [SchemeKind; 4] = [
        SchemeKind::Analogous,
        SchemeKind::Complementary,
        SchemeKind::Triadic,
        SchemeKind::Monochromatic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SchemeKind::Analogous => "analogous",
            SchemeKind::Complementary => "complementary",
            SchemeKind::Triadic => "triadic",
            SchemeKind::Monochromatic => "monochromatic",
        }
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchemeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemeKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// A two-stop background gradient shown briefly by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gradient {
    pub angle: u16,
    pub from: String,
    pub to: String,
}

impl Gradient {
    pub fn css(&self) -> String {
        format!("linear-gradient({}deg, {}, {})", self.angle, self.from, self.to)
    }
}

pub fn random_color<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    let value = ((rng.next_unit() * 16_777_216.0) as u32).min(0xFF_FFFF);
    format!("#{:06x}", value)
}

/// Hues of a random palette for a given starting hue.
pub fn wheel_hues(base: f64) -> [f64; RANDOM_PALETTE_SIZE] {
    std::array::from_fn(|i| (base + i as f64 * HUE_STEP) % 360.0)
}

pub fn random_palette<R: RandomSource + ?Sized>(rng: &mut R) -> Palette {
    let base = rng.next_in(0.0, 360.0);
    wheel_hues(base)
        .into_iter()
        .map(|hue| {
            let saturation = rng.next_in(50.0, 80.0);
            let lightness = rng.next_in(30.0, 70.0);
            Color::from_hsl(hue, saturation, lightness)
        })
        .collect()
}

pub fn random_gradient<R: RandomSource + ?Sized>(rng: &mut R) -> Gradient {
    let from = random_color(rng);
    let to = random_color(rng);
    let angle = ((rng.next_unit() * 360.0) as u16).min(359);
    Gradient { angle, from, to }
}

/// `(hue offset, lightness offset)` pairs for each derived color.
fn scheme_offsets(kind: SchemeKind) -> &'static [(i32, i32)] {
    match kind {
        SchemeKind::Analogous => &[(30, 0), (60, 0), (-30, 0), (-60, 0)],
        SchemeKind::Complementary => &[(180, 0), (180, -20), (180, 20)],
        SchemeKind::Triadic => &[(120, 0), (240, 0)],
        SchemeKind::Monochromatic => &[(0, -30), (0, -15), (0, 15), (0, 30)],
    }
}

/// Base color followed by the colors the scheme derives from its hue and lightness.
pub fn scheme(base: &Color, kind: SchemeKind) -> Palette {
    let Hsl { h, s, l } = base.hsl();
    let derived = scheme_offsets(kind).iter().map(|&(dh, dl)| {
        let hue = (h as i32 + dh).rem_euclid(360);
        let lightness = (l as i32 + dl).clamp(0, 100);
        Color::from_hsl(hue as f64, s as f64, lightness as f64)
    });
    std::iter::once(base.clone()).chain(derived).collect()
}

/// Scheme by name; a name no scheme answers to yields just the base color.
pub fn color_scheme(base: &Color, kind: &str) -> Palette {
    match kind.parse::<SchemeKind>() {
        Ok(kind) => scheme(base, kind),
        Err(()) => vec![base.clone()],
    }
}
