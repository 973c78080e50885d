//! Option parser for the `{CRAZY ...}` tag header.
//!
//! The header carries whitespace-separated `key=value` tokens. Parsing is
//! total: unknown keys, tokens without `=`, and malformed values are dropped
//! and the affected field keeps its default.

use serde::{Deserialize, Serialize};

use crate::types::Rgb;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealStyle {
    #[default]
    Normal,
    Explode,
    Blast,
}

impl RevealStyle {
    /// Full ring revolutions a glyph spins when `cycles` is not given.
    pub fn default_cycles(self) -> u32 {
        match self {
            RevealStyle::Normal => 1,
            RevealStyle::Explode => 3,
            RevealStyle::Blast => 2,
        }
    }

    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "explode" => RevealStyle::Explode,
            "blast" => RevealStyle::Blast,
            _ => RevealStyle::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    #[default]
    Left,
    Middle,
    Right,
}

impl Origin {
    /// Index the reveal wave is measured from, for a span of `n` characters.
    pub fn index(self, n: usize) -> usize {
        let last = n.saturating_sub(1);
        match self {
            Origin::Left => 0,
            Origin::Middle => last / 2,
            Origin::Right => last,
        }
    }

    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "left" => Origin::Left,
            "right" => Origin::Right,
            _ => Origin::Middle,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedFrom {
    #[default]
    Fixed,
    Random,
}

impl SeedFrom {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "random" => SeedFrom::Random,
            _ => SeedFrom::Fixed,
        }
    }
}

pub const DEFAULT_FLASH_A: Rgb = Rgb::new(0xff, 0xff, 0xff);
pub const DEFAULT_FLASH_B: Rgb = Rgb::new(0xff, 0xe0, 0x66);

/// Typed, clamped options for one animated span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationOptions {
    pub fps: u32,
    pub jitter_frames: u32,
    pub cycles: u32,
    pub rainbow: bool,
    pub rainbow_hz: f64,
    pub rainbow_shift_deg: f64,
    pub style: RevealStyle,
    pub origin: Origin,
    pub edge_boost: f64,
    pub spread: u32,
    pub flash_frames: u32,
    pub overshoot: u32,
    pub flash_color_a: Rgb,
    pub flash_color_b: Rgb,
    pub seed_from: SeedFrom,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        AnimationOptions {
            fps: 60,
            jitter_frames: 0,
            cycles: RevealStyle::Normal.default_cycles(),
            rainbow: false,
            rainbow_hz: 0.6,
            rainbow_shift_deg: 18.0,
            style: RevealStyle::Normal,
            origin: Origin::Left,
            edge_boost: 0.0,
            spread: 0,
            flash_frames: 0,
            overshoot: 0,
            flash_color_a: DEFAULT_FLASH_A,
            flash_color_b: DEFAULT_FLASH_B,
            seed_from: SeedFrom::Fixed,
        }
    }
}

impl AnimationOptions {
    /// Parse a header option string such as `style=blast fps=30 flash=4`.
    pub fn parse(input: &str) -> Self {
        let mut opts = AnimationOptions::default();
        let mut cycles: Option<u32> = None;

        for token in input.split_whitespace() {
            let Some((key, value)) = token.split_once('=') else {
                continue;
            };
            match key.to_ascii_lowercase().as_str() {
                "fps" => set_int(&mut opts.fps, value, 1, 240),
                "jitter" | "jitterframes" => set_int(&mut opts.jitter_frames, value, 0, 60),
                "cycles" => {
                    if let Some(v) = parse_int(value) {
                        cycles = Some(v.clamp(0, 10) as u32);
                    }
                }
                "rainbow" => opts.rainbow = parse_bool(value),
                "rainbowhz" | "hz" => set_float(&mut opts.rainbow_hz, value, 0.01, 5.0),
                "rainbowshift" | "rainbowshiftdeg" | "shift" => {
                    set_float(&mut opts.rainbow_shift_deg, value, 0.0, 360.0)
                }
                "style" => opts.style = RevealStyle::parse(value),
                "origin" => opts.origin = Origin::parse(value),
                "edgeboost" | "edge" => set_float(&mut opts.edge_boost, value, 0.0, 1.0),
                "spread" => set_int(&mut opts.spread, value, 0, i64::from(u32::MAX)),
                "flash" | "flashframes" => {
                    set_int(&mut opts.flash_frames, value, 0, i64::from(u32::MAX))
                }
                "overshoot" => set_int(&mut opts.overshoot, value, 0, i64::from(u32::MAX)),
                "flasha" | "flashcolora" => set_color(&mut opts.flash_color_a, value),
                "flashb" | "flashcolorb" => set_color(&mut opts.flash_color_b, value),
                "seed" | "seedfrom" => opts.seed_from = SeedFrom::parse(value),
                _ => {}
            }
        }

        opts.cycles = cycles.unwrap_or_else(|| opts.style.default_cycles());
        opts
    }
}

fn parse_int(value: &str) -> Option<i64> {
    value.parse::<i64>().ok()
}

fn set_int(field: &mut u32, value: &str, min: i64, max: i64) {
    if let Some(v) = parse_int(value) {
        *field = v.clamp(min, max) as u32;
    }
}

fn set_float(field: &mut f64, value: &str, min: f64, max: f64) {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => *field = v.clamp(min, max),
        _ => {}
    }
}

fn set_color(field: &mut Rgb, value: &str) {
    if let Some(c) = Rgb::parse_hex(value) {
        *field = c;
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value, "true" | "1")
}
