//! Color scale definitions and interpolation
//!
//! A [`ColorScale`] is a piecewise-linear gradient over the normalized range
//! [0, 1], defined by hex color stops in the form plotting libraries accept.
//! Stops are parsed and validated once when the scale is built.

use std::fmt;
use std::str::FromStr;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An 8-bit RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB`, case-insensitive
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        // from_str_radix alone would accept a leading '+'
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColorFormat(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| Error::InvalidColorFormat(hex.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for Color32 {
    fn from(c: Rgb) -> Self {
        Color32::from_rgb(c.r, c.g, c.b)
    }
}

/// A color pinned to a position in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(position: f64, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// Piecewise-linear gradient over [0, 1].
///
/// Invariants (checked at construction): at least two stops, positions
/// non-decreasing, the first at 0.0 and the last at 1.0. A repeated position
/// makes a hard step between the two colors.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColorScale {
    stops: Vec<ColorStop>,
}

impl ColorScale {
    /// Start building a scale stop by stop
    pub fn builder() -> ColorScaleBuilder {
        ColorScaleBuilder::default()
    }

    /// Build a scale from `(position, "#RRGGBB")` pairs
    pub fn from_stops(stops: &[(f64, &str)]) -> Result<Self> {
        stops
            .iter()
            .fold(Self::builder(), |b, &(pos, hex)| b.stop(pos, hex))
            .build()
    }

    /// Build a scale from already-parsed stops
    pub fn new(stops: Vec<ColorStop>) -> Result<Self> {
        validate_stops(&stops)?;
        log::debug!("built color scale with {} stops", stops.len());
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Map a normalized value to a color.
    ///
    /// The first adjacent stop pair that brackets `value` is interpolated
    /// channel by channel, rounding half away from zero. Values outside
    /// [0, 1] (and NaN) match no pair and resolve to black. A zero-width pair
    /// resolves to its left stop.
    pub fn resolve(&self, value: f64) -> Rgb {
        for pair in self.stops.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            if value >= start.position && value <= end.position {
                let width = end.position - start.position;
                if width == 0.0 {
                    return start.color;
                }
                return lerp_rgb(start.color, end.color, (value - start.position) / width);
            }
        }
        log::debug!("value {} outside color scale, using fallback", value);
        Rgb::BLACK
    }

    /// Same as [`resolve`](Self::resolve), as an egui color
    pub fn resolve_color32(&self, value: f64) -> Color32 {
        self.resolve(value).into()
    }
}

/// Collects raw stops; parsing and validation happen in [`build`](Self::build)
#[derive(Clone, Debug, Default)]
pub struct ColorScaleBuilder {
    stops: Vec<(f64, String)>,
}

impl ColorScaleBuilder {
    pub fn stop(mut self, position: f64, hex: &str) -> Self {
        self.stops.push((position, hex.to_string()));
        self
    }

    pub fn build(self) -> Result<ColorScale> {
        let stops = self
            .stops
            .iter()
            .map(|(pos, hex)| Ok(ColorStop::new(*pos, Rgb::from_hex(hex)?)))
            .collect::<Result<Vec<_>>>()?;
        ColorScale::new(stops)
    }
}

fn validate_stops(stops: &[ColorStop]) -> Result<()> {
    if stops.len() < 2 {
        return Err(Error::InvalidColorScale(format!("need at least 2 stops, got {}", stops.len())));
    }
    if let Some(s) = stops.iter().find(|s| !s.position.is_finite()) {
        return Err(Error::InvalidColorScale(format!("non-finite stop position {}", s.position)));
    }
    let first = stops[0].position;
    let last = stops[stops.len() - 1].position;
    if first != 0.0 || last != 1.0 {
        return Err(Error::InvalidColorScale(format!(
            "stops must span [0, 1], got [{}, {}]",
            first, last
        )));
    }
    if let Some(pair) = stops.windows(2).find(|p| p[1].position < p[0].position) {
        return Err(Error::InvalidColorScale(format!(
            "stop positions must be ascending ({} then {})",
            pair[0].position, pair[1].position
        )));
    }
    Ok(())
}

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    let (a, b) = (a as f64, b as f64);
    (a + t * (b - a)).round().clamp(0.0, 255.0) as u8
}

fn lerp_rgb(a: Rgb, b: Rgb, t: f64) -> Rgb {
    Rgb::new(
        lerp_channel(a.r, b.r, t),
        lerp_channel(a.g, b.g, t),
        lerp_channel(a.b, b.b, t),
    )
}

/// Named scales used by the Ratestick plots
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Density plots
    #[default]
    Plasma,
    /// Reversed red-blue, for pressure plots
    RdBuR,
    /// Flat near-white, for the z1 = 0.5 reaction front line
    Whites,
}

const PLASMA_STOPS: [(f64, &str); 11] = [
    (0.0, "#0d0887"),
    (0.1, "#41049d"),
    (0.2, "#6a00a8"),
    (0.3, "#8f0da4"),
    (0.4, "#b12a90"),
    (0.5, "#cc4778"),
    (0.6, "#e16462"),
    (0.7, "#f2844b"),
    (0.8, "#fca636"),
    (0.9, "#f6d644"),
    (1.0, "#f0f921"),
];

const RDBU_R_STOPS: [(f64, &str); 11] = [
    (0.0, "#053061"),
    (0.1, "#2166ac"),
    (0.2, "#4393c3"),
    (0.3, "#92c5de"),
    (0.4, "#d1e5f0"),
    (0.5, "#f7f7f7"),
    (0.6, "#fdbeb7"),
    (0.7, "#f4a582"),
    (0.8, "#d6604d"),
    (0.9, "#b2182b"),
    (1.0, "#67001f"),
];

const WHITES_STOPS: [(f64, &str); 2] = [(0.0, "#f7f7f7"), (1.0, "#f7f7f7")];

impl Preset {
    pub const ALL: &'static [Preset] = &[Preset::Plasma, Preset::RdBuR, Preset::Whites];

    /// Name accepted by [`Preset::from_name`]
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Plasma => "plasma",
            Preset::RdBuR => "rdbu_r",
            Preset::Whites => "whites",
        }
    }

    /// Look up a preset by name, case-insensitive
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownColorscale(name.to_string()))
    }

    /// Check if this is a diverging scale
    pub fn is_diverging(&self) -> bool {
        matches!(self, Preset::RdBuR)
    }

    pub fn scale(&self) -> ColorScale {
        let stops: &[(f64, &str)] = match self {
            Preset::Plasma => &PLASMA_STOPS,
            Preset::RdBuR => &RDBU_R_STOPS,
            Preset::Whites => &WHITES_STOPS,
        };
        let stops = stops
            .iter()
            .filter_map(|&(pos, hex)| Rgb::from_hex(hex).ok().map(|c| ColorStop::new(pos, c)))
            .collect();
        // Preset tables are fixed and well-formed
        ColorScale { stops }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_white() -> ColorScale {
        ColorScale::from_stops(&[(0.0, "#000000"), (1.0, "#ffffff")]).unwrap()
    }

    #[test]
    fn test_hex_parse() {
        assert_eq!(Rgb::from_hex("#0d0887").unwrap(), Rgb::new(13, 8, 135));
        assert_eq!(Rgb::from_hex("F0F921").unwrap(), Rgb::new(240, 249, 33));
        assert_eq!("#AbCdEf".parse::<Rgb>().unwrap(), Rgb::new(0xab, 0xcd, 0xef));
    }

    #[test]
    fn test_hex_parse_rejects_malformed() {
        let malformed = [
            "", "#", "#fff", "#0d08877", "##0d0887", "#0g0887", "+f+f+f", "#+f0000", "#ééé",
        ];
        for bad in malformed {
            assert!(
                matches!(Rgb::from_hex(bad), Err(Error::InvalidColorFormat(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_hex_display() {
        assert_eq!(Rgb::new(13, 8, 135).to_hex(), "#0d0887");
    }

    #[test]
    fn test_endpoints() {
        for preset in Preset::ALL {
            let scale = preset.scale();
            let stops = scale.stops();
            assert_eq!(scale.resolve(0.0), stops[0].color);
            assert_eq!(scale.resolve(1.0), stops[stops.len() - 1].color);
        }
    }

    #[test]
    fn test_midpoint_rounds_half_up() {
        // 127.5 rounds to 128
        assert_eq!(black_white().resolve(0.5), Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_exact_stop_position() {
        let scale = Preset::Plasma.scale();
        assert_eq!(scale.resolve(0.5), Rgb::from_hex("#cc4778").unwrap());
        assert_eq!(scale.resolve(0.1), Rgb::from_hex("#41049d").unwrap());
    }

    #[test]
    fn test_interior_interpolation() {
        let scale = ColorScale::from_stops(&[(0.0, "#0d0887"), (1.0, "#f0f921")]).unwrap();
        // 13 + 227 * 2/3, 8 + 241 * 2/3, 135 - 102 * 2/3
        assert_eq!(scale.resolve(2.0 / 3.0), Rgb::new(164, 169, 67));
    }

    #[test]
    fn test_resolve_is_pure() {
        let scale = Preset::RdBuR.scale();
        let a = scale.resolve(0.37);
        let b = scale.resolve(0.37);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fallback_outside_range() {
        for preset in Preset::ALL {
            let scale = preset.scale();
            assert_eq!(scale.resolve(-0.1), Rgb::BLACK);
            assert_eq!(scale.resolve(1.1), Rgb::BLACK);
            assert_eq!(scale.resolve(f64::NAN), Rgb::BLACK);
        }
    }

    #[test]
    fn test_invalid_scales() {
        let cases: &[&[(f64, &str)]] = &[
            &[],
            &[(0.0, "#000000")],
            &[(0.1, "#000000"), (1.0, "#ffffff")],
            &[(0.0, "#000000"), (0.9, "#ffffff")],
            &[(0.0, "#000000"), (0.6, "#888888"), (0.4, "#888888"), (1.0, "#ffffff")],
            &[(0.0, "#000000"), (f64::NAN, "#888888"), (1.0, "#ffffff")],
        ];
        for stops in cases {
            assert!(
                matches!(ColorScale::from_stops(stops), Err(Error::InvalidColorScale(_))),
                "{:?} should be rejected",
                stops
            );
        }
    }

    #[test]
    fn test_repeated_position_is_hard_step() {
        let scale = ColorScale::from_stops(&[
            (0.0, "#000000"),
            (0.5, "#ff0000"),
            (0.5, "#0000ff"),
            (1.0, "#ffffff"),
        ])
        .unwrap();
        assert_eq!(scale.resolve(0.5), Rgb::new(255, 0, 0));
        assert_eq!(scale.resolve(0.25), Rgb::new(128, 0, 0));
        assert_eq!(scale.resolve(0.75), Rgb::new(128, 128, 255));
    }

    #[test]
    fn test_zero_width_first_pair() {
        let scale = ColorScale::builder()
            .stop(0.0, "#ff0000")
            .stop(0.0, "#000000")
            .stop(1.0, "#ffffff")
            .build()
            .unwrap();
        assert_eq!(scale.resolve(0.0), Rgb::new(255, 0, 0));
        assert_eq!(scale.resolve(0.5), Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_bad_color_reported_before_ordering() {
        let err = ColorScale::builder()
            .stop(0.5, "#000000")
            .stop(0.0, "nope")
            .build()
            .unwrap_err();
        assert_eq!(err, Error::InvalidColorFormat("nope".to_string()));
    }

    #[test]
    fn test_presets_match_validated_build() {
        for preset in Preset::ALL {
            let rebuilt = ColorScale::new(preset.scale().stops().to_vec()).unwrap();
            assert_eq!(rebuilt, preset.scale());
            assert_eq!(rebuilt.stops().len(), preset.scale().stops().len());
        }
        assert_eq!(Preset::Plasma.scale().stops().len(), 11);
        assert_eq!(Preset::RdBuR.scale().stops().len(), 11);
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(Preset::from_name("plasma").unwrap(), Preset::Plasma);
        assert_eq!(Preset::from_name("RdBu_r").unwrap(), Preset::RdBuR);
        assert!(Preset::RdBuR.is_diverging());
        assert!(!Preset::Plasma.is_diverging());
        assert!(matches!(
            Preset::from_name("viridis"),
            Err(Error::UnknownColorscale(_))
        ));
    }

    #[test]
    fn test_color32_conversion() {
        let c = black_white().resolve_color32(1.0);
        assert_eq!(c, Color32::from_rgb(255, 255, 255));
    }
}
