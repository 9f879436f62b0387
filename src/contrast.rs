//! Label text color selection
//!
//! Picks black or white text for a label drawn over a filled contour plot,
//! based on the color the field produces under the label.

use std::fmt;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::colorscale::{ColorScale, Rgb};
use crate::field::{Coordinate, ScalarField};

/// Luminance at or above this gets black text
pub const LUMINANCE_THRESHOLD: f64 = 0.5;

/// Text color for a label
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextColor {
    Black,
    White,
}

impl TextColor {
    /// Color name as accepted by charting libraries
    pub fn name(&self) -> &'static str {
        match self {
            TextColor::Black => "black",
            TextColor::White => "white",
        }
    }

    pub fn rgb(&self) -> Rgb {
        match self {
            TextColor::Black => Rgb::BLACK,
            TextColor::White => Rgb::WHITE,
        }
    }

    /// White on dark backgrounds, black otherwise
    pub fn for_luminance(luminance: f64) -> Self {
        if luminance < LUMINANCE_THRESHOLD {
            TextColor::White
        } else {
            TextColor::Black
        }
    }

    /// Text color for a given background
    pub fn for_background(bg: Rgb) -> Self {
        Self::for_luminance(luminance(bg))
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<TextColor> for Color32 {
    fn from(c: TextColor) -> Self {
        match c {
            TextColor::Black => Color32::BLACK,
            TextColor::White => Color32::WHITE,
        }
    }
}

/// Unweighted mean of the channels, in [0, 1].
///
/// Not a photometric luminance: the three channels count equally.
pub fn luminance(c: Rgb) -> f64 {
    (c.r as f64 / 255.0 + c.g as f64 / 255.0 + c.b as f64 / 255.0) / 3.0
}

/// Background color the field shows at a coordinate
pub fn background_at(at: Coordinate, field: &ScalarField, scale: &ColorScale) -> Rgb {
    let raw = field.value_at(at);
    if raw.is_nan() {
        log::warn!("no data at ({}, {}), treating background as black", at.x, at.y);
    }
    scale.resolve(field.normalize(raw))
}

/// Pick legible text color for a label at `at`
pub fn pick(at: Coordinate, field: &ScalarField, scale: &ColorScale) -> TextColor {
    let bg = background_at(at, field, scale);
    let choice = TextColor::for_background(bg);
    log::debug!("text at ({}, {}) over {} -> {}", at.x, at.y, bg, choice);
    choice
}
