//! Plot extent and region labels for a Ratestick case
//!
//! A case is a cylindrical explosive charge of some radius, optionally wrapped
//! in a confiner shell, surrounded by air. Ratestick writes a window that
//! advances with the detonation front; the plotting constants say which frame
//! is being shown and how far each frame advances.

use serde::{Deserialize, Serialize};

use crate::colorscale::ColorScale;
use crate::contrast::{self, TextColor};
use crate::error::{Error, Result};
use crate::field::{parse_grid, Coordinate, FieldBounds, ScalarField};

/// Frames of advance shown across the x extent of a plot
const FRAMES_PER_WINDOW: f64 = 3.0;

/// Geometry of a case, in millimetres
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseGeometry {
    /// Explosive name, used as label text
    pub explosive: String,
    /// Confiner material; `None` for unconfined charges
    pub confiner: Option<String>,
    /// Radius of the explosive charge
    pub explosive_radius: f64,
    /// Thickness of the confiner shell
    pub confiner_width: f64,
    /// Air shown above the confiner
    pub air_margin: f64,
}

impl Default for CaseGeometry {
    fn default() -> Self {
        Self {
            explosive: "PETN".to_string(),
            confiner: Some("Granite".to_string()),
            explosive_radius: 30.0,
            confiner_width: 5.0,
            air_margin: 15.0,
        }
    }
}

impl CaseGeometry {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let geometry: CaseGeometry = serde_json::from_str(json)?;
        geometry.validate()?;
        Ok(geometry)
    }

    fn validate(&self) -> Result<()> {
        let dims = [self.explosive_radius, self.confiner_width, self.air_margin];
        if dims.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(Error::InvalidGeometry(format!(
                "dimensions must be finite and non-negative: radius {}, confiner {}, air {}",
                self.explosive_radius, self.confiner_width, self.air_margin
            )));
        }
        if self.explosive_radius == 0.0 {
            return Err(Error::InvalidGeometry("explosive radius is zero".to_string()));
        }
        Ok(())
    }
}

/// Per-frame constants from `Plotting_constants.dat`
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlottingConstants {
    /// Simulation time of the frame, in microseconds
    pub time: f64,
    pub end_time: f64,
    pub frame_count: f64,
    /// Distance the window advances per frame, in millimetres
    pub advance_x: f64,
    pub time_contour: f64,
}

impl PlottingConstants {
    /// Read the values row (the second line; the first is a header).
    ///
    /// A missing row yields all zeros. Missing trailing values read as zero.
    pub fn from_text(text: &str) -> Self {
        let rows = parse_grid(text);
        let Some(row) = rows.get(1) else {
            log::warn!("plotting constants have no values row, using zeros");
            return Self::default();
        };
        let at = |i: usize| row.get(i).copied().unwrap_or(0.0);
        Self {
            time: at(0),
            end_time: at(1),
            frame_count: at(2),
            advance_x: at(3),
            time_contour: at(4),
        }
    }
}

/// Material regions that get a label
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Air,
    Explosive,
    ExplosiveProducts,
    Confiner,
}

/// A placed region label
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub region: Region,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub color: TextColor,
}

/// Plot bounds and label anchors for one frame
#[derive(Clone, Debug, PartialEq)]
pub struct CaseLayout {
    geometry: CaseGeometry,
    bounds: FieldBounds,
}

impl CaseLayout {
    pub fn new(geometry: CaseGeometry, constants: &PlottingConstants) -> Result<Self> {
        geometry.validate()?;
        let xmin = constants.frame_count * constants.advance_x;
        let xmax = xmin + FRAMES_PER_WINDOW * constants.advance_x;
        let ymax = geometry.explosive_radius + geometry.confiner_width + geometry.air_margin;
        let bounds = FieldBounds::new(xmin, xmax, 0.0, ymax)?;
        log::debug!("case layout bounds {:?}", bounds);
        Ok(Self { geometry, bounds })
    }

    pub fn bounds(&self) -> FieldBounds {
        self.bounds
    }

    pub fn geometry(&self) -> &CaseGeometry {
        &self.geometry
    }

    /// Anchor point and text of each region label.
    ///
    /// The confiner label is left out for unconfined cases.
    pub fn anchors(&self) -> Vec<(Region, String, Coordinate)> {
        let b = &self.bounds;
        let g = &self.geometry;
        let dx = b.xmax - b.xmin;
        let r = g.explosive_radius;
        let w = g.confiner_width;

        let mut anchors = vec![
            (
                Region::Air,
                "Air".to_string(),
                Coordinate::new(b.xmin + dx * 0.8, (b.ymax - b.ymin + r + w) / 2.0),
            ),
            (
                Region::Explosive,
                g.explosive.clone(),
                Coordinate::new(b.xmin + dx * 0.8, r / 2.0),
            ),
            (
                Region::ExplosiveProducts,
                format!("{} products", g.explosive),
                Coordinate::new(b.xmin + dx * 0.2, r / 2.0),
            ),
        ];
        if let Some(confiner) = &g.confiner {
            anchors.push((
                Region::Confiner,
                confiner.clone(),
                Coordinate::new(b.xmin + dx * 0.8, r + w / 2.0),
            ));
        }
        anchors
    }

    /// Place every label and pick its text color against `field`.
    ///
    /// The field must span this layout's bounds, otherwise the anchors would
    /// sample the wrong cells.
    pub fn label_colors(&self, field: &ScalarField, scale: &ColorScale) -> Result<Vec<Label>> {
        if field.bounds() != self.bounds {
            return Err(Error::InvalidField(format!(
                "field bounds {:?} do not match case bounds {:?}",
                field.bounds(),
                self.bounds
            )));
        }
        let labels = self
            .anchors()
            .into_iter()
            .map(|(region, text, at)| Label {
                region,
                text,
                x: at.x,
                y: at.y,
                color: contrast::pick(at, field, scale),
            })
            .collect();
        Ok(labels)
    }
}
