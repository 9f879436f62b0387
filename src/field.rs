//! Scalar fields sampled on a regular grid
//!
//! A [`ScalarField`] is a row-major grid of samples spanning a rectangle in
//! physical units. Column 0 sits at `xmin` and the last column at `xmax`;
//! row 0 sits at `ymin` and the last row at `ymax`. The global value range is
//! computed once at construction so lookups never rescan the grid.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Physical extent of a field
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl FieldBounds {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self> {
        let bounds = Self { xmin, xmax, ymin, ymax };
        bounds.validate()?;
        Ok(bounds)
    }

    fn validate(&self) -> Result<()> {
        let finite = [self.xmin, self.xmax, self.ymin, self.ymax]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.xmax <= self.xmin || self.ymax <= self.ymin {
            return Err(Error::InvalidBounds {
                xmin: self.xmin,
                xmax: self.xmax,
                ymin: self.ymin,
                ymax: self.ymax,
            });
        }
        Ok(())
    }
}

/// A point in the field's physical units
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rectangular grid of samples with coordinate bounds
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    values: Vec<f64>,
    rows: usize,
    cols: usize,
    bounds: FieldBounds,
    /// Global min/max over finite samples; `None` when there are none
    range: Option<(f64, f64)>,
}

impl ScalarField {
    /// Create a field from row-major samples
    pub fn new(values: Vec<f64>, rows: usize, cols: usize, bounds: FieldBounds) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidField(format!("empty grid ({}x{})", rows, cols)));
        }
        let expected = rows
            .checked_mul(cols)
            .ok_or_else(|| Error::InvalidField(format!("grid {}x{} is too large", rows, cols)))?;
        if values.len() != expected {
            return Err(Error::InvalidField(format!(
                "expected {} samples ({}x{}), got {}",
                expected,
                rows,
                cols,
                values.len()
            )));
        }
        bounds.validate()?;

        let range = value_range(&values);
        if range.is_none() {
            log::warn!("field has no finite samples");
        }
        log::debug!("field {}x{} range {:?}", rows, cols, range);

        Ok(Self {
            values,
            rows,
            cols,
            bounds,
            range,
        })
    }

    /// Create a field from a list of equal-length rows
    pub fn from_rows(rows: Vec<Vec<f64>>, bounds: FieldBounds) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
            return Err(Error::InvalidField(format!(
                "row {} has {} columns, expected {}",
                i,
                row.len(),
                ncols
            )));
        }
        Self::new(rows.into_iter().flatten().collect(), nrows, ncols, bounds)
    }

    /// Parse whitespace-delimited text, one row per line
    pub fn from_text(text: &str, bounds: FieldBounds) -> Result<Self> {
        Self::from_rows(parse_grid(text), bounds)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn bounds(&self) -> FieldBounds {
        self.bounds
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Global (min, max) of the finite samples, or `None` if there are none
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.range
    }

    /// Sample at (row, col), if in bounds
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.values[row * self.cols + col])
        } else {
            None
        }
    }

    /// Grid cell (row, col) containing a coordinate.
    ///
    /// Coordinates on or beyond the upper bound land in the last row/column;
    /// coordinates below the lower bound land in the first.
    pub fn cell_at(&self, at: Coordinate) -> (usize, usize) {
        let b = &self.bounds;
        let col = cell_index(at.x, b.xmin, b.xmax, self.cols);
        let row = cell_index(at.y, b.ymin, b.ymax, self.rows);
        (row, col)
    }

    /// Sample at the cell containing a coordinate
    pub fn value_at(&self, at: Coordinate) -> f64 {
        let (row, col) = self.cell_at(at);
        self.values[row * self.cols + col]
    }

    /// Scale a raw value to [0, 1] using the global range.
    ///
    /// A uniform field, or one with no finite samples, normalizes everything
    /// to 0. Infinite samples are outside the range and normalize to ±inf.
    pub fn normalize(&self, raw: f64) -> f64 {
        match self.range {
            Some((min, max)) if max > min => (raw - min) / (max - min),
            _ => 0.0,
        }
    }

    /// Column coordinates from xmin to xmax
    pub fn x_coords(&self) -> Vec<f64> {
        linspace(self.bounds.xmin, self.bounds.xmax, self.cols)
    }

    /// Row coordinates from ymin to ymax
    pub fn y_coords(&self) -> Vec<f64> {
        linspace(self.bounds.ymin, self.bounds.ymax, self.rows)
    }
}

fn cell_index(v: f64, min: f64, max: f64, n: usize) -> usize {
    let idx = ((v - min) / (max - min) * n as f64).floor();
    // NaN saturates to 0 in the cast
    idx.clamp(0.0, (n - 1) as f64) as usize
}

fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Split text into rows of numbers.
///
/// Lines are split on whitespace; tokens that are not numbers become NaN.
/// Blank lines are skipped.
pub fn parse_grid(text: &str) -> Vec<Vec<f64>> {
    text.trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.split_whitespace()
                .map(|tok| tok.parse::<f64>().unwrap_or(f64::NAN))
                .collect()
        })
        .collect()
}

/// `num` evenly spaced values from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            (0..num).map(|i| start + step * i as f64).collect()
        }
    }
}
