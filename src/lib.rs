//! ratestick-view - Color scales and label contrast for Ratestick contour plots
//!
//! Ratestick writes density, pressure and reaction-progress fields as flat
//! text grids. This library turns those grids into the colors a contour plot
//! shows, and picks legible black or white text for the region labels drawn
//! over the plot. It compiles to WebAssembly for use from the plotting page.
//!
//! ## Architecture
//!
//! - `ColorScale`: piecewise-linear gradient from hex stops
//! - `ScalarField`: row-major grid with coordinate bounds and global range
//! - `contrast::pick`: label text color at a coordinate
//! - `CaseLayout`: plot bounds and label anchors for a case
//! - `FieldHandle`: WASM interface for JavaScript

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod colorscale;
pub mod contrast;
pub mod error;
pub mod field;
pub mod layout;

pub use colorscale::{ColorScale, ColorScaleBuilder, ColorStop, Preset, Rgb};
pub use contrast::{luminance, pick, TextColor};
pub use error::Error;
pub use field::{linspace, parse_grid, Coordinate, FieldBounds, ScalarField};
pub use layout::{CaseGeometry, CaseLayout, Label, PlottingConstants, Region};

/// Crate version and build time, as "ratestick-view 0.1.0 (2026-01-01 12:00:00)"
pub fn build_info() -> String {
    format!(
        "{} {} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIMESTAMP")
    )
}

/// Install the browser console logger.
///
/// Debug builds log at Debug, release builds at Warn. Safe to call more than
/// once; later calls are ignored.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    #[cfg(debug_assertions)]
    {
        console_log::init_with_level(log::Level::Debug).ok();
    }
    #[cfg(not(debug_assertions))]
    {
        console_log::init_with_level(log::Level::Warn).ok();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = buildInfo)]
pub fn build_info_js() -> String {
    build_info()
}

#[cfg(target_arch = "wasm32")]
fn to_js(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// A handle to one loaded field and the color scale it is plotted with.
///
/// This struct is exposed to JavaScript. The page loads a field, picks the
/// scale its contour trace uses, and asks for label colors.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct FieldHandle {
    field: ScalarField,
    scale: ColorScale,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl FieldHandle {
    /// Create a handle from raw samples.
    ///
    /// # Arguments
    /// * `buffer` - ArrayBuffer holding `width * height` samples, row-major,
    ///   row 0 at `ymin`
    /// * `width` - Number of columns
    /// * `height` - Number of rows
    /// * `array_type` - Rust-style type specifier: "i8", "u8", "i16", "u16",
    ///   "i32", "u32", "f32" or "f64" (default)
    /// * `xmin`, `xmax`, `ymin`, `ymax` - Physical extent of the grid
    ///
    /// The handle starts with the plasma scale.
    #[wasm_bindgen(constructor)]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        buffer: &js_sys::ArrayBuffer,
        width: u32,
        height: u32,
        array_type: &str,
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
    ) -> Result<FieldHandle, JsValue> {
        let values = convert_buffer_to_f64(buffer, array_type);
        let bounds = FieldBounds::new(xmin, xmax, ymin, ymax).map_err(to_js)?;
        let field =
            ScalarField::new(values, height as usize, width as usize, bounds).map_err(to_js)?;
        Ok(FieldHandle {
            field,
            scale: Preset::default().scale(),
        })
    }

    /// Create a handle from Ratestick text output (whitespace-delimited rows)
    #[wasm_bindgen(js_name = fromText)]
    pub fn from_text(
        text: &str,
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
    ) -> Result<FieldHandle, JsValue> {
        let bounds = FieldBounds::new(xmin, xmax, ymin, ymax).map_err(to_js)?;
        let field = ScalarField::from_text(text, bounds).map_err(to_js)?;
        Ok(FieldHandle {
            field,
            scale: Preset::default().scale(),
        })
    }

    /// Select a named scale: "plasma", "rdbu_r" or "whites"
    #[wasm_bindgen(js_name = setColorscale)]
    pub fn set_colorscale(&mut self, name: &str) -> Result<(), JsValue> {
        self.scale = Preset::from_name(name).map_err(to_js)?.scale();
        Ok(())
    }

    /// Use a custom scale given as parallel arrays of positions and hex colors
    #[wasm_bindgen(js_name = setCustomColorscale)]
    pub fn set_custom_colorscale(
        &mut self,
        positions: &[f64],
        colors: Vec<String>,
    ) -> Result<(), JsValue> {
        if positions.len() != colors.len() {
            return Err(JsValue::from_str(&format!(
                "{} positions but {} colors",
                positions.len(),
                colors.len()
            )));
        }
        let builder = positions
            .iter()
            .zip(&colors)
            .fold(ColorScale::builder(), |b, (&pos, hex)| b.stop(pos, hex));
        self.scale = builder.build().map_err(to_js)?;
        Ok(())
    }

    /// Text color for a label at (x, y): "black" or "white"
    #[wasm_bindgen(js_name = textColor)]
    pub fn text_color(&self, x: f64, y: f64) -> String {
        pick(Coordinate::new(x, y), &self.field, &self.scale).name().to_string()
    }

    /// Color of a normalized value under the current scale, as "#rrggbb"
    #[wasm_bindgen(js_name = colorAt)]
    pub fn color_at(&self, value: f64) -> String {
        self.scale.resolve(value).to_hex()
    }

    /// Get the field value range as [min, max]; [0, 0] if the field has no data
    #[wasm_bindgen(js_name = getValueRange)]
    pub fn get_value_range(&self) -> js_sys::Float64Array {
        let (min_val, max_val) = self.field.value_range().unwrap_or((0.0, 0.0));
        let result = js_sys::Float64Array::new_with_length(2);
        result.copy_from(&[min_val, max_val]);
        result
    }

    /// Column coordinates (linspace from xmin to xmax)
    #[wasm_bindgen(js_name = getXCoords)]
    pub fn get_x_coords(&self) -> Vec<f64> {
        self.field.x_coords()
    }

    /// Row coordinates (linspace from ymin to ymax)
    #[wasm_bindgen(js_name = getYCoords)]
    pub fn get_y_coords(&self) -> Vec<f64> {
        self.field.y_coords()
    }

    /// Region labels for a case, as a JSON array of
    /// { region, text, x, y, color }.
    ///
    /// `geometry_json` is a `CaseGeometry` object (missing keys take defaults);
    /// `constants_text` is the content of `Plotting_constants.dat`. The case
    /// bounds must equal this field's bounds, otherwise an error is returned.
    #[wasm_bindgen(js_name = labelColors)]
    pub fn label_colors(
        &self,
        geometry_json: &str,
        constants_text: &str,
    ) -> Result<String, JsValue> {
        let geometry = CaseGeometry::from_json(geometry_json).map_err(to_js)?;
        let constants = PlottingConstants::from_text(constants_text);
        let layout = CaseLayout::new(geometry, &constants).map_err(to_js)?;
        let labels = layout.label_colors(&self.field, &self.scale).map_err(to_js)?;
        serde_json::to_string(&labels).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

/// Convert a JavaScript ArrayBuffer to Vec<f64> based on ArrayType string.
/// ArrayType values are Rust-style type specifiers (i8, u8, i16, etc.).
#[cfg(target_arch = "wasm32")]
fn convert_buffer_to_f64(buffer: &js_sys::ArrayBuffer, array_type: &str) -> Vec<f64> {
    match array_type {
        "i8" => widen(js_sys::Int8Array::new(buffer).to_vec()),
        "u8" => widen(js_sys::Uint8Array::new(buffer).to_vec()),
        "i16" => widen(js_sys::Int16Array::new(buffer).to_vec()),
        "u16" => widen(js_sys::Uint16Array::new(buffer).to_vec()),
        "i32" => widen(js_sys::Int32Array::new(buffer).to_vec()),
        "u32" => widen(js_sys::Uint32Array::new(buffer).to_vec()),
        "f32" => widen(js_sys::Float32Array::new(buffer).to_vec()),
        // Default to Float64
        _ => js_sys::Float64Array::new(buffer).to_vec(),
    }
}

#[cfg(target_arch = "wasm32")]
fn widen<T: Into<f64>>(values: Vec<T>) -> Vec<f64> {
    values.into_iter().map(Into::into).collect()
}
