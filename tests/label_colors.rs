//! End-to-end: Ratestick text output in, label colors out

use ratestick_view::{
    pick, CaseGeometry, CaseLayout, ColorScale, Coordinate, FieldBounds, PlottingConstants, Preset,
    Region, Rgb, ScalarField, TextColor,
};

const CONSTANTS: &str = "time end_time frame_count advance_x time_contour\n\
                         8.0 40.0 2 5.0 0.5\n";

/// Pressure-like field: high near the axis, falling off towards the air
fn pressure_text(rows: usize, cols: usize) -> String {
    (0..rows)
        .map(|i| {
            let p = if i < rows / 2 { 30.0 } else { -2.0 };
            vec![format!("{:.3}", p); cols].join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_text_to_labels() {
    let constants = PlottingConstants::from_text(CONSTANTS);
    let layout = CaseLayout::new(CaseGeometry::default(), &constants).unwrap();
    let field = ScalarField::from_text(&pressure_text(20, 8), layout.bounds()).unwrap();
    assert_eq!(field.rows(), 20);
    assert_eq!(field.cols(), 8);

    let labels = layout.label_colors(&field, &Preset::RdBuR.scale()).unwrap();
    assert_eq!(labels.len(), 4);

    let color_of = |region| labels.iter().find(|l| l.region == region).unwrap().color;
    // Top of RdBu_r is deep red, bottom is deep blue: both dark
    assert_eq!(color_of(Region::Explosive), TextColor::White);
    assert_eq!(color_of(Region::Air), TextColor::White);
}

#[test]
fn test_whites_scale_always_black() {
    let field = ScalarField::from_text(
        &pressure_text(4, 4),
        FieldBounds::new(0.0, 1.0, 0.0, 1.0).unwrap(),
    )
    .unwrap();
    let scale = Preset::Whites.scale();
    for &(x, y) in &[(0.0, 0.0), (0.5, 0.5), (1.0, 1.0), (0.99, 0.01)] {
        assert_eq!(pick(Coordinate::new(x, y), &field, &scale), TextColor::Black);
    }
}

#[test]
fn test_custom_scale_over_text_field() {
    let scale = ColorScale::builder()
        .stop(0.0, "#000000")
        .stop(0.5, "#FF0000")
        .stop(1.0, "#ffffff")
        .build()
        .unwrap();
    assert_eq!(scale.resolve(0.25), Rgb::new(128, 0, 0));
    assert_eq!(scale.resolve(0.75), Rgb::new(255, 128, 128));

    let bounds = FieldBounds::new(0.0, 4.0, 0.0, 2.0).unwrap();
    let field = ScalarField::from_text("0 1 2 3\n4 5 6 7\n", bounds).unwrap();
    // Cell (0, 0): value 0 -> black background
    assert_eq!(pick(Coordinate::new(0.5, 0.5), &field, &scale), TextColor::White);
    // Corner (xmax, ymax): value 7 -> white background
    assert_eq!(pick(Coordinate::new(4.0, 2.0), &field, &scale), TextColor::Black);
}

#[test]
fn test_field_on_other_bounds_is_rejected() {
    let constants = PlottingConstants::from_text(CONSTANTS);
    let layout = CaseLayout::new(CaseGeometry::default(), &constants).unwrap();
    let unit = FieldBounds::new(0.0, 1.0, 0.0, 1.0).unwrap();
    let field = ScalarField::from_text(&pressure_text(4, 4), unit).unwrap();
    assert!(layout.label_colors(&field, &Preset::RdBuR.scale()).is_err());
}

#[test]
fn test_labels_json_from_geometry() {
    let geometry = CaseGeometry::from_json(r#"{"explosive": "TNT", "confiner": null}"#).unwrap();
    let layout = CaseLayout::new(geometry, &PlottingConstants::from_text(CONSTANTS)).unwrap();
    let field = ScalarField::new(vec![1.0; 4], 2, 2, layout.bounds()).unwrap();
    let labels = layout.label_colors(&field, &Preset::Plasma.scale()).unwrap();
    let json = serde_json::to_string(&labels).unwrap();
    assert!(json.contains(r#""text":"TNT products""#));
    assert!(!json.contains("confiner"));
}
