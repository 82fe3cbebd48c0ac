use spectrum_viz_wasm::geometry::{rotation_matrix, Geometry};
use spectrum_viz_wasm::VizError;

#[test]
fn parses_triangle_document() {
    let g = Geometry::from_json(r#"{"points": [[0, 1], [-1, -1], [1, -1]]}"#).unwrap();
    assert_eq!(g.dims(), 2);
    assert_eq!(g.vertex_count(), 3);
    assert_eq!(g.positions(), &[0.0, 1.0, -1.0, -1.0, 1.0, -1.0]);
}

#[test]
fn extra_keys_are_ignored() {
    let g = Geometry::from_json(r#"{"name": "tri", "points": [[0,0,0],[1,0,0],[0,1,0]]}"#).unwrap();
    assert_eq!(g.dims(), 3);
    assert_eq!(g.vertex_count(), 3);
}

#[test]
fn rejects_non_array_points() {
    let err = Geometry::from_json(r#"{"points": "not an array"}"#).unwrap_err();
    assert!(matches!(err, VizError::Geometry(_)), "{err:?}");
}

#[test]
fn rejects_non_numeric_components() {
    assert!(matches!(
        Geometry::from_json(r#"{"points": [[0, "1"], [1, 1]]}"#),
        Err(VizError::Geometry(_))
    ));
    assert!(matches!(
        Geometry::from_json(r#"{"points": [0, 1, 2]}"#),
        Err(VizError::Geometry(_))
    ));
}

#[test]
fn rejects_missing_or_empty_points() {
    assert!(Geometry::from_json("{}").is_err());
    assert!(Geometry::from_json(r#"{"points": []}"#).is_err());
    assert!(Geometry::from_json("not json").is_err());
}

#[test]
fn rejects_ragged_or_oversized_points() {
    let err = Geometry::from_json(r#"{"points": [[0, 0], [1, 1, 1]]}"#).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid triangle document: point 1 has 3 components, expected 2"
    );
    assert!(Geometry::from_json(r#"{"points": [[0]]}"#).is_err());
    assert!(Geometry::from_json(r#"{"points": [[0, 0, 0, 0, 0]]}"#).is_err());
}

#[test]
fn rotation_matrix_turns_x_axis() {
    let m = rotation_matrix(std::f32::consts::FRAC_PI_2);
    // column-major: rotating (1, 0) gives the first column
    assert!(m[0].abs() < 1e-6);
    assert!((m[1] - 1.0).abs() < 1e-6);
    assert!((m[2] + 1.0).abs() < 1e-6);
    assert!(m[3].abs() < 1e-6);

    assert_eq!(rotation_matrix(0.0), [1.0, 0.0, -0.0, 1.0]);
}
