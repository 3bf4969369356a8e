//! Tests for coordinate validation

use super::*;

#[test]
fn test_valid_coordinate() {
    // Bengaluru: 12.9716°N, 77.5946°E
    let coord = Coordinate::new(12.9716, 77.5946).unwrap();
    assert_eq!(coord.lat(), 12.9716);
    assert_eq!(coord.lon(), 77.5946);
}

#[test]
fn test_range_limits_are_inclusive() {
    assert!(Coordinate::new(90.0, 180.0).is_ok());
    assert!(Coordinate::new(-90.0, -180.0).is_ok());
}

#[test]
fn test_invalid_latitude_too_high() {
    let result = Coordinate::new(90.0001, 0.0);
    assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
}

#[test]
fn test_invalid_latitude_too_low() {
    let result = Coordinate::new(-91.0, 0.0);
    assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
}

#[test]
fn test_invalid_longitude() {
    let result = Coordinate::new(0.0, 180.5);
    assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
}

#[test]
fn test_non_finite_is_rejected() {
    assert!(matches!(
        Coordinate::new(f64::NAN, 0.0),
        Err(CoordError::InvalidLatitude(_))
    ));
    assert!(matches!(
        Coordinate::new(0.0, f64::INFINITY),
        Err(CoordError::InvalidLongitude(_))
    ));
}

#[test]
fn test_error_message_names_range() {
    let err = Coordinate::new(95.0, 0.0).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("95"));
    assert!(msg.contains("-90"));
}

#[test]
fn test_deserialize_pair() {
    let coord: Coordinate = serde_json::from_str("[12.5, 77.25]").unwrap();
    assert_eq!(coord.lat(), 12.5);
    assert_eq!(coord.lon(), 77.25);
}

#[test]
fn test_deserialize_rejects_out_of_range() {
    let result: Result<Coordinate, _> = serde_json::from_str("[120.0, 0.0]");
    assert!(result.is_err());
}

#[test]
fn test_bounding_box_from_points() {
    let points = [
        Coordinate::new(1.0, 5.0).unwrap(),
        Coordinate::new(-2.0, 7.0).unwrap(),
        Coordinate::new(3.0, 6.0).unwrap(),
    ];
    let bbox = BoundingBox::from_points(&points).unwrap();
    assert_eq!(bbox.min_lat, -2.0);
    assert_eq!(bbox.max_lat, 3.0);
    assert_eq!(bbox.min_lon, 5.0);
    assert_eq!(bbox.max_lon, 7.0);
}

#[test]
fn test_bounding_box_empty() {
    let points: [Coordinate; 0] = [];
    assert!(BoundingBox::from_points(&points).is_none());
}

#[test]
fn test_bounding_box_contains_is_inclusive() {
    let bbox = BoundingBox {
        min_lat: 0.0,
        min_lon: 0.0,
        max_lat: 10.0,
        max_lon: 10.0,
    };
    assert!(bbox.contains(&Coordinate::new(0.0, 0.0).unwrap()));
    assert!(bbox.contains(&Coordinate::new(10.0, 10.0).unwrap()));
    assert!(!bbox.contains(&Coordinate::new(10.1, 5.0).unwrap()));
}
