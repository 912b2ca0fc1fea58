use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(60, 0).is_err());
    let fps = Fps::new(60, 1).unwrap();
    assert_eq!(fps, Fps::default());
}

#[test]
fn canvas_contains_is_half_open() {
    let c = Canvas::new(100, 50).unwrap();
    assert!(c.contains(Point::new(0.0, 0.0)));
    assert!(c.contains(Point::new(99.5, 49.5)));
    assert!(!c.contains(Point::new(100.0, 10.0)));
    assert!(!c.contains(Point::new(10.0, -0.1)));
    assert!(Canvas::new(0, 10).is_err());
}

#[test]
fn canvas_rejects_sides_beyond_raster_limit() {
    assert!(Canvas::new(Canvas::MAX_SIDE, 1).is_ok());
    assert!(Canvas::new(70_000, 400).is_err());
    assert!(Canvas::new(400, Canvas::MAX_SIDE + 1).is_err());
}

#[test]
fn hex_colors_parse_with_or_without_hash() {
    let c = Rgb8::from_hex("#c896ff").unwrap();
    assert_eq!(c, Rgb8::new(0xc8, 0x96, 0xff));
    assert_eq!(Rgb8::from_hex("C896FF").unwrap(), c);
    assert_eq!(c.to_hex(), "#c896ff");
    assert_eq!(c.to_rgba8(), [0xc8, 0x96, 0xff, 255]);
}

#[test]
fn bad_hex_colors_are_invalid_parameters() {
    for bad in ["", "#fff", "#12345g", "#1234567", "#ééé"] {
        let err = Rgb8::from_hex(bad).unwrap_err();
        assert!(matches!(err, SketchError::InvalidParameter(_)), "{bad}");
    }
}

#[test]
fn color_serializes_as_hex_string() {
    let json = serde_json::to_string(&Rgb8::new(1, 2, 255)).unwrap();
    assert_eq!(json, "\"#0102ff\"");
    let back: Rgb8 = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Rgb8::new(1, 2, 255));
    assert!(serde_json::from_str::<Rgb8>("\"blue\"").is_err());
}
