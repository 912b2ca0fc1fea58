use super::*;

#[test]
fn defaults_are_valid() {
    let p = Params::default();
    p.validate().unwrap();
    assert_eq!(p.block_size, 40);
    assert_eq!(p.color.to_hex(), "#c896ff");
    assert_eq!(p.extent(), 200.0);
}

#[test]
fn rejected_setters_leave_state_unchanged() {
    let mut p = Params::default();
    assert!(matches!(
        p.set_block_size(0),
        Err(SketchError::InvalidParameter(_))
    ));
    assert!(p.set_density(1.5).is_err());
    assert!(p.set_density(-0.01).is_err());
    assert!(p.set_density(f64::NAN).is_err());
    assert_eq!(p, Params::default());
}

#[test]
fn accepted_setters_apply_immediately() {
    let mut p = Params::default();
    p.set_block_size(80).unwrap();
    p.set_density(0.0).unwrap();
    p.set_density(1.0).unwrap();
    p.set_color(Rgb8::new(1, 2, 3));
    assert_eq!(p.block_size, 80);
    assert_eq!(p.density, 1.0);
    assert_eq!(p.color, Rgb8::new(1, 2, 3));
    assert_eq!(p.extent(), 400.0);
}

#[test]
fn partial_json_fills_defaults() {
    let p: Params = serde_json::from_str(r##"{ "density": 0.25 }"##).unwrap();
    assert_eq!(p.density, 0.25);
    assert_eq!(p.block_size, 40);
    assert!(serde_json::from_str::<Params>(r#"{ "size": 3 }"#).is_err());
}
