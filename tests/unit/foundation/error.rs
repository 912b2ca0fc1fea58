use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SketchError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SketchError::invalid_parameter("x")
            .to_string()
            .contains("invalid parameter:")
    );
    assert!(
        SketchError::capture("x")
            .to_string()
            .contains("capture error:")
    );
    assert!(SketchError::render("x").to_string().contains("render error:"));
    assert!(
        SketchError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SketchError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
