use super::*;
use crate::animation::driver::SessionState;
use crate::encode::sink::InMemorySink;

const MINIMAL: &str = r#"{ "canvas": { "width": 64, "height": 48 } }"#;

fn cfg(json: &str) -> SketchConfig {
    SketchConfig::from_reader(json.as_bytes()).unwrap()
}

fn small() -> SketchConfig {
    SketchConfig {
        params: Params {
            block_size: 4,
            density: 1.0,
            ..Params::default()
        },
        grow_speed: 5.0,
        anchors: vec![Point::new(20.0, 20.0), Point::new(40.0, 30.0)],
        ..cfg(MINIMAL)
    }
}

#[test]
fn defaults_fill_missing_fields() {
    let c = cfg(MINIMAL);
    assert_eq!(c.fps, Fps { num: 60, den: 1 });
    assert_eq!(c.seed, 0);
    assert_eq!(c.variant, VariantDef::default());
    assert_eq!(c.params, Params::default());
    assert_eq!(c.grow_speed, 2.0);
    assert_eq!(c.background, Rgb8::new(255, 255, 255));
    assert_eq!(c.reserved_band_px, 0);
    assert!(c.anchors.is_empty());
    assert_eq!(c.max_ticks, 100_000);
}

#[test]
fn full_document_parses() {
    let c = cfg(r##"{
        "canvas": { "width": 320, "height": 200 },
        "fps": { "num": 30, "den": 1 },
        "seed": 7,
        "variant": { "preset": "scatter", "cap": 50, "jitter": 0 },
        "params": { "block_size": 10, "density": 0.5, "color": "#102030" },
        "grow_speed": 1.5,
        "background": "#000000",
        "reserved_band_px": 40,
        "anchors": [ { "x": 100, "y": 100 } ],
        "max_ticks": 500
    }"##);
    let v = c.variant.resolve();
    assert_eq!(v.cap, 50);
    assert_eq!(v.jitter, None);
    assert_eq!(v.shape, Variant::preset(Preset::Scatter).shape);
    assert_eq!(c.params.color, Rgb8::new(0x10, 0x20, 0x30));
    assert_eq!(c.anchors, vec![Point::new(100.0, 100.0)]);
    assert_eq!(c.opts().reserved_band_px, 40);
}

#[test]
fn rejects_bad_documents() {
    let bad = [
        r#"{ "canvas": { "width": 0, "height": 48 } }"#,
        r#"{ "canvas": { "width": 70000, "height": 400 } }"#,
        r#"{ "canvas": { "width": 64, "height": 48 }, "params": { "density": 1.5 } }"#,
        r#"{ "canvas": { "width": 64, "height": 48 }, "params": { "block_size": 0 } }"#,
        r#"{ "canvas": { "width": 64, "height": 48 }, "grow_speed": 0 }"#,
        r#"{ "canvas": { "width": 64, "height": 48 }, "reserved_band_px": 48 }"#,
        r#"{ "canvas": { "width": 64, "height": 48 }, "max_ticks": 0 }"#,
        r#"{ "canvas": { "width": 64, "height": 48 }, "variant": { "cap": 0 } }"#,
        r#"{ "canvas": { "width": 64, "height": 48 }, "variant": { "preset": "nope" } }"#,
        r#"{ "canvas": { "width": 64, "height": 48 }, "unknown": 1 }"#,
        r#"{ "canvas": { "width": 64, "height": 48 }, "background": "white" }"#,
    ];
    for json in bad {
        assert!(SketchConfig::from_reader(json.as_bytes()).is_err(), "{json}");
    }
}

#[test]
fn serde_errors_are_reported_as_serde() {
    let err = SketchConfig::from_reader("{".as_bytes()).unwrap_err();
    assert!(matches!(err, SketchError::Serde(_)));
}

#[test]
fn overrides_apply_on_top_of_preset() {
    let def = VariantDef {
        preset: Preset::Erode,
        direction: Some(Direction::Grow),
        arming: Some(Arming::Exact(2)),
        ..VariantDef::default()
    };
    let v = def.resolve();
    assert_eq!(v.direction, Direction::Grow);
    assert_eq!(v.arming, Arming::Exact(2));
    assert!(!v.reveal_all_on_complete);
}

#[test]
fn scripted_run_records_until_completion() {
    let c = small();
    let mut s = c.session().unwrap();
    let sink = InMemorySink::new();
    let capture = sink.capture();
    s.start_recording(Box::new(sink)).unwrap();

    let report = c.run(&mut s, |_| Ok(ControlFlow::Continue(()))).unwrap();
    assert_eq!(report.ticks, 4);
    assert_eq!(report.completions, 1);
    assert_eq!(report.finalized, Some(FinalizeOutcome::Finalized { frames: 4 }));
    assert!(!report.stopped);
    assert_eq!(s.clusters().len(), 2);
    assert_eq!(s.state(), SessionState::Idle);
    assert_eq!(capture.frame_count(), 4);
    assert_eq!(capture.end_calls(), 1);
}

#[test]
fn scripted_run_can_stop_early() {
    let c = small();
    let mut s = c.session().unwrap();
    let mut seen = 0;
    let report = c
        .run(&mut s, |_| {
            seen += 1;
            Ok(if seen == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        })
        .unwrap();
    assert!(report.stopped);
    assert_eq!(report.ticks, 2);
    assert_eq!(s.state(), SessionState::Animating);
}

#[test]
fn immediate_variant_animates_each_anchor() {
    let c = SketchConfig {
        variant: VariantDef {
            preset: Preset::Mosaic,
            ..VariantDef::default()
        },
        ..small()
    };
    let mut s = c.session().unwrap();
    let report = c.run(&mut s, |_| Ok(ControlFlow::Continue(()))).unwrap();
    assert_eq!(report.completions, 2);
    assert_eq!(report.ticks, 8);
    assert_eq!(report.finalized, Some(FinalizeOutcome::Unavailable));
}

#[test]
fn refused_anchors_are_counted() {
    let c = SketchConfig {
        reserved_band_px: 10,
        anchors: vec![
            Point::new(20.0, 5.0),
            Point::new(500.0, 20.0),
            Point::new(20.0, 20.0),
        ],
        ..small()
    };
    let mut s = c.session().unwrap();
    let report = c.run(&mut s, |_| Ok(ControlFlow::Continue(()))).unwrap();
    assert_eq!(report.ignored_anchors, 2);
    assert_eq!(s.clusters().len(), 1);
}

#[test]
fn scripted_run_errors() {
    let empty = SketchConfig {
        anchors: Vec::new(),
        ..small()
    };
    let mut s = empty.session().unwrap();
    assert!(empty.run(&mut s, |_| Ok(ControlFlow::Continue(()))).is_err());

    let triad = SketchConfig {
        variant: VariantDef {
            preset: Preset::Triad,
            ..VariantDef::default()
        },
        ..small()
    };
    let mut s = triad.session().unwrap();
    let err = triad
        .run(&mut s, |_| Ok(ControlFlow::Continue(())))
        .unwrap_err();
    assert!(err.to_string().contains("WrongAnchorCount"));

    let bounded = SketchConfig {
        max_ticks: 3,
        ..small()
    };
    let mut s = bounded.session().unwrap();
    let err = bounded
        .run(&mut s, |_| Ok(ControlFlow::Continue(())))
        .unwrap_err();
    assert!(err.to_string().contains("max_ticks"));
}
