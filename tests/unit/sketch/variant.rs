use super::*;

const ALL: [Preset; 5] = [
    Preset::Bloom,
    Preset::Scatter,
    Preset::Mosaic,
    Preset::Triad,
    Preset::Erode,
];

#[test]
fn every_preset_validates() {
    for p in ALL {
        Variant::preset(p).validate().unwrap();
    }
}

#[test]
fn caps_are_100_or_200() {
    for p in ALL {
        let cap = Variant::preset(p).cap;
        assert!(cap == 100 || cap == 200, "{p:?} cap {cap}");
    }
}

#[test]
fn only_erode_shrinks() {
    for p in ALL {
        let v = Variant::preset(p);
        assert_eq!(v.direction == Direction::Shrink, p == Preset::Erode);
    }
    assert!(!Variant::preset(Preset::Erode).reveal_all_on_complete);
}

#[test]
fn triad_limits_anchors() {
    assert_eq!(Variant::preset(Preset::Triad).max_anchors(), Some(3));
    assert_eq!(Variant::preset(Preset::Bloom).max_anchors(), None);
}

#[test]
fn bad_settings_are_rejected() {
    let base = Variant::default();
    let bad = [
        Variant { cap: 0, ..base },
        Variant {
            shape: BlockShape::Range { min: 1.5, max: 0.5 },
            ..base
        },
        Variant {
            jitter: Some(-0.1),
            ..base
        },
        Variant {
            arming: Arming::Exact(0),
            ..base
        },
    ];
    for v in bad {
        assert!(v.validate().is_err(), "{v:?}");
    }
}

#[test]
fn variant_json_shape() {
    let v = Variant::preset(Preset::Triad);
    let json = serde_json::to_value(v).unwrap();
    assert_eq!(json["shape"]["kind"], "range");
    assert_eq!(json["arming"]["kind"], "exact");
    assert_eq!(json["arming"]["anchors"], 3);
    assert_eq!(json["direction"], "grow");
    let back: Variant = serde_json::from_value(json).unwrap();
    assert_eq!(back, v);
}
