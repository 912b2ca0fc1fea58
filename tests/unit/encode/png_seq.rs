use super::*;
use crate::foundation::core::Fps;

fn out_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("png_seq_unit").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 4,
        height: 2,
        fps: Fps::default(),
    }
}

fn red_frame() -> FrameRGBA {
    FrameRGBA {
        width: 4,
        height: 2,
        data: [255u8, 0, 0, 255].repeat(8),
        premultiplied: true,
    }
}

#[test]
fn frames_are_numbered_and_decodable() {
    let dir = out_dir("numbered");
    let mut sink = PngSequenceSink::new(PngSequenceOpts::new(&dir));
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &red_frame()).unwrap();
    sink.push_frame(FrameIndex(1), &red_frame()).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.written().len(), 2);
    let first = dir.join("frame_00000.png");
    assert_eq!(sink.written()[0], first);
    let img = image::open(&first).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (4, 2));
    assert_eq!(img.get_pixel(3, 1).0, [255, 0, 0, 255]);
}

#[test]
fn out_of_order_frames_are_rejected() {
    let dir = out_dir("order");
    let mut sink = PngSequenceSink::new(PngSequenceOpts::new(&dir));
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(3), &red_frame()).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &red_frame()).is_err());
    assert!(sink.push_frame(FrameIndex(2), &red_frame()).is_err());
}

#[test]
fn abort_removes_written_frames() {
    let dir = out_dir("abort");
    let mut sink = PngSequenceSink::new(PngSequenceOpts::new(&dir));
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &red_frame()).unwrap();
    assert!(dir.join("frame_00000.png").exists());
    sink.abort().unwrap();
    assert!(!dir.join("frame_00000.png").exists());
    assert!(sink.end().is_err());
}
