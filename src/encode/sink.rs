use std::sync::{Arc, Mutex, MutexGuard};

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{SketchError, SketchResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] when recording starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming captured frames.
///
/// `begin` is called once, `push_frame` once per animation tick in strictly increasing
/// `FrameIndex` order, then exactly one of `end` (animation completed) or `abort` (recording
/// cancelled by a reset).
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> SketchResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SketchResult<()>;
    /// Finalize the output artifact.
    fn end(&mut self) -> SketchResult<()>;
    /// Tear down without producing an artifact.
    fn abort(&mut self) -> SketchResult<()> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Captured {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    end_calls: u32,
    abort_calls: u32,
}

/// Shared view of what an [`InMemorySink`] received.
///
/// Stays readable after the sink has been handed to a session.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCapture(Arc<Mutex<Captured>>);

impl InMemoryCapture {
    fn lock(&self) -> MutexGuard<'_, Captured> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Configuration received in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.lock().cfg.clone()
    }

    /// Number of frames pushed.
    pub fn frame_count(&self) -> usize {
        self.lock().frames.len()
    }

    /// Copies of the pushed frames in push order.
    pub fn frames(&self) -> Vec<(FrameIndex, FrameRGBA)> {
        self.lock().frames.clone()
    }

    /// How many times `end` was called.
    pub fn end_calls(&self) -> u32 {
        self.lock().end_calls
    }

    /// How many times `abort` was called.
    pub fn abort_calls(&self) -> u32 {
        self.lock().abort_calls
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    shared: InMemoryCapture,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the captured data.
    pub fn capture(&self) -> InMemoryCapture {
        self.shared.clone()
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SketchResult<()> {
        let mut c = self.shared.lock();
        c.cfg = Some(cfg);
        c.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SketchResult<()> {
        self.shared.lock().frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> SketchResult<()> {
        self.shared.lock().end_calls += 1;
        Ok(())
    }

    fn abort(&mut self) -> SketchResult<()> {
        self.shared.lock().abort_calls += 1;
        Ok(())
    }
}

/// Flatten premultiplied RGBA8 over an opaque background into opaque RGBA8.
pub(crate) fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> SketchResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(SketchError::validation(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = bg_rgba[0] as u16;
    let bg_g = bg_rgba[1] as u16;
    let bg_b = bg_rgba[2] as u16;

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        let r = s[0] as u16 + mul_div255_u16(bg_r, inv);
        let g = s[1] as u16 + mul_div255_u16(bg_g, inv);
        let b = s[2] as u16 + mul_div255_u16(bg_b, inv);

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

/// Byte length of one tightly packed RGBA8 frame of `cfg`'s size.
pub(crate) fn frame_len(cfg: &SinkConfig) -> usize {
    (cfg.width as usize) * (cfg.height as usize) * 4
}

/// Check that `frame` matches the size announced in `begin`.
pub(crate) fn check_frame_size(cfg: &SinkConfig, frame: &FrameRGBA) -> SketchResult<()> {
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(SketchError::capture(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != frame_len(cfg) {
        return Err(SketchError::capture(
            "frame.data size mismatch with width*height*4",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
