use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::{
    FrameSink, SinkConfig, check_frame_size, flatten_premul_over_bg_to_opaque_rgba8, frame_len,
};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{SketchError, SketchResult};
use crate::render::backend::FrameRGBA;

/// Options for [`PngSequenceSink`].
#[derive(Clone, Debug)]
pub struct PngSequenceOpts {
    /// Directory receiving the frames. Created when missing.
    pub out_dir: PathBuf,
    /// File name prefix; frames are written as `{prefix}_{index:05}.png`.
    pub prefix: String,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
}

impl PngSequenceOpts {
    /// Write `frame_00000.png`, `frame_00001.png`, ... into `out_dir`.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            prefix: "frame".to_owned(),
            bg_rgba: [255, 255, 255, 255],
        }
    }
}

/// Sink writing one PNG per captured frame.
pub struct PngSequenceSink {
    opts: PngSequenceOpts,
    cfg: Option<SinkConfig>,
    scratch: Vec<u8>,
    written: Vec<PathBuf>,
    last_idx: Option<FrameIndex>,
}

impl PngSequenceSink {
    /// Create a sink for `opts`.
    pub fn new(opts: PngSequenceOpts) -> Self {
        Self {
            opts,
            cfg: None,
            scratch: Vec::new(),
            written: Vec::new(),
            last_idx: None,
        }
    }

    /// Path of frame `idx`.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        frame_path(&self.opts.out_dir, &self.opts.prefix, idx)
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

fn frame_path(dir: &Path, prefix: &str, idx: FrameIndex) -> PathBuf {
    dir.join(format!("{prefix}_{:05}.png", idx.0))
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> SketchResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(SketchError::validation(
                "png sequence width/height must be non-zero",
            ));
        }
        if self.opts.prefix.is_empty() {
            return Err(SketchError::validation("png sequence prefix must not be empty"));
        }
        std::fs::create_dir_all(&self.opts.out_dir).with_context(|| {
            format!(
                "failed to create output directory '{}'",
                self.opts.out_dir.display()
            )
        })?;

        self.scratch = vec![0u8; frame_len(&cfg)];
        self.written.clear();
        self.last_idx = None;
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SketchResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| SketchError::capture("png sequence sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(SketchError::capture(
                "png sequence sink received out-of-order frame index",
            ));
        }
        check_frame_size(cfg, frame)?;

        let pixels: &[u8] = if frame.premultiplied {
            flatten_premul_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;
            &self.scratch
        } else {
            &frame.data
        };

        let path = self.frame_path(idx);
        image::save_buffer_with_format(
            &path,
            pixels,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;

        self.last_idx = Some(idx);
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> SketchResult<()> {
        if self.cfg.take().is_none() {
            return Err(SketchError::capture("png sequence sink not started"));
        }
        tracing::info!(
            frames = self.written.len(),
            dir = %self.opts.out_dir.display(),
            "png sequence written"
        );
        Ok(())
    }

    fn abort(&mut self) -> SketchResult<()> {
        self.cfg = None;
        for path in self.written.drain(..) {
            std::fs::remove_file(&path)
                .with_context(|| format!("remove partial frame '{}'", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png_seq.rs"]
mod tests;
