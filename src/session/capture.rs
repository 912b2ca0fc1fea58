use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::SketchResult;
use crate::render::backend::FrameRGBA;

/// Result of finalizing the capture slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// The sink was ended after receiving `frames` frames.
    Finalized {
        /// Frames pushed to the sink.
        frames: u64,
    },
    /// No recording was active; nothing happened.
    Unavailable,
}

struct Recording {
    sink: Box<dyn FrameSink>,
    next: FrameIndex,
}

/// Holds at most one active recording.
#[derive(Default)]
pub(crate) struct CaptureSlot {
    active: Option<Recording>,
}

impl CaptureSlot {
    pub(crate) fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Begin `sink`. Returns `false` (and drops `sink` untouched) when already recording.
    pub(crate) fn start(&mut self, mut sink: Box<dyn FrameSink>, cfg: SinkConfig) -> SketchResult<bool> {
        if self.active.is_some() {
            return Ok(false);
        }
        sink.begin(cfg)?;
        self.active = Some(Recording {
            sink,
            next: FrameIndex(0),
        });
        Ok(true)
    }

    /// Push one frame. A failing sink is aborted and removed.
    pub(crate) fn push(&mut self, frame: &FrameRGBA) -> SketchResult<()> {
        let Some(rec) = self.active.as_mut() else {
            return Ok(());
        };
        if let Err(e) = rec.sink.push_frame(rec.next, frame) {
            self.abort();
            return Err(e);
        }
        rec.next = FrameIndex(rec.next.0 + 1);
        Ok(())
    }

    pub(crate) fn finalize(&mut self) -> SketchResult<FinalizeOutcome> {
        let Some(mut rec) = self.active.take() else {
            tracing::debug!("finalize requested without an active recording");
            return Ok(FinalizeOutcome::Unavailable);
        };
        rec.sink.end()?;
        tracing::info!(frames = rec.next.0, "recording finalized");
        Ok(FinalizeOutcome::Finalized { frames: rec.next.0 })
    }

    /// Tear down the active recording without finalizing it.
    pub(crate) fn abort(&mut self) {
        let Some(mut rec) = self.active.take() else {
            return;
        };
        match rec.sink.abort() {
            Ok(()) => tracing::info!(frames = rec.next.0, "recording aborted"),
            Err(e) => tracing::warn!(error = %e, "failed to abort recording"),
        }
    }
}
