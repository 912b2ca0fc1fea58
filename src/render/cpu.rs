use crate::foundation::core::{Canvas, Rgb8};
use crate::foundation::error::{SketchError, SketchResult};
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::commands::FrameCommands;

/// CPU backend powered by `vello_cpu`.
///
/// The render context and target pixmap are reused across frames of the same size.
#[derive(Default)]
pub struct CpuBackend {
    ctx: Option<vello_cpu::RenderContext>,
    pixmap: Option<vello_cpu::Pixmap>,
}

impl CpuBackend {
    /// Create a backend with no cached surfaces.
    pub fn new() -> Self {
        Self::default()
    }

    fn surfaces(
        &mut self,
        width: u16,
        height: u16,
    ) -> (vello_cpu::RenderContext, vello_cpu::Pixmap) {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let pixmap = match self.pixmap.take() {
            Some(p) if p.width() == width && p.height() == height => p,
            _ => vello_cpu::Pixmap::new(width, height),
        };
        (ctx, pixmap)
    }
}

impl RenderBackend for CpuBackend {
    fn render(&mut self, canvas: Canvas, commands: &FrameCommands) -> SketchResult<FrameRGBA> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| SketchError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| SketchError::render("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(SketchError::render("canvas width/height must be non-zero"));
        }

        let (mut ctx, mut pixmap) = self.surfaces(width, height);

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(paint(commands.background));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));

        for cmd in &commands.rects {
            let r = cmd.rect();
            ctx.set_paint(paint(cmd.color));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1));
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        let out = FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        };
        self.ctx = Some(ctx);
        self.pixmap = Some(pixmap);
        Ok(out)
    }
}

fn paint(c: Rgb8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}
