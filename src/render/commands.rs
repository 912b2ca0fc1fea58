use crate::foundation::core::{Point, Rgb8};

/// Fill one axis-aligned rectangle centered on `center`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectCommand {
    /// Rectangle center in canvas pixels.
    pub center: Point,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// Fill color.
    pub color: Rgb8,
}

impl RectCommand {
    /// Rectangle in canvas coordinates.
    pub fn rect(&self) -> kurbo::Rect {
        kurbo::Rect::from_center_size(self.center, (self.width, self.height))
    }
}

/// Everything a renderer needs to paint one frame: a background fill, then rectangles in order.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameCommands {
    /// Background fill color.
    pub background: Rgb8,
    /// Rectangles, painted in order.
    pub rects: Vec<RectCommand>,
}

impl FrameCommands {
    /// A frame with only a background.
    pub fn empty(background: Rgb8) -> Self {
        Self {
            background,
            rects: Vec::new(),
        }
    }
}
