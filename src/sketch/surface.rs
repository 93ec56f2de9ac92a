use crate::sketch::model::{Color, Point, StrokeStyle};
use crate::sketch::raster::{clear_pixels, stamp_segment, BrushMask};
use crate::sketch::snapshot::Snapshot;

#[derive(Debug, Clone, PartialEq)]
struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Freehand drawing target. Until [`StrokeSurface::init`] is called every
/// operation is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeSurface {
    buffer: Option<PixelBuffer>,
    style: StrokeStyle,
    mask: BrushMask,
    drawing: bool,
    last_point: Option<(i32, i32)>,
    revision: u64,
}

impl Default for StrokeSurface {
    fn default() -> Self {
        Self::new(StrokeStyle::default())
    }
}

impl StrokeSurface {
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            buffer: None,
            mask: BrushMask::for_width(style.width),
            style,
            drawing: false,
            last_point: None,
            revision: 0,
        }
    }

    /// Allocates a transparent buffer of the given size, discarding any
    /// previous content. Ignored while a stroke is in progress.
    pub fn init(&mut self, width: u32, height: u32) -> bool {
        if self.drawing {
            tracing::debug!(width, height, "surface re-init ignored mid-stroke");
            return false;
        }
        let len = (width as usize) * (height as usize) * 4;
        self.buffer = Some(PixelBuffer {
            width,
            height,
            pixels: vec![0; len],
        });
        self.last_point = None;
        self.revision = self.revision.wrapping_add(1);
        tracing::debug!(width, height, "surface initialised");
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.buffer.as_ref().map(|b| (b.width, b.height))
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn color(&self) -> Color {
        self.style.color
    }

    /// Bumped on every visible change so hosts can skip re-uploading an
    /// unchanged buffer.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_color(&mut self, color: Color) {
        self.style.color = color;
    }

    pub fn begin_stroke(&mut self, point: Point) {
        if self.buffer.is_none() || self.drawing {
            return;
        }
        self.drawing = true;
        self.last_point = Some(point.to_pixel());
    }

    pub fn extend_stroke(&mut self, point: Point) {
        if !self.drawing {
            return;
        }
        let Some(buffer) = self.buffer.as_mut() else {
            return;
        };
        let next = point.to_pixel();
        let start = self.last_point.unwrap_or(next);
        let touched = stamp_segment(
            start,
            next,
            self.style.color,
            &self.mask,
            &mut buffer.pixels,
            buffer.width,
            buffer.height,
        );
        self.last_point = Some(next);
        if touched {
            self.revision = self.revision.wrapping_add(1);
        }
    }

    pub fn end_stroke(&mut self) {
        self.drawing = false;
        self.last_point = None;
    }

    pub fn clear(&mut self) {
        let Some(buffer) = self.buffer.as_mut() else {
            return;
        };
        clear_pixels(&mut buffer.pixels);
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        let buffer = self.buffer.as_ref()?;
        Snapshot::from_pixels(buffer.width, buffer.height, buffer.pixels.clone()).ok()
    }

    pub fn pixels(&self) -> Option<&[u8]> {
        self.buffer.as_ref().map(|b| b.pixels.as_slice())
    }
}
