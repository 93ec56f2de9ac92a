use crate::sketch::model::Point;
use crate::sketch::snapshot::Snapshot;

/// Inclusive pixel bounds of drawn content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x as f32 + self.max_x as f32) / 2.0,
            (self.min_y as f32 + self.max_y as f32) / 2.0,
        )
    }
}

/// Scans every pixel and returns the tight box around all pixels whose alpha
/// is above zero, or `None` when the snapshot is entirely transparent.
pub fn extract(snapshot: &Snapshot) -> Option<BoundingBox> {
    let width = snapshot.width() as usize;
    if width == 0 {
        return None;
    }

    let mut bounds: Option<BoundingBox> = None;
    for (y, row) in snapshot.pixels().chunks_exact(width * 4).enumerate() {
        for (x, px) in row.chunks_exact(4).enumerate() {
            if px[3] == 0 {
                continue;
            }
            let (x, y) = (x as u32, y as u32);
            bounds = Some(match bounds {
                None => BoundingBox {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                },
                Some(b) => BoundingBox {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y.min(y),
                    max_x: b.max_x.max(x),
                    max_y: b.max_y.max(y),
                },
            });
        }
    }
    bounds
}
