/// A rectangle in atlas-local coordinates, measured in texels.
///
/// Viewports are real-valued because the resize fallback scales them by an
/// arbitrary factor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn max(&self) -> (f32, f32) {
        (self.x + self.width, self.y + self.height)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Whether the two viewports share any area. Viewports that only touch
    /// along an edge, or that have zero area, do not intersect.
    pub fn intersects(&self, other: &Viewport) -> bool {
        let (self_max_x, self_max_y) = self.max();
        let (other_max_x, other_max_y) = other.max();

        let x_overlap = self.x.max(other.x) < self_max_x.min(other_max_x);
        let y_overlap = self.y.max(other.y) < self_max_y.min(other_max_y);

        x_overlap && y_overlap
    }

    /// Whether this viewport lies entirely inside `[0, width] x [0, height]`.
    pub fn fits_within(&self, width: f32, height: f32) -> bool {
        let (max_x, max_y) = self.max();

        self.x >= 0.0 && self.y >= 0.0 && max_x <= width && max_y <= height
    }

    /// Scales the viewport uniformly around the atlas origin, clamped to
    /// `bounds`.
    ///
    /// Both edges are scaled rather than position and size, so viewports that
    /// shared an edge before scaling still share it exactly afterwards.
    pub(crate) fn scaled_within(&self, factor: f32, bounds: (f32, f32)) -> Viewport {
        let (max_x, max_y) = self.max();
        let (x, width) = scale_span(self.x, max_x, factor, bounds.0);
        let (y, height) = scale_span(self.y, max_y, factor, bounds.1);

        Viewport {
            x,
            y,
            width,
            height,
        }
    }
}

/// Scales the span `[min, max]` by `factor`, clamped to `limit`, and returns
/// its new start and length. The length is rounded down as needed so that
/// `start + length` never lands past the scaled end.
fn scale_span(min: f32, max: f32, factor: f32, limit: f32) -> (f32, f32) {
    let start = (min * factor).min(limit);
    let end = (max * factor).min(limit);

    let mut length = end - start;
    while length > 0.0 && start + length > end {
        length = f32::from_bits(length.to_bits() - 1);
    }

    (start, length)
}
