use crate::geometry::Viewport;

/// An input to the shadow atlas layout routines.
///
/// A request is just the resolution a shadow caster would like to render at.
/// Sizes are not validated: zero or negative sizes produce degenerate
/// viewports, and sizes larger than the atlas push the layout into the resize
/// fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionRequest {
    pub(crate) size: (f32, f32),
}

impl ResolutionRequest {
    #[inline]
    pub fn new(size: (f32, f32)) -> Self {
        Self { size }
    }

    /// A square request, the common case for punctual lights.
    #[inline]
    pub fn square(resolution: f32) -> Self {
        Self::new((resolution, resolution))
    }

    #[inline]
    pub fn size(&self) -> (f32, f32) {
        self.size
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.0
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.1
    }
}

/// Which packing routine produced an [`AtlasLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStrategy {
    /// Every request fit at its requested resolution.
    Shelf,

    /// The shelf pass overflowed, so requests were re-packed and uniformly
    /// scaled down to fit.
    Resized,
}

/// The results from a successful layout pass.
///
/// Viewports are index-aligned with the requests that were reserved, so
/// `viewports()[id.index()]` is the viewport for the request `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasLayout {
    pub(crate) viewports: Vec<Viewport>,
    pub(crate) scale_factor: f32,
    pub(crate) strategy: LayoutStrategy,
}

impl AtlasLayout {
    #[inline]
    pub fn viewports(&self) -> &[Viewport] {
        &self.viewports
    }

    /// The uniform factor every viewport was scaled by. This is `1.0` unless
    /// the resize fallback had to shrink the layout.
    #[inline]
    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    #[inline]
    pub fn rcp_scale_factor(&self) -> f32 {
        1.0 / self.scale_factor
    }

    #[inline]
    pub fn strategy(&self) -> LayoutStrategy {
        self.strategy
    }
}
