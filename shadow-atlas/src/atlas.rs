use crate::{
    geometry::Viewport,
    id::RequestId,
    packer,
    surface::{AtlasDescriptor, SurfaceDescriptor},
    types::{AtlasLayout, LayoutStrategy, ResolutionRequest},
};

/// A fixed-size shadow atlas and the resolution requests to lay out in it.
///
/// Requests are collected each frame with [`reserve`][ShadowAtlas::reserve],
/// assigned viewports with [`layout`][ShadowAtlas::layout] and discarded with
/// [`clear`][ShadowAtlas::clear] before the next frame.
#[derive(Debug, Clone)]
pub struct ShadowAtlas {
    size: (u32, u32),
    descriptor: AtlasDescriptor,
    requests: Vec<ResolutionRequest>,
    layout: Option<AtlasLayout>,
}

impl ShadowAtlas {
    pub fn new(size: (u32, u32)) -> Self {
        Self::with_descriptor(size, AtlasDescriptor::default())
    }

    pub fn with_descriptor(size: (u32, u32), descriptor: AtlasDescriptor) -> Self {
        Self {
            size,
            descriptor,
            requests: Vec::new(),
            layout: None,
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.0
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.1
    }

    #[inline]
    pub fn descriptor(&self) -> &AtlasDescriptor {
        &self.descriptor
    }

    /// The surfaces a host renderer should bind for this atlas at its current
    /// size.
    pub fn surfaces(&self) -> Vec<SurfaceDescriptor> {
        self.descriptor.surfaces(self.size)
    }

    /// Changes the size of the atlas. Any previous layout is discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!(
            "Resizing shadow atlas '{}' from {:?} to {:?}",
            self.descriptor.name,
            self.size,
            (width, height)
        );

        self.size = (width, height);
        self.layout = None;
    }

    /// Resizes the atlas only if `size` differs from its current size.
    /// Returns whether a resize happened.
    pub fn update_size(&mut self, size: (u32, u32)) -> bool {
        if self.size == size {
            return false;
        }

        self.resize(size.0, size.1);
        true
    }

    /// Queues a request for the next layout pass.
    pub fn reserve(&mut self, request: ResolutionRequest) -> RequestId {
        let id = RequestId::new(self.requests.len());
        self.requests.push(request);
        self.layout = None;

        id
    }

    #[inline]
    pub fn requests(&self) -> &[ResolutionRequest] {
        &self.requests
    }

    /// Discards every pending request along with the last layout.
    pub fn clear(&mut self) {
        self.requests.clear();
        self.layout = None;
    }

    /// Assigns a viewport to every pending request.
    ///
    /// Requests are first packed onto shelves at their requested resolution.
    /// If that overflows and `allow_resize` is set, they're re-packed into a
    /// square-ish region and scaled down uniformly to fit, which always
    /// succeeds. Returns `false` only when the shelves overflowed and resizing
    /// wasn't allowed; the atlas has no layout in that case.
    pub fn layout(&mut self, allow_resize: bool) -> bool {
        let atlas_size = (self.size.0 as f32, self.size.1 as f32);

        log::trace!(
            "Laying out {} requests in {}x{} atlas '{}'",
            self.requests.len(),
            self.size.0,
            self.size.1,
            self.descriptor.name
        );

        if let Some(viewports) = packer::shelf_pack(&self.requests, atlas_size) {
            self.layout = Some(AtlasLayout {
                viewports,
                scale_factor: 1.0,
                strategy: LayoutStrategy::Shelf,
            });

            return true;
        }

        if !allow_resize {
            log::debug!(
                "{} requests did not fit in atlas '{}' and resizing is disabled",
                self.requests.len(),
                self.descriptor.name
            );

            self.layout = None;
            return false;
        }

        let layout = self.layout_resize(atlas_size);

        log::debug!(
            "Atlas '{}' overflowed, scaled {} requests by {}",
            self.descriptor.name,
            self.requests.len(),
            layout.scale_factor
        );

        self.layout = Some(layout);
        true
    }

    fn layout_resize(&self, atlas_size: (f32, f32)) -> AtlasLayout {
        let (viewports, bounds) = packer::square_pack(&self.requests);
        let scale_factor = fit_scale(bounds, atlas_size);

        let viewports = viewports
            .iter()
            .map(|viewport| viewport.scaled_within(scale_factor, atlas_size))
            .collect();

        AtlasLayout {
            viewports,
            scale_factor,
            strategy: LayoutStrategy::Resized,
        }
    }

    /// The result of the last successful layout, if it's still valid.
    #[inline]
    pub fn current_layout(&self) -> Option<&AtlasLayout> {
        self.layout.as_ref()
    }

    /// Viewports from the last successful layout, index-aligned with
    /// [`requests`][ShadowAtlas::requests]. Empty if there's no valid layout.
    pub fn viewports(&self) -> &[Viewport] {
        match &self.layout {
            Some(layout) => layout.viewports(),
            None => &[],
        }
    }

    pub fn viewport(&self, id: RequestId) -> Option<Viewport> {
        self.viewports().get(id.index()).copied()
    }

    /// Uniform scale applied by the last layout. `1.0` when nothing was
    /// rescaled.
    pub fn scale_factor(&self) -> f32 {
        self.layout
            .as_ref()
            .map(AtlasLayout::scale_factor)
            .unwrap_or(1.0)
    }

    /// Reciprocal of [`scale_factor`][ShadowAtlas::scale_factor]. Shaders use
    /// it to map filter footprints back to the requested resolution.
    pub fn rcp_scale_factor(&self) -> f32 {
        1.0 / self.scale_factor()
    }

    /// `(width, height, 1 / width, 1 / height)`, the layout shaders expect for
    /// the atlas size constant.
    pub fn size_vector(&self) -> [f32; 4] {
        let width = self.size.0 as f32;
        let height = self.size.1 as f32;

        [width, height, 1.0 / width, 1.0 / height]
    }

    /// Scale and bias that map `[0, 1]` texture coordinates onto `viewport`
    /// within the atlas: `(scale_x, scale_y, bias_x, bias_y)`.
    pub fn scale_bias(&self, viewport: &Viewport) -> [f32; 4] {
        let rcp_width = 1.0 / self.size.0 as f32;
        let rcp_height = 1.0 / self.size.1 as f32;

        [
            viewport.width * rcp_width,
            viewport.height * rcp_height,
            viewport.x * rcp_width,
            viewport.y * rcp_height,
        ]
    }
}

/// Largest uniform scale, no greater than one, that fits `bounds` inside
/// `atlas_size` on both axes.
fn fit_scale(bounds: (f32, f32), atlas_size: (f32, f32)) -> f32 {
    let axis = |extent: f32, available: f32| {
        if extent > 0.0 {
            available / extent
        } else {
            1.0
        }
    };

    // The square packing can fit even when the shelves overflowed. Those
    // layouts keep their requested resolution instead of being enlarged.
    axis(bounds.0, atlas_size.0)
        .min(axis(bounds.1, atlas_size.1))
        .min(1.0)
}

#[cfg(test)]
mod test {
    use super::*;

    use insta::assert_snapshot;

    fn atlas_with(size: (u32, u32), requests: &[(f32, f32)]) -> (ShadowAtlas, Vec<RequestId>) {
        let mut atlas = ShadowAtlas::new(size);
        let ids = requests
            .iter()
            .map(|&size| atlas.reserve(ResolutionRequest::new(size)))
            .collect();

        (atlas, ids)
    }

    fn assert_valid_layout(atlas: &ShadowAtlas) {
        let (width, height) = (atlas.width() as f32, atlas.height() as f32);
        let viewports = atlas.viewports();

        assert_eq!(viewports.len(), atlas.requests().len());

        for (i, a) in viewports.iter().enumerate() {
            assert!(
                a.fits_within(width, height),
                "viewport {} {:?} outside {}x{}",
                i,
                a,
                width,
                height
            );

            for (j, b) in viewports.iter().enumerate().skip(i + 1) {
                assert!(!a.intersects(b), "viewport {} {:?} overlaps {} {:?}", i, a, j, b);
            }
        }
    }

    /// Small deterministic generator for request sets.
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self, range: u32) -> u32 {
            self.0 = self
                .0
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);

            ((self.0 >> 33) % range as u64) as u32
        }
    }

    fn summarize(atlas: &ShadowAtlas) -> String {
        atlas
            .viewports()
            .iter()
            .map(|viewport| format!("{},{}", viewport.x, viewport.y))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn empty_layout_succeeds() {
        let mut atlas = ShadowAtlas::new((1024, 1024));

        assert!(atlas.layout(false));
        assert!(atlas.viewports().is_empty());
        assert_eq!(atlas.rcp_scale_factor(), 1.0);
    }

    #[test]
    fn five_512s_in_1024_atlas_rescale() {
        let (mut atlas, _) = atlas_with((1024, 1024), &[(512.0, 512.0); 5]);

        assert!(!atlas.layout(false));
        assert!(atlas.current_layout().is_none());

        assert!(atlas.layout(true));
        assert_valid_layout(&atlas);

        let layout = atlas.current_layout().unwrap();
        assert_eq!(layout.strategy(), LayoutStrategy::Resized);
        assert!(atlas.scale_factor() < 1.0);
        assert!((atlas.rcp_scale_factor() - 1.5).abs() < 1e-5);
    }

    #[test]
    fn ten_256s_in_2048_atlas_fit() {
        let (mut atlas, ids) = atlas_with((2048, 2048), &[(256.0, 256.0); 10]);

        assert!(atlas.layout(true));
        assert_valid_layout(&atlas);

        assert_eq!(atlas.current_layout().unwrap().strategy(), LayoutStrategy::Shelf);
        assert_eq!(atlas.rcp_scale_factor(), 1.0);

        assert_eq!(
            atlas.viewport(ids[9]),
            Some(Viewport::new(256.0, 256.0, 256.0, 256.0))
        );
    }

    #[test]
    fn equal_sizes_keep_reservation_order() {
        let (mut atlas, ids) = atlas_with((1024, 1024), &[(256.0, 256.0); 7]);

        assert!(atlas.layout(false));
        assert_snapshot!(summarize(&atlas), @"0,0 256,0 512,0 768,0 0,256 256,256 512,256");

        let placed: Vec<_> = ids
            .iter()
            .map(|&id| {
                let viewport = atlas.viewport(id).unwrap();
                (viewport.y, viewport.x)
            })
            .collect();

        let mut sorted = placed.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(placed, sorted);
    }

    #[test]
    fn equal_sizes_keep_order_among_mixed_sizes() {
        let (mut atlas, ids) = atlas_with(
            (1024, 1024),
            &[(128.0, 128.0), (512.0, 512.0), (128.0, 128.0), (128.0, 128.0)],
        );

        assert!(atlas.layout(false));

        let xs: Vec<_> = [ids[0], ids[2], ids[3]]
            .iter()
            .map(|&id| atlas.viewport(id).unwrap().x)
            .collect();
        assert_eq!(xs, vec![512.0, 640.0, 768.0]);
    }

    #[test]
    fn layout_is_idempotent() {
        let (mut atlas, _) = atlas_with(
            (1024, 1024),
            &[(512.0, 256.0), (128.0, 128.0), (700.0, 300.0), (64.0, 900.0)],
        );

        assert!(atlas.layout(true));
        let first = atlas.current_layout().cloned();

        assert!(atlas.layout(true));
        assert_eq!(atlas.current_layout().cloned(), first);
    }

    #[test]
    fn request_order_is_not_sorted() {
        let (mut atlas, _) = atlas_with((1024, 1024), &[(64.0, 64.0), (512.0, 512.0)]);

        assert!(atlas.layout(true));
        assert_eq!(
            atlas.requests(),
            &[
                ResolutionRequest::new((64.0, 64.0)),
                ResolutionRequest::new((512.0, 512.0))
            ]
        );
    }

    #[test]
    fn oversized_request_is_scaled_down() {
        let (mut atlas, ids) = atlas_with((1024, 1024), &[(4096.0, 2048.0)]);

        assert!(!atlas.layout(false));
        assert!(atlas.layout(true));
        assert_valid_layout(&atlas);

        assert_eq!(atlas.scale_factor(), 0.25);
        assert_eq!(atlas.rcp_scale_factor(), 4.0);
        assert_eq!(
            atlas.viewport(ids[0]),
            Some(Viewport::new(0.0, 0.0, 1024.0, 512.0))
        );
    }

    #[test]
    fn fallback_fits_many_mixed_requests() {
        let sizes: Vec<(f32, f32)> = (0..40)
            .map(|i| {
                let side = [1024.0, 512.0, 256.0, 128.0, 300.0][i % 5];
                (side, side * 0.5 + 64.0)
            })
            .collect();
        let (mut atlas, _) = atlas_with((2048, 1024), &sizes);

        assert!(atlas.layout(true));
        assert_valid_layout(&atlas);
        assert_eq!(
            atlas.current_layout().unwrap().strategy(),
            LayoutStrategy::Resized
        );
        assert!(atlas.rcp_scale_factor() > 1.0);
    }

    #[test]
    fn rescaled_layouts_stay_in_bounds_without_overlap() {
        let mut rng = Lcg(0x5eed);
        let mut resized = 0;

        for _ in 0..500 {
            let size = (64 + rng.next(4001), 64 + rng.next(4001));
            let count = 1 + rng.next(40) as usize;

            let requests: Vec<(f32, f32)> = (0..count)
                .map(|_| {
                    let width = (1 + rng.next(2000)) as f32 + rng.next(4) as f32 * 0.25;
                    let height = (1 + rng.next(2000)) as f32 + rng.next(4) as f32 * 0.25;
                    (width, height)
                })
                .collect();

            let (mut atlas, _) = atlas_with(size, &requests);
            assert!(atlas.layout(true));
            assert_valid_layout(&atlas);

            if atlas.current_layout().unwrap().strategy() == LayoutStrategy::Resized {
                resized += 1;
            }
        }

        assert!(resized > 0);
    }

    #[test]
    fn fit_scale_never_upscales() {
        assert_eq!(fit_scale((512.0, 256.0), (1024.0, 1024.0)), 1.0);
        assert_eq!(fit_scale((2048.0, 1024.0), (1024.0, 1024.0)), 0.5);
        assert_eq!(fit_scale((1024.0, 4096.0), (1024.0, 1024.0)), 0.25);
    }

    #[test]
    fn fit_scale_ignores_empty_axes() {
        assert_eq!(fit_scale((0.0, 0.0), (1024.0, 1024.0)), 1.0);
        assert_eq!(fit_scale((0.0, 2048.0), (1024.0, 1024.0)), 0.5);
    }

    #[test]
    fn zero_sized_requests_are_degenerate() {
        let (mut atlas, ids) = atlas_with((256, 256), &[(0.0, 0.0), (0.0, 0.0)]);

        assert!(atlas.layout(false));
        assert_eq!(atlas.viewport(ids[1]).unwrap().area(), 0.0);
    }

    #[test]
    fn clear_discards_requests() {
        let (mut atlas, ids) = atlas_with((512, 512), &[(128.0, 128.0)]);

        assert!(atlas.layout(true));
        atlas.clear();

        assert!(atlas.requests().is_empty());
        assert_eq!(atlas.viewport(ids[0]), None);
    }

    #[test]
    fn resize_invalidates_layout() {
        let (mut atlas, ids) = atlas_with((512, 512), &[(512.0, 512.0), (512.0, 512.0)]);

        assert!(!atlas.layout(false));

        atlas.resize(1024, 512);
        assert!(atlas.layout(false));
        assert_eq!(atlas.viewport(ids[1]).unwrap().x, 512.0);

        atlas.resize(2048, 2048);
        assert_eq!(atlas.viewport(ids[1]), None);
    }

    #[test]
    fn update_size_only_when_changed() {
        let mut atlas = ShadowAtlas::new((1024, 1024));
        atlas.reserve(ResolutionRequest::square(128.0));
        assert!(atlas.layout(true));

        assert!(!atlas.update_size((1024, 1024)));
        assert!(atlas.current_layout().is_some());

        assert!(atlas.update_size((2048, 1024)));
        assert_eq!(atlas.size(), (2048, 1024));
        assert!(atlas.current_layout().is_none());
    }

    #[test]
    fn size_vector_and_scale_bias() {
        let atlas = ShadowAtlas::new((1024, 512));

        assert_eq!(atlas.size_vector(), [1024.0, 512.0, 1.0 / 1024.0, 1.0 / 512.0]);
        assert_eq!(
            atlas.scale_bias(&Viewport::new(512.0, 256.0, 256.0, 128.0)),
            [0.25, 0.25, 0.5, 0.5]
        );
    }
}
