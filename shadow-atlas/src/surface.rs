//! Descriptions of the GPU surfaces backing a shadow atlas.
//!
//! The atlas never allocates anything itself. A host renderer reads these
//! descriptors and binds surfaces of `width x height` texels to write shadow
//! maps into.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Point,
    Bilinear,
    Trilinear,
}

impl Default for FilterMode {
    fn default() -> Self {
        FilterMode::Bilinear
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthBits {
    None,
    Depth16,
    Depth24,
    Depth32,
}

impl DepthBits {
    pub fn bits(&self) -> u32 {
        match self {
            DepthBits::None => 0,
            DepthBits::Depth16 => 16,
            DepthBits::Depth24 => 24,
            DepthBits::Depth32 => 32,
        }
    }

    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0 => Some(DepthBits::None),
            16 => Some(DepthBits::Depth16),
            24 => Some(DepthBits::Depth24),
            32 => Some(DepthBits::Depth32),
            _ => None,
        }
    }
}

impl Default for DepthBits {
    fn default() -> Self {
        DepthBits::Depth16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceFormat {
    /// Depth surface sampled with hardware comparison.
    Shadowmap,
    Depth,
    Rg32Float,
    Rgba32Float,
    Rgba32Sint,
}

impl Default for SurfaceFormat {
    fn default() -> Self {
        SurfaceFormat::Shadowmap
    }
}

/// Everything a host renderer needs to allocate one surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceDescriptor {
    pub name: String,
    pub size: (u32, u32),
    pub format: SurfaceFormat,
    pub filter_mode: FilterMode,
    pub depth_bits: DepthBits,
    pub random_write: bool,
    pub mipmapped: bool,
}

impl SurfaceDescriptor {
    fn moment(name: String, size: (u32, u32), format: SurfaceFormat) -> Self {
        Self {
            name,
            size,
            format,
            filter_mode: FilterMode::Point,
            depth_bits: DepthBits::None,
            random_write: true,
            mipmapped: false,
        }
    }
}

/// How an atlas should be backed on the GPU.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AtlasDescriptor {
    pub name: String,
    pub filter_mode: FilterMode,
    pub depth_bits: DepthBits,
    pub format: SurfaceFormat,

    /// Allocate the moment and summed-area surfaces used by moment shadows.
    pub moment_shadows: bool,

    /// Allocate a mipmapped two-channel moment surface for EVSM blurring.
    /// Ignored when `moment_shadows` is set.
    pub evsm2_mipped: bool,
}

impl AtlasDescriptor {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Lists the surfaces to allocate for an atlas of the given size, main
    /// depth surface first.
    pub fn surfaces(&self, size: (u32, u32)) -> Vec<SurfaceDescriptor> {
        let mut surfaces = vec![SurfaceDescriptor {
            name: self.name.clone(),
            size,
            format: self.format,
            filter_mode: self.filter_mode,
            depth_bits: self.depth_bits,
            random_write: false,
            mipmapped: false,
        }];

        if self.moment_shadows {
            surfaces.push(SurfaceDescriptor::moment(
                format!("{}Moment", self.name),
                size,
                SurfaceFormat::Rgba32Float,
            ));
            surfaces.push(SurfaceDescriptor::moment(
                format!("{}IntermediateSummedArea", self.name),
                size,
                SurfaceFormat::Rgba32Sint,
            ));
            surfaces.push(SurfaceDescriptor::moment(
                format!("{}SummedAreaFinal", self.name),
                size,
                SurfaceFormat::Rgba32Sint,
            ));
        } else if self.evsm2_mipped {
            let mut moment = SurfaceDescriptor::moment(
                format!("{}Moment", self.name),
                size,
                SurfaceFormat::Rg32Float,
            );
            moment.mipmapped = true;

            surfaces.push(moment);
        }

        surfaces
    }
}
