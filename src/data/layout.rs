use serde::{Deserialize, Serialize};
use shadow_atlas::{
    FilterMode, LayoutStrategy, ShadowAtlas, SurfaceDescriptor, SurfaceFormat, Viewport,
};

use crate::data::Config;

/// The result of laying out an atlas, written out by `atlasctl layout`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayoutManifest {
    pub atlas: String,
    pub size: (u32, u32),
    pub strategy: StrategyKind,

    /// Shaders multiply filter footprints by this to account for viewports
    /// that were scaled down to fit.
    pub rcp_scale_factor: f32,

    /// `(width, height, 1 / width, 1 / height)`
    pub size_vector: [f32; 4],

    pub surfaces: Vec<SurfaceManifest>,
    pub viewports: Vec<ViewportManifest>,
}

impl LayoutManifest {
    /// Collects the layout of `atlas`, naming viewports after the requests in
    /// `config`. Returns `None` if the atlas has not been laid out.
    pub fn new(config: &Config, atlas: &ShadowAtlas) -> Option<Self> {
        let layout = atlas.current_layout()?;

        let viewports = config
            .requests
            .iter()
            .zip(layout.viewports())
            .map(|(request, viewport)| ViewportManifest {
                name: request.name.clone(),
                requested: request.size,
                viewport: (*viewport).into(),
                scale_bias: atlas.scale_bias(viewport),
            })
            .collect();

        Some(Self {
            atlas: atlas.descriptor().name.clone(),
            size: atlas.size(),
            strategy: layout.strategy().into(),
            rcp_scale_factor: layout.rcp_scale_factor(),
            size_vector: atlas.size_vector(),
            surfaces: atlas.surfaces().iter().map(SurfaceManifest::from).collect(),
            viewports,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Shelf,
    Resized,
}

impl From<LayoutStrategy> for StrategyKind {
    fn from(strategy: LayoutStrategy) -> StrategyKind {
        match strategy {
            LayoutStrategy::Shelf => StrategyKind::Shelf,
            LayoutStrategy::Resized => StrategyKind::Resized,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ViewportManifest {
    pub name: String,
    pub requested: (f32, f32),
    pub viewport: Rect,

    /// Maps `[0, 1]` coordinates onto this viewport in atlas UV space:
    /// `(scale_x, scale_y, bias_x, bias_y)`.
    pub scale_bias: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<Viewport> for Rect {
    fn from(viewport: Viewport) -> Rect {
        Rect {
            x: viewport.x,
            y: viewport.y,
            width: viewport.width,
            height: viewport.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SurfaceManifest {
    pub name: String,
    pub size: (u32, u32),
    pub format: String,
    pub filter_mode: String,
    pub depth_bits: u32,
    pub random_write: bool,
    pub mipmapped: bool,
}

impl From<&SurfaceDescriptor> for SurfaceManifest {
    fn from(surface: &SurfaceDescriptor) -> SurfaceManifest {
        SurfaceManifest {
            name: surface.name.clone(),
            size: surface.size,
            format: format_name(surface.format).to_owned(),
            filter_mode: filter_mode_name(surface.filter_mode).to_owned(),
            depth_bits: surface.depth_bits.bits(),
            random_write: surface.random_write,
            mipmapped: surface.mipmapped,
        }
    }
}

fn format_name(format: SurfaceFormat) -> &'static str {
    match format {
        SurfaceFormat::Shadowmap => "shadowmap",
        SurfaceFormat::Depth => "depth",
        SurfaceFormat::Rg32Float => "rg32-float",
        SurfaceFormat::Rgba32Float => "rgba32-float",
        SurfaceFormat::Rgba32Sint => "rgba32-sint",
    }
}

fn filter_mode_name(filter_mode: FilterMode) -> &'static str {
    match filter_mode {
        FilterMode::Point => "point",
        FilterMode::Bilinear => "bilinear",
        FilterMode::Trilinear => "trilinear",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use shadow_atlas::DepthBits;

    use crate::data::{AtlasConfig, FilterModeConfig, FormatConfig, RequestConfig};

    fn config(size: (u32, u32), requests: &[(&str, f32)]) -> Config {
        Config {
            atlas: AtlasConfig {
                name: String::from("PunctualShadowAtlas"),
                size,
                filter_mode: FilterModeConfig::Bilinear,
                depth_bits: DepthBits::Depth16.bits(),
                format: FormatConfig::Shadowmap,
                moment_shadows: true,
                evsm2_mipped: false,
            },
            requests: requests
                .iter()
                .map(|&(name, side)| RequestConfig {
                    name: name.to_owned(),
                    size: (side, side),
                })
                .collect(),
            file_path: Default::default(),
        }
    }

    #[test]
    fn not_laid_out() {
        let config = config((1024, 1024), &[("spot", 256.0)]);
        let atlas = config.build_atlas().unwrap();

        assert_eq!(LayoutManifest::new(&config, &atlas), None);
    }

    #[test]
    fn names_follow_requests() {
        let config = config((1024, 1024), &[("small", 256.0), ("big", 512.0)]);
        let mut atlas = config.build_atlas().unwrap();
        assert!(atlas.layout(true));

        let manifest = LayoutManifest::new(&config, &atlas).unwrap();

        assert_eq!(manifest.strategy, StrategyKind::Shelf);
        assert_eq!(manifest.rcp_scale_factor, 1.0);
        assert_eq!(manifest.viewports[0].name, "small");
        assert_eq!(manifest.viewports[0].viewport.x, 512.0);
        assert_eq!(manifest.viewports[1].name, "big");
        assert_eq!(manifest.viewports[1].scale_bias, [0.5, 0.5, 0.0, 0.0]);

        assert_eq!(manifest.surfaces.len(), 4);
        assert_eq!(manifest.surfaces[1].name, "PunctualShadowAtlasMoment");
        assert_eq!(manifest.surfaces[1].format, "rgba32-float");
    }

    #[test]
    fn serializes_kebab_case() {
        let config = config((512, 512), &[("sun", 1024.0)]);
        let mut atlas = config.build_atlas().unwrap();
        assert!(atlas.layout(true));

        let manifest = LayoutManifest::new(&config, &atlas).unwrap();
        let json = serde_json::to_value(&manifest).unwrap();

        assert_eq!(json["strategy"], "resized");
        assert_eq!(json["rcp-scale-factor"], 2.0);
        assert_eq!(json["viewports"][0]["viewport"]["width"], 512.0);
    }
}
