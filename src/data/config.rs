use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use shadow_atlas::{
    AtlasDescriptor, DepthBits, FilterMode, ResolutionRequest, ShadowAtlas, SurfaceFormat,
};
use thiserror::Error;

static CONFIG_FILENAME: &str = "shadow-atlas.toml";

/// The largest atlas dimension accepted, matching the usual GPU limit for 2D
/// textures.
pub const MAX_ATLAS_DIMENSION: u32 = 16384;

/// Describes one shadow atlas and the requests to lay out in it, contained in a
/// shadow-atlas.toml file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    pub atlas: AtlasConfig,

    /// Resolution requests, in the order shadow casters would reserve them.
    #[serde(default)]
    pub requests: Vec<RequestConfig>,

    /// The path that this config came from.
    #[serde(skip)]
    pub file_path: PathBuf,
}

impl Config {
    pub fn read_from_folder_or_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let meta = fs::metadata(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        if meta.is_file() {
            Self::read_from_file(path)
        } else {
            Self::read_from_folder(path)
        }
    }

    pub fn read_from_folder<P: AsRef<Path>>(folder_path: P) -> Result<Self, ConfigError> {
        let folder_path = folder_path.as_ref();
        let file_path = &folder_path.join(CONFIG_FILENAME);

        Self::read_from_file(file_path)
    }

    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        let mut config = Self::from_slice(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_owned(),
            source,
        })?;
        config.file_path = path.to_owned();

        Ok(config)
    }

    fn from_slice(contents: &[u8]) -> Result<Self, toml::de::Error> {
        toml::from_slice(contents)
    }

    pub fn descriptor(&self) -> Result<AtlasDescriptor, ConfigError> {
        let atlas = &self.atlas;

        let depth_bits =
            DepthBits::from_bits(atlas.depth_bits).ok_or_else(|| ConfigError::DepthBits {
                path: self.file_path.clone(),
                bits: atlas.depth_bits,
            })?;

        Ok(AtlasDescriptor {
            name: atlas.name.clone(),
            filter_mode: atlas.filter_mode.into(),
            depth_bits,
            format: atlas.format.into(),
            moment_shadows: atlas.moment_shadows,
            evsm2_mipped: atlas.evsm2_mipped,
        })
    }

    /// Creates the atlas described by this config with every request already
    /// reserved.
    pub fn build_atlas(&self) -> Result<ShadowAtlas, ConfigError> {
        let (width, height) = self.atlas.size;
        let valid = 1..=MAX_ATLAS_DIMENSION;

        if !valid.contains(&width) || !valid.contains(&height) {
            return Err(ConfigError::AtlasSize {
                path: self.file_path.clone(),
                size: self.atlas.size,
            });
        }

        let mut atlas = ShadowAtlas::with_descriptor(self.atlas.size, self.descriptor()?);

        for request in &self.requests {
            atlas.reserve(ResolutionRequest::new(request.size));
        }

        Ok(atlas)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct AtlasConfig {
    /// The name of the atlas. Surfaces backing the atlas are named after it.
    #[serde(default = "default_atlas_name")]
    pub name: String,

    #[serde(default = "default_atlas_size")]
    pub size: (u32, u32),

    #[serde(default)]
    pub filter_mode: FilterModeConfig,

    /// Bits of depth in the main atlas surface: 0, 16, 24, or 32.
    #[serde(default = "default_depth_bits")]
    pub depth_bits: u32,

    #[serde(default)]
    pub format: FormatConfig,

    #[serde(default)]
    pub moment_shadows: bool,

    #[serde(default)]
    pub evsm2_mipped: bool,
}

fn default_atlas_name() -> String {
    String::from("ShadowAtlas")
}

fn default_atlas_size() -> (u32, u32) {
    (4096, 4096)
}

fn default_depth_bits() -> u32 {
    16
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct RequestConfig {
    /// Used to identify this request's viewport in outputs.
    pub name: String,

    /// The requested resolution, in texels.
    pub size: (f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterModeConfig {
    Point,
    Bilinear,
    Trilinear,
}

impl Default for FilterModeConfig {
    fn default() -> Self {
        FilterModeConfig::Bilinear
    }
}

impl From<FilterModeConfig> for FilterMode {
    fn from(config: FilterModeConfig) -> FilterMode {
        match config {
            FilterModeConfig::Point => FilterMode::Point,
            FilterModeConfig::Bilinear => FilterMode::Bilinear,
            FilterModeConfig::Trilinear => FilterMode::Trilinear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatConfig {
    /// Depth with hardware comparison sampling.
    Shadowmap,

    /// Plain depth, sampled as a regular texture.
    Depth,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig::Shadowmap
    }
}

impl From<FormatConfig> for SurfaceFormat {
    fn from(config: FormatConfig) -> SurfaceFormat {
        match config {
            FormatConfig::Shadowmap => SurfaceFormat::Shadowmap,
            FormatConfig::Depth => SurfaceFormat::Depth,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{} in {}", source, path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{} in {}", source, path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error(
        "depth-bits must be 0, 16, 24 or 32, but was {} in {}",
        bits,
        path.display()
    )]
    DepthBits { path: PathBuf, bits: u32 },

    #[error(
        "atlas size {}x{} in {} must be between 1 and {} on each axis",
        size.0,
        size.1,
        path.display(),
        MAX_ATLAS_DIMENSION
    )]
    AtlasSize { path: PathBuf, size: (u32, u32) },
}

impl ConfigError {
    /// Tells whether this ConfigError originated because of a path not
    /// existing.
    pub fn is_not_found(&self) -> bool {
        match self {
            ConfigError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
