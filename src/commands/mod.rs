mod layout;
mod render;

pub use layout::*;
pub use render::*;

use std::env;

use anyhow::{bail, Context};
use shadow_atlas::ShadowAtlas;

use crate::{data::Config, options::GlobalOptions};

/// Reads the config named by the global options and lays out its atlas.
fn load_and_lay_out(
    global: &GlobalOptions,
    allow_resize: bool,
) -> anyhow::Result<(Config, ShadowAtlas)> {
    let fuzzy_config_path = match &global.config_path {
        Some(path) => path.clone(),
        None => env::current_dir().context("could not read the current directory")?,
    };

    let config = match Config::read_from_folder_or_file(&fuzzy_config_path) {
        Ok(config) => config,
        Err(err) if err.is_not_found() => {
            bail!(
                "no shadow atlas config found at {}",
                fuzzy_config_path.display()
            );
        }
        Err(err) => return Err(err.into()),
    };

    log::trace!(
        "Loaded atlas '{}' with {} requests from {}",
        config.atlas.name,
        config.requests.len(),
        config.file_path.display()
    );

    let mut atlas = config.build_atlas()?;

    if !atlas.layout(allow_resize) {
        bail!(
            "{} requests do not fit in the {}x{} atlas '{}' at their requested resolution",
            config.requests.len(),
            atlas.width(),
            atlas.height(),
            config.atlas.name
        );
    }

    if atlas.scale_factor() < 1.0 {
        log::warn!(
            "Requests did not fit in atlas '{}', viewports were scaled by {}",
            config.atlas.name,
            atlas.scale_factor()
        );
    }

    Ok((config, atlas))
}
