use std::io::BufWriter;

use fs_err as fs;
use shadow_atlas::Viewport;

use crate::{
    image::{Image, Pixel},
    options::{GlobalOptions, RenderOptions},
};

use super::load_and_lay_out;

static BACKGROUND: Pixel = Pixel::new(24, 24, 28, 255);

static PALETTE: &[Pixel] = &[
    Pixel::new(230, 97, 1, 255),
    Pixel::new(253, 184, 99, 255),
    Pixel::new(178, 171, 210, 255),
    Pixel::new(94, 60, 153, 255),
    Pixel::new(102, 194, 165, 255),
    Pixel::new(141, 160, 203, 255),
];

pub fn render(global: GlobalOptions, options: RenderOptions) -> anyhow::Result<()> {
    let (_config, atlas) = load_and_lay_out(&global, !options.no_resize)?;

    let mut image = Image::new_filled_rgba8(atlas.size(), BACKGROUND);

    for (index, viewport) in atlas.viewports().iter().enumerate() {
        let (min, max) = pixel_bounds(viewport);
        let color = PALETTE[index % PALETTE.len()];

        image.fill_rect(min, max, color);
        image.outline_rect(min, max, color.darken(0.5));
    }

    let file = BufWriter::new(fs::File::create(&options.output)?);
    image.encode_png(file)?;

    let (width, height) = image.size();
    log::info!(
        "Rendered {} viewports into {}x{} image {}",
        atlas.viewports().len(),
        width,
        height,
        options.output.display()
    );

    Ok(())
}

/// The texels covered by `viewport`, rounded outward. Negative coordinates
/// clamp to zero.
fn pixel_bounds(viewport: &Viewport) -> ((u32, u32), (u32, u32)) {
    let (max_x, max_y) = viewport.max();

    (
        (viewport.x.floor() as u32, viewport.y.floor() as u32),
        (max_x.ceil() as u32, max_y.ceil() as u32),
    )
}
