use shadow_atlas::{ResolutionRequest, ShadowAtlas};

fn main() {
    env_logger::init();

    let mut atlas = ShadowAtlas::new((1024, 1024));
    for _ in 0..5 {
        atlas.reserve(ResolutionRequest::square(512.0));
    }

    let fits = atlas.layout(false);
    println!("Fits without resizing: {}", fits);

    atlas.layout(true);
    println!("Rcp scale factor: {}", atlas.rcp_scale_factor());
    println!("Layout: {:#?}", atlas.viewports());
}
