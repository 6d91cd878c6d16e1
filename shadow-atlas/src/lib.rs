//! Shadow-atlas is a small library for laying out shadow maps inside a single
//! fixed-size atlas texture. Each frame, every shadow caster reserves the
//! resolution it wants, and the atlas assigns each one a non-overlapping
//! viewport.
//!
//! Layout first packs requests onto shelves, tallest first. If they don't all
//! fit and resizing is allowed, requests are re-packed into a roughly square
//! region and scaled down uniformly until that region fits the atlas. The
//! scale that was applied is exposed so shaders can compensate for the lost
//! resolution.
//!
//! ## Example
//! ```
//! use shadow_atlas::{ResolutionRequest, ShadowAtlas};
//!
//! let mut atlas = ShadowAtlas::new((1024, 1024));
//!
//! // Reserve a viewport for each shadow caster this frame. Keep the returned
//! // IDs around to look up viewports after layout.
//! let sun = atlas.reserve(ResolutionRequest::square(512.0));
//! let spot = atlas.reserve(ResolutionRequest::new((256.0, 128.0)));
//!
//! assert!(atlas.layout(true));
//!
//! let sun_viewport = atlas.viewport(sun).unwrap();
//! let spot_viewport = atlas.viewport(spot).unwrap();
//! assert!(!sun_viewport.intersects(&spot_viewport));
//!
//! // Start over next frame.
//! atlas.clear();
//! ```

mod atlas;
mod geometry;
mod id;
mod packer;
mod surface;
mod types;

pub use atlas::*;
pub use geometry::*;
pub use id::*;
pub use surface::*;
pub use types::*;
