use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "A tool to lay out and inspect shadow map atlases")]
pub struct Options {
    #[structopt(flatten)]
    pub global: GlobalOptions,

    #[structopt(subcommand)]
    pub command: Subcommand,
}

#[derive(Debug, StructOpt)]
pub struct GlobalOptions {
    /// The atlas config to use, either a shadow-atlas.toml file or a folder
    /// containing one. Defaults to the current working directory.
    #[structopt(long = "config", global = true)]
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, StructOpt)]
pub enum Subcommand {
    /// Lay out every request in the atlas and write the resulting viewports as
    /// JSON.
    Layout(LayoutOptions),

    /// Lay out every request in the atlas and render the viewports to a PNG
    /// image the size of the atlas.
    Render(RenderOptions),
}

#[derive(Debug, StructOpt)]
pub struct LayoutOptions {
    /// Fail instead of scaling viewports down when requests don't fit in the
    /// atlas at their requested resolution.
    #[structopt(long)]
    pub no_resize: bool,

    /// Where to write the layout. Defaults to stdout.
    #[structopt(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, StructOpt)]
pub struct RenderOptions {
    /// Fail instead of scaling viewports down when requests don't fit in the
    /// atlas at their requested resolution.
    #[structopt(long)]
    pub no_resize: bool,

    /// The path to write the PNG image to.
    #[structopt(long)]
    pub output: PathBuf,
}
