use std::io::{self, BufWriter, Write};

use anyhow::anyhow;
use fs_err as fs;

use crate::{
    data::LayoutManifest,
    options::{GlobalOptions, LayoutOptions},
};

use super::load_and_lay_out;

pub fn layout(global: GlobalOptions, options: LayoutOptions) -> anyhow::Result<()> {
    let (config, atlas) = load_and_lay_out(&global, !options.no_resize)?;

    let manifest = LayoutManifest::new(&config, &atlas)
        .ok_or_else(|| anyhow!("atlas '{}' has no layout", config.atlas.name))?;

    match &options.output {
        Some(path) => {
            let mut file = BufWriter::new(fs::File::create(path)?);
            serde_json::to_writer_pretty(&mut file, &manifest)?;
            file.flush()?;

            log::info!(
                "Wrote layout of {} viewports to {}",
                manifest.viewports.len(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, &manifest)?;
            writeln!(handle)?;
        }
    }

    Ok(())
}
