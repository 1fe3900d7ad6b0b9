use std::path::PathBuf;

use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use tracing::info;
use xiv_tex::Texture;

use crate::commands::ArchiveArgs;

#[derive(clap::Subcommand)]
pub enum TexCommands {
    /// Print the format and size of a texture as JSON
    Info(InfoArgs),
    /// Write the raw pixel data of one mipmap
    Mipmap(MipmapArgs),
}

impl TexCommands {
    pub fn handle(&self) -> Result<()> {
        match self {
            TexCommands::Info(info) => info.handle(),
            TexCommands::Mipmap(mipmap) => mipmap.handle(),
        }
    }
}

#[derive(Args)]
pub struct InfoArgs {
    #[command(flatten)]
    archive: ArchiveArgs,

    /// Texture path, e.g. `chara/equipment/e0001/texture/v01_c0101e0001_top_d.tex`
    path: String,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let sqpack = self.archive.open();
        let texture = Texture::load(&sqpack, &self.path)?;

        println!("{}", serde_json::to_string(&texture.info()?).into_diagnostic()?);
        println!("{} mipmaps", texture.mipmaps().len());

        Ok(())
    }
}

#[derive(Args)]
pub struct MipmapArgs {
    #[command(flatten)]
    archive: ArchiveArgs,

    /// Texture path
    path: String,

    /// Mipmap level, 0 is the largest
    #[arg(short, long, default_value_t = 0)]
    index: usize,

    /// A target file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,
}

impl MipmapArgs {
    pub fn handle(&self) -> Result<()> {
        let sqpack = self.archive.open();
        let texture = Texture::load(&sqpack, &self.path)?;
        let data = texture.mipmap(self.index)?;

        std::fs::write(&self.output, data)
            .into_diagnostic()
            .context(format!("writing {}", self.output.display()))?;
        info!("wrote {} bytes to {}", data.len(), self.output.display());

        Ok(())
    }
}
