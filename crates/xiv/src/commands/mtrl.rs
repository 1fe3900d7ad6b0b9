use clap::Args;
use miette::{IntoDiagnostic, Result};
use xiv_mtrl::Material;

use crate::commands::ArchiveArgs;

#[derive(clap::Subcommand)]
pub enum MtrlCommands {
    /// Print the textures of a material
    Textures(TexturesArgs),
}

impl MtrlCommands {
    pub fn handle(&self) -> Result<()> {
        match self {
            MtrlCommands::Textures(textures) => textures.handle(),
        }
    }
}

#[derive(Args)]
pub struct TexturesArgs {
    #[command(flatten)]
    archive: ArchiveArgs,

    /// Material path, e.g. `chara/equipment/e0001/material/v0001/mt_c0101e0001_top_a.mtrl`
    path: String,

    /// Print every texture path instead of the diffuse, specular and normal roles
    #[arg(long, default_value_t = false)]
    all: bool,
}

impl TexturesArgs {
    pub fn handle(&self) -> Result<()> {
        let sqpack = self.archive.open();
        let material = Material::load(&sqpack, &self.path)?;

        if self.all {
            for texture in material.textures()? {
                println!("{texture}");
            }
            return Ok(());
        }

        println!("{}", serde_json::to_string(&material.texture_roles()?).into_diagnostic()?);
        Ok(())
    }
}
