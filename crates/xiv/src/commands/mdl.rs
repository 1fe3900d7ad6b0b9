use std::{fs::File, io::Write, path::PathBuf};

use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use tracing::info;
use xiv_mdl::Model;

use crate::commands::ArchiveArgs;

#[derive(clap::Subcommand)]
pub enum MdlCommands {
    /// Write the viewer JSON of a model
    Json(JsonArgs),
}

impl MdlCommands {
    pub fn handle(&self) -> Result<()> {
        match self {
            MdlCommands::Json(json) => json.handle(),
        }
    }
}

#[derive(Args)]
pub struct JsonArgs {
    #[command(flatten)]
    archive: ArchiveArgs,

    /// Model path, e.g. `chara/equipment/e0001/model/c0101e0001_top.mdl`
    path: String,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl JsonArgs {
    pub fn handle(&self) -> Result<()> {
        let sqpack = self.archive.open();
        let model = Model::load(&sqpack, &self.path)?;
        let view = model.view()?;

        match &self.output {
            Some(output) => {
                let mut f = File::create(output)
                    .into_diagnostic()
                    .context(format!("creating {}", output.display()))?;
                serde_json::to_writer(&mut f, &view).into_diagnostic()?;
                f.flush().into_diagnostic()?;
                info!("wrote {}", output.display());
            }
            None => println!("{}", serde_json::to_string(&view).into_diagnostic()?),
        }

        Ok(())
    }
}
