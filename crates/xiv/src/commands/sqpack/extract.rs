use std::path::PathBuf;

use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use tracing::info;
use xiv_sqpack::dump::{dump, DumpOptions};

use crate::commands::{ArchiveArgs, Batch};

#[derive(Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    archive: ArchiveArgs,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Only extract these partitions, every partition when omitted
    #[arg(short, long, value_name = "NAME")]
    partition: Vec<String>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// Also write the model sub-blocks that are not interpreted
    #[arg(long, default_value_t = false)]
    extra_buffers: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        std::fs::create_dir_all(&self.directory)
            .into_diagnostic()
            .context(format!("creating {}", self.directory.display()))?;

        let sqpack = self.archive.open();
        let options = DumpOptions::builder()
            .overwrite(self.overwrite)
            .extra_buffers(self.extra_buffers)
            .build();

        let mut batch = Batch::default();
        for partition in sqpack.partitions()?.values() {
            if !self.partition.is_empty() && !self.partition.iter().any(|name| name == partition.name()) {
                continue;
            }

            info!("extracting {}", partition.name());
            for found in partition.resources()? {
                let written = partition
                    .decode(&found)
                    .and_then(|decoded| dump(&self.directory, &found.resource_id, &decoded.resource, &options));

                if let Some(written) = batch.record(&found.resource_id, written) {
                    for path in written {
                        info!("writing {}", path.display());
                    }
                }
            }
        }

        batch.finish("resources")
    }
}
