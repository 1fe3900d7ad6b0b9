use clap::Args;
use miette::Result;
use tracing::warn;

use crate::commands::ArchiveArgs;

#[derive(Args)]
pub struct FilesArgs {
    #[command(flatten)]
    archive: ArchiveArgs,

    /// Partition name, e.g. `exd`
    partition: String,

    /// Also read each resource header and print its kind and size
    #[arg(long, default_value_t = false)]
    headers: bool,
}

impl FilesArgs {
    pub fn handle(&self) -> Result<()> {
        let sqpack = self.archive.open();
        let partition = sqpack.partition(&self.partition)?;

        for found in partition.resources()? {
            let location = format!("dat{} 0x{:08X}", found.data_file, found.offset);

            if !self.headers {
                println!("{} {location}", found.resource_id);
                continue;
            }

            match partition.header(&found) {
                Ok(header) => println!(
                    "{} {location} {:?} {}",
                    found.resource_id, header.kind, header.uncompressed_size
                ),
                Err(err) => warn!("{}: {err}", found.resource_id),
            }
        }

        Ok(())
    }
}
