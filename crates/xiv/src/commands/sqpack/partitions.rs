use clap::Args;
use miette::Result;
use owo_colors::{OwoColorize, Stream::Stdout};

use crate::commands::ArchiveArgs;

#[derive(Args)]
pub struct PartitionsArgs {
    #[command(flatten)]
    archive: ArchiveArgs,
}

impl PartitionsArgs {
    pub fn handle(&self) -> Result<()> {
        let sqpack = self.archive.open();

        for partition in sqpack.partitions()?.values() {
            println!(
                "{:<12} {:>2} data files {:>8} resources",
                partition.name().if_supports_color(Stdout, |name| name.bold()),
                partition.data_file_count(),
                partition.len()?
            );
        }

        Ok(())
    }
}
