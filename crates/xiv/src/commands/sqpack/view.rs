use clap::Args;
use miette::Result;
use owo_colors::{OwoColorize, Stream::Stdout};
use xiv_sqpack::ResourceId;

use crate::commands::ArchiveArgs;

#[derive(Args)]
pub struct ViewArgs {
    #[command(flatten)]
    archive: ArchiveArgs,

    /// Either `partition-DIRHASH-FILEHASH` or a path such as `exd/root.exl`
    #[arg(value_name = "RESOURCE")]
    id: ResourceId,

    /// Print the tree of decoding steps, including the step that failed
    #[arg(long, default_value_t = false)]
    trace: bool,
}

impl ViewArgs {
    pub fn handle(&self) -> Result<()> {
        let sqpack = self.archive.open();
        let found = sqpack.resource_ref(&self.id)?;
        println!(
            "{} in dat{} at 0x{:08X}",
            found.resource_id.if_supports_color(Stdout, |id| id.bold()),
            found.data_file,
            found.offset
        );

        let decoded = if self.trace {
            let (decoded, trace) = sqpack.trace_resource(&self.id)?;
            if let Some(trace) = trace {
                print!("{trace}");
            }
            decoded?
        } else {
            sqpack.resource(&self.id)?
        };

        println!("{:?}", decoded.header);
        println!("{:?}", decoded.resource);

        Ok(())
    }
}
