pub mod extract;
pub mod files;
pub mod partitions;
pub mod view;

#[derive(clap::Subcommand)]
pub enum SqPackCommands {
    /// List the partitions of an archive
    Partitions(partitions::PartitionsArgs),
    /// List the resources of a partition
    Files(files::FilesArgs),
    /// Decode a single resource and describe it
    View(view::ViewArgs),
    /// Extract resources into a directory
    Extract(extract::ExtractArgs),
}

impl SqPackCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            SqPackCommands::Partitions(partitions) => partitions.handle(),
            SqPackCommands::Files(files) => files.handle(),
            SqPackCommands::View(view) => view.handle(),
            SqPackCommands::Extract(extract) => extract.handle(),
        }
    }
}
