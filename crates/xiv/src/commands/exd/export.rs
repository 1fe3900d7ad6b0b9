use std::path::PathBuf;

use clap::Args;
use miette::Result;
use tracing::info;
use xiv_exd::{csv, DataTables};

use crate::commands::{ArchiveArgs, Batch};

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    archive: ArchiveArgs,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Tables to export, every table when omitted
    tables: Vec<String>,
}

impl ExportArgs {
    pub fn handle(&self) -> Result<()> {
        let sqpack = self.archive.open();
        let tables = DataTables::new(&sqpack);

        let mut batch = Batch::default();
        if self.tables.is_empty() {
            for table in tables.tables()? {
                batch.record(table.name(), csv::export(&self.directory, table));
            }
        } else {
            for name in &self.tables {
                let written = tables
                    .table(name)
                    .and_then(|table| csv::export(&self.directory, table));
                batch.record(name, written);
            }
        }

        info!("exported to {}", self.directory.display());
        batch.finish("tables")
    }
}
