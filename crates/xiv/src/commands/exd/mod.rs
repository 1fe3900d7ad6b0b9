pub mod export;
pub mod query;

#[derive(clap::Subcommand)]
pub enum ExdCommands {
    /// List the tables named in root.exl
    Tables(query::TablesArgs),
    /// List the languages of a table
    Languages(query::LanguagesArgs),
    /// Print every row of a table
    Rows(query::RowsArgs),
    /// Print a single row of a table
    Row(query::RowArgs),
    /// Export tables as CSV files
    Export(export::ExportArgs),
}

impl ExdCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            ExdCommands::Tables(tables) => tables.handle(),
            ExdCommands::Languages(languages) => languages.handle(),
            ExdCommands::Rows(rows) => rows.handle(),
            ExdCommands::Row(row) => row.handle(),
            ExdCommands::Export(export) => export.handle(),
        }
    }
}
