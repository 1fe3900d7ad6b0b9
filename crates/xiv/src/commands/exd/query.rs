use clap::Args;
use itertools::Itertools;
use miette::{miette, Result};
use xiv_exd::{DataTables, Language, LocalizedTable, Row, Table};

use crate::commands::ArchiveArgs;

fn print_row(row: &Row) {
    println!("{}\t{}", row.id, row.values.iter().join("\t"));
}

/// The requested language, or the first one the table has
fn localized<'t, 'a>(table: &'t Table<'a>, language: Option<Language>) -> Result<&'t LocalizedTable<'a>> {
    let language = match language {
        Some(language) => language,
        None => table
            .languages()?
            .first()
            .copied()
            .ok_or_else(|| miette!("table {} has no languages", table.name()))?,
    };
    Ok(table.localized(language)?)
}

#[derive(Args)]
pub struct TablesArgs {
    #[command(flatten)]
    archive: ArchiveArgs,
}

impl TablesArgs {
    pub fn handle(&self) -> Result<()> {
        let sqpack = self.archive.open();
        let tables = DataTables::new(&sqpack);

        for table in tables.tables()? {
            println!("{}", table.name());
        }

        Ok(())
    }
}

#[derive(Args)]
pub struct LanguagesArgs {
    #[command(flatten)]
    archive: ArchiveArgs,

    /// Table name as listed in root.exl
    table: String,
}

impl LanguagesArgs {
    pub fn handle(&self) -> Result<()> {
        let sqpack = self.archive.open();
        let tables = DataTables::new(&sqpack);

        let languages = tables.table(&self.table)?.languages()?;
        println!("{}", languages.iter().join(" "));

        Ok(())
    }
}

#[derive(Args)]
pub struct RowsArgs {
    #[command(flatten)]
    archive: ArchiveArgs,

    /// Table name as listed in root.exl
    table: String,

    /// Language to read, the first language of the table when omitted
    #[arg(short, long)]
    language: Option<Language>,
}

impl RowsArgs {
    pub fn handle(&self) -> Result<()> {
        let sqpack = self.archive.open();
        let tables = DataTables::new(&sqpack);
        let table = localized(tables.table(&self.table)?, self.language)?;

        for row in table.rows()? {
            print_row(row);
        }

        Ok(())
    }
}

#[derive(Args)]
pub struct RowArgs {
    #[command(flatten)]
    archive: ArchiveArgs,

    /// Table name as listed in root.exl
    table: String,

    /// Row id
    id: u32,

    /// Language to read, the first language of the table when omitted
    #[arg(short, long)]
    language: Option<Language>,
}

impl RowArgs {
    pub fn handle(&self) -> Result<()> {
        let sqpack = self.archive.open();
        let tables = DataTables::new(&sqpack);
        let table = localized(tables.table(&self.table)?, self.language)?;

        print_row(table.row(self.id)?);

        Ok(())
    }
}
