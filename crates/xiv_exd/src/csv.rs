//! CSV export of localized tables.
//!
//! One file per language, `<dir>/<table>[.<lang>].csv`, one line per row starting with the id.

use std::{
    borrow::Cow,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::{info, instrument};

use crate::{
    error::Result,
    read::{LocalizedTable, Table},
    types::{Language, Row},
};

/// Quote a value if it holds a comma, a quote or a line break
pub fn quote(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Write `rows` as CSV lines
pub fn write_csv<'r, W: Write>(w: &mut W, rows: impl IntoIterator<Item = &'r Row>) -> std::io::Result<()> {
    for row in rows {
        write!(w, "{}", row.id)?;
        for value in &row.values {
            write!(w, ",{}", quote(&value.to_string()))?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// File name of a table export relative to the output directory
pub fn csv_file_name(table: &str, language: Language) -> String {
    match language {
        Language::None => format!("{table}.csv"),
        language => format!("{table}.{}.csv", language.suffix()),
    }
}

/// Write one localized table below `dir`
#[instrument(skip(dir, table), fields(table = %table.name(), language = %table.language()), err(level = "debug"))]
pub fn export_localized(dir: &Path, table: &LocalizedTable) -> Result<PathBuf> {
    let path = dir.join(csv_file_name(table.name(), table.language()));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let rows = table.rows()?;
    let mut w = BufWriter::new(File::create(&path)?);
    write_csv(&mut w, rows.iter().copied())?;
    w.flush()?;

    info!("wrote {} rows to {}", rows.len(), path.display());
    Ok(path)
}

/// Write every language of `table` below `dir`, returning the files written
pub fn export(dir: impl AsRef<Path>, table: &Table) -> Result<Vec<PathBuf>> {
    table
        .localized_tables()?
        .map(|localized| export_localized(dir.as_ref(), localized))
        .collect()
}
