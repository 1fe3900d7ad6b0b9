//! Lazily loaded tables on top of a [`ResourceSource`].
//!
//! Nothing is read until asked for. The table list, each schema, and each row page are
//! decoded once and kept for the lifetime of the [`DataTables`].

use std::{
    collections::BTreeMap,
    fmt::{self, Debug},
    rc::Rc,
};

use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use tracing::{debug, info, instrument};
use xiv_sqpack::{cursor::ByteCursor, decoder, ResourceSource};

use crate::{
    error::{Error, Result},
    exd::decode_page,
    exh::{decode_schema, Schema},
    exl::{parse_table_list, ROOT_PATH},
    types::{Language, Row},
};

/// Every table listed in `exd/root.exl`
pub struct DataTables<'a> {
    source: &'a dyn ResourceSource,
    tables: OnceCell<IndexMap<String, Table<'a>>>,
}

impl Debug for DataTables<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.tables.get() {
            Some(tables) => write!(f, "DataTables({} tables)", tables.len()),
            None => f.write_str("DataTables(not loaded)"),
        }
    }
}

impl<'a> DataTables<'a> {
    /// Read tables out of `source`, typically an [`xiv_sqpack::SqPack`]
    pub fn new(source: &'a dyn ResourceSource) -> Self {
        DataTables {
            source,
            tables: OnceCell::new(),
        }
    }

    /// All tables in list order
    pub fn tables(&self) -> Result<impl Iterator<Item = &Table<'a>>> {
        Ok(self.table_map()?.values())
    }

    /// Get a table by name
    pub fn table(&self, name: &str) -> Result<&Table<'a>> {
        self.table_map()?
            .get(name)
            .ok_or_else(|| Error::TableNotFound(name.to_owned()))
    }

    fn table_map(&self) -> Result<&IndexMap<String, Table<'a>>> {
        self.tables.get_or_try_init(|| self.load())
    }

    #[instrument(skip(self), err)]
    fn load(&self) -> Result<IndexMap<String, Table<'a>>> {
        let list = self.source.blob(ROOT_PATH)?;
        let tables = parse_table_list(&list)
            .into_iter()
            .map(|name| (name.clone(), Table::new(self.source, name)))
            .collect::<IndexMap<_, _>>();

        info!("found {} tables", tables.len());
        Ok(tables)
    }
}

/// One table and its localized variants
pub struct Table<'a> {
    source: &'a dyn ResourceSource,
    name: String,
    schema: OnceCell<Rc<Schema>>,
    localized: OnceCell<IndexMap<Language, LocalizedTable<'a>>>,
}

impl Debug for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Table({})", self.name)
    }
}

impl<'a> Table<'a> {
    fn new(source: &'a dyn ResourceSource, name: String) -> Self {
        Table {
            source,
            name,
            schema: OnceCell::new(),
            localized: OnceCell::new(),
        }
    }

    /// Table name as listed in `exd/root.exl`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the schema file
    pub fn schema_path(&self) -> String {
        format!("exd/{}.exh", self.name)
    }

    /// The decoded schema, shared by every page of every language
    pub fn schema(&self) -> Result<&Schema> {
        self.shared_schema().map(|schema| &**schema)
    }

    fn shared_schema(&self) -> Result<&Rc<Schema>> {
        self.schema.get_or_try_init(|| self.load_schema())
    }

    #[instrument(skip(self), fields(table = %self.name), err(level = "debug"))]
    fn load_schema(&self) -> Result<Rc<Schema>> {
        let data = self.source.blob(&self.schema_path())?;
        let schema = decoder::read(ByteCursor::new(&data), decode_schema)?;
        debug!(
            "{} members, {} pages, languages {:?}",
            schema.members.len(),
            schema.pages.len(),
            schema.languages
        );
        Ok(Rc::new(schema))
    }

    /// Languages the table is available in
    pub fn languages(&self) -> Result<Vec<Language>> {
        Ok(self.localized_map()?.keys().copied().collect())
    }

    /// All localized variants
    pub fn localized_tables(&self) -> Result<impl Iterator<Item = &LocalizedTable<'a>>> {
        Ok(self.localized_map()?.values())
    }

    /// The variant for `language`
    pub fn localized(&self, language: Language) -> Result<&LocalizedTable<'a>> {
        self.localized_map()?
            .get(&language)
            .ok_or_else(|| Error::LanguageNotFound {
                table: self.name.clone(),
                language,
            })
    }

    fn localized_map(&self) -> Result<&IndexMap<Language, LocalizedTable<'a>>> {
        self.localized.get_or_try_init(|| {
            let schema = self.shared_schema()?;
            Ok(schema
                .languages
                .iter()
                .map(|&language| {
                    let table = LocalizedTable::new(self.source, &self.name, language, schema.clone());
                    (language, table)
                })
                .collect())
        })
    }
}

/// A table in one language, made of row pages
pub struct LocalizedTable<'a> {
    name: String,
    language: Language,
    pages: BTreeMap<u32, Page<'a>>,
}

impl Debug for LocalizedTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "LocalizedTable({}, {}, pages={:?})",
            self.name,
            self.language,
            self.pages.keys().collect::<Vec<_>>()
        )
    }
}

impl<'a> LocalizedTable<'a> {
    fn new(source: &'a dyn ResourceSource, name: &str, language: Language, schema: Rc<Schema>) -> Self {
        let pages = schema
            .pages
            .iter()
            .map(|page| {
                let path = page_path(name, page.start, language);
                (page.start, Page::new(source, path, page.start, page.row_count, schema.clone()))
            })
            .collect();

        LocalizedTable {
            name: name.to_owned(),
            language,
            pages,
        }
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Language of this variant
    pub fn language(&self) -> Language {
        self.language
    }

    /// Pages ordered by start row id
    pub fn pages(&self) -> impl Iterator<Item = &Page<'a>> {
        self.pages.values()
    }

    /// The page that would hold row `id`: the one with the greatest start not above it
    pub fn page_for(&self, id: u32) -> Option<&Page<'a>> {
        self.pages.range(..=id).next_back().map(|(_, page)| page)
    }

    /// Look up a single row, decoding only the page that holds it
    pub fn row(&self, id: u32) -> Result<&Row> {
        let not_found = || Error::RowNotFound {
            table: self.name.clone(),
            language: self.language,
            id,
        };

        let page = self.page_for(id).ok_or_else(not_found)?;
        page.rows()?.get(&id).ok_or_else(not_found)
    }

    /// Every row of every page in page order
    pub fn rows(&self) -> Result<Vec<&Row>> {
        let mut rows = Vec::new();
        for page in self.pages() {
            rows.extend(page.rows()?.values());
        }
        Ok(rows)
    }
}

/// Path of a row page, `exd/<name>_<start>[_<lang>].exd`
pub fn page_path(name: &str, start: u32, language: Language) -> String {
    match language {
        Language::None => format!("exd/{name}_{start}.exd"),
        language => format!("exd/{name}_{start}_{}.exd", language.suffix()),
    }
}

/// One row page file
pub struct Page<'a> {
    source: &'a dyn ResourceSource,
    path: String,
    start: u32,
    row_count: u32,
    schema: Rc<Schema>,
    rows: OnceCell<IndexMap<u32, Row>>,
}

impl Debug for Page<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Page({}, start={}, rows={})", self.path, self.start, self.row_count)
    }
}

impl<'a> Page<'a> {
    fn new(source: &'a dyn ResourceSource, path: String, start: u32, row_count: u32, schema: Rc<Schema>) -> Self {
        Page {
            source,
            path,
            start,
            row_count,
            schema,
            rows: OnceCell::new(),
        }
    }

    /// Path of the page file
    pub fn path(&self) -> &str {
        &self.path
    }

    /// First row id
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Row count declared by the schema
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Decoded rows keyed by id, loaded on first use
    pub fn rows(&self) -> Result<&IndexMap<u32, Row>> {
        self.rows.get_or_try_init(|| self.load())
    }

    #[instrument(skip(self), fields(page = %self.path), err(level = "debug"))]
    fn load(&self) -> Result<IndexMap<u32, Row>> {
        let data = self.source.blob(&self.path)?;
        let rows = decoder::read(ByteCursor::new(&data), |d| decode_page(d, &self.schema))?;
        debug!("decoded {} rows", rows.len());
        Ok(rows.into_iter().map(|row| (row.id, row)).collect())
    }
}
