//! Error types that can be emitted from this library

use std::io;

use miette::Diagnostic;
use thiserror::Error;

use crate::types::Language;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`xiv_sqpack::error::Error`]
    #[error(transparent)]
    SqPack(#[from] xiv_sqpack::error::Error),

    /// table {0} is not listed in root.exl
    #[error("table {0} is not listed in root.exl")]
    TableNotFound(String),

    /// table has no data for the requested language
    #[error("table {table} has no {language:?} data")]
    LanguageNotFound {
        /// Table name
        table: String,
        /// Requested language
        language: Language,
    },

    /// no page of the table holds the requested row
    #[error("row {id} not found in table {table} ({language:?})")]
    RowNotFound {
        /// Table name
        table: String,
        /// Language of the table
        language: Language,
        /// Requested row id
        id: u32,
    },
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::SqPack(err.into())
    }
}

impl From<binrw::Error> for Error {
    fn from(err: binrw::Error) -> Self {
        Error::SqPack(err.into())
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
