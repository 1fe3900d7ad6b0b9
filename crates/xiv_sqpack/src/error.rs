//! Error types that can be emitted from this library

use std::io;

use miette::Diagnostic;
use thiserror::Error;

use crate::resource::ResourceKind;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(binrw::Error),

    /// a read went past the end of the backing buffer
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBoundsError),

    /// a discriminant value is not one we know how to decode
    #[error("unknown {kind} 0x{value:X}")]
    UnknownVariant {
        /// What was being discriminated, e.g. "resource kind"
        kind: &'static str,
        /// The value found in the file
        value: u64,
    },

    /// a compressed block could not be reassembled
    #[error("corrupt block at offset 0x{offset:X}: {reason}")]
    CorruptBlock {
        /// Offset of the block header in the data file
        offset: u64,
        /// What was wrong with it
        reason: String,
    },

    /// a header is structurally inconsistent
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// unable to find requested key
    #[error("unable to find requested key")]
    KeyNotFound(#[from] KeyNotFoundError),

    /// resource id could not be parsed
    #[error("invalid resource id {0:?}")]
    InvalidResourceId(String),

    /// the resource exists but is not of the kind the caller asked for
    #[error("expected a {expected:?} resource, found {found:?}")]
    WrongResourceKind {
        /// Kind the caller asked for
        expected: ResourceKind,
        /// Kind stored in the archive
        found: ResourceKind,
    },
}

/// Details of a read that went past the end of a cursor
#[derive(Error, Diagnostic, Debug, Clone, Copy, PartialEq, Eq)]
#[error("read of {requested} bytes at offset 0x{offset:X} overruns buffer of size 0x{size:X}")]
pub struct OutOfBoundsError {
    /// Position of the read
    pub offset: u64,
    /// Number of bytes requested
    pub requested: u64,
    /// Total size of the buffer
    pub size: u64,
}

/// Error type to provide further information when a key has not been found
#[derive(Error, Diagnostic, Debug)]
#[error("unable to find requested key")]
pub enum KeyNotFoundError {
    /// partition {0}
    #[error("partition {0}")]
    Partition(String),

    /// resource {0}
    #[error("resource {0}")]
    Resource(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        if !err
            .get_ref()
            .is_some_and(|inner| inner.is::<OutOfBoundsError>())
        {
            return Error::IOError(err);
        }

        match err.into_inner().map(|inner| inner.downcast::<OutOfBoundsError>()) {
            Some(Ok(overrun)) => Error::OutOfBounds(*overrun),
            _ => Error::IOError(io::ErrorKind::UnexpectedEof.into()),
        }
    }
}

impl From<binrw::Error> for Error {
    fn from(err: binrw::Error) -> Self {
        match err {
            binrw::Error::Io(err) => Error::from(err),
            binrw::Error::Backtrace(backtrace) => Error::from(*backtrace.error),
            err => Error::BinRWError(err),
        }
    }
}

impl From<OutOfBoundsError> for io::Error {
    fn from(err: OutOfBoundsError) -> Self {
        io::Error::new(io::ErrorKind::UnexpectedEof, err)
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
