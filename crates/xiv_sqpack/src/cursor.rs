//! Positionable byte sources backing every decode.
//!
//! A [`ByteCursor`] walks a borrowed byte slice. The slice is either a memory-mapped data file
//! (see [`MappedFile`]) or a buffer that has already been decompressed.

use std::{
    fmt::{self, Debug},
    fs::File,
    io::{self, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use memmap2::Mmap;
use tracing::{debug, instrument};

use crate::error::{OutOfBoundsError, Result};

/// A cursor over a borrowed byte slice
///
/// Reads never move past [`ByteCursor::size`]; asking for more bytes than remain is an
/// [`crate::error::Error::OutOfBounds`] error. Seeking past the end is allowed, the next read fails.
#[derive(Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: u64,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, position: 0 }
    }

    /// Current absolute offset
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Total addressable length
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Move to an absolute offset
    pub fn seek_to(&mut self, offset: u64) {
        self.position = offset;
    }

    /// Move forward by `count` bytes
    pub fn skip(&mut self, count: u64) {
        self.position = self.position.saturating_add(count);
    }

    /// Borrow exactly `count` bytes and advance past them
    pub fn read_slice(&mut self, count: usize) -> Result<&'a [u8]> {
        let overrun = OutOfBoundsError {
            offset: self.position,
            requested: count as u64,
            size: self.size(),
        };

        let start = usize::try_from(self.position).map_err(|_| overrun)?;
        let end = start.checked_add(count).ok_or(overrun)?;
        let data = self.data.get(start..end).ok_or(overrun)?;

        self.position = end as u64;
        Ok(data)
    }

    /// Borrow everything from the current position to the end without advancing
    pub fn remaining(&self) -> &'a [u8] {
        usize::try_from(self.position)
            .ok()
            .and_then(|start| self.data.get(start..))
            .unwrap_or_default()
    }

    /// The whole backing slice
    pub fn get_ref(&self) -> &'a [u8] {
        self.data
    }
}

impl Debug for ByteCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ByteCursor(position=0x{:X}, size=0x{:X})", self.position, self.size())
    }
}

impl Read for ByteCursor<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.remaining();
        let count = available.len().min(buf.len());
        buf[..count].copy_from_slice(&available[..count]);
        self.position += count as u64;
        Ok(count)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let data = self.read_slice(buf.len()).map_err(|err| match err {
            crate::error::Error::OutOfBounds(overrun) => io::Error::from(overrun),
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        })?;
        buf.copy_from_slice(data);
        Ok(())
    }
}

impl Seek for ByteCursor<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => self.size().checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
        };

        match target {
            Some(offset) => {
                self.position = offset;
                Ok(offset)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.position)
    }
}

/// A read-only memory map of a file on disk
pub struct MappedFile {
    path: PathBuf,
    mmap: Mmap,
}

impl MappedFile {
    /// Map `path` read-only
    #[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
    pub fn open(path: impl AsRef<Path>) -> Result<MappedFile> {
        let path = path.as_ref();
        let file = File::open(path)?;

        // SAFETY: the map is never written through and archive files are not
        // modified while a partition is open.
        let mmap = unsafe { Mmap::map(&file)? };

        #[cfg(unix)]
        {
            use memmap2::Advice;
            if let Err(err) = mmap.advise(Advice::Random) {
                debug!("unable to advise kernel about access pattern: {err}");
            }
        }

        debug!("mapped {} bytes", mmap.len());

        Ok(MappedFile {
            path: path.to_path_buf(),
            mmap,
        })
    }

    /// Path of the mapped file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the mapped file in bytes
    pub fn size(&self) -> u64 {
        self.mmap.len() as u64
    }

    /// Get a fresh cursor over the whole file
    pub fn cursor(&self) -> ByteCursor<'_> {
        ByteCursor::new(&self.mmap)
    }
}

impl Debug for MappedFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MappedFile({}, size=0x{:X})", self.path.display(), self.size())
    }
}
