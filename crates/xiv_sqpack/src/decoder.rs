//! Structural decoding engine.
//!
//! Decoders are plain functions generic over a [`Decoder`]:
//!
//! ```
//! use byteorder::{BigEndian, ReadBytesExt};
//! use xiv_sqpack::{cursor::ByteCursor, decoder::{self, Decoder}, error::Result};
//!
//! fn pair<D: Decoder>(d: &mut D) -> Result<(u16, u16)> {
//!     d.scope("pair", &(), |d| Ok((d.read_u16::<BigEndian>()?, d.read_u16::<BigEndian>()?)))
//! }
//!
//! # fn doit() -> Result<()> {
//! let data = [0x00, 0x01, 0x00, 0x02];
//! assert_eq!(decoder::read(ByteCursor::new(&data), pair)?, (1, 2));
//!
//! let (result, trace) = decoder::trace(ByteCursor::new(&data), pair);
//! assert_eq!(result?, (1, 2));
//! assert_eq!(trace.map(|t| t.children.len()), Some(2));
//! # Ok(())
//! # }
//! # doit().unwrap();
//! ```
//!
//! Scalars are read with [`byteorder::ReadBytesExt`] through the decoder's [`Read`] impl and
//! fixed-layout records are `binrw` structs read with [`Decoder::read_record`]. Running the same
//! function through [`trace`] instead of [`read`] records every record, seek and primitive read
//! as a [`TraceNode`] tree without changing the decoded values.

use std::{
    any::type_name,
    fmt::{self, Debug, Display},
    io::{self, Read, Seek, SeekFrom},
    result::Result as StdResult,
};

use binrw::{BinRead, Endian};

use crate::{
    cursor::ByteCursor,
    error::{Error, Result},
};

/// A positioned byte source that structural decoders read from
pub trait Decoder: Read + Seek {
    /// Current absolute offset
    fn position(&self) -> u64;

    /// Total addressable length
    fn size(&self) -> u64;

    /// Move to an absolute offset
    fn seek_to(&mut self, offset: u64);

    /// Move forward by `count` bytes
    fn skip(&mut self, count: u64);

    /// Read exactly `count` bytes
    fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>>;

    /// Run a named decoder over this context
    ///
    /// The error type is left to the caller so that format crates can raise their own errors
    /// from inside a scope.
    fn scope<T, E, F>(&mut self, name: &'static str, args: &dyn Debug, f: F) -> StdResult<T, E>
    where
        T: Debug,
        E: Display,
        F: FnOnce(&mut Self) -> StdResult<T, E>;

    /// Read a fixed-layout `binrw` record
    fn read_record<T>(&mut self) -> Result<T>
    where
        T: BinRead + Debug,
        for<'a> T::Args<'a>: Default,
        Self: Sized,
    {
        self.scope(short_type_name::<T>(), &(), |d| {
            T::read_options(d, Endian::Little, Default::default()).map_err(Error::from)
        })
    }

    /// Read `count` fixed-layout records back to back
    fn read_records<T>(&mut self, count: usize) -> Result<Vec<T>>
    where
        T: BinRead + Debug,
        for<'a> T::Args<'a>: Default,
        Self: Sized,
    {
        (0..count).map(|_| self.read_record::<T>()).collect()
    }
}

/// Decode with the plain context
pub fn read<'a, T, E, F>(cursor: ByteCursor<'a>, f: F) -> StdResult<T, E>
where
    F: FnOnce(&mut Context<'a>) -> StdResult<T, E>,
{
    f(&mut Context::new(cursor))
}

/// Decode with the tracing context, returning the result and the recorded call tree
///
/// The tree is returned on failure too, which is the point: it shows how far the decoder got.
pub fn trace<'a, T, E, F>(cursor: ByteCursor<'a>, f: F) -> (StdResult<T, E>, Option<TraceNode>)
where
    F: FnOnce(&mut TracingContext<'a>) -> StdResult<T, E>,
{
    let mut ctx = TracingContext::new(cursor);
    let result = f(&mut ctx);
    (result, ctx.finish())
}

fn short_type_name<T>() -> &'static str {
    let name = type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}

/// Decoding context with no bookkeeping
#[derive(Debug)]
pub struct Context<'a> {
    cursor: ByteCursor<'a>,
}

impl<'a> Context<'a> {
    /// Wrap a cursor
    pub fn new(cursor: ByteCursor<'a>) -> Self {
        Context { cursor }
    }
}

impl Read for Context<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.cursor.read_exact(buf)
    }
}

impl Seek for Context<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl Decoder for Context<'_> {
    fn position(&self) -> u64 {
        self.cursor.position()
    }

    fn size(&self) -> u64 {
        self.cursor.size()
    }

    fn seek_to(&mut self, offset: u64) {
        self.cursor.seek_to(offset)
    }

    fn skip(&mut self, count: u64) {
        self.cursor.skip(count)
    }

    fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        Ok(self.cursor.read_slice(count)?.to_vec())
    }

    fn scope<T, E, F>(&mut self, _name: &'static str, _args: &dyn Debug, f: F) -> StdResult<T, E>
    where
        T: Debug,
        E: Display,
        F: FnOnce(&mut Self) -> StdResult<T, E>,
    {
        f(self)
    }
}

/// What a [`TraceNode`] recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// An explicit absolute seek
    Seek(u64),
    /// An explicit relative skip
    Skip(u64),
    /// A primitive read of `n` bytes
    Read(u64),
    /// A named decoder invocation with its debug-formatted arguments
    Record {
        /// Decoder or record type name
        name: &'static str,
        /// Arguments passed to the decoder
        args: String,
    },
}

/// One node of a decode call tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceNode {
    /// Cursor position when the node was entered
    pub offset: u64,
    /// Bytes between entering and leaving the node
    pub size: u64,
    /// What happened
    pub event: TraceEvent,
    /// Debug-formatted result, or the error message if the step failed
    pub result: Option<String>,
    /// Nested steps
    pub children: Vec<TraceNode>,
}

impl TraceNode {
    fn new(offset: u64, event: TraceEvent) -> Self {
        TraceNode {
            offset,
            size: 0,
            event,
            result: None,
            children: Vec::new(),
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        write!(
            f,
            "{:indent$}[0x{:08X}+0x{:X}] ",
            "",
            self.offset,
            self.size,
            indent = depth * 2
        )?;
        match &self.event {
            TraceEvent::Seek(offset) => write!(f, "seek 0x{offset:X}")?,
            TraceEvent::Skip(count) => write!(f, "skip 0x{count:X}")?,
            TraceEvent::Read(count) => write!(f, "read {count}")?,
            TraceEvent::Record { name, args } => write!(f, "{name}{args}")?,
        }
        if let Some(result) = &self.result {
            write!(f, " => {result}")?;
        }
        writeln!(f)?;

        self.children
            .iter()
            .try_for_each(|child| child.fmt_indented(f, depth + 1))
    }
}

impl Display for TraceNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

// Longest result kept verbatim in a trace node
const MAX_RESULT_LEN: usize = 120;

fn summarize(mut text: String) -> String {
    if text.len() > MAX_RESULT_LEN {
        let mut cut = MAX_RESULT_LEN;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("...");
    }
    text
}

/// Decoding context that records a [`TraceNode`] tree
#[derive(Debug)]
pub struct TracingContext<'a> {
    cursor: ByteCursor<'a>,
    stack: Vec<TraceNode>,
    roots: Vec<TraceNode>,
}

impl<'a> TracingContext<'a> {
    /// Wrap a cursor
    pub fn new(cursor: ByteCursor<'a>) -> Self {
        TracingContext {
            cursor,
            stack: Vec::new(),
            roots: Vec::new(),
        }
    }

    fn push(&mut self, event: TraceEvent) {
        self.stack
            .push(TraceNode::new(self.cursor.position(), event));
    }

    fn pop(&mut self, result: Option<String>) {
        let Some(mut node) = self.stack.pop() else {
            return;
        };
        node.size = self.cursor.position().saturating_sub(node.offset);
        node.result = result.map(summarize);

        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    /// Close any open nodes and return the tree
    ///
    /// When the top-level decoder issued several independent calls they are gathered under a
    /// synthetic `root` node.
    pub fn finish(mut self) -> Option<TraceNode> {
        while !self.stack.is_empty() {
            self.pop(Some("<unfinished>".into()));
        }

        match self.roots.len() {
            0 => None,
            1 => self.roots.pop(),
            _ => {
                let offset = self.roots.first().map_or(0, |n| n.offset);
                let mut root = TraceNode::new(
                    offset,
                    TraceEvent::Record {
                        name: "root",
                        args: String::new(),
                    },
                );
                root.size = self.cursor.position().saturating_sub(offset);
                root.children = self.roots;
                Some(root)
            }
        }
    }
}

impl Read for TracingContext<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.push(TraceEvent::Read(buf.len() as u64));
        let result = self.cursor.read(buf);
        let summary = match &result {
            Ok(count) => format!("{:02X?}", &buf[..*count]),
            Err(err) => format!("error: {err}"),
        };
        self.pop(Some(summary));
        result
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.push(TraceEvent::Read(buf.len() as u64));
        let result = self.cursor.read_exact(buf);
        let summary = match &result {
            Ok(()) => format!("{buf:02X?}"),
            Err(err) => format!("error: {err}"),
        };
        self.pop(Some(summary));
        result
    }
}

impl Seek for TracingContext<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl Decoder for TracingContext<'_> {
    fn position(&self) -> u64 {
        self.cursor.position()
    }

    fn size(&self) -> u64 {
        self.cursor.size()
    }

    fn seek_to(&mut self, offset: u64) {
        self.push(TraceEvent::Seek(offset));
        self.cursor.seek_to(offset);
        self.pop(None);
    }

    fn skip(&mut self, count: u64) {
        self.push(TraceEvent::Skip(count));
        self.cursor.skip(count);
        self.pop(None);
    }

    fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        self.push(TraceEvent::Read(count as u64));
        let result = self.cursor.read_slice(count).map(<[u8]>::to_vec);
        let summary = match &result {
            Ok(data) => format!("{} bytes", data.len()),
            Err(err) => format!("error: {err}"),
        };
        self.pop(Some(summary));
        result
    }

    fn scope<T, E, F>(&mut self, name: &'static str, args: &dyn Debug, f: F) -> StdResult<T, E>
    where
        T: Debug,
        E: Display,
        F: FnOnce(&mut Self) -> StdResult<T, E>,
    {
        self.push(TraceEvent::Record {
            name,
            args: format!("{args:?}"),
        });
        let result = f(self);
        let summary = match &result {
            Ok(value) => format!("{value:?}"),
            Err(err) => format!("error: {err}"),
        };
        self.pop(Some(summary));
        result
    }
}
