//! Raw stream payloads attached to dictionaries.
//!
//! The object model never holds decoded stream content. A dictionary that
//! carries a stream holds a [`RawStream`] handle, and the bytes are read on
//! demand through a [`StreamSource`]. Every `open_raw` call returns a fresh
//! reader that owns whatever handle it needs, so the handle is released as
//! soon as the reader is dropped.

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;

/// Provider of the raw (undecoded) bytes of one stream.
///
/// Implementations must be cheap to query for the length and must return an
/// independent reader on every `open_raw` call.
pub trait StreamSource: Send + Sync + fmt::Debug {
    /// Length of the raw payload in bytes.
    fn raw_len(&self) -> io::Result<u64>;

    /// Open a reader over the raw payload.
    fn open_raw(&self) -> io::Result<Box<dyn Read + '_>>;
}

/// Shared handle to a stream source.
#[derive(Clone, Debug)]
pub struct RawStream(Arc<dyn StreamSource>);

impl RawStream {
    /// A stream whose raw bytes are already in memory.
    pub fn in_memory(data: impl Into<Bytes>) -> Self {
        Self(Arc::new(InMemorySource::new(data)))
    }

    /// A stream backed by a byte range of a file on disk.
    pub fn file_range(path: impl Into<PathBuf>, offset: u64, len: u64) -> Self {
        Self(Arc::new(FileRangeSource::new(path, offset, len)))
    }

    /// Wrap any custom source.
    pub fn from_source(source: impl StreamSource + 'static) -> Self {
        Self(Arc::new(source))
    }

    /// Length of the raw payload in bytes.
    pub fn raw_len(&self) -> io::Result<u64> {
        self.0.raw_len()
    }

    /// Open a reader over the raw payload.
    pub fn open_raw(&self) -> io::Result<Box<dyn Read + '_>> {
        self.0.open_raw()
    }

    /// Read the whole raw payload into memory.
    pub fn read_all(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.open_raw()?.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Returns `true` if both handles point at the same source.
    pub fn same_source(&self, other: &RawStream) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// ---------------------------------------------------------------------------
// InMemorySource
// ---------------------------------------------------------------------------

/// Raw stream bytes held in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InMemorySource {
    data: Bytes,
}

impl InMemorySource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

impl StreamSource for InMemorySource {
    fn raw_len(&self) -> io::Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn open_raw(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.data.as_ref())))
    }
}

// ---------------------------------------------------------------------------
// FileRangeSource
// ---------------------------------------------------------------------------

/// Raw stream bytes located at `offset..offset + len` inside a file.
///
/// The file is opened per read and closed when the returned reader is
/// dropped, so no descriptor outlives a single comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRangeSource {
    path: PathBuf,
    offset: u64,
    len: u64,
}

impl FileRangeSource {
    pub fn new(path: impl Into<PathBuf>, offset: u64, len: u64) -> Self {
        Self {
            path: path.into(),
            offset,
            len,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_bounds(&self, file_len: u64) -> io::Result<()> {
        let end = self.offset.checked_add(self.len).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "stream range overflows u64")
        })?;
        if end > file_len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "stream range {}..{} exceeds file length {} of {}",
                    self.offset,
                    end,
                    file_len,
                    self.path.display()
                ),
            ));
        }
        Ok(())
    }
}

impl StreamSource for FileRangeSource {
    fn raw_len(&self) -> io::Result<u64> {
        let metadata = std::fs::metadata(&self.path)?;
        self.check_bounds(metadata.len())?;
        Ok(self.len)
    }

    fn open_raw(&self) -> io::Result<Box<dyn Read + '_>> {
        let mut file = File::open(&self.path)?;
        self.check_bounds(file.metadata()?.len())?;
        file.seek(SeekFrom::Start(self.offset))?;
        Ok(Box::new(file.take(self.len)))
    }
}
