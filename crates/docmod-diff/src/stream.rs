//! Raw stream comparison.
//!
//! Streams are compared on their raw bytes, before any filter is applied.
//! Two streams that decode to the same content but were re-encoded
//! differently are reported as changed.

use std::io::{self, Read};

use docmod_types::RawStream;

const CHUNK_SIZE: usize = 8 * 1024;

/// Outcome of comparing the streams attached to two dictionaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamDifference {
    /// Neither side has a stream, or both streams hold the same bytes.
    Unchanged,
    /// Only the final dictionary has a stream.
    Added,
    /// Only the original dictionary has a stream.
    Removed,
    /// Both have a stream and the raw bytes differ.
    Changed,
}

/// Compare two optional raw streams.
///
/// Returns `Err` if either stream cannot be read; the caller decides how to
/// recover. Readers are dropped before returning on every path.
pub fn compare_raw_streams(
    original: Option<&RawStream>,
    revised: Option<&RawStream>,
) -> io::Result<StreamDifference> {
    match (original, revised) {
        (None, None) => Ok(StreamDifference::Unchanged),
        (None, Some(_)) => Ok(StreamDifference::Added),
        (Some(_), None) => Ok(StreamDifference::Removed),
        (Some(a), Some(b)) => {
            if a.same_source(b) {
                return Ok(StreamDifference::Unchanged);
            }
            if a.raw_len()? != b.raw_len()? {
                return Ok(StreamDifference::Changed);
            }
            let mut reader_a = a.open_raw()?;
            let mut reader_b = b.open_raw()?;
            if readers_equal(&mut reader_a, &mut reader_b)? {
                Ok(StreamDifference::Unchanged)
            } else {
                Ok(StreamDifference::Changed)
            }
        }
    }
}

/// Chunked byte-for-byte comparison of two readers.
pub fn readers_equal(a: &mut dyn Read, b: &mut dyn Read) -> io::Result<bool> {
    let mut buf_a = vec![0u8; CHUNK_SIZE];
    let mut buf_b = vec![0u8; CHUNK_SIZE];
    loop {
        let n_a = fill(a, &mut buf_a)?;
        let n_b = fill(b, &mut buf_b)?;
        if n_a != n_b || buf_a[..n_a] != buf_b[..n_b] {
            return Ok(false);
        }
        if n_a == 0 {
            return Ok(true);
        }
    }
}

/// Read until `buf` is full or the reader is exhausted.
fn fill(reader: &mut dyn Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use docmod_types::StreamSource;

    use super::*;

    /// Source that reports a length but fails to open.
    #[derive(Debug)]
    struct BrokenSource;

    impl StreamSource for BrokenSource {
        fn raw_len(&self) -> io::Result<u64> {
            Ok(4)
        }

        fn open_raw(&self) -> io::Result<Box<dyn Read + '_>> {
            Err(io::Error::new(io::ErrorKind::Other, "truncated file"))
        }
    }

    /// Reader that hands out one byte per call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[0];
            self.0 = &self.0[1..];
            Ok(1)
        }
    }

    impl fmt::Debug for Trickle<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Trickle({})", self.0.len())
        }
    }

    #[test]
    fn absent_streams_are_unchanged() {
        assert_eq!(compare_raw_streams(None, None).unwrap(), StreamDifference::Unchanged);
    }

    #[test]
    fn one_sided_streams() {
        let s = RawStream::in_memory(vec![1u8]);
        assert_eq!(compare_raw_streams(None, Some(&s)).unwrap(), StreamDifference::Added);
        assert_eq!(compare_raw_streams(Some(&s), None).unwrap(), StreamDifference::Removed);
    }

    #[test]
    fn equal_bytes_from_distinct_sources() {
        let a = RawStream::in_memory(vec![7u8; 20_000]);
        let b = RawStream::in_memory(vec![7u8; 20_000]);
        assert_eq!(compare_raw_streams(Some(&a), Some(&b)).unwrap(), StreamDifference::Unchanged);
    }

    #[test]
    fn differing_bytes_same_length() {
        let a = RawStream::in_memory(&b"q 1 0 0 1 0 0 cm Q"[..]);
        let b = RawStream::in_memory(&b"q 1 0 0 1 9 9 cm Q"[..]);
        assert_eq!(compare_raw_streams(Some(&a), Some(&b)).unwrap(), StreamDifference::Changed);
    }

    #[test]
    fn differing_length_short_circuits() {
        let a = RawStream::in_memory(vec![0u8; 3]);
        let b = RawStream::from_source(BrokenSource);
        // Lengths differ (3 vs 4), so the broken reader is never opened.
        assert_eq!(compare_raw_streams(Some(&a), Some(&b)).unwrap(), StreamDifference::Changed);
    }

    #[test]
    fn read_failure_is_reported() {
        let a = RawStream::in_memory(vec![0u8; 4]);
        let b = RawStream::from_source(BrokenSource);
        assert!(compare_raw_streams(Some(&a), Some(&b)).is_err());
    }

    #[test]
    fn partial_reads_are_handled() {
        let data = b"partial reads still compare equal";
        let mut a = Trickle(data);
        let mut b = &data[..];
        assert!(readers_equal(&mut a, &mut b).unwrap());

        let mut c = Trickle(b"abc");
        let mut d = &b"abd"[..];
        assert!(!readers_equal(&mut c, &mut d).unwrap());
    }

    #[test]
    fn shorter_reader_is_not_equal() {
        let mut a = &b"abc"[..];
        let mut b = &b"abcd"[..];
        assert!(!readers_equal(&mut a, &mut b).unwrap());
    }
}
