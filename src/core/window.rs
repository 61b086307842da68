// Character window: the reusable byte staging area of one stream.
//
// Layout of the backing storage:
//
//   0 ........ mark ........ cursor ........ len ........ capacity
//   [consumed ][pending cell  ][unscanned      ][spare           ]
//
// Bytes in [mark, len) survive every refill. Refills only compact (shift
// [mark, len) down to 0) or grow; they never drop pending data.

use log::{debug, trace};
use std::io::{self, ErrorKind, Read};

/// Initial capacity of a window created with `CharWindow::new`.
pub const DEFAULT_CAPACITY: usize = 8 * 1024;

const MIN_CAPACITY: usize = 64;

/// Outcome of asking a source for more bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// `n` bytes were appended to the window.
    Filled(usize),
    /// Nothing available right now; more may arrive later.
    Pending,
    /// The source will never produce more bytes.
    Exhausted,
}

/// Supplier of bytes for a window.
pub trait RefillSource {
    /// Write up to `buf.len()` bytes into `buf`. `buf` is never empty.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<Fill>;
}

impl<S: RefillSource + ?Sized> RefillSource for &mut S {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<Fill> {
        (**self).fill(buf)
    }
}

/// Adapts any `io::Read` into a `RefillSource`.
///
/// `Ok(0)` means exhaustion; `WouldBlock` and `Interrupted` mean "try again".
#[derive(Debug)]
pub struct ReadSource<R> {
    inner: R,
}

impl<R: Read> ReadSource<R> {
    pub fn new(inner: R) -> Self {
        ReadSource { inner }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> RefillSource for ReadSource<R> {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<Fill> {
        match self.inner.read(buf) {
            Ok(0) => Ok(Fill::Exhausted),
            Ok(n) => Ok(Fill::Filled(n)),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                Ok(Fill::Pending)
            }
            Err(e) => Err(e),
        }
    }
}

/// Growable byte window with a cell mark and a scan cursor.
#[derive(Debug, Clone)]
pub struct CharWindow {
    /// Backing storage, fully initialized; its length is the capacity.
    pub(crate) buffer: Vec<u8>,
    /// Number of valid bytes.
    pub(crate) len: usize,
    /// Start of the cell currently being accumulated.
    pub(crate) mark: usize,
    /// Next byte to classify.
    pub(crate) cursor: usize,
}

impl CharWindow {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        CharWindow {
            buffer: vec![0; capacity.max(1)],
            len: 0,
            mark: 0,
            cursor: 0,
        }
    }

    /// A window pre-loaded with `data`, nothing scanned yet.
    pub fn from_slice(data: &[u8]) -> Self {
        let mut window = Self::with_capacity(data.len());
        window.extend_from_slice(data);
        window
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn mark(&self) -> usize {
        self.mark
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Bytes of the in-progress cell plus everything not yet scanned.
    pub fn pending(&self) -> &[u8] {
        &self.buffer[self.mark..self.len]
    }

    /// Bytes not yet classified by a scanner.
    pub fn unscanned(&self) -> &[u8] {
        &self.buffer[self.cursor..self.len]
    }

    #[inline]
    pub fn has_unscanned(&self) -> bool {
        self.cursor < self.len
    }

    #[inline]
    pub fn spare_capacity(&self) -> usize {
        self.buffer.len() - self.len
    }

    /// Ask `source` for more bytes, appending them after the valid region.
    ///
    /// A full window is compacted first and grown only if compaction frees
    /// nothing.
    pub fn refill<S: RefillSource + ?Sized>(&mut self, source: &mut S) -> io::Result<Fill> {
        if self.spare_capacity() == 0 {
            self.make_room(1);
        }
        let spare = self.spare_capacity();
        let fill = source.fill(&mut self.buffer[self.len..])?;
        if let Fill::Filled(n) = fill {
            assert!(n <= spare, "refill source reported {n} bytes into {spare} spare");
            self.len += n;
        }
        trace!("refill: {:?} (len {}, mark {})", fill, self.len, self.mark);
        Ok(fill)
    }

    /// Push-mode refill: append `chunk` after the valid region.
    pub fn extend_from_slice(&mut self, chunk: &[u8]) {
        if self.spare_capacity() < chunk.len() {
            self.make_room(chunk.len());
        }
        let end = self.len + chunk.len();
        self.buffer[self.len..end].copy_from_slice(chunk);
        self.len = end;
    }

    /// Forget all data and reset every cursor. Capacity is kept.
    pub fn clear(&mut self) {
        self.len = 0;
        self.mark = 0;
        self.cursor = 0;
    }

    fn make_room(&mut self, additional: usize) {
        if self.mark > 0 {
            self.compact();
        }
        if self.spare_capacity() < additional {
            self.grow(additional);
        }
    }

    /// Shift [mark, len) down to offset 0.
    fn compact(&mut self) {
        let shift = self.mark;
        self.buffer.copy_within(shift..self.len, 0);
        self.len -= shift;
        self.cursor -= shift;
        self.mark = 0;
        trace!("compacted window by {} bytes, {} retained", shift, self.len);
    }

    fn grow(&mut self, additional: usize) {
        let new_capacity = (self.buffer.len() * 2)
            .max(self.len + additional)
            .max(MIN_CAPACITY);
        debug!(
            "growing window from {} to {} bytes",
            self.buffer.len(),
            new_capacity
        );
        self.buffer.resize(new_capacity, 0);
    }
}

impl Default for CharWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct Blocking;

    impl Read for Blocking {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::WouldBlock, "not yet"))
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::ConnectionReset, "gone"))
        }
    }

    #[test]
    fn test_refill_appends() {
        let mut window = CharWindow::with_capacity(16);
        let mut source = ReadSource::new(Cursor::new(b"abc".to_vec()));
        assert_eq!(window.refill(&mut source).unwrap(), Fill::Filled(3));
        assert_eq!(window.pending(), b"abc");
        assert_eq!(window.refill(&mut source).unwrap(), Fill::Exhausted);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_full_window_compacts_before_growing() {
        let mut window = CharWindow::with_capacity(4);
        window.extend_from_slice(b"ab,c");
        window.mark = 3;
        window.cursor = 4;

        let mut source = ReadSource::new(Cursor::new(b"de".to_vec()));
        assert_eq!(window.refill(&mut source).unwrap(), Fill::Filled(2));
        assert_eq!(window.capacity(), 4);
        assert_eq!(window.mark(), 0);
        assert_eq!(window.cursor(), 1);
        assert_eq!(window.pending(), b"cde");
        assert_eq!(window.unscanned(), b"de");
    }

    #[test]
    fn test_full_window_grows_when_mark_at_start() {
        let mut window = CharWindow::with_capacity(4);
        window.extend_from_slice(b"abcd");
        window.cursor = 4;

        let mut source = ReadSource::new(Cursor::new(b"efgh".to_vec()));
        window.refill(&mut source).unwrap();
        assert!(window.capacity() > 4);
        assert_eq!(window.pending(), b"abcdefgh");
    }

    #[test]
    fn test_extend_grows_for_large_chunk() {
        let mut window = CharWindow::with_capacity(2);
        let big = vec![b'x'; 1000];
        window.extend_from_slice(&big);
        assert_eq!(window.len(), 1000);
        assert_eq!(window.pending(), big.as_slice());
    }

    #[test]
    fn test_extend_compacts_consumed_prefix() {
        let mut window = CharWindow::with_capacity(8);
        window.extend_from_slice(b"a,b,c,dd");
        window.mark = 6;
        window.cursor = 7;
        window.extend_from_slice(b"ee");
        assert_eq!(window.capacity(), 8);
        assert_eq!(window.pending(), b"ddee");
        assert_eq!(window.unscanned(), b"dee");
    }

    #[test]
    fn test_would_block_is_pending() {
        let mut window = CharWindow::with_capacity(8);
        let mut source = ReadSource::new(Blocking);
        assert_eq!(window.refill(&mut source).unwrap(), Fill::Pending);
        assert!(window.is_empty());
    }

    #[test]
    fn test_read_errors_propagate() {
        let mut window = CharWindow::with_capacity(8);
        let mut source = ReadSource::new(Broken);
        let err = window.refill(&mut source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConnectionReset);
    }

    #[test]
    fn test_from_empty_slice() {
        let mut window = CharWindow::from_slice(b"");
        assert!(window.is_empty());
        window.extend_from_slice(b"xyz");
        assert_eq!(window.pending(), b"xyz");
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut window = CharWindow::from_slice(b"hello");
        window.cursor = 3;
        window.clear();
        assert_eq!(window.capacity(), 5);
        assert!(window.is_empty());
        assert!(!window.has_unscanned());
    }
}
