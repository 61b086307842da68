// Downstream side of the scanner: cell and row-end callbacks.

/// Receives cells and row boundaries in stream order.
///
/// `on_cell` borrows the window storage. The slice is only valid for the
/// duration of the call; implementations copy out whatever they keep.
pub trait CellConsumer {
    fn on_cell(&mut self, cell: &[u8]);

    fn on_row_end(&mut self);

    /// Called once by stream drivers after the source is exhausted and the
    /// last row has been flushed.
    fn on_end(&mut self) {}
}

impl<C: CellConsumer + ?Sized> CellConsumer for &mut C {
    #[inline]
    fn on_cell(&mut self, cell: &[u8]) {
        (**self).on_cell(cell)
    }

    #[inline]
    fn on_row_end(&mut self) {
        (**self).on_row_end()
    }

    fn on_end(&mut self) {
        (**self).on_end()
    }
}

/// Discards everything; used when only boundaries matter.
impl CellConsumer for () {
    #[inline]
    fn on_cell(&mut self, _cell: &[u8]) {}

    #[inline]
    fn on_row_end(&mut self) {}
}

/// Copies every cell into owned rows.
#[derive(Debug, Default, Clone)]
pub struct RowCollector {
    rows: Vec<Vec<Vec<u8>>>,
    current: Vec<Vec<u8>>,
}

impl RowCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take up to `max` complete rows, oldest first.
    pub fn take_rows(&mut self, max: usize) -> Vec<Vec<Vec<u8>>> {
        let take_count = max.min(self.rows.len());
        self.rows.drain(0..take_count).collect()
    }

    pub fn available_rows(&self) -> usize {
        self.rows.len()
    }

    /// Cells received since the last row end.
    pub fn has_open_row(&self) -> bool {
        !self.current.is_empty()
    }

    /// All complete rows; an open row is discarded.
    pub fn into_rows(self) -> Vec<Vec<Vec<u8>>> {
        self.rows
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.current.clear();
    }
}

impl CellConsumer for RowCollector {
    fn on_cell(&mut self, cell: &[u8]) {
        self.current.push(cell.to_vec());
    }

    fn on_row_end(&mut self) {
        let row = std::mem::replace(&mut self.current, Vec::with_capacity(8));
        self.rows.push(row);
    }
}

/// Counts cells and rows without copying anything.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CellCounter {
    pub cells: usize,
    pub rows: usize,
    pub bytes: usize,
}

impl CellConsumer for CellCounter {
    #[inline]
    fn on_cell(&mut self, cell: &[u8]) {
        self.cells += 1;
        self.bytes += cell.len();
    }

    #[inline]
    fn on_row_end(&mut self) {
        self.rows += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_groups_rows() {
        let mut c = RowCollector::new();
        c.on_cell(b"a");
        c.on_cell(b"b");
        c.on_row_end();
        c.on_cell(b"c");
        assert_eq!(c.available_rows(), 1);
        assert!(c.has_open_row());
        assert_eq!(c.take_rows(10), vec![vec![b"a".to_vec(), b"b".to_vec()]]);
        assert_eq!(c.available_rows(), 0);
    }

    #[test]
    fn test_take_rows_partial() {
        let mut c = RowCollector::new();
        for cell in [b"1", b"2", b"3"] {
            c.on_cell(cell);
            c.on_row_end();
        }
        assert_eq!(c.take_rows(2).len(), 2);
        assert_eq!(c.take_rows(2), vec![vec![b"3".to_vec()]]);
    }

    fn feed<C: CellConsumer>(mut consumer: C) {
        consumer.on_cell(b"abc");
        consumer.on_cell(b"");
        consumer.on_row_end();
        consumer.on_end();
    }

    #[test]
    fn test_counter_through_mut_ref() {
        let mut counter = CellCounter::default();
        feed(&mut counter);
        assert_eq!(
            counter,
            CellCounter {
                cells: 2,
                rows: 1,
                bytes: 3
            }
        );
    }
}
