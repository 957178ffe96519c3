//! Byte offset to row/column conversion.

/// A row/column position. Both are zero-based; the column counts bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Start offsets of every line in a source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    pub fn point(&self, offset: usize) -> Point {
        let row = self.starts.partition_point(|&start| start <= offset) - 1;
        Point {
            row,
            column: offset - self.starts[row],
        }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}
