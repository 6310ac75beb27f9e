#![forbid(unsafe_code)]

//! Byte offset to line/column conversion

use crate::scan::Location;

/// Line start offsets for one file's contents
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    content: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Each element of the index is the byte offset of the start of a line.
    /// Line 0 starts at offset 0.
    pub fn new(content: &'a str) -> Self {
        let mut starts = vec![0];
        for (i, c) in content.char_indices() {
            if c == '\n' {
                starts.push(i + 1);
            }
        }
        Self { content, starts }
    }

    /// Convert a byte offset to a 1-indexed location
    ///
    /// Columns count characters, not bytes.
    pub fn locate(&self, offset: usize) -> Location {
        let line_idx = self
            .starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.starts[line_idx];
        let column = self
            .content
            .get(line_start..offset)
            .map_or(0, |prefix| prefix.chars().count());

        Location {
            line: (line_idx + 1) as u32,
            column: (column + 1) as u32,
            offset,
        }
    }
}
