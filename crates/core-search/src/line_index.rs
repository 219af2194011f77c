use core_text::{Buffer, Cursor};

/// Start offset of every line inside the buffer flattened with `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn build(buffer: &Buffer) -> Self {
        let mut starts = Vec::with_capacity(buffer.line_count());
        let mut offset = 0usize;
        for line in buffer.lines() {
            starts.push(offset);
            offset += line.len() + 1;
        }
        Self { starts }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Map a flat byte offset back to a cursor.
    pub fn to_cursor(&self, flat: usize) -> Cursor {
        let row = self.starts.partition_point(|&s| s <= flat).saturating_sub(1);
        Cursor::new(row, flat - self.starts.get(row).copied().unwrap_or(0))
    }

    pub fn to_flat(&self, cursor: Cursor) -> usize {
        self.starts.get(cursor.row).copied().unwrap_or(0) + cursor.col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_offsets_both_ways() {
        let buf = Buffer::from_lines(["abB", "", "bcd"]);
        let idx = LineIndex::build(&buf);
        assert_eq!(idx.line_count(), 3);
        assert_eq!(idx.to_cursor(0), Cursor::new(0, 0));
        assert_eq!(idx.to_cursor(3), Cursor::new(0, 3));
        assert_eq!(idx.to_cursor(4), Cursor::new(1, 0));
        assert_eq!(idx.to_cursor(6), Cursor::new(2, 1));
        assert_eq!(idx.to_flat(Cursor::new(2, 1)), 6);
    }
}
