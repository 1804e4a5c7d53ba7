//! Line queries for the line-oriented editor surface
//!
//! Nodes only carry byte weights, so these walk the leaves with SIMD scans
//! rather than descending by line metrics.

use crate::error::Result;
use crate::iter::Leaves;
use crate::rope::Rope;
use bytecount::count as bytecount_count;
use memchr::{memchr, memrchr};
use std::iter::FusedIterator;
use std::mem;

impl<'a> Rope<'a> {
    pub fn newline_count(&self) -> usize {
        self.chunks()
            .map(|chunk| bytecount_count(chunk.as_bytes(), b'\n'))
            .sum()
    }

    /// Lines as an editor shows them: a trailing newline opens an empty last line
    pub fn line_count(&self) -> usize {
        self.newline_count() + 1
    }

    /// Byte offset where `line` starts, `None` past the last line
    pub fn line_to_byte(&self, line: usize) -> Option<usize> {
        if line == 0 {
            return Some(0);
        }

        let mut seen = 0;
        for (offset, chunk) in self.chunk_offsets() {
            let bytes = chunk.as_bytes();
            let in_chunk = bytecount_count(bytes, b'\n');
            if seen + in_chunk < line {
                seen += in_chunk;
                continue;
            }

            // The wanted newline is in this chunk
            let mut pos = 0;
            while let Some(found) = memchr(b'\n', &bytes[pos..]) {
                seen += 1;
                pos += found + 1;
                if seen == line {
                    return Some(offset + pos);
                }
            }
        }
        None
    }

    /// Line containing byte `byte` (clamped to the end of the rope)
    pub fn byte_to_line(&self, byte: usize) -> usize {
        let mut line = 0;
        for (offset, chunk) in self.chunk_offsets() {
            if offset >= byte {
                break;
            }
            let upto = (byte - offset).min(chunk.len());
            line += bytecount_count(&chunk.as_bytes()[..upto], b'\n');
        }
        line
    }

    /// First newline at or after `pos`
    pub fn find_next_newline(&self, pos: usize) -> Option<usize> {
        for (offset, chunk) in self.chunk_offsets() {
            let end = offset + chunk.len();
            if end <= pos {
                continue;
            }
            let start = pos.saturating_sub(offset);
            if let Some(found) = memchr(b'\n', &chunk.as_bytes()[start..]) {
                return Some(offset + start + found);
            }
        }
        None
    }

    /// Last newline strictly before `pos`
    pub fn find_prev_newline(&self, pos: usize) -> Option<usize> {
        let mut last = None;
        for (offset, chunk) in self.chunk_offsets() {
            if offset >= pos {
                break;
            }
            let upto = (pos - offset).min(chunk.len());
            if let Some(found) = memrchr(b'\n', &chunk.as_bytes()[..upto]) {
                last = Some(offset + found);
            }
        }
        last
    }

    /// Text of `line` without its newline, `None` past the last line
    pub fn line(&self, line: usize) -> Result<Option<String>> {
        let Some(start) = self.line_to_byte(line) else {
            return Ok(None);
        };
        let end = self.find_next_newline(start).unwrap_or_else(|| self.len());
        self.text_range(start..end).map(Some)
    }

    /// Lines split on `\n`, like `str::split('\n')`
    pub fn lines(&self) -> Lines<'a> {
        Lines {
            leaves: self.leaves(),
            current: "",
            pending: String::new(),
            done: false,
        }
    }
}

/// Owned lines of a rope; a line may span several leaves
pub struct Lines<'a> {
    leaves: Leaves<'a>,
    current: &'a str,
    pending: String,
    done: bool,
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }

        loop {
            if let Some(pos) = memchr(b'\n', self.current.as_bytes()) {
                self.pending.push_str(&self.current[..pos]);
                self.current = &self.current[pos + 1..];
                return Some(mem::take(&mut self.pending));
            }

            self.pending.push_str(self.current);
            self.current = "";
            match self.leaves.next() {
                Some(leaf) => self.current = leaf.text().unwrap_or_default(),
                None => {
                    self.done = true;
                    return Some(mem::take(&mut self.pending));
                }
            }
        }
    }
}

impl FusedIterator for Lines<'_> {}

#[cfg(test)]
mod tests {
    use crate::arena::Arena;
    use crate::rope::Rope;

    #[test]
    fn test_line_counts() {
        let arena = Arena::new(64).unwrap();
        let rope = Rope::from_chunks(&arena, "Hello\nWorld\n!", 3).unwrap();

        assert_eq!(rope.newline_count(), 2);
        assert_eq!(rope.line_count(), 3);

        let empty = Rope::empty(&arena).unwrap();
        assert_eq!(empty.line_count(), 1);
    }

    #[test]
    fn test_line_to_byte() {
        let arena = Arena::new(64).unwrap();
        let rope = Rope::from_chunks(&arena, "Line 1\nLine 2\nLine 3\n", 4).unwrap();

        assert_eq!(rope.line_to_byte(0), Some(0));
        assert_eq!(rope.line_to_byte(1), Some(7));
        assert_eq!(rope.line_to_byte(2), Some(14));
        assert_eq!(rope.line_to_byte(3), Some(21));
        assert_eq!(rope.line_to_byte(4), None);
    }

    #[test]
    fn test_byte_to_line() {
        let arena = Arena::new(64).unwrap();
        let rope = Rope::from_chunks(&arena, "Line 1\nLine 2\nLine 3\n", 5).unwrap();

        assert_eq!(rope.byte_to_line(0), 0);
        assert_eq!(rope.byte_to_line(5), 0);
        assert_eq!(rope.byte_to_line(7), 1);
        assert_eq!(rope.byte_to_line(10), 1);
        assert_eq!(rope.byte_to_line(14), 2);
        assert_eq!(rope.byte_to_line(20), 2);
        assert_eq!(rope.byte_to_line(1000), 3);
    }

    #[test]
    fn test_find_newlines() {
        let arena = Arena::new(64).unwrap();
        let rope = Rope::from_chunks(&arena, "Hello\nWorld\n!", 4).unwrap();

        assert_eq!(rope.find_next_newline(0), Some(5));
        assert_eq!(rope.find_next_newline(5), Some(5));
        assert_eq!(rope.find_next_newline(6), Some(11));
        assert_eq!(rope.find_next_newline(12), None);

        assert_eq!(rope.find_prev_newline(0), None);
        assert_eq!(rope.find_prev_newline(6), Some(5));
        assert_eq!(rope.find_prev_newline(12), Some(11));
    }

    #[test]
    fn test_line_text() {
        let arena = Arena::new(64).unwrap();
        let rope = Rope::from_chunks(&arena, "First line\nSecond line\nThird line", 4).unwrap();

        assert_eq!(rope.line(0).unwrap().as_deref(), Some("First line"));
        assert_eq!(rope.line(1).unwrap().as_deref(), Some("Second line"));
        assert_eq!(rope.line(2).unwrap().as_deref(), Some("Third line"));
        assert_eq!(rope.line(3).unwrap(), None);

        let multibyte = Rope::from_chunks(&arena, "çà
voilà", 1).unwrap();
        assert_eq!(multibyte.line(1).unwrap().as_deref(), Some("voilà"));
    }

    #[test]
    fn test_lines_match_str_split() {
        let arena = Arena::new(256).unwrap();
        for text in ["", "\n", "one", "a\nb\n", "\n\nx\n\ny", "long line\nshort\n"] {
            for leaf in [1, 2, 3, 64] {
                let rope = Rope::from_chunks(&arena, text, leaf).unwrap();
                let lines: Vec<String> = rope.lines().collect();
                let expected: Vec<&str> = text.split('\n').collect();
                assert_eq!(lines, expected, "text {:?}, leaf size {}", text, leaf);
            }
        }
    }
}
