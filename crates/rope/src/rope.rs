//! `Rope` handle: an arena plus a root node
//!
//! This is the surface the editor talks to. Every edit returns a new `Rope`
//! that shares untouched subtrees with the old one, so old versions stay
//! valid for as long as the arena lives.

use crate::arena::Arena;
use crate::error::{Result, RopeError};
use crate::iter::{Bytes, Chars, Leaves};
use crate::node::Node;
use simdutf8::basic::from_utf8;
use std::fmt;
use std::ops::Range;

#[derive(Clone, Copy)]
pub struct Rope<'a> {
    arena: &'a Arena<'a>,
    root: &'a Node<'a>,
}

impl<'a> Rope<'a> {
    /// Rope over a single leaf viewing `text` (no copy)
    pub fn new(arena: &'a Arena<'a>, text: &'a str) -> Result<Self> {
        let root = arena.alloc(Node::leaf(text))?;
        Ok(Self { arena, root })
    }

    pub fn empty(arena: &'a Arena<'a>) -> Result<Self> {
        Self::new(arena, "")
    }

    /// Rope over a copy of `text` placed in the arena
    pub fn from_str(arena: &'a Arena<'a>, text: &str) -> Result<Self> {
        Self::new(arena, arena.alloc_str(text))
    }

    /// Rope over raw bytes, rejecting invalid UTF-8
    pub fn from_utf8(arena: &'a Arena<'a>, bytes: &'a [u8]) -> Result<Self> {
        let text = from_utf8(bytes).map_err(|_| RopeError::InvalidUtf8)?;
        Self::new(arena, text)
    }

    /// Rope whose leaves hold at most `max_leaf_bytes` each
    ///
    /// Leaves are cut on character boundaries and joined pairwise, level by
    /// level, so the initial tree is balanced. Later edits do not rebalance.
    pub fn from_chunks(arena: &'a Arena<'a>, text: &'a str, max_leaf_bytes: usize) -> Result<Self> {
        if text.len() <= max_leaf_bytes || max_leaf_bytes == 0 {
            return Self::new(arena, text);
        }

        let bytes = text.as_bytes();
        let mut nodes = Vec::with_capacity(text.len() / max_leaf_bytes + 1);
        let mut pos = 0;

        while pos < bytes.len() {
            let mut end = (pos + max_leaf_bytes).min(bytes.len());
            // Back off to a character boundary
            while end > pos && !text.is_char_boundary(end) {
                end -= 1;
            }
            // Chunk smaller than one character: take the whole character
            if end == pos {
                end = pos + 1;
                while !text.is_char_boundary(end) {
                    end += 1;
                }
            }

            nodes.push(arena.alloc(Node::leaf(&text[pos..end]))?);
            pos = end;
        }

        while nodes.len() > 1 {
            let mut next_level = Vec::with_capacity(nodes.len() / 2 + 1);
            let mut pairs = nodes.chunks_exact(2);
            for pair in &mut pairs {
                next_level.push(pair[0].concat(arena, pair[1])?);
            }
            next_level.extend(pairs.remainder());
            nodes = next_level;
        }

        match nodes.pop() {
            Some(root) => Ok(Self { arena, root }),
            None => Self::new(arena, text),
        }
    }

    /// Wrap an existing node
    pub fn from_node(arena: &'a Arena<'a>, root: &'a Node<'a>) -> Self {
        Self { arena, root }
    }

    pub fn root(&self) -> &'a Node<'a> {
        self.root
    }

    pub fn arena(&self) -> &'a Arena<'a> {
        self.arena
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn byte_at(&self, index: usize) -> Result<u8> {
        self.root.byte_at(index)
    }

    /// Character starting at byte `index`
    pub fn char_at(&self, index: usize) -> Result<char> {
        let (text, offset) = self.root.leaf_at(index)?;
        if !text.is_char_boundary(offset) {
            return Err(RopeError::NotCharBoundary { index });
        }
        text[offset..]
            .chars()
            .next()
            .ok_or(RopeError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Both halves around byte `index`; an empty half is `None`
    pub fn split(&self, index: usize) -> Result<(Option<Self>, Option<Self>)> {
        let (left, right) = self.root.split(self.arena, index)?;
        Ok((self.wrap(left), self.wrap(right)))
    }

    pub fn concat(&self, other: &Rope<'a>) -> Result<Self> {
        let root = self.root.concat(self.arena, other.root)?;
        Ok(Self::from_node(self.arena, root))
    }

    /// Insert a copy of `text` at byte `index`
    pub fn insert(&self, index: usize, text: &str) -> Result<Self> {
        self.check_index(index)?;
        self.insert_borrowed(index, self.arena.alloc_str(text))
    }

    /// Insert `text` at byte `index` without copying it
    pub fn insert_borrowed(&self, index: usize, text: &'a str) -> Result<Self> {
        let root = self.root.insert(self.arena, text, index)?;
        Ok(Self::from_node(self.arena, root))
    }

    /// Remove `length` bytes starting at `start`
    pub fn delete(&self, start: usize, length: usize) -> Result<Self> {
        let root = self.root.kill(self.arena, start, length)?;
        Ok(Self::from_node(self.arena, root))
    }

    /// Sub-rope covering `range`, sharing structure with `self`
    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        let len = self.len();
        if range.start > range.end || range.end > len {
            return Err(RopeError::IndexOutOfRange {
                index: range.end.max(range.start),
                len,
            });
        }

        let (head, _) = self.root.split(self.arena, range.end)?;
        let middle = match head {
            Some(head) => head.split(self.arena, range.start)?.1,
            None => None,
        };
        match middle {
            Some(root) => Ok(Self::from_node(self.arena, root)),
            None => Self::empty(self.arena),
        }
    }

    /// Text of `range` copied into a new string
    pub fn text_range(&self, range: Range<usize>) -> Result<String> {
        let len = self.len();
        if range.start > range.end || range.end > len {
            return Err(RopeError::IndexOutOfRange {
                index: range.end.max(range.start),
                len,
            });
        }

        let mut out = String::with_capacity(range.end - range.start);
        for (offset, chunk) in self.chunk_offsets() {
            let chunk_end = offset + chunk.len();
            if chunk_end <= range.start {
                continue;
            }
            if offset >= range.end {
                break;
            }
            let from = range.start.saturating_sub(offset);
            let to = (range.end - offset).min(chunk.len());
            let piece = chunk
                .get(from..to)
                .ok_or(RopeError::NotCharBoundary { index: offset + from })?;
            out.push_str(piece);
        }
        Ok(out)
    }

    pub fn render(&self) -> String {
        self.root.render()
    }

    pub fn leaves(&self) -> Leaves<'a> {
        self.root.leaves()
    }

    /// Leaf texts in order
    pub fn chunks(&self) -> impl Iterator<Item = &'a str> {
        self.leaves().filter_map(|leaf| leaf.text())
    }

    /// Leaf texts paired with their starting byte offset
    pub(crate) fn chunk_offsets(&self) -> impl Iterator<Item = (usize, &'a str)> {
        self.chunks().scan(0, |offset, chunk| {
            let start = *offset;
            *offset += chunk.len();
            Some((start, chunk))
        })
    }

    pub fn bytes(&self) -> Bytes<'a> {
        self.root.bytes()
    }

    pub fn chars(&self) -> Chars<'a> {
        self.root.chars()
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn check_weights(&self) -> bool {
        self.root.check_weights()
    }

    pub fn dump(&self) -> String {
        self.root.dump()
    }

    /// True when both ropes are the very same tree
    pub fn ptr_eq(&self, other: &Rope<'a>) -> bool {
        std::ptr::eq(self.root, other.root)
    }

    fn wrap(&self, node: Option<&'a Node<'a>>) -> Option<Self> {
        node.map(|root| Self::from_node(self.arena, root))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.len();
        if index > len {
            return Err(RopeError::IndexOutOfRange { index, len });
        }
        Ok(())
    }
}

impl fmt::Display for Rope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Rope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rope")
            .field("len", &self.len())
            .field("depth", &self.depth())
            .field("text", &self.render())
            .finish()
    }
}

impl PartialEq for Rope<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.bytes().eq(other.bytes())
    }
}

impl Eq for Rope<'_> {}

impl PartialEq<str> for Rope<'_> {
    fn eq(&self, other: &str) -> bool {
        self.len() == other.len() && self.bytes().eq(other.bytes())
    }
}

impl PartialEq<&str> for Rope<'_> {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}
