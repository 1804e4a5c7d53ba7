//! Rope nodes and the weight-indexed tree algorithms
//!
//! A node is either a leaf viewing a run of text or an internal node joining
//! two subtrees. Every internal node caches `weight`, the byte length of its
//! *entire* left subtree, which is what lets lookups and splits descend one
//! path instead of scanning. Nodes are immutable once allocated, so any
//! number of rope versions can share subtrees.

use crate::arena::Arena;
use crate::error::{Result, RopeError};
use crate::iter::{Bytes, Chars, Leaves};
use std::fmt::Write;

/// Result of a split: either side may be absent (empty)
pub type Split<'a> = (Option<&'a Node<'a>>, Option<&'a Node<'a>>);

#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    /// Borrowed view into text owned elsewhere (arena or caller)
    Leaf { text: &'a str },
    Internal {
        /// Byte length of everything reachable through `left`
        weight: usize,
        left: &'a Node<'a>,
        right: &'a Node<'a>,
    },
}

/// Which child the split descent took at a given level
enum Step<'a> {
    /// Went right; the left sibling belongs to the left part
    Right(&'a Node<'a>),
    /// Went left; the right sibling belongs to the right part
    Left(&'a Node<'a>),
}

impl<'a> Node<'a> {
    pub fn leaf(text: &'a str) -> Self {
        Node::Leaf { text }
    }

    /// Internal node over two finished subtrees
    ///
    /// Children are immutable and already weighted, so the new weight is just
    /// the total length of `left`.
    fn internal(left: &'a Node<'a>, right: &'a Node<'a>) -> Self {
        Node::Internal {
            weight: left.len(),
            left,
            right,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    #[inline]
    pub fn is_internal(&self) -> bool {
        !self.is_leaf()
    }

    /// Leaf text, `None` for internal nodes
    #[inline]
    pub fn text(&self) -> Option<&'a str> {
        match *self {
            Node::Leaf { text } => Some(text),
            Node::Internal { .. } => None,
        }
    }

    #[inline]
    pub fn left(&self) -> Option<&'a Node<'a>> {
        match *self {
            Node::Internal { left, .. } => Some(left),
            Node::Leaf { .. } => None,
        }
    }

    #[inline]
    pub fn right(&self) -> Option<&'a Node<'a>> {
        match *self {
            Node::Internal { right, .. } => Some(right),
            Node::Leaf { .. } => None,
        }
    }

    /// Leaf length, or left-subtree length for internal nodes
    #[inline]
    pub fn weight(&self) -> usize {
        match *self {
            Node::Leaf { text } => text.len(),
            Node::Internal { weight, .. } => weight,
        }
    }

    /// Total byte length, walking down the right spine
    pub fn len(&self) -> usize {
        let mut total = 0;
        let mut node = self;
        loop {
            match *node {
                Node::Leaf { text } => return total + text.len(),
                Node::Internal { weight, right, .. } => {
                    total += weight;
                    node = right;
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Leaf containing byte `index` and the offset of `index` inside it
    pub fn leaf_at(&self, index: usize) -> Result<(&'a str, usize)> {
        let mut node = self;
        let mut offset = index;
        loop {
            match *node {
                Node::Internal {
                    weight,
                    left,
                    right,
                } => {
                    if offset >= weight {
                        offset -= weight;
                        node = right;
                    } else {
                        node = left;
                    }
                }
                Node::Leaf { text } => {
                    if offset < text.len() {
                        return Ok((text, offset));
                    }
                    return Err(RopeError::IndexOutOfRange {
                        index,
                        len: self.len(),
                    });
                }
            }
        }
    }

    /// Byte at `index`
    pub fn byte_at(&self, index: usize) -> Result<u8> {
        let (text, offset) = self.leaf_at(index)?;
        Ok(text.as_bytes()[offset])
    }

    /// Join `self` and `other` under a new internal node
    pub fn concat(&'a self, arena: &'a Arena<'_>, other: &'a Node<'a>) -> Result<&'a Node<'a>> {
        arena.alloc(Node::internal(self, other))
    }

    /// Partition the sequence at byte `index`
    ///
    /// Leaf text is never copied: slicing a leaf creates new views over the
    /// same bytes. Splitting exactly on an existing left/right boundary
    /// returns the two children without allocating.
    pub fn split(&'a self, arena: &'a Arena<'_>, index: usize) -> Result<Split<'a>> {
        let mut path = Vec::new();
        let mut node = self;
        let mut offset = index;

        let (mut left_part, mut right_part): Split<'a> = loop {
            match *node {
                Node::Internal {
                    weight,
                    left,
                    right,
                } => {
                    if offset == weight {
                        break (Some(left), Some(right));
                    } else if offset > weight {
                        path.push(Step::Right(left));
                        offset -= weight;
                        node = right;
                    } else {
                        path.push(Step::Left(right));
                        node = left;
                    }
                }
                Node::Leaf { text } => {
                    if offset == text.len() {
                        break (Some(node), None);
                    }
                    if offset == 0 {
                        break (None, Some(node));
                    }
                    if offset > text.len() {
                        return Err(RopeError::IndexOutOfRange {
                            index,
                            len: self.len(),
                        });
                    }
                    if !text.is_char_boundary(offset) {
                        return Err(RopeError::NotCharBoundary { index });
                    }

                    let head = arena.alloc(Node::leaf(&text[..offset]))?;
                    let tail = arena.alloc(Node::leaf(&text[offset..]))?;
                    break (Some(head), Some(tail));
                }
            }
        };

        // Rebuild both halves from the split point back up to the root
        for step in path.into_iter().rev() {
            match step {
                Step::Right(sibling) => left_part = join(arena, Some(sibling), left_part)?,
                Step::Left(sibling) => right_part = join(arena, right_part, Some(sibling))?,
            }
        }

        Ok((left_part, right_part))
    }

    /// New tree with `text` inserted at byte `index`
    pub fn insert(&'a self, arena: &'a Arena<'_>, text: &'a str, index: usize) -> Result<&'a Node<'a>> {
        let (left, right) = self.split(arena, index)?;
        let middle = arena.alloc(Node::leaf(text))?;

        match (left, right) {
            (None, None) => Ok(middle),
            (None, Some(right)) => middle.concat(arena, right),
            (Some(left), None) => left.concat(arena, middle),
            (Some(left), Some(right)) => left.concat(arena, middle.concat(arena, right)?),
        }
    }

    /// New tree without the `length` bytes starting at `start`
    ///
    /// Both splits run against this (unmodified) tree.
    pub fn kill(&'a self, arena: &'a Arena<'_>, start: usize, length: usize) -> Result<&'a Node<'a>> {
        let len = self.len();
        let end = start
            .checked_add(length)
            .filter(|&end| end <= len)
            .ok_or(RopeError::IndexOutOfRange {
                index: start.saturating_add(length),
                len,
            })?;

        let (left, _) = self.split(arena, start)?;
        let (_, right) = self.split(arena, end)?;

        match (left, right) {
            (None, None) => arena.alloc(Node::leaf("")),
            (None, Some(right)) => Ok(right),
            (Some(left), None) => Ok(left),
            (Some(left), Some(right)) => left.concat(arena, right),
        }
    }

    /// Whole text as one string
    pub fn render(&'a self) -> String {
        let mut out = String::with_capacity(self.len());
        for leaf in self.leaves() {
            if let Some(text) = leaf.text() {
                out.push_str(text);
            }
        }
        out
    }

    /// Leaves in left-to-right order
    pub fn leaves(&'a self) -> Leaves<'a> {
        Leaves::new(self)
    }

    pub fn bytes(&'a self) -> Bytes<'a> {
        Bytes::new(self.leaves())
    }

    pub fn chars(&'a self) -> Chars<'a> {
        Chars::new(self.leaves())
    }

    /// Nodes in this subtree (a shared subtree is counted once per reference)
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            if let Node::Internal { left, right, .. } = *node {
                stack.push(right);
                stack.push(left);
            }
        }
        count
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match *node {
                Node::Leaf { .. } => count += 1,
                Node::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        count
    }

    /// Longest root-to-leaf path, a lone leaf has depth 1
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Node::Internal { left, right, .. } = *node {
                stack.push((right, depth + 1));
                stack.push((left, depth + 1));
            }
        }
        deepest
    }

    /// True when every internal node's weight equals its left subtree length
    pub fn check_weights(&self) -> bool {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Node::Internal {
                weight,
                left,
                right,
            } = *node
            {
                if weight != left.len() {
                    return false;
                }
                stack.push(right);
                stack.push(left);
            }
        }
        true
    }

    /// Indented `(weight): text` outline of the tree
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self, 0)];
        while let Some((node, indent)) = stack.pop() {
            let _ = write!(out, "{:width$}({})", "", node.weight(), width = indent * 2);
            match *node {
                Node::Leaf { text } => {
                    let _ = writeln!(out, ": {}", text);
                }
                Node::Internal { left, right, .. } => {
                    out.push('\n');
                    stack.push((right, indent + 1));
                    stack.push((left, indent + 1));
                }
            }
        }
        out
    }
}

/// Concatenate two optional halves, treating `None` as empty
fn join<'a>(
    arena: &'a Arena<'_>,
    left: Option<&'a Node<'a>>,
    right: Option<&'a Node<'a>>,
) -> Result<Option<&'a Node<'a>>> {
    match (left, right) {
        (Some(left), Some(right)) => left.concat(arena, right).map(Some),
        (Some(only), None) | (None, Some(only)) => Ok(Some(only)),
        (None, None) => Ok(None),
    }
}
