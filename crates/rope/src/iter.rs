//! Non-recursive traversal over rope leaves and their contents
//!
//! Depth is bounded by the explicit stack, not the call stack, so deep
//! unbalanced trees are safe to walk.

use crate::node::Node;
use std::iter::FusedIterator;
use std::ptr;
use std::str;

/// Leaves in left-to-right order
///
/// Not restartable in place; build a new one from the root instead.
#[derive(Clone, Debug)]
pub struct Leaves<'a> {
    stack: Vec<&'a Node<'a>>,
    /// Leaf the next call to `next` yields
    next: Option<&'a Node<'a>>,
}

impl<'a> Leaves<'a> {
    pub fn new(root: &'a Node<'a>) -> Self {
        let mut leaves = Self {
            stack: vec![root],
            next: None,
        };
        leaves.next = leaves.next_leaf();
        leaves
    }

    /// Leaf about to be yielded, without advancing
    pub fn peek(&self) -> Option<&'a Node<'a>> {
        self.next
    }

    fn next_leaf(&mut self) -> Option<&'a Node<'a>> {
        while let Some(top) = self.stack.pop() {
            match *top {
                Node::Leaf { .. } => return Some(top),
                Node::Internal { left, right, .. } => {
                    // Right first so left pops first
                    self.stack.push(right);
                    self.stack.push(left);
                }
            }
        }
        None
    }
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.next_leaf();
        Some(current)
    }
}

impl FusedIterator for Leaves<'_> {}

/// Equal when both are about to yield the same leaf (or both are done)
impl PartialEq for Leaves<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self.next, other.next) {
            (Some(a), Some(b)) => ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Flat byte sequence of a rope: a leaf iterator plus an offset in the current leaf
#[derive(Clone, Debug)]
pub struct Bytes<'a> {
    leaves: Leaves<'a>,
    current: &'a [u8],
    offset: usize,
}

impl<'a> Bytes<'a> {
    pub fn new(leaves: Leaves<'a>) -> Self {
        Self {
            leaves,
            current: &[],
            offset: 0,
        }
    }
}

impl Iterator for Bytes<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        loop {
            if let Some(&byte) = self.current.get(self.offset) {
                self.offset += 1;
                return Some(byte);
            }

            match self.leaves.next() {
                Some(leaf) => {
                    self.current = leaf.text().unwrap_or_default().as_bytes();
                    self.offset = 0;
                }
                None => {
                    self.current = &[];
                    self.offset = 0;
                    return None;
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.current.len() - self.offset, None)
    }
}

impl FusedIterator for Bytes<'_> {}

impl PartialEq for Bytes<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.leaves == other.leaves
            && ptr::eq(self.current, other.current)
            && self.offset == other.offset
    }
}

/// Characters of a rope
///
/// Leaves always start and end on character boundaries, so each leaf decodes
/// on its own.
#[derive(Clone, Debug)]
pub struct Chars<'a> {
    leaves: Leaves<'a>,
    current: str::Chars<'a>,
}

impl<'a> Chars<'a> {
    pub fn new(leaves: Leaves<'a>) -> Self {
        Self {
            leaves,
            current: "".chars(),
        }
    }
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        loop {
            if let Some(c) = self.current.next() {
                return Some(c);
            }
            let leaf = self.leaves.next()?;
            self.current = leaf.text().unwrap_or_default().chars();
        }
    }
}

impl FusedIterator for Chars<'_> {}
