//! Fixed-capacity bump arena that owns every rope node of a session
//!
//! Nodes are never freed one by one. Dropping the arena releases the whole
//! block, and the `'a` lifetime carried by every node keeps references from
//! outliving it. Arenas nest: a child borrows its parent, so the borrow
//! checker enforces innermost-created, innermost-dropped teardown.

use crate::error::{Result, RopeError};
use crate::node::Node;
use bumpalo::Bump;
use std::cell::Cell;
use std::fmt;
use std::mem;
use tracing::{debug, warn};

pub struct Arena<'p> {
    bump: Bump,
    /// Node slots handed out so far (the bump pointer, counted in nodes)
    used: Cell<usize>,
    capacity: usize,
    /// Arena that was active when this one was created
    parent: Option<&'p Arena<'p>>,
}

impl Arena<'static> {
    /// Reserve storage for `capacity` nodes
    pub fn new(capacity: usize) -> Result<Self> {
        Self::reserve(capacity, None)
    }
}

impl<'p> Arena<'p> {
    /// Open a nested arena whose parent is `self`
    ///
    /// The child borrows the parent, so it has to be dropped first.
    pub fn nested(&'p self, capacity: usize) -> Result<Arena<'p>> {
        Self::reserve(capacity, Some(self))
    }

    fn reserve(capacity: usize, parent: Option<&'p Arena<'p>>) -> Result<Arena<'p>> {
        let bytes = capacity
            .checked_mul(mem::size_of::<Node<'static>>())
            .ok_or(RopeError::OutOfMemory { capacity })?;
        let bump = Bump::try_with_capacity(bytes).map_err(|_| RopeError::OutOfMemory { capacity })?;

        let arena = Arena {
            bump,
            used: Cell::new(0),
            capacity,
            parent,
        };
        debug!(capacity, depth = arena.depth(), "arena created");
        Ok(arena)
    }

    /// Place one node in the arena
    ///
    /// This is the only way rope nodes come into existence.
    pub fn alloc<'a>(&'a self, node: Node<'a>) -> Result<&'a Node<'a>> {
        let used = self.used.get();
        if used >= self.capacity {
            warn!(capacity = self.capacity, "arena exhausted");
            return Err(RopeError::ArenaExhausted {
                capacity: self.capacity,
            });
        }

        let slot = self.bump.try_alloc(node).map_err(|_| RopeError::OutOfMemory {
            capacity: self.capacity,
        })?;
        self.used.set(used + 1);
        Ok(slot)
    }

    /// Copy `text` into the arena block so it can back leaves
    ///
    /// Text storage does not count against the node capacity.
    pub fn alloc_str<'a>(&'a self, text: &str) -> &'a str {
        self.bump.alloc_str(text)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn used(&self) -> usize {
        self.used.get()
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.used.get()
    }

    pub fn parent(&self) -> Option<&'p Arena<'p>> {
        self.parent
    }

    /// Number of enclosing arenas (0 for a root arena)
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent;
        while let Some(arena) = current {
            depth += 1;
            current = arena.parent;
        }
        depth
    }
}

impl Drop for Arena<'_> {
    fn drop(&mut self) {
        debug!(
            used = self.used.get(),
            capacity = self.capacity,
            depth = self.depth(),
            "arena released"
        );
    }
}

impl fmt::Debug for Arena<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("used", &self.used.get())
            .field("capacity", &self.capacity)
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_up_to_capacity() {
        let arena = Arena::new(3).unwrap();
        for _ in 0..3 {
            arena.alloc(Node::leaf("x")).unwrap();
        }
        assert_eq!(arena.used(), 3);
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    fn test_alloc_past_capacity() {
        let arena = Arena::new(2).unwrap();
        arena.alloc(Node::leaf("a")).unwrap();
        arena.alloc(Node::leaf("b")).unwrap();

        let err = arena.alloc(Node::leaf("c")).unwrap_err();
        assert!(matches!(err, RopeError::ArenaExhausted { capacity: 2 }));
        // A failed request does not move the bump pointer
        assert_eq!(arena.used(), 2);
    }

    #[test]
    fn test_zero_capacity() {
        let arena = Arena::new(0).unwrap();
        assert!(matches!(
            arena.alloc(Node::leaf("")),
            Err(RopeError::ArenaExhausted { capacity: 0 })
        ));
    }

    #[test]
    fn test_unreservable_capacity() {
        let err = Arena::new(usize::MAX).unwrap_err();
        assert!(matches!(err, RopeError::OutOfMemory { .. }));
    }

    #[test]
    fn test_nested_arenas() {
        let outer = Arena::new(4).unwrap();
        assert!(outer.parent().is_none());
        assert_eq!(outer.depth(), 0);

        {
            let inner = outer.nested(1).unwrap();
            assert_eq!(inner.depth(), 1);
            assert_eq!(inner.parent().map(|p| p.capacity()), Some(4));

            let innermost = inner.nested(1).unwrap();
            assert_eq!(innermost.depth(), 2);

            inner.alloc(Node::leaf("inner")).unwrap();
            assert!(inner.alloc(Node::leaf("more")).is_err());
        }

        // Exhausting a child leaves the parent untouched
        assert_eq!(outer.used(), 0);
        outer.alloc(Node::leaf("outer")).unwrap();
    }

    #[test]
    fn test_alloc_str_is_free() {
        let arena = Arena::new(1).unwrap();
        let owned = String::from("typed text");
        let text = arena.alloc_str(&owned);
        drop(owned);

        assert_eq!(text, "typed text");
        assert_eq!(arena.used(), 0);
        arena.alloc(Node::leaf(text)).unwrap();
    }
}
