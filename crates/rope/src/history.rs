//! Bounded undo/redo stacks
//!
//! Entries are whole rope versions. Structural sharing makes each one cost a
//! root pointer, not a copy of the text.

use std::collections::VecDeque;

pub struct History<T> {
    undo: VecDeque<T>,
    redo: Vec<T>,
    max_size: usize,
}

impl<T> History<T> {
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_size,
        }
    }

    /// Remember `item` as the state to return to on undo
    pub fn checkpoint(&mut self, item: T) {
        self.undo.push_back(item);
        self.redo.clear();

        if self.undo.len() > self.max_size {
            self.undo.pop_front();
        }
    }

    /// Swap `current` for the last checkpoint
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        Some(next)
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }
}
