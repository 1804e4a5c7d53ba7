//! Editable document: current rope, undo history and a version counter
//!
//! Every committed batch of edits produces a new rope version. Earlier
//! versions share their untouched subtrees with it, so history is cheap.

use crate::arena::Arena;
use crate::config::RopeConfig;
use crate::error::{Result, RopeError};
use crate::history::History;
use crate::rope::Rope;
use std::ops::Range;
use tracing::{debug, trace};

/// Edit operations
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    Insert { pos: usize, text: String },
    Delete { range: Range<usize> },
    Replace { range: Range<usize>, text: String },
}

pub struct Document<'a> {
    rope: Rope<'a>,
    history: History<Rope<'a>>,
    version: u64,
    max_leaf_bytes: usize,
}

impl<'a> Document<'a> {
    pub fn new(arena: &'a Arena<'a>, config: &RopeConfig) -> Result<Self> {
        Self::from_str(arena, "", config)
    }

    /// Copy `text` into the arena and load it in leaves of `max_leaf_bytes`
    pub fn from_str(arena: &'a Arena<'a>, text: &str, config: &RopeConfig) -> Result<Self> {
        let text = arena.alloc_str(text);
        let rope = Rope::from_chunks(arena, text, config.max_leaf_bytes)?;
        debug!(
            bytes = rope.len(),
            nodes = rope.node_count(),
            "document loaded"
        );

        Ok(Self {
            rope,
            history: History::with_max_size(config.history_limit),
            version: 0,
            max_leaf_bytes: config.max_leaf_bytes,
        })
    }

    pub fn rope(&self) -> Rope<'a> {
        self.rope
    }

    pub fn text(&self) -> String {
        self.rope.render()
    }

    pub fn len(&self) -> usize {
        self.rope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn insert(&mut self, pos: usize, text: &str) -> Result<()> {
        self.apply(Edit::Insert {
            pos,
            text: text.to_string(),
        })
    }

    pub fn delete(&mut self, range: Range<usize>) -> Result<()> {
        self.apply(Edit::Delete { range })
    }

    pub fn apply(&mut self, edit: Edit) -> Result<()> {
        self.apply_edits(std::slice::from_ref(&edit))
    }

    /// Apply `edits` in order as one undo step
    ///
    /// Either every edit lands or the document is left as it was.
    pub fn apply_edits(&mut self, edits: &[Edit]) -> Result<()> {
        if edits.is_empty() {
            return Ok(());
        }

        let mut rope = self.rope;
        for edit in edits {
            trace!(?edit, "applying edit");
            rope = apply_edit(rope, edit)?;
        }
        debug_assert!(rope.check_weights(), "weight invariant broken after {:?}", edits);

        self.commit(rope);
        Ok(())
    }

    /// Replace the current rope wholesale, keeping the old one for undo
    pub fn replace_rope(&mut self, rope: Rope<'a>) {
        self.commit(rope);
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.rope) {
            Some(previous) => {
                self.rope = previous;
                self.version += 1;
                debug!(version = self.version, "undo");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.rope) {
            Some(next) => {
                self.rope = next;
                self.version += 1;
                debug!(version = self.version, "redo");
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Reload from `text`, discarding history
    pub fn reset(&mut self, text: &str) -> Result<()> {
        let arena = self.rope.arena();
        let text = arena.alloc_str(text);
        self.rope = Rope::from_chunks(arena, text, self.max_leaf_bytes)?;
        self.history.clear();
        self.version += 1;
        Ok(())
    }

    fn commit(&mut self, rope: Rope<'a>) {
        self.history.checkpoint(self.rope);
        self.rope = rope;
        self.version += 1;
        debug!(
            version = self.version,
            bytes = self.rope.len(),
            depth = self.rope.depth(),
            "document committed"
        );
    }
}

fn apply_edit<'a>(rope: Rope<'a>, edit: &Edit) -> Result<Rope<'a>> {
    match edit {
        Edit::Insert { pos, text } => rope.insert(*pos, text),
        Edit::Delete { range } => rope.delete(range.start, range_len(&rope, range)?),
        Edit::Replace { range, text } => rope
            .delete(range.start, range_len(&rope, range)?)?
            .insert(range.start, text),
    }
}

fn range_len(rope: &Rope<'_>, range: &Range<usize>) -> Result<usize> {
    if range.start > range.end {
        return Err(RopeError::IndexOutOfRange {
            index: range.start,
            len: rope.len(),
        });
    }
    Ok(range.end - range.start)
}
