//! Arena-backed rope with weight-indexed split, concat, insert and delete
//!
//! Nodes live in a fixed-capacity [`Arena`] and are immutable once built, so
//! edits return new ropes that share untouched subtrees with the old ones.
//! The tree is never rebalanced: depth grows with repeated edits.
//!
//! ```
//! use tiny_rope::{Arena, Rope};
//!
//! let arena = Arena::new(64)?;
//! let rope = Rope::new(&arena, "hello world")?;
//! let edited = rope.insert(5, ",")?.delete(6, 1)?;
//!
//! assert_eq!(edited.to_string(), "hello,world");
//! assert_eq!(rope.to_string(), "hello world");
//! # Ok::<(), tiny_rope::RopeError>(())
//! ```

mod arena;
mod config;
mod document;
mod error;
mod history;
mod iter;
mod lines;
mod node;
mod rope;
mod search;

pub use arena::Arena;
pub use config::RopeConfig;
pub use document::{Document, Edit};
pub use error::{Result, RopeError};
pub use history::History;
pub use iter::{Bytes, Chars, Leaves};
pub use lines::Lines;
pub use node::{Node, Split};
pub use rope::Rope;
pub use search::{SearchMatch, SearchOptions};
