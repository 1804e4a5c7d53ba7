//! Search and replace over ropes

use crate::document::{Document, Edit};
use crate::error::{Result, RopeError};
use crate::rope::Rope;
use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use memchr::memchr_iter;
use regex::Regex;
use std::ops::Range;
use tracing::debug;

/// A match found during search
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchMatch {
    pub byte_range: Range<usize>,
    pub line: usize,
    pub column: usize, // UTF-8 character column within line
}

impl SearchMatch {
    /// Matched text, copied out of the rope
    pub fn text(&self, rope: &Rope<'_>) -> Result<String> {
        rope.text_range(self.byte_range.clone())
    }
}

/// Options for search operations
#[derive(Clone, Debug)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub regex: bool,
    pub limit: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
            regex: false,
            limit: None,
        }
    }
}

impl<'a> Rope<'a> {
    /// Find all occurrences of `pattern`
    ///
    /// Plain matches may overlap ("aa" occurs twice in "aaa").
    pub fn search(&self, pattern: &str, options: &SearchOptions) -> Result<Vec<SearchMatch>> {
        if pattern.is_empty() {
            return Ok(Vec::new());
        }

        let engine = if options.regex {
            SearchEngine::Regex(regex_searcher(pattern, options)?)
        } else {
            SearchEngine::Plain(PlainSearcher::new(pattern, options)?)
        };

        let text = self.render();
        let limit = options.limit.unwrap_or(usize::MAX);
        let ranges = engine.find_all(&text, limit);

        let mut positions = LinePositions::new(&text);
        Ok(ranges
            .into_iter()
            .map(|byte_range| {
                let (line, column) = positions.locate(byte_range.start);
                SearchMatch {
                    byte_range,
                    line,
                    column,
                }
            })
            .collect())
    }

    /// First match starting after `start_pos`
    pub fn search_next(
        &self,
        pattern: &str,
        start_pos: usize,
        options: &SearchOptions,
    ) -> Result<Option<SearchMatch>> {
        let unlimited = SearchOptions {
            limit: None,
            ..options.clone()
        };
        Ok(self
            .search(pattern, &unlimited)?
            .into_iter()
            .find(|m| m.byte_range.start > start_pos))
    }
}

impl Document<'_> {
    /// Replace every non-overlapping match as one undo step, returning the count
    pub fn replace_all(
        &mut self,
        pattern: &str,
        replacement: &str,
        options: &SearchOptions,
    ) -> Result<usize> {
        let matches = self.rope().search(pattern, options)?;

        let mut ranges: Vec<Range<usize>> = Vec::with_capacity(matches.len());
        for m in matches {
            if ranges.last().map_or(true, |last| m.byte_range.start >= last.end) {
                ranges.push(m.byte_range);
            }
        }

        // Back to front so earlier offsets stay valid
        let edits: Vec<Edit> = ranges
            .iter()
            .rev()
            .map(|range| Edit::Replace {
                range: range.clone(),
                text: replacement.to_string(),
            })
            .collect();

        debug!(pattern, replacements = edits.len(), "replace all");
        self.apply_edits(&edits)?;
        Ok(edits.len())
    }
}

// === Search Engines ===

enum SearchEngine {
    Plain(PlainSearcher),
    Regex(Regex),
}

impl SearchEngine {
    fn find_all(&self, text: &str, limit: usize) -> Vec<Range<usize>> {
        let mut found = Vec::new();
        match self {
            SearchEngine::Plain(searcher) => {
                let bytes = text.as_bytes();
                let mut pos = 0;
                while found.len() < limit && pos < bytes.len() {
                    let Some(m) = searcher.automaton.find(&bytes[pos..]) else {
                        break;
                    };
                    let (start, end) = (pos + m.start(), pos + m.end());
                    if searcher.is_word_boundary(text, start, end) {
                        found.push(start..end);
                    }
                    // Resume right after the match start to catch overlaps
                    pos = start + 1;
                }
            }
            SearchEngine::Regex(regex) => {
                found.extend(regex.find_iter(text).take(limit).map(|m| m.range()));
            }
        }
        found
    }
}

struct PlainSearcher {
    whole_word: bool,
    automaton: AhoCorasick,
}

impl PlainSearcher {
    fn new(pattern: &str, options: &SearchOptions) -> Result<Self> {
        let automaton = AhoCorasickBuilder::new()
            .ascii_case_insensitive(!options.case_sensitive)
            .build([pattern])
            .map_err(|err| RopeError::InvalidPattern(err.to_string()))?;

        Ok(Self {
            whole_word: options.whole_word,
            automaton,
        })
    }

    /// Neighbours are decoded as chars so non-ASCII letters count as word characters
    fn is_word_boundary(&self, text: &str, start: usize, end: usize) -> bool {
        if !self.whole_word {
            return true;
        }

        let is_word_char = |c: char| c.is_alphanumeric() || c == '_';

        if text[..start].chars().next_back().is_some_and(is_word_char) {
            return false;
        }
        if text[end..].chars().next().is_some_and(is_word_char) {
            return false;
        }
        true
    }
}

fn regex_searcher(pattern: &str, options: &SearchOptions) -> Result<Regex> {
    let mut pattern = pattern.to_string();
    if options.whole_word {
        pattern = format!(r"\b(?:{})\b", pattern);
    }
    if !options.case_sensitive {
        pattern = format!("(?i){}", pattern);
    }
    Regex::new(&pattern).map_err(|err| RopeError::InvalidPattern(err.to_string()))
}

/// Incremental byte offset to (line, column) conversion for ascending offsets
struct LinePositions<'t> {
    text: &'t str,
    newlines: memchr::Memchr<'t>,
    line: usize,
    line_start: usize,
    next_newline: Option<usize>,
}

impl<'t> LinePositions<'t> {
    fn new(text: &'t str) -> Self {
        let mut newlines = memchr_iter(b'\n', text.as_bytes());
        let next_newline = newlines.next();
        Self {
            text,
            newlines,
            line: 0,
            line_start: 0,
            next_newline,
        }
    }

    fn locate(&mut self, offset: usize) -> (usize, usize) {
        while let Some(newline) = self.next_newline.filter(|&n| n < offset) {
            self.line += 1;
            self.line_start = newline + 1;
            self.next_newline = self.newlines.next();
        }
        let column = self.text[self.line_start..offset].chars().count();
        (self.line, column)
    }
}
