//! Core data types for newsdesk
//!
//! This module defines the values that flow through the pipeline:
//!
//! - [`Message`]: an owned text payload or the end-of-stream sentinel
//! - [`Category`]: the three fixed routing classes
//! - [`CategoryCounts`]: a per-category counter used by stage reports

use std::fmt;
use std::ops::{Index, IndexMut};

/// Text printed for the end-of-stream sentinel.
pub const SENTINEL_TEXT: &str = "DONE";

/// A single item carried by a bounded buffer.
///
/// The sentinel is its own variant, so no producer payload can ever be
/// mistaken for it, even one whose text happens to read `DONE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Ordinary category-tagged payload, e.g. `producer 3 NEWS 0`.
    Text(String),
    /// End of stream for exactly one upstream source.
    Done,
}

impl Message {
    /// Build an ordinary payload message.
    pub fn text(text: impl Into<String>) -> Self {
        Message::Text(text.into())
    }

    /// Build the payload a producer emits for one article.
    ///
    /// `seq` is the per-category running counter within that producer.
    pub fn article(producer_id: u32, category: Category, seq: u64) -> Self {
        Message::Text(format!("producer {producer_id} {} {seq}", category.name()))
    }

    /// Whether this is the end-of-stream sentinel.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Message::Done)
    }

    /// Text as it appears on screen.
    pub fn as_str(&self) -> &str {
        match self {
            Message::Text(text) => text,
            Message::Done => SENTINEL_TEXT,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routing class of a payload message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Sports,
    News,
    Weather,
}

impl Category {
    /// All categories, in routing order.
    pub const ALL: [Category; 3] = [Category::Sports, Category::News, Category::Weather];

    /// Number of categories (and therefore of co-editors).
    pub const COUNT: usize = Self::ALL.len();

    /// Upper-case tag embedded in payload text.
    pub const fn name(self) -> &'static str {
        match self {
            Category::Sports => "SPORTS",
            Category::News => "NEWS",
            Category::Weather => "WEATHER",
        }
    }

    /// Position of this category in [`Category::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Category::Sports => 0,
            Category::News => 1,
            Category::Weather => 2,
        }
    }

    /// Classify payload text by the first category tag it contains.
    ///
    /// Returns `None` for text carrying no known tag.
    pub fn classify(text: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| text.contains(c.name()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One counter per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts([u64; Category::COUNT]);

impl CategoryCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum over all categories.
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// Iterate `(category, count)` pairs in routing order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self[c]))
    }
}

impl Index<Category> for CategoryCounts {
    type Output = u64;

    fn index(&self, category: Category) -> &u64 {
        &self.0[category.index()]
    }
}

impl IndexMut<Category> for CategoryCounts {
    fn index_mut(&mut self, category: Category) -> &mut u64 {
        &mut self.0[category.index()]
    }
}
