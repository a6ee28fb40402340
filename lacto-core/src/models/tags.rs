//! Tag collection attached to a ferment.
//!
//! Tags behave as a set that remembers insertion order for display.
//! Interactive input is capped at [`MAX_TAGS`] tags of at most
//! [`MAX_TAG_LEN`] characters; once the set is full further additions
//! are rejected rather than truncated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of tags accepted through [`TagSet::insert`].
pub const MAX_TAGS: usize = 5;

/// Maximum length of a single tag, in characters.
pub const MAX_TAG_LEN: usize = 20;

/// Errors raised when adding a tag.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("Tag cannot be empty")]
    Empty,

    #[error("Tag '{0}' is longer than {max} characters", max = MAX_TAG_LEN)]
    TooLong(String),

    #[error("A ferment can have at most {max} tags", max = MAX_TAGS)]
    Full,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds a set from interactive input, enforcing every limit.
    pub fn try_from_input<I, S>(tags: I) -> Result<Self, TagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = TagSet::new();
        for tag in tags {
            set.insert(tag.as_ref())?;
        }
        Ok(set)
    }

    /// Adds a trimmed tag.
    ///
    /// Returns `Ok(false)` when the tag is already present.
    pub fn insert(&mut self, tag: &str) -> Result<bool, TagError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(TagError::Empty);
        }
        if tag.chars().count() > MAX_TAG_LEN {
            return Err(TagError::TooLong(tag.to_string()));
        }
        if self.contains(tag) {
            return Ok(false);
        }
        if self.is_full() {
            return Err(TagError::Full);
        }
        self.0.push(tag.to_string());
        Ok(true)
    }

    /// Removes a tag. Returns true if it was present.
    pub fn remove(&mut self, tag: &str) -> bool {
        let len_before = self.0.len();
        self.0.retain(|t| t != tag);
        self.0.len() != len_before
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    /// True once no further tags can be added.
    pub fn is_full(&self) -> bool {
        self.0.len() >= MAX_TAGS
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Set equality: insertion order is ignored.
impl PartialEq for TagSet {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().all(|t| other.contains(t))
    }
}

impl Eq for TagSet {}

/// Stored data is taken as-is apart from dropping repeated values.
impl From<Vec<String>> for TagSet {
    fn from(tags: Vec<String>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        Self(unique)
    }
}

impl From<TagSet> for Vec<String> {
    fn from(tags: TagSet) -> Self {
        tags.0
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
