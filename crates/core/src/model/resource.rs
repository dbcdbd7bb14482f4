use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::ResourceId;
use crate::model::labels::normalize_labels;
use crate::model::style::StyleAffinity;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResourceError {
    #[error("resource title cannot be empty")]
    EmptyTitle,

    #[error("resource topic cannot be empty")]
    EmptyTopic,

    #[error("difficulty must be between 1 and 5, got {0}")]
    InvalidDifficulty(i64),

    #[error("unknown resource type: {0}")]
    UnknownKind(String),
}

/// Format of a catalog resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Video,
    Interactive,
    Text,
    Audio,
    Practice,
    Mixed,
    Article,
}

impl ResourceKind {
    const ALL: [ResourceKind; 7] = [
        ResourceKind::Video,
        ResourceKind::Interactive,
        ResourceKind::Text,
        ResourceKind::Audio,
        ResourceKind::Practice,
        ResourceKind::Mixed,
        ResourceKind::Article,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Video => "video",
            ResourceKind::Interactive => "interactive",
            ResourceKind::Text => "text",
            ResourceKind::Audio => "audio",
            ResourceKind::Practice => "practice",
            ResourceKind::Mixed => "mixed",
            ResourceKind::Article => "article",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ResourceError::UnknownKind(s.trim().to_string()))
    }
}

/// Difficulty of a resource, 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    /// # Errors
    ///
    /// Returns `ResourceError::InvalidDifficulty` outside `1..=5`.
    pub fn new(value: i64) -> Result<Self, ResourceError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (1..=5).contains(v))
            .map(Self)
            .ok_or(ResourceError::InvalidDifficulty(value))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = ResourceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> Self {
        d.0
    }
}

/// A catalog entry. Immutable once published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub title: String,
    pub kind: ResourceKind,
    pub topic: String,
    pub difficulty: Difficulty,
    pub style: StyleAffinity,
    pub content_url: Option<String>,
    pub prerequisites: Vec<String>,
}

impl Resource {
    /// Build a catalog entry, trimming text fields.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError` if the title or topic is blank.
    pub fn new(
        id: ResourceId,
        title: impl Into<String>,
        kind: ResourceKind,
        topic: impl Into<String>,
        difficulty: Difficulty,
        style: StyleAffinity,
    ) -> Result<Self, ResourceError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(ResourceError::EmptyTitle);
        }
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            return Err(ResourceError::EmptyTopic);
        }
        Ok(Self {
            id,
            title,
            kind,
            topic,
            difficulty,
            style,
            content_url: None,
            prerequisites: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_content_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.content_url = Some(url.trim().to_string()).filter(|u| !u.is_empty());
        self
    }

    #[must_use]
    pub fn with_prerequisites<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.prerequisites = normalize_labels(topics);
        self
    }
}

/// In-memory lookup of resources by id.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    by_id: HashMap<ResourceId, Resource>,
}

impl ResourceCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, resource: Resource) {
        self.by_id.insert(resource.id.clone(), resource);
    }

    #[must_use]
    pub fn get(&self, id: &ResourceId) -> Option<&Resource> {
        self.by_id.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ResourceId) -> bool {
        self.by_id.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl FromIterator<Resource> for ResourceCatalog {
    fn from_iter<T: IntoIterator<Item = Resource>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for resource in iter {
            catalog.insert(resource);
        }
        catalog
    }
}
