use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StyleError {
    #[error("unknown learning style: {0}")]
    Unknown(String),
}

/// How a learner prefers to take in material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    Visual,
    Auditory,
    Reading,
    Kinesthetic,
}

impl LearningStyle {
    /// Every style, in the order analytics lists them.
    pub const ALL: [LearningStyle; 4] = [
        LearningStyle::Visual,
        LearningStyle::Auditory,
        LearningStyle::Reading,
        LearningStyle::Kinesthetic,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LearningStyle::Visual => "visual",
            LearningStyle::Auditory => "auditory",
            LearningStyle::Reading => "reading",
            LearningStyle::Kinesthetic => "kinesthetic",
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearningStyle {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        LearningStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == normalized)
            .ok_or_else(|| StyleError::Unknown(s.trim().to_string()))
    }
}

/// Which learners a catalog resource is written for.
///
/// Catalog entries may be `universal`; learners always have a concrete style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StyleAffinity {
    Universal,
    Style(LearningStyle),
}

impl StyleAffinity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StyleAffinity::Universal => "universal",
            StyleAffinity::Style(style) => style.as_str(),
        }
    }

    /// True if a learner with `style` is served by this resource.
    #[must_use]
    pub fn suits(self, style: LearningStyle) -> bool {
        match self {
            StyleAffinity::Universal => true,
            StyleAffinity::Style(own) => own == style,
        }
    }
}

impl FromStr for StyleAffinity {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("universal") {
            return Ok(StyleAffinity::Universal);
        }
        s.parse().map(StyleAffinity::Style)
    }
}

impl TryFrom<String> for StyleAffinity {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StyleAffinity> for String {
    fn from(affinity: StyleAffinity) -> Self {
        affinity.as_str().to_string()
    }
}
