use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubjectError {
    #[error("unknown subject: {0}")]
    Unknown(String),
}

/// Subjects a learner can enrol in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Algebra,
    Geometry,
    Trigonometry,
    Calculus,
}

impl Subject {
    pub const ALL: [Subject; 4] = [
        Subject::Algebra,
        Subject::Geometry,
        Subject::Trigonometry,
        Subject::Calculus,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Subject::Algebra => "algebra",
            Subject::Geometry => "geometry",
            Subject::Trigonometry => "trigonometry",
            Subject::Calculus => "calculus",
        }
    }

    /// Weak-area labels offered when creating a profile for this subject.
    #[must_use]
    pub fn weak_area_options(self) -> &'static [&'static str] {
        match self {
            Subject::Algebra => &[
                "variables",
                "linear equations",
                "like terms",
                "order of operations",
                "graphing",
            ],
            Subject::Geometry => &["angles", "triangles", "circles", "area", "volume"],
            Subject::Trigonometry => &["sine", "cosine", "tangent", "identities", "graphs"],
            Subject::Calculus => &[
                "limits",
                "derivatives",
                "integrals",
                "applications",
                "continuity",
            ],
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = SubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == normalized)
            .ok_or_else(|| SubjectError::Unknown(s.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subject_offers_five_weak_areas() {
        for subject in Subject::ALL {
            assert_eq!(subject.weak_area_options().len(), 5, "{subject}");
        }
    }

    #[test]
    fn parse_round_trips_display() {
        for subject in Subject::ALL {
            assert_eq!(subject.to_string().parse::<Subject>().unwrap(), subject);
        }
        assert!("chemistry".parse::<Subject>().is_err());
    }
}
