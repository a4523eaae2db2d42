//! File filtering pattern type

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ingestion::error::InvalidPatternType;

/// How the processing collaborator applies the request's pattern
///
/// `Include` keeps only matching files, `Exclude` drops them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    Include,
    #[default]
    Exclude,
}

impl PatternType {
    /// Wire form of the pattern type
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Include => "include",
            PatternType::Exclude => "exclude",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternType {
    type Err = InvalidPatternType;

    /// Matching is exact: `"Include"` or `" exclude"` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "include" => Ok(PatternType::Include),
            "exclude" => Ok(PatternType::Exclude),
            other => Err(InvalidPatternType(other.to_string())),
        }
    }
}
