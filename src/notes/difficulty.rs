// Difficulty levels offered to the player
//
// The wire names ("original", "advanced", ...) are what clients send and
// what result metadata reports back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target difficulty of the simplified score, from untouched to easiest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// The preprocessed transcription as-is
    #[default]
    Original,
    /// Ornaments removed, dynamics evened out
    Advanced,
    /// At most four voices within a comfortable range
    Intermediate,
    /// Melody and bass only
    Beginner,
}

impl Difficulty {
    /// All levels, from least to most simplified
    pub const ALL: &'static [Difficulty] = &[
        Difficulty::Original,
        Difficulty::Advanced,
        Difficulty::Intermediate,
        Difficulty::Beginner,
    ];

    /// Name used on the wire and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Original => "original",
            Difficulty::Advanced => "advanced",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Beginner => "beginner",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Original => "Original",
            Difficulty::Advanced => "Advanced",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Beginner => "Beginner",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .iter()
            .copied()
            .find(|level| level.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| ParseDifficultyError(s.to_string()))
    }
}

/// Returned when a level name is not one of the four known ones
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown difficulty level '{0}' (expected original, advanced, intermediate or beginner)")]
pub struct ParseDifficultyError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        for level in Difficulty::ALL {
            assert_eq!(level.as_str().parse::<Difficulty>().unwrap(), *level);
        }
        assert_eq!(" Beginner ".parse::<Difficulty>().unwrap(), Difficulty::Beginner);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "expert".parse::<Difficulty>().unwrap_err();
        assert_eq!(err, ParseDifficultyError("expert".to_string()));
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Intermediate).unwrap();
        assert_eq!(json, "\"intermediate\"");
        let back: Difficulty = serde_json::from_str("\"advanced\"").unwrap();
        assert_eq!(back, Difficulty::Advanced);
    }
}
