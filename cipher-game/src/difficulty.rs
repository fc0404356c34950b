use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Puzzle tier. The declaration order is the unlock order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Rank shown on mode cards and the puzzle header.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Easy => "ROOKIE",
            Self::Medium => "AGENT",
            Self::Hard => "OPERATIVE",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Easy => "Entry-level intelligence assessment",
            Self::Medium => "Intermediate analytical challenges",
            Self::Hard => "Elite intelligence operations",
        }
    }

    /// Tier whose progress gates this one.
    #[must_use]
    pub const fn prerequisite(self) -> Option<Self> {
        match self {
            Self::Easy => None,
            Self::Medium => Some(Self::Easy),
            Self::Hard => Some(Self::Medium),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(()),
        }
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_forms_round_trip() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.as_str().parse::<Difficulty>(), Ok(difficulty));
        }
        assert!("expert".parse::<Difficulty>().is_err());
        assert_eq!(String::from(Difficulty::Medium), "medium");
    }

    #[test]
    fn prerequisites_follow_declaration_order() {
        assert_eq!(Difficulty::Easy.prerequisite(), None);
        assert_eq!(Difficulty::Medium.prerequisite(), Some(Difficulty::Easy));
        assert_eq!(Difficulty::Hard.prerequisite(), Some(Difficulty::Medium));
        assert!(Difficulty::Easy < Difficulty::Medium && Difficulty::Medium < Difficulty::Hard);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Hard).unwrap();
        assert_eq!(json, "\"hard\"");
        assert_eq!(Difficulty::Hard.title(), "OPERATIVE");
    }
}
