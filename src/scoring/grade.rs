use anyhow::{bail, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An HKDSE level, from 5** down to U, plus the `A` (attained) marker used
/// by pass/fail subjects such as Citizenship and Social Development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    FiveStarStar,
    FiveStar,
    Five,
    Four,
    Three,
    Two,
    One,
    Unclassified,
    Attained,
}

impl Grade {
    /// All grades, highest rank first.
    pub const ALL: [Grade; 9] = [
        Grade::FiveStarStar,
        Grade::FiveStar,
        Grade::Five,
        Grade::Four,
        Grade::Three,
        Grade::Two,
        Grade::One,
        Grade::Unclassified,
        Grade::Attained,
    ];

    /// Grades a student can pick for a graded subject (everything except `A`).
    pub const SCORED: [Grade; 8] = [
        Grade::FiveStarStar,
        Grade::FiveStar,
        Grade::Five,
        Grade::Four,
        Grade::Three,
        Grade::Two,
        Grade::One,
        Grade::Unclassified,
    ];

    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        match s {
            "5**" => Ok(Grade::FiveStarStar),
            "5*" => Ok(Grade::FiveStar),
            "5" => Ok(Grade::Five),
            "4" => Ok(Grade::Four),
            "3" => Ok(Grade::Three),
            "2" => Ok(Grade::Two),
            "1" => Ok(Grade::One),
            "U" | "u" => Ok(Grade::Unclassified),
            "A" | "a" => Ok(Grade::Attained),
            _ => bail!("Unknown grade '{}' (expected 5**, 5*, 5, 4, 3, 2, 1, U or A)", s),
        }
    }

    /// Numeric weight used for the best-five total. `U` and `A` never count.
    pub fn weight(&self) -> u32 {
        match self {
            Grade::FiveStarStar => 7,
            Grade::FiveStar => 6,
            Grade::Five => 5,
            Grade::Four => 4,
            Grade::Three => 3,
            Grade::Two => 2,
            Grade::One => 1,
            Grade::Unclassified | Grade::Attained => 0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Grade::FiveStarStar => "5**",
            Grade::FiveStar => "5*",
            Grade::Five => "5",
            Grade::Four => "4",
            Grade::Three => "3",
            Grade::Two => "2",
            Grade::One => "1",
            Grade::Unclassified => "U",
            Grade::Attained => "A",
        }
    }

    /// Header fragments that identify this grade's column in a reference
    /// table, cumulative ("N+") headers first.
    pub fn header_fragments(&self) -> &'static [&'static str] {
        match self {
            Grade::FiveStarStar => &["5**"],
            Grade::FiveStar => &["5*+", "5*"],
            Grade::Five => &["5+", "5"],
            Grade::Four => &["4+", "4"],
            Grade::Three => &["3+", "3"],
            Grade::Two => &["2+", "2"],
            Grade::One => &["1+", "1"],
            Grade::Unclassified => &["U"],
            Grade::Attained => &[],
        }
    }
}

/// Weight of an optional grade; a missing grade weighs nothing.
pub fn weight_of(grade: Option<Grade>) -> u32 {
    grade.map(|g| g.weight()).unwrap_or(0)
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Grade {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Grade::parse(s)
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Grade {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Grade::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_symbols() {
        for grade in Grade::ALL {
            assert_eq!(Grade::parse(grade.symbol()).unwrap(), grade);
        }
    }

    #[test]
    fn test_parse_trims_and_accepts_lowercase_markers() {
        assert_eq!(Grade::parse(" 5** ").unwrap(), Grade::FiveStarStar);
        assert_eq!(Grade::parse("u").unwrap(), Grade::Unclassified);
        assert_eq!(Grade::parse("a").unwrap(), Grade::Attained);
    }

    #[test]
    fn test_parse_unknown_grade() {
        assert!(Grade::parse("6").is_err());
        assert!(Grade::parse("").is_err());
        assert!(Grade::parse("5***").is_err());
    }

    #[test]
    fn test_weights_monotonic_with_rank() {
        let weights: Vec<u32> = Grade::ALL.iter().map(|g| g.weight()).collect();
        for pair in weights.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
        assert_eq!(Grade::FiveStarStar.weight(), 7);
    }

    #[test]
    fn test_unclassified_and_attained_weigh_zero() {
        assert_eq!(Grade::Unclassified.weight(), 0);
        assert_eq!(Grade::Attained.weight(), 0);
        assert_eq!(weight_of(None), 0);
    }

    #[test]
    fn test_cumulative_fragment_preferred() {
        assert_eq!(Grade::FiveStar.header_fragments(), &["5*+", "5*"]);
        assert!(Grade::Attained.header_fragments().is_empty());
    }

    #[test]
    fn test_grade_serde_as_symbol() {
        let json = serde_json::to_string(&Grade::FiveStar).unwrap();
        assert_eq!(json, "\"5*\"");
        let parsed: Grade = serde_json::from_str("\"5**\"").unwrap();
        assert_eq!(parsed, Grade::FiveStarStar);
        assert!(serde_json::from_str::<Grade>("\"X\"").is_err());
    }
}
