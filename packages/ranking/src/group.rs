#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Cohort a candidate competes in, fixed from the class at registration time.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")
)]
pub enum CompetitionGroup {
    /// Classes 6 to 8.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "A"))]
    A,
    /// Classes 9 to 12.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "B"))]
    B,
}

impl CompetitionGroup {
    pub const ALL: &'static [CompetitionGroup] = &[Self::A, Self::B];

    /// Group for a class level. Classes 6-8 are group A, anything else is B.
    pub fn for_class(class: i32) -> Self {
        if (6..=8).contains(&class) {
            Self::A
        } else {
            Self::B
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

impl fmt::Display for CompetitionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid group string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid group '{invalid}'. Valid values: A, B")]
pub struct ParseGroupError {
    invalid: String,
}

impl FromStr for CompetitionGroup {
    type Err = ParseGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            _ => Err(ParseGroupError {
                invalid: s.to_string(),
            }),
        }
    }
}

/// Key a result is grouped under for per-group leaderboards.
///
/// Records without a competition group fall back to their raw class. Whether
/// that fallback repairs legacy rows or hides missing classification upstream
/// is undecided, so callers see both cases explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum GroupKey {
    Competition(CompetitionGroup),
    RawClass(i32),
}

impl GroupKey {
    pub fn new(group: Option<CompetitionGroup>, class: i32) -> Self {
        match group {
            Some(g) => Self::Competition(g),
            None => {
                tracing::debug!(class, "Result has no competition group, keying by class");
                Self::RawClass(class)
            }
        }
    }

    /// Presentation weight: raw classes by value, letters by character code.
    pub fn display_value(&self) -> i64 {
        match self {
            Self::Competition(CompetitionGroup::A) => i64::from(b'A'),
            Self::Competition(CompetitionGroup::B) => i64::from(b'B'),
            Self::RawClass(class) => i64::from(*class),
        }
    }

    fn variant_rank(&self) -> u8 {
        match self {
            Self::RawClass(_) => 0,
            Self::Competition(_) => 1,
        }
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.display_value()
            .cmp(&other.display_value())
            .then_with(|| self.variant_rank().cmp(&other.variant_rank()))
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Competition(g) => write!(f, "{g}"),
            Self::RawClass(class) => write!(f, "{class}"),
        }
    }
}
