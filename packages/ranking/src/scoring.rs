use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest mark a single subject can carry.
pub const MAX_SUBJECT_SCORE: i32 = 100;

/// Highest possible total across the five subjects.
pub const MAX_TOTAL: i32 = 500;

/// Totals at or above this are a pass.
pub const PASS_THRESHOLD: i32 = 250;

/// Marks for the five subjects of one candidate.
///
/// Values are expected in `0..=100`. Nothing in this crate clamps or repairs
/// them; [`SubjectScores::out_of_range`] and [`verify_summary`] report violations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SubjectScores {
    pub gk: i32,
    pub science: i32,
    pub mathematics: i32,
    pub logical_reasoning: i32,
    pub current_affairs: i32,
}

/// Partial score update. Absent subjects keep their stored value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
pub struct ScorePatch {
    pub gk: Option<i32>,
    pub science: Option<i32>,
    pub mathematics: Option<i32>,
    pub logical_reasoning: Option<i32>,
    pub current_affairs: Option<i32>,
}

impl ScorePatch {
    /// True when no subject is supplied.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Subjects present in the patch, by name.
    pub fn supplied(&self) -> impl Iterator<Item = (&'static str, i32)> {
        [
            ("gk", self.gk),
            ("science", self.science),
            ("mathematics", self.mathematics),
            ("logical_reasoning", self.logical_reasoning),
            ("current_affairs", self.current_affairs),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

impl SubjectScores {
    pub fn new(
        gk: i32,
        science: i32,
        mathematics: i32,
        logical_reasoning: i32,
        current_affairs: i32,
    ) -> Self {
        Self {
            gk,
            science,
            mathematics,
            logical_reasoning,
            current_affairs,
        }
    }

    /// Subject name/value pairs in display order.
    pub fn subjects(&self) -> [(&'static str, i32); 5] {
        [
            ("gk", self.gk),
            ("science", self.science),
            ("mathematics", self.mathematics),
            ("logical_reasoning", self.logical_reasoning),
            ("current_affairs", self.current_affairs),
        ]
    }

    /// Overlay `patch` on these scores. The result is the full merged set that
    /// totals must be recomputed from.
    pub fn merge(&self, patch: &ScorePatch) -> Self {
        Self {
            gk: patch.gk.unwrap_or(self.gk),
            science: patch.science.unwrap_or(self.science),
            mathematics: patch.mathematics.unwrap_or(self.mathematics),
            logical_reasoning: patch.logical_reasoning.unwrap_or(self.logical_reasoning),
            current_affairs: patch.current_affairs.unwrap_or(self.current_affairs),
        }
    }

    /// First subject whose value falls outside `0..=100`, if any.
    pub fn out_of_range(&self) -> Option<(&'static str, i32)> {
        self.subjects()
            .into_iter()
            .find(|&(_, v)| !(0..=MAX_SUBJECT_SCORE).contains(&v))
    }

    pub fn total(&self) -> i32 {
        self.subjects().iter().map(|&(_, v)| v).sum()
    }
}

/// Total and percentage derived from a set of subject scores.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ScoreSummary {
    pub total: i32,
    pub percentage: f64,
}

/// Compute total and percentage for one candidate.
///
/// Used identically when a result is created and when it is updated.
pub fn compute_score(scores: &SubjectScores) -> ScoreSummary {
    let total = scores.total();
    ScoreSummary {
        total,
        percentage: percentage_of(total),
    }
}

/// `total / 500 * 100`, rounded to two decimal places.
pub fn percentage_of(total: i32) -> f64 {
    let raw = f64::from(total) / f64::from(MAX_TOTAL) * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Pass/fail status shown next to a result. Derived, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultStatus {
    Pass,
    Fail,
}

impl ResultStatus {
    pub fn from_total(total: i32) -> Self {
        if total >= PASS_THRESHOLD {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored total/percentage pair that disagrees with its subject scores.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreDrift {
    #[error("{subject} score {value} is outside 0..=100")]
    OutOfRange { subject: &'static str, value: i32 },
    #[error("stored total {stored} does not match recomputed total {expected}")]
    Total { stored: i32, expected: i32 },
    #[error("stored percentage {stored} does not match recomputed percentage {expected}")]
    Percentage { stored: f64, expected: f64 },
}

/// Check stored values against a fresh recomputation. Reports, never corrects.
pub fn verify_summary(
    scores: &SubjectScores,
    stored_total: i32,
    stored_percentage: f64,
) -> Result<(), ScoreDrift> {
    if let Some((subject, value)) = scores.out_of_range() {
        return Err(ScoreDrift::OutOfRange { subject, value });
    }
    let expected = compute_score(scores);
    if stored_total != expected.total {
        return Err(ScoreDrift::Total {
            stored: stored_total,
            expected: expected.total,
        });
    }
    if (stored_percentage - expected.percentage).abs() > 1e-9 {
        return Err(ScoreDrift::Percentage {
            stored: stored_percentage,
            expected: expected.percentage,
        });
    }
    Ok(())
}
