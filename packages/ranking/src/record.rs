use serde::Serialize;

use crate::group::{CompetitionGroup, GroupKey};
use crate::scoring::{ResultStatus, ScoreDrift, SubjectScores, compute_score, verify_summary};

/// One candidate's result for one exam year, joined with the identity fields
/// the leaderboards display.
///
/// `total` and `percentage` are the stored values as read; ranking trusts them
/// on read paths. Use [`ResultRecord::recomputed`] to rebuild them from scores.
#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ResultRecord {
    pub registration_id: i32,
    pub exam_year_id: i32,

    pub full_name: String,
    pub class: i32,
    /// `None` only for rows registered before the group was recorded.
    pub group: Option<CompetitionGroup>,
    pub school_roll_no: String,

    pub school_id: i32,
    pub school_name: String,
    pub district_id: i32,
    pub district_name: String,

    pub scores: SubjectScores,
    pub total: i32,
    pub percentage: f64,
}

impl ResultRecord {
    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(self.group, self.class)
    }

    pub fn result_status(&self) -> ResultStatus {
        ResultStatus::from_total(self.total)
    }

    /// Copy with `total`/`percentage` rebuilt from the subject scores.
    pub fn recomputed(&self) -> Self {
        let summary = compute_score(&self.scores);
        Self {
            total: summary.total,
            percentage: summary.percentage,
            ..self.clone()
        }
    }

    /// Compare the stored summary with a recomputation.
    pub fn verify(&self) -> Result<(), ScoreDrift> {
        verify_summary(&self.scores, self.total, self.percentage)
    }
}
