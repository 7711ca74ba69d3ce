//! Leaderboard computation for exam results.
//!
//! Pure and synchronous: callers fetch a snapshot of [`ResultRecord`]s for one
//! exam year and hand it to the functions in [`engine`]. Nothing here performs
//! I/O, caches, or mutates its input.

pub mod engine;
pub mod group;
pub mod record;
pub mod scoring;

pub use engine::{
    GroupToppers, LeaderboardEntry, Ranked, RankingOrder, Scope, Topper, assign_ranks,
    global_rank, global_toppers, leaderboard, partition_by_group, partition_by_school,
    school_toppers, sort_descending, top_n, toppers_by_group,
};
pub use group::{CompetitionGroup, GroupKey, ParseGroupError};
pub use record::ResultRecord;
pub use scoring::{
    MAX_SUBJECT_SCORE, MAX_TOTAL, PASS_THRESHOLD, ResultStatus, ScoreDrift, ScorePatch,
    ScoreSummary, SubjectScores, compute_score, percentage_of, verify_summary,
};
