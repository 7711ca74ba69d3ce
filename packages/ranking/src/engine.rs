//! Sorting, ranking and top-N extraction over a snapshot of results.
//!
//! Every function here takes the records by shared reference and returns a new
//! view. Ranks are standard competition ranks ("1224"): tied candidates share a
//! rank and the next distinct key skips ahead by the size of the tie.

use std::cmp::{Ordering, Reverse};
use std::collections::BTreeMap;

use serde::Serialize;

use crate::group::GroupKey;
use crate::record::ResultRecord;
use crate::scoring::ResultStatus;

/// Which tie-break chain to sort by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RankingOrder {
    /// Full leaderboard: total, mathematics, science, then general knowledge.
    Leaderboard,
    /// Topper extraction: total, mathematics, science.
    Toppers,
}

/// Comparison key, compared descending. General knowledge is zeroed for
/// [`RankingOrder::Toppers`] so it never separates candidates there.
type RankKey = (i32, i32, i32, i32);

impl RankingOrder {
    fn key(self, r: &ResultRecord) -> RankKey {
        let gk = match self {
            Self::Leaderboard => r.scores.gk,
            Self::Toppers => 0,
        };
        (r.total, r.scores.mathematics, r.scores.science, gk)
    }

    /// Whether two records tie on every ranking key (name excluded).
    pub fn ties(self, a: &ResultRecord, b: &ResultRecord) -> bool {
        self.key(a) == self.key(b)
    }

    /// Strict ordering: ranking key descending, then full name ascending.
    /// Registration id settles identical names so output is reproducible.
    pub fn compare(self, a: &ResultRecord, b: &ResultRecord) -> Ordering {
        Reverse(self.key(a))
            .cmp(&Reverse(self.key(b)))
            .then_with(|| a.full_name.cmp(&b.full_name))
            .then_with(|| a.registration_id.cmp(&b.registration_id))
    }
}

/// Partition a ranking is computed within.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Every record handed to the engine (one exam year).
    Global,
    /// Records sharing a group key.
    Group(GroupKey),
    /// Records from one school.
    School(i32),
}

impl Scope {
    fn contains(&self, r: &ResultRecord) -> bool {
        match self {
            Self::Global => true,
            Self::Group(key) => r.group_key() == *key,
            Self::School(id) => r.school_id == *id,
        }
    }
}

/// A record paired with its rank inside the set it was ranked in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ranked<'a> {
    pub rank: u32,
    pub record: &'a ResultRecord,
}

/// One row of a full leaderboard.
#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub result_status: ResultStatus,
    #[serde(flatten)]
    pub record: ResultRecord,
}

/// A candidate included in a top-N extract.
///
/// Exactly one of the two ranks is set, depending on the scope the extract was
/// taken from.
#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct Topper {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_global: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_school: Option<u32>,
    #[serde(flatten)]
    pub record: ResultRecord,
}

/// Toppers of one group.
#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct GroupToppers {
    pub group: GroupKey,
    pub toppers: Vec<Topper>,
}

/// Sort records best-first under `order`. The input is left untouched.
pub fn sort_descending<'a, I>(records: I, order: RankingOrder) -> Vec<&'a ResultRecord>
where
    I: IntoIterator<Item = &'a ResultRecord>,
{
    let mut sorted: Vec<&ResultRecord> = records.into_iter().collect();
    sorted.sort_by(|a, b| order.compare(a, b));
    sorted
}

/// Assign competition ranks to an already sorted slice.
pub fn assign_ranks<'a>(sorted: &[&'a ResultRecord], order: RankingOrder) -> Vec<Ranked<'a>> {
    let mut ranked: Vec<Ranked<'a>> = Vec::with_capacity(sorted.len());
    for (idx, &record) in sorted.iter().enumerate() {
        let rank = match ranked.last() {
            Some(prev) if order.ties(prev.record, record) => prev.rank,
            _ => position_rank(idx),
        };
        ranked.push(Ranked { rank, record });
    }
    ranked
}

/// Best `n` records, extended past position `n` with every record tied with
/// the last included one on `(total, mathematics, science)`.
///
/// Returns at least `min(n, len)` entries and never splits a tie group.
pub fn top_n<'a, I>(records: I, n: usize) -> Vec<Ranked<'a>>
where
    I: IntoIterator<Item = &'a ResultRecord>,
{
    let order = RankingOrder::Toppers;
    let sorted = sort_descending(records, order);
    if n == 0 {
        return Vec::new();
    }
    let mut ranked = assign_ranks(&sorted, order);
    if ranked.len() <= n {
        return ranked;
    }

    let cutoff = order.key(ranked[n - 1].record);
    let end = n + ranked[n..]
        .iter()
        .take_while(|r| order.key(r.record) == cutoff)
        .count();
    ranked.truncate(end);
    ranked
}

/// Split records by group key. Keys iterate in display order.
pub fn partition_by_group(records: &[ResultRecord]) -> BTreeMap<GroupKey, Vec<&ResultRecord>> {
    let mut groups: BTreeMap<GroupKey, Vec<&ResultRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.group_key()).or_default().push(record);
    }
    groups
}

/// Records belonging to one school.
pub fn partition_by_school(records: &[ResultRecord], school_id: i32) -> Vec<&ResultRecord> {
    records.iter().filter(|r| r.school_id == school_id).collect()
}

/// Full ordered leaderboard for `scope`, ranked within that scope.
pub fn leaderboard(records: &[ResultRecord], scope: Scope) -> Vec<LeaderboardEntry> {
    let order = RankingOrder::Leaderboard;
    let sorted = sort_descending(records.iter().filter(|r| scope.contains(r)), order);
    assign_ranks(&sorted, order)
        .into_iter()
        .map(|ranked| LeaderboardEntry {
            rank: ranked.rank,
            result_status: ranked.record.result_status(),
            record: ranked.record.clone(),
        })
        .collect()
}

/// Top `n` across the exam year, optionally limited to one group.
///
/// `rank_global` is always measured against every record passed in.
pub fn global_toppers(records: &[ResultRecord], group: Option<GroupKey>, n: usize) -> Vec<Topper> {
    let ranks = RankIndex::new(records.iter());
    let scope = group.map_or(Scope::Global, Scope::Group);
    top_n(records.iter().filter(|r| scope.contains(r)), n)
        .into_iter()
        .map(|ranked| Topper {
            rank_global: Some(ranks.rank_of(ranked.record)),
            rank_school: None,
            record: ranked.record.clone(),
        })
        .collect()
}

/// Topper-order rank of `record` among `records`, the same value a
/// [`Topper::rank_global`] would carry. `record` need not be in `records`.
pub fn global_rank(records: &[ResultRecord], record: &ResultRecord) -> u32 {
    RankIndex::new(records.iter()).rank_of(record)
}

/// Top `n` per group, groups in display order. Each topper carries its
/// exam-year-wide `rank_global`.
pub fn toppers_by_group(records: &[ResultRecord], n: usize) -> Vec<GroupToppers> {
    let ranks = RankIndex::new(records.iter());
    partition_by_group(records)
        .into_iter()
        .map(|(group, members)| GroupToppers {
            group,
            toppers: top_n(members, n)
                .into_iter()
                .map(|ranked| Topper {
                    rank_global: Some(ranks.rank_of(ranked.record)),
                    rank_school: None,
                    record: ranked.record.clone(),
                })
                .collect(),
        })
        .collect()
}

/// Top `n` of one school, optionally limited to one group.
///
/// `rank_school` is measured against every record of that school, independent
/// of the global ranking.
pub fn school_toppers(
    records: &[ResultRecord],
    school_id: i32,
    group: Option<GroupKey>,
    n: usize,
) -> Vec<Topper> {
    let school = partition_by_school(records, school_id);
    let ranks = RankIndex::new(school.iter().copied());
    top_n(
        school
            .iter()
            .copied()
            .filter(|r| group.is_none_or(|g| r.group_key() == g)),
        n,
    )
    .into_iter()
    .map(|ranked| Topper {
        rank_global: None,
        rank_school: Some(ranks.rank_of(ranked.record)),
        record: ranked.record.clone(),
    })
    .collect()
}

fn position_rank(idx: usize) -> u32 {
    u32::try_from(idx + 1).unwrap_or(u32::MAX)
}

/// Topper-order keys of a base set, sorted best-first, for rank lookups of
/// records that may come from a subset.
struct RankIndex {
    keys: Vec<RankKey>,
}

impl RankIndex {
    fn new<'a>(records: impl Iterator<Item = &'a ResultRecord>) -> Self {
        let mut keys: Vec<RankKey> = records.map(|r| RankingOrder::Toppers.key(r)).collect();
        keys.sort_unstable_by(|a, b| b.cmp(a));
        Self { keys }
    }

    /// One plus the number of base records with a strictly better key.
    fn rank_of(&self, record: &ResultRecord) -> u32 {
        let key = RankingOrder::Toppers.key(record);
        position_rank(self.keys.partition_point(|k| *k > key))
    }
}
