//! Commit-activity bucketing for repository review summaries.
//!
//! # Responsibility
//! - Assign commit timestamps to recency buckets and accumulate counts.
//!
//! # Invariants
//! - Bucket assignment is strictly exclusive and ordered: a timestamp lands
//!   in exactly one of `last_7d`, `last_30d`, `last_6m`, `last_1y`, or in no
//!   bucket at all when older than one year.
//! - This module is a pure data transform; retrieving the commit log itself
//!   belongs to an external collaborator.

use chrono::{DateTime, Duration, Months, Utc};
use std::collections::BTreeMap;

/// Recency bucket for one commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityBucket {
    Last7d,
    Last30d,
    Last6m,
    Last1y,
}

/// Window boundaries computed once from a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityWindows {
    days_7: DateTime<Utc>,
    days_30: DateTime<Utc>,
    months_6: DateTime<Utc>,
    years_1: DateTime<Utc>,
}

impl ActivityWindows {
    /// Computes window boundaries ending at `now`.
    pub fn ending_at(now: DateTime<Utc>) -> Self {
        Self {
            days_7: now - Duration::days(7),
            days_30: now - Duration::days(30),
            months_6: now - Months::new(6),
            years_1: now - Months::new(12),
        }
    }

    /// Assigns one timestamp to its single bucket.
    ///
    /// Returns `None` for timestamps older than one year; there is no
    /// unbounded catch-all bucket.
    pub fn bucket_for(&self, committed_at: DateTime<Utc>) -> Option<ActivityBucket> {
        if committed_at > self.days_7 {
            Some(ActivityBucket::Last7d)
        } else if committed_at > self.days_30 {
            Some(ActivityBucket::Last30d)
        } else if committed_at > self.months_6 {
            Some(ActivityBucket::Last6m)
        } else if committed_at > self.years_1 {
            Some(ActivityBucket::Last1y)
        } else {
            None
        }
    }
}

/// Accumulated bucket and per-author counts for one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityCounts {
    pub last_7d: u64,
    pub last_30d: u64,
    pub last_6m: u64,
    pub last_1y: u64,
    /// Commit tally per author, regardless of bucket.
    pub by_author: BTreeMap<String, u64>,
}

impl ActivityCounts {
    pub fn total_bucketed(&self) -> u64 {
        self.last_7d + self.last_30d + self.last_6m + self.last_1y
    }
}

/// Counts commits into exclusive buckets.
///
/// `commits` yields `(committed_at, author)` pairs; author attribution is
/// tallied even for commits too old to land in a bucket.
pub fn count_commits(
    windows: &ActivityWindows,
    commits: impl IntoIterator<Item = (DateTime<Utc>, String)>,
) -> ActivityCounts {
    let mut counts = ActivityCounts::default();
    for (committed_at, author) in commits {
        match windows.bucket_for(committed_at) {
            Some(ActivityBucket::Last7d) => counts.last_7d += 1,
            Some(ActivityBucket::Last30d) => counts.last_30d += 1,
            Some(ActivityBucket::Last6m) => counts.last_6m += 1,
            Some(ActivityBucket::Last1y) => counts.last_1y += 1,
            None => {}
        }
        *counts.by_author.entry(author).or_insert(0) += 1;
    }
    counts
}
