use crate::model::{CommitRecord, YearMonthCount};

/// Commit counts per (year, month), accumulated across every branch fed in.
///
/// A commit reachable from two branches is observed twice and counted twice.
#[derive(Debug, Default, Clone)]
pub struct TimeBucketAggregator {
    buckets: YearMonthCount,
    observed: u64,
}

impl TimeBucketAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, commit: &CommitRecord) {
        let months = self.buckets.entry(commit.year).or_default();
        *months.entry(commit.month).or_insert(0) += 1;
        self.observed += 1;
    }

    /// Folds another aggregator's counts into this one.
    pub fn absorb(&mut self, other: TimeBucketAggregator) {
        for (year, months) in other.buckets {
            let target = self.buckets.entry(year).or_default();
            for (month, count) in months {
                *target.entry(month).or_insert(0) += count;
            }
        }
        self.observed += other.observed;
    }

    /// Owned copy of the counts, ordered by year then month.
    pub fn snapshot(&self) -> YearMonthCount {
        self.buckets.clone()
    }

    /// Number of `observe` calls so far.
    pub fn total(&self) -> u64 {
        self.observed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn at(year: i32, month: u32) -> CommitRecord {
        CommitRecord {
            id: format!("{year}-{month}"),
            year,
            month,
            author: "Alice".into(),
            insertions: 0,
            deletions: 0,
            files: vec![],
        }
    }

    fn bucket_sum(buckets: &YearMonthCount) -> u64 {
        buckets.values().flat_map(|m| m.values()).sum()
    }

    #[test]
    fn counts_by_year_and_month() {
        let mut agg = TimeBucketAggregator::new();
        for c in [at(2023, 1), at(2023, 1), at(2023, 2)] {
            agg.observe(&c);
        }
        let expected: YearMonthCount = BTreeMap::from([(2023, BTreeMap::from([(1, 2), (2, 1)]))]);
        assert_eq!(agg.snapshot(), expected);
    }

    #[test]
    fn snapshot_is_stable_without_observations() {
        let mut agg = TimeBucketAggregator::new();
        agg.observe(&at(2020, 12));
        assert_eq!(agg.snapshot(), agg.snapshot());
    }

    #[test]
    fn absorb_adds_counts() {
        let mut a = TimeBucketAggregator::new();
        a.observe(&at(2022, 3));
        let mut b = TimeBucketAggregator::new();
        b.observe(&at(2022, 3));
        b.observe(&at(2021, 7));
        a.absorb(b);
        assert_eq!(a.total(), 3);
        assert_eq!(a.snapshot()[&2022][&3], 2);
        assert_eq!(a.snapshot()[&2021][&7], 1);
    }

    proptest! {
        #[test]
        fn bucket_sum_matches_observations(
            dates in prop::collection::vec((1990i32..2030, 1u32..=12), 1..200)
        ) {
            let mut agg = TimeBucketAggregator::new();
            for (y, m) in &dates {
                agg.observe(&at(*y, *m));
            }
            prop_assert_eq!(bucket_sum(&agg.snapshot()), dates.len() as u64);
            prop_assert_eq!(agg.total(), dates.len() as u64);
        }

        #[test]
        fn order_does_not_matter(
            dates in prop::collection::vec((1990i32..2030, 1u32..=12), 0..100),
            seed in any::<u64>()
        ) {
            let mut shuffled = dates.clone();
            // deterministic permutation driven by the seed
            let len = shuffled.len();
            if len > 1 {
                let mut s = seed;
                for i in (1..len).rev() {
                    s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                    let j = (s >> 33) as usize % (i + 1);
                    shuffled.swap(i, j);
                }
            }

            let mut a = TimeBucketAggregator::new();
            let mut b = TimeBucketAggregator::new();
            for (y, m) in &dates {
                a.observe(&at(*y, *m));
            }
            for (y, m) in &shuffled {
                b.observe(&at(*y, *m));
            }
            prop_assert_eq!(a.snapshot(), b.snapshot());
        }
    }
}
