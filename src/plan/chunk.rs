//! Job list partitioning
//!
//! Splits an ordered job list into contiguous stages of bounded size.
//! Every item lands in exactly one group, groups keep the input order and
//! all groups but the last hold exactly `size` items.
//!
//! The label of a group always spans `size` positions, so the label of a
//! short final group overstates its real upper bound: 120 jobs in groups of
//! 50 are labelled `Jobs 1 - 50`, `Jobs 51 - 100` and `Jobs 101 - 150`.

#![allow(clippy::must_use_candidate)]

use super::job::Job;
use super::stage::Stage;
use std::num::NonZeroUsize;

/// A labelled contiguous slice of the input sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<T> {
    /// Display label, `Jobs {first} - {first + size - 1}` (1-based)
    pub label: String,
    /// Items of this group in input order
    pub items: Vec<T>,
}

/// Label of the group starting at the 0-based index `start`.
pub fn partition_label(start: usize, size: NonZeroUsize) -> String {
    format!("Jobs {} - {}", start + 1, start + size.get())
}

/// Splits `items` into groups of at most `size` items.
///
/// An empty input yields no groups.
pub fn partition<T>(items: Vec<T>, size: NonZeroUsize) -> Vec<Partition<T>> {
    let mut groups = Vec::with_capacity(items.len().div_ceil(size.get()));
    let mut items = items.into_iter().peekable();
    let mut start = 0;

    while items.peek().is_some() {
        let chunk: Vec<T> = items.by_ref().take(size.get()).collect();
        groups.push(Partition {
            label: partition_label(start, size),
            items: chunk,
        });
        start += size.get();
    }

    groups
}

/// Groups jobs into stages of at most `size` jobs, named after their partition.
pub fn chunk_jobs(jobs: Vec<Job>, size: NonZeroUsize) -> Vec<Stage> {
    let stages: Vec<Stage> = partition(jobs, size)
        .into_iter()
        .map(|group| Stage::new(group.label, group.items))
        .collect();

    tracing::debug!(stages = stages.len(), size = size.get(), "chunked job list");
    stages
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn sizes<T>(groups: &[Partition<T>]) -> Vec<usize> {
        groups.iter().map(|g| g.items.len()).collect()
    }

    fn labels<T>(groups: &[Partition<T>]) -> Vec<&str> {
        groups.iter().map(|g| g.label.as_str()).collect()
    }

    #[test]
    fn test_partition_empty() {
        let groups = partition(Vec::<u32>::new(), size(50));
        assert!(groups.is_empty());
    }

    #[test]
    fn test_partition_partial_last_group() {
        let groups = partition((0..120).collect::<Vec<_>>(), size(50));

        assert_eq!(sizes(&groups), vec![50, 50, 20]);
        assert_eq!(
            labels(&groups),
            vec!["Jobs 1 - 50", "Jobs 51 - 100", "Jobs 101 - 150"]
        );
    }

    #[test]
    fn test_partition_exact_multiple() {
        let groups = partition((0..50).collect::<Vec<_>>(), size(50));

        assert_eq!(sizes(&groups), vec![50]);
        assert_eq!(labels(&groups), vec!["Jobs 1 - 50"]);
    }

    #[test]
    fn test_partition_smaller_than_size() {
        let groups = partition(vec!["a", "b", "c"], size(50));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items, vec!["a", "b", "c"]);
        assert_eq!(groups[0].label, "Jobs 1 - 50");
    }

    #[test]
    fn test_partition_size_one() {
        let groups = partition(vec![1, 2], size(1));
        assert_eq!(labels(&groups), vec!["Jobs 1 - 1", "Jobs 2 - 2"]);
    }

    #[test]
    fn test_chunk_jobs_into_stages() {
        let jobs: Vec<Job> = (0..3)
            .map(|i| Job::new(format!("Job {i}"), format!("J{i}")))
            .collect();

        let stages = chunk_jobs(jobs, size(2));

        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].name, "Jobs 1 - 2");
        assert_eq!(stages[0].job_count(), 2);
        assert_eq!(stages[1].name, "Jobs 3 - 4");
        assert_eq!(stages[1].jobs[0].key, "J2");
    }

    proptest! {
        #[test]
        fn prop_partition_preserves_order(items in proptest::collection::vec(any::<u16>(), 0..400), n in 1usize..80) {
            let groups = partition(items.clone(), size(n));
            let flattened: Vec<u16> = groups.into_iter().flat_map(|g| g.items).collect();
            prop_assert_eq!(flattened, items);
        }

        #[test]
        fn prop_partition_group_sizes(len in 0usize..400, n in 1usize..80) {
            let groups = partition((0..len).collect::<Vec<_>>(), size(n));

            prop_assert_eq!(groups.len(), len.div_ceil(n));
            prop_assert_eq!(groups.iter().map(|g| g.items.len()).sum::<usize>(), len);

            if let Some((last, rest)) = groups.split_last() {
                prop_assert!(rest.iter().all(|g| g.items.len() == n));
                let expected_last = if len % n == 0 { n } else { len % n };
                prop_assert_eq!(last.items.len(), expected_last);
            }
        }

        #[test]
        fn prop_partition_labels_follow_index(len in 1usize..400, n in 1usize..80) {
            let groups = partition((0..len).collect::<Vec<_>>(), size(n));
            for (i, group) in groups.iter().enumerate() {
                let expected = format!("Jobs {} - {}", i * n + 1, i * n + n);
                prop_assert_eq!(&group.label, &expected);
            }
        }
    }
}
