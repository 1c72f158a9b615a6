//! Splitting an unordered checksum listing by filename uniqueness
//!
//! A filename that appears more than once in an external listing could belong
//! to any of several files, so none of its checksums can be trusted without
//! re-hashing.

use crate::hash::Checksum;
use ahash::AHashMap;

/// Result of [`partition_by_uniqueness`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniquenessPartition {
    /// Filenames seen exactly once, in input order
    pub unique: Vec<(String, Checksum)>,
    /// Every occurrence of filenames seen two or more times
    pub duplicates: Vec<(String, Checksum)>,
}

/// Single pass over `entries`.
///
/// On the second sighting of a name its first occurrence moves from the unique
/// group to the duplicate group, followed by the new occurrence; later
/// sightings go straight to the duplicate group.
pub fn partition_by_uniqueness<I>(entries: I) -> UniquenessPartition
where
    I: IntoIterator<Item = (String, Checksum)>,
{
    // slot in `unique` for names seen once so far; `None` once demoted
    let mut index: AHashMap<String, Option<usize>> = AHashMap::new();
    let mut unique: Vec<Option<(String, Checksum)>> = Vec::new();
    let mut duplicates = Vec::new();

    for (name, checksum) in entries {
        match index.get_mut(&name) {
            None => {
                index.insert(name.clone(), Some(unique.len()));
                unique.push(Some((name, checksum)));
            }
            Some(slot) => {
                if let Some(first) = slot.take().and_then(|i| unique[i].take()) {
                    duplicates.push(first);
                }
                duplicates.push((name, checksum));
            }
        }
    }

    UniquenessPartition {
        unique: unique.into_iter().flatten().collect(),
        duplicates,
    }
}

/// Lookup form of a [`UniquenessPartition`]
#[derive(Debug, Clone, Default)]
pub struct UnsortedSourceIndex {
    unique: AHashMap<String, Checksum>,
    duplicates: AHashMap<String, Vec<Checksum>>,
}

impl UnsortedSourceIndex {
    pub fn new(partition: UniquenessPartition) -> Self {
        let mut duplicates: AHashMap<String, Vec<Checksum>> = AHashMap::new();
        for (name, checksum) in partition.duplicates {
            duplicates.entry(name).or_default().push(checksum);
        }
        Self {
            unique: partition.unique.into_iter().collect(),
            duplicates,
        }
    }

    /// Checksum for a name listed exactly once
    pub fn unique(&self, name: &str) -> Option<&Checksum> {
        self.unique.get(name)
    }

    /// All candidate checksums for a name listed more than once
    pub fn candidates(&self, name: &str) -> Option<&[Checksum]> {
        self.duplicates.get(name).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.unique.is_empty() && self.duplicates.is_empty()
    }

    pub fn unique_len(&self) -> usize {
        self.unique.len()
    }

    pub fn duplicate_names(&self) -> usize {
        self.duplicates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_bytes;
    use std::collections::HashSet;

    fn entry(name: &str, content: &[u8]) -> (String, Checksum) {
        (name.to_string(), hash_bytes(content))
    }

    #[test]
    fn test_all_unique() {
        let input = vec![entry("a", b"1"), entry("b", b"2")];
        let partition = partition_by_uniqueness(input.clone());
        assert_eq!(partition.unique, input);
        assert!(partition.duplicates.is_empty());
    }

    #[test]
    fn test_duplicate_moves_first_occurrence() {
        let partition = partition_by_uniqueness(vec![
            entry("a", b"1"),
            entry("b", b"2"),
            entry("a", b"3"),
            entry("c", b"4"),
            entry("a", b"5"),
        ]);

        assert_eq!(partition.unique, vec![entry("b", b"2"), entry("c", b"4")]);
        assert_eq!(
            partition.duplicates,
            vec![entry("a", b"1"), entry("a", b"3"), entry("a", b"5")]
        );
    }

    #[test]
    fn test_partitions_are_disjoint_and_cover_input() {
        let input = vec![
            entry("x", b"1"),
            entry("y", b"1"),
            entry("x", b"1"),
            entry("z", b"2"),
            entry("y", b"3"),
            entry("w", b"4"),
        ];
        let partition = partition_by_uniqueness(input.clone());

        let unique_names: HashSet<_> = partition.unique.iter().map(|(n, _)| n.clone()).collect();
        let dup_names: HashSet<_> = partition.duplicates.iter().map(|(n, _)| n.clone()).collect();
        assert!(unique_names.is_disjoint(&dup_names));
        assert_eq!(partition.unique.len() + partition.duplicates.len(), input.len());

        let mut all: Vec<_> = partition.unique.into_iter().chain(partition.duplicates).collect();
        let mut expected = input;
        all.sort();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_index_lookup() {
        let index = UnsortedSourceIndex::new(partition_by_uniqueness(vec![
            entry("test2.txt", b"x"),
            entry("test11.txt", b"11"),
            entry("test11.txt", b"112"),
        ]));

        assert_eq!(index.unique("test2.txt"), Some(&hash_bytes(b"x")));
        assert!(index.unique("test11.txt").is_none());
        assert_eq!(
            index.candidates("test11.txt"),
            Some(&[hash_bytes(b"11"), hash_bytes(b"112")][..])
        );
        assert_eq!(index.unique_len(), 1);
        assert_eq!(index.duplicate_names(), 1);
    }
}
