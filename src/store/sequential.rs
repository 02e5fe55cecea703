//! Branch/revision index for sequential thought records.

use std::collections::HashMap;

use super::ThoughtData;

/// Index over a sequential chain of thoughts.
///
/// Owns the thought log plus two derived groupings: branch membership and
/// revision lists. Both are updated by the single [`add`](Self::add) entry
/// point, so they can never drift apart. The groupings hold positions into
/// the log rather than copies.
///
/// Sequence numbers are caller-supplied and shared across branches; the
/// global ordering interleaves branches in one numbering space, while each
/// branch keeps its own insertion-order sub-sequence.
#[derive(Debug, Default)]
pub struct SequentialStore {
    thoughts: Vec<ThoughtData>,
    branches: HashMap<String, Vec<usize>>,
    revisions: HashMap<u32, Vec<usize>>,
}

impl SequentialStore {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a thought, filing it under its branch and/or the revision list
    /// of the sequence number it revises.
    pub fn add(&mut self, thought: ThoughtData) {
        let pos = self.thoughts.len();

        if let Some(branch_id) = &thought.branch_id {
            self.branches.entry(branch_id.clone()).or_default().push(pos);
        }

        if thought.is_revision.unwrap_or(false) {
            if let Some(revised) = thought.revises_thought {
                self.revisions.entry(revised).or_default().push(pos);
            }
        }

        self.thoughts.push(thought);
    }

    /// Rebuild the index from a stored snapshot by replaying every thought
    /// through [`add`](Self::add), in stored order.
    pub fn from_thoughts<I>(thoughts: I) -> Self
    where
        I: IntoIterator<Item = ThoughtData>,
    {
        let mut store = Self::new();
        for thought in thoughts {
            store.add(thought);
        }
        store
    }

    /// All thoughts, ascending by sequence number. The sort is stable, so
    /// ties keep insertion order. Branch membership does not affect the
    /// global ordering.
    pub fn get_all(&self) -> Vec<ThoughtData> {
        let mut all = self.thoughts.clone();
        all.sort_by_key(|t| t.thought_number);
        all
    }

    /// The insertion-order thoughts of one branch; empty if unknown.
    pub fn get_branch(&self, branch_id: &str) -> Vec<ThoughtData> {
        self.branches
            .get(branch_id)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&pos| self.thoughts[pos].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The insertion-order thoughts revising a sequence number; empty if
    /// unknown.
    pub fn get_revisions(&self, thought_number: u32) -> Vec<ThoughtData> {
        self.revisions
            .get(&thought_number)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&pos| self.thoughts[pos].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of thoughts in the log.
    pub fn len(&self) -> usize {
        self.thoughts.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.thoughts.is_empty()
    }

    /// Remove all thoughts and groupings.
    pub fn clear(&mut self) {
        self.thoughts.clear();
        self.branches.clear();
        self.revisions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thought(n: u32) -> ThoughtData {
        ThoughtData::new(format!("thought {}", n), n, 5, true)
    }

    #[test]
    fn test_global_order_interleaves_branches() {
        let mut store = SequentialStore::new();
        assert!(store.is_empty());
        store.add(thought(1));
        store.add(thought(3));
        store.add(thought(2).with_branch("b", 1));
        assert_eq!(store.len(), 3);

        let numbers: Vec<u32> = store.get_all().iter().map(|t| t.thought_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_branch_keeps_insertion_order() {
        let mut store = SequentialStore::new();
        store.add(thought(4).with_branch("alt", 2));
        store.add(thought(2).with_branch("alt", 2));

        let numbers: Vec<u32> = store
            .get_branch("alt")
            .iter()
            .map(|t| t.thought_number)
            .collect();
        assert_eq!(numbers, vec![4, 2], "branch order is insertion order");
        assert!(store.get_branch("missing").is_empty());
    }

    #[test]
    fn test_revision_grouping_keeps_original_position() {
        let mut store = SequentialStore::new();
        store.add(thought(1));
        store.add(thought(2));
        store.add(thought(5).as_revision_of(2));

        let revisions = store.get_revisions(2);
        assert_eq!(revisions.len(), 1);
        assert_eq!(revisions[0].thought_number, 5);

        // The revision still appears in the global order at its own number.
        let numbers: Vec<u32> = store.get_all().iter().map(|t| t.thought_number).collect();
        assert_eq!(numbers, vec![1, 2, 5]);
    }

    #[test]
    fn test_revises_thought_without_flag_is_not_filed() {
        let mut store = SequentialStore::new();
        let mut t = thought(3);
        t.revises_thought = Some(1);
        store.add(t);

        assert!(store.get_revisions(1).is_empty());
    }

    #[test]
    fn test_stable_sort_breaks_ties_by_insertion() {
        let mut store = SequentialStore::new();
        let mut first = thought(2);
        first.thought = "first".to_string();
        let mut second = thought(2);
        second.thought = "second".to_string();
        store.add(first);
        store.add(second);

        let all = store.get_all();
        assert_eq!(all[0].thought, "first");
        assert_eq!(all[1].thought, "second");
    }

    #[test]
    fn test_rebuild_matches_live_adds() {
        let mut live = SequentialStore::new();
        live.add(thought(1));
        live.add(thought(2).with_branch("b", 1));
        live.add(thought(3).as_revision_of(1));

        let rebuilt = SequentialStore::from_thoughts(live.thoughts.clone());

        assert_eq!(rebuilt.get_all(), live.get_all());
        assert_eq!(rebuilt.get_branch("b"), live.get_branch("b"));
        assert_eq!(rebuilt.get_revisions(1), live.get_revisions(1));
    }
}
