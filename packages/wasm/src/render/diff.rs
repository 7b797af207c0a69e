//! Keyed diff between the elements on screen and the elements of a new layout.

use std::collections::HashSet;
use std::hash::Hash;

/// Three disjoint key sets: new, persisting and departing elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedDiff<K> {
    /// In `next` but not on screen, in `next` order.
    pub entering: Vec<K>,
    /// In both, in `next` order.
    pub updating: Vec<K>,
    /// On screen but not in `next`, in `current` order.
    pub exiting: Vec<K>,
}

/// Handles each population of a [`KeyedDiff`].
pub trait DiffVisitor<K> {
    fn enter(&mut self, key: K);
    fn update(&mut self, key: K);
    fn exit(&mut self, key: K);
}

impl<K: Copy + Eq + Hash> KeyedDiff<K> {
    /// Classify keys. Duplicate keys in `next` are only counted once.
    pub fn compute<C, N>(current: C, next: N) -> Self
    where
        C: IntoIterator<Item = K>,
        N: IntoIterator<Item = K>,
    {
        let current: Vec<K> = current.into_iter().collect();
        let on_screen: HashSet<K> = current.iter().copied().collect();
        let mut seen: HashSet<K> = HashSet::new();

        let mut entering = Vec::new();
        let mut updating = Vec::new();
        for key in next {
            if !seen.insert(key) {
                continue;
            }
            if on_screen.contains(&key) {
                updating.push(key);
            } else {
                entering.push(key);
            }
        }

        let exiting = current.into_iter().filter(|key| !seen.contains(key)).collect();

        Self {
            entering,
            updating,
            exiting,
        }
    }

    /// Run the visitor over all three populations: exits, then updates, then entries.
    pub fn visit<V: DiffVisitor<K>>(&self, visitor: &mut V) {
        for &key in &self.exiting {
            visitor.exit(key);
        }
        for &key in &self.updating {
            visitor.update(key);
        }
        for &key in &self.entering {
            visitor.enter(key);
        }
    }

    /// True when nothing enters or leaves.
    pub fn is_stable(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl DiffVisitor<u32> for Recorder {
        fn enter(&mut self, key: u32) {
            self.0.push(format!("+{key}"));
        }
        fn update(&mut self, key: u32) {
            self.0.push(format!("={key}"));
        }
        fn exit(&mut self, key: u32) {
            self.0.push(format!("-{key}"));
        }
    }

    #[test]
    fn test_three_way_split() {
        let diff = KeyedDiff::compute([1, 2, 3], [3, 4, 1, 5]);
        assert_eq!(diff.entering, vec![4, 5]);
        assert_eq!(diff.updating, vec![3, 1]);
        assert_eq!(diff.exiting, vec![2]);
        assert!(!diff.is_stable());
    }

    #[test]
    fn test_identical_sets_are_stable() {
        let diff = KeyedDiff::compute([1, 2], [2, 1]);
        assert!(diff.is_stable());
        assert_eq!(diff.updating, vec![2, 1]);
    }

    #[test]
    fn test_duplicates_in_next_counted_once() {
        let diff = KeyedDiff::compute(Vec::<u32>::new(), [7, 7]);
        assert_eq!(diff.entering, vec![7]);
    }

    #[test]
    fn test_visit_order() {
        let diff = KeyedDiff::compute([1, 2], [2, 3]);
        let mut recorder = Recorder::default();
        diff.visit(&mut recorder);
        assert_eq!(recorder.0, vec!["-1", "=2", "+3"]);
    }
}
