//! Dependency graph over string keys.
//!
//! A pair `(dependee, dependent)` means the dependent's value is computed
//! from the dependee's, so the dependee must be evaluated first. Every pair
//! is stored twice, once in each direction, so both "who depends on X" and
//! "what does X depend on" are single hash lookups. The two maps are only
//! ever touched together through [`DependencyGraph::link`] and
//! [`DependencyGraph::unlink`], and empty sets are dropped so that two graphs
//! holding the same pairs compare equal.
//!
//! Unknown nodes are never an error: they simply have no relations.

use log::trace;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    /// dependee -> dependents
    dependents: HashMap<String, HashSet<String>>,
    /// dependent -> dependees
    dependees: HashMap<String, HashSet<String>>,
    size: usize,
}

impl DependencyGraph {
    pub fn new() -> DependencyGraph {
        DependencyGraph::default()
    }

    /// Number of distinct pairs.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Snapshot of the nodes that depend on `node`.
    pub fn dependents(&self, node: &str) -> HashSet<String> {
        self.dependents.get(node).cloned().unwrap_or_default()
    }

    /// Snapshot of the nodes `node` depends on.
    pub fn dependees(&self, node: &str) -> HashSet<String> {
        self.dependees.get(node).cloned().unwrap_or_default()
    }

    pub fn has_dependents(&self, node: &str) -> bool {
        self.dependents.contains_key(node)
    }

    pub fn has_dependees(&self, node: &str) -> bool {
        self.dependees.contains_key(node)
    }

    pub fn num_dependents(&self, node: &str) -> usize {
        self.dependents.get(node).map_or(0, HashSet::len)
    }

    pub fn num_dependees(&self, node: &str) -> usize {
        self.dependees.get(node).map_or(0, HashSet::len)
    }

    pub fn add_dependency(&mut self, dependee: &str, dependent: &str) {
        self.link(dependee, dependent);
    }

    pub fn remove_dependency(&mut self, dependee: &str, dependent: &str) {
        self.unlink(dependee, dependent);
    }

    /// Replace every `(node, _)` pair with `(node, d)` for each `d` in `new_dependents`.
    pub fn replace_dependents<I>(&mut self, node: &str, new_dependents: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for old in self.dependents(node) {
            self.unlink(node, &old);
        }
        for dependent in new_dependents {
            self.link(node, dependent.as_ref());
        }
        trace!(
            "replaced dependents of {}: now {}",
            node,
            self.num_dependents(node)
        );
    }

    /// Replace every `(_, node)` pair with `(d, node)` for each `d` in `new_dependees`.
    pub fn replace_dependees<I>(&mut self, node: &str, new_dependees: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for old in self.dependees(node) {
            self.unlink(&old, node);
        }
        for dependee in new_dependees {
            self.link(dependee.as_ref(), node);
        }
        trace!(
            "replaced dependees of {}: now {}",
            node,
            self.num_dependees(node)
        );
    }

    /// Insert a pair into both maps. Returns false if it was already present.
    fn link(&mut self, dependee: &str, dependent: &str) -> bool {
        let added = self
            .dependents
            .entry(dependee.to_string())
            .or_default()
            .insert(dependent.to_string());
        if added {
            self.dependees
                .entry(dependent.to_string())
                .or_default()
                .insert(dependee.to_string());
            self.size += 1;
        }
        added
    }

    /// Remove a pair from both maps. Returns false if it was absent.
    fn unlink(&mut self, dependee: &str, dependent: &str) -> bool {
        let removed = remove_from(&mut self.dependents, dependee, dependent);
        if removed {
            remove_from(&mut self.dependees, dependent, dependee);
            self.size -= 1;
        }
        removed
    }
}

/// Remove `value` from the set under `key`, dropping the set once empty.
fn remove_from(map: &mut HashMap<String, HashSet<String>>, key: &str, value: &str) -> bool {
    let Some(set) = map.get_mut(key) else {
        return false;
    };
    let removed = set.remove(value);
    if set.is_empty() {
        map.remove(key);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_graph() {
        let g = DependencyGraph::new();
        assert_eq!(g.size(), 0);
        assert!(g.is_empty());
        assert!(g.dependents("a").is_empty());
        assert!(g.dependees("a").is_empty());
        assert!(!g.has_dependents("a"));
        assert!(!g.has_dependees("a"));
        assert_eq!(g.num_dependees("a"), 0);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut g = DependencyGraph::new();
        g.add_dependency("a", "b");
        g.add_dependency("a", "b");
        assert_eq!(g.size(), 1);
        assert_eq!(g.dependents("a"), set(&["b"]));
        assert_eq!(g.dependees("b"), set(&["a"]));
        assert!(g.has_dependents("a"));
        assert!(!g.has_dependees("a"));
    }

    #[test]
    fn test_remove() {
        let mut g = DependencyGraph::new();
        g.add_dependency("a", "b");
        g.add_dependency("a", "c");
        g.remove_dependency("a", "b");
        g.remove_dependency("a", "b");
        g.remove_dependency("x", "y");
        assert_eq!(g.size(), 1);
        assert_eq!(g.dependents("a"), set(&["c"]));
        assert!(!g.has_dependees("b"));
    }

    #[test]
    fn test_remove_everything_equals_new() {
        let mut g = DependencyGraph::new();
        g.add_dependency("a", "b");
        g.remove_dependency("a", "b");
        assert_eq!(g, DependencyGraph::new());
    }

    #[test]
    fn test_snapshots_are_independent() {
        let mut g = DependencyGraph::new();
        g.add_dependency("a", "b");
        let mut snapshot = g.dependents("a");
        snapshot.insert("z".to_string());
        g.add_dependency("a", "c");
        assert_eq!(g.dependents("a"), set(&["b", "c"]));
        assert_eq!(snapshot, set(&["b", "z"]));
    }

    #[test]
    fn test_self_loop_is_stored() {
        let mut g = DependencyGraph::new();
        g.add_dependency("a", "a");
        assert_eq!(g.size(), 1);
        assert_eq!(g.dependents("a"), set(&["a"]));
        assert_eq!(g.dependees("a"), set(&["a"]));
    }

    #[test]
    fn test_replace_dependents() {
        let mut g = DependencyGraph::new();
        g.add_dependency("a", "b");
        g.add_dependency("a", "c");
        g.add_dependency("d", "c");
        g.replace_dependents("a", ["x", "y", "b"]);
        assert_eq!(g.size(), 4);
        assert_eq!(g.dependents("a"), set(&["x", "y", "b"]));
        assert_eq!(g.dependees("c"), set(&["d"]));
        assert_eq!(g.dependees("x"), set(&["a"]));
    }

    #[test]
    fn test_replace_dependees() {
        let mut g = DependencyGraph::new();
        g.add_dependency("a", "b");
        g.add_dependency("c", "b");
        g.add_dependency("c", "d");
        g.replace_dependees("b", Vec::<String>::new());
        assert_eq!(g.size(), 1);
        assert!(!g.has_dependees("b"));
        assert!(!g.has_dependents("a"));
        g.replace_dependees("z", ["a", "a", "c"]);
        assert_eq!(g.size(), 3);
        assert_eq!(g.num_dependees("z"), 2);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Add(u8, u8),
        Remove(u8, u8),
        ReplaceDependents(u8, Vec<u8>),
        ReplaceDependees(u8, Vec<u8>),
    }

    fn op() -> impl Strategy<Value = Op> {
        let node = 0u8..6;
        prop_oneof![
            (node.clone(), node.clone()).prop_map(|(a, b)| Op::Add(a, b)),
            (node.clone(), node.clone()).prop_map(|(a, b)| Op::Remove(a, b)),
            (node.clone(), prop::collection::vec(node.clone(), 0..4))
                .prop_map(|(a, bs)| Op::ReplaceDependents(a, bs)),
            (node.clone(), prop::collection::vec(node, 0..4))
                .prop_map(|(a, bs)| Op::ReplaceDependees(a, bs)),
        ]
    }

    fn name(n: u8) -> String {
        format!("n{}", n)
    }

    proptest! {
        #[test]
        fn prop_directions_stay_mirrored(ops in prop::collection::vec(op(), 0..40)) {
            let mut g = DependencyGraph::new();
            let mut pairs = HashSet::new();
            for op in ops {
                match op {
                    Op::Add(a, b) => {
                        g.add_dependency(&name(a), &name(b));
                        pairs.insert((a, b));
                    }
                    Op::Remove(a, b) => {
                        g.remove_dependency(&name(a), &name(b));
                        pairs.remove(&(a, b));
                    }
                    Op::ReplaceDependents(a, bs) => {
                        g.replace_dependents(&name(a), bs.iter().map(|b| name(*b)));
                        pairs.retain(|(x, _)| *x != a);
                        pairs.extend(bs.iter().map(|b| (a, *b)));
                    }
                    Op::ReplaceDependees(b, as_) => {
                        g.replace_dependees(&name(b), as_.iter().map(|a| name(*a)));
                        pairs.retain(|(_, y)| *y != b);
                        pairs.extend(as_.iter().map(|a| (*a, b)));
                    }
                }
            }

            prop_assert_eq!(g.size(), pairs.len());
            for x in 0..6u8 {
                for y in 0..6u8 {
                    let forward = g.dependents(&name(x)).contains(&name(y));
                    let backward = g.dependees(&name(y)).contains(&name(x));
                    prop_assert_eq!(forward, backward);
                    prop_assert_eq!(forward, pairs.contains(&(x, y)));
                }
            }
        }
    }
}
