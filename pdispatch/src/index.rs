//! Predicate trie used to index handlers.
//!
//! The index stores ordered sequences of predicates as paths from a root
//! node. Each node may hold a value; nodes that only join paths hold none.
//!
//! # Algorithm Overview
//!
//! 1. **Insert**: walk the sequence, reusing the edge whose predicate is
//!    the *same* predicate (identity, not behaviour) and appending a new
//!    edge otherwise. Store the value on the last node.
//! 2. **Lookup**: walk the features, taking at each node the most recently
//!    added edge whose predicate accepts the feature. Stop with nothing as
//!    soon as no edge accepts.
//!
//! Edges live in an insertion-ordered `Vec` rather than a map: insertion
//! order decides which of several accepting edges wins.

use std::fmt;

use crate::predicate::Predicate;

/// A trie keyed by predicate identity.
pub struct MatchIndex<F, V> {
    root: Node<F, V>,
    len: usize,
}

/// One position along a predicate path.
struct Node<F, V> {
    value: Option<V>,
    edges: Vec<Edge<F, V>>,
}

/// A guarded link to an owned child node.
struct Edge<F, V> {
    predicate: Predicate<F>,
    node: Node<F, V>,
}

impl<F, V> Node<F, V> {
    fn new() -> Self {
        Self {
            value: None,
            edges: Vec::new(),
        }
    }

    /// Returns the child reached through `predicate`, creating it if needed.
    fn child_for(&mut self, predicate: &Predicate<F>) -> &mut Node<F, V> {
        let pos = match self.edges.iter().position(|e| e.predicate.same(predicate)) {
            Some(pos) => pos,
            None => {
                self.edges.push(Edge {
                    predicate: predicate.clone(),
                    node: Node::new(),
                });
                self.edges.len() - 1
            }
        };
        &mut self.edges[pos].node
    }

    /// Finds the traversable child for a feature. Later edges take priority.
    fn traverse(&self, feature: &F) -> Option<&Node<F, V>> {
        self.edges
            .iter()
            .rev()
            .find(|e| e.predicate.test(feature))
            .map(|e| &e.node)
    }

    fn count(&self) -> usize {
        1 + self.edges.iter().map(|e| e.node.count()).sum::<usize>()
    }
}

impl<F, V> MatchIndex<F, V> {
    /// Creates an empty index, consisting only of its root.
    pub fn new() -> Self {
        Self {
            root: Node::new(),
            len: 0,
        }
    }

    /// Associates `value` with a sequence of predicates.
    ///
    /// An empty sequence stores the value on the root. Registering the same
    /// sequence again replaces the stored value, which is returned.
    pub fn set_value<'a, I>(&mut self, predicates: I, value: V) -> Option<V>
    where
        I: IntoIterator<Item = &'a Predicate<F>>,
        F: 'a,
    {
        let mut current = &mut self.root;
        for predicate in predicates {
            current = current.child_for(predicate);
        }
        let previous = current.value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Retrieves the value whose predicates accept the given features.
    ///
    /// Returns `None` when some feature is accepted by no edge, or when the
    /// node reached after the last feature holds no value. Features beyond
    /// the depth of every registered path therefore miss.
    pub fn get_value<'a, I>(&self, features: I) -> Option<&V>
    where
        I: IntoIterator<Item = &'a F>,
        F: 'a,
    {
        let mut current = &self.root;
        for feature in features {
            current = current.traverse(feature)?;
        }
        current.value.as_ref()
    }

    /// Retrieves the value stored under exactly this predicate sequence.
    ///
    /// Edges are followed by identity; no predicate is evaluated.
    pub fn get_exact<'a, I>(&self, predicates: I) -> Option<&V>
    where
        I: IntoIterator<Item = &'a Predicate<F>>,
        F: 'a,
    {
        let mut current = &self.root;
        for predicate in predicates {
            current = current
                .edges
                .iter()
                .find(|e| e.predicate.same(predicate))
                .map(|e| &e.node)?;
        }
        current.value.as_ref()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no value has been stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.root.count()
    }
}

impl<F, V> Default for MatchIndex<F, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F, V: fmt::Debug> fmt::Debug for MatchIndex<F, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(|value| format!("{:?}", value)))
    }
}

impl<F, V> MatchIndex<F, V> {
    /// Renders the tree one edge per line, indented by depth.
    ///
    /// Edges are listed in insertion order; nodes holding a value are
    /// suffixed with ` => ` and the output of `show`.
    pub fn render_with<D, S>(&self, show: S) -> String
    where
        D: fmt::Display,
        S: Fn(&V) -> D,
    {
        fn walk<F, V, D: fmt::Display>(
            node: &Node<F, V>,
            depth: usize,
            show: &dyn Fn(&V) -> D,
            out: &mut String,
        ) {
            for edge in &node.edges {
                out.push_str(&format!("{:indent$}{:?}", "", edge.predicate, indent = depth * 2));
                if let Some(value) = &edge.node.value {
                    out.push_str(&format!(" => {}", show(value)));
                }
                out.push('\n');
                walk(&edge.node, depth + 1, show, out);
            }
        }

        let mut out = String::from("<root>");
        if let Some(value) = &self.root.value {
            out.push_str(&format!(" => {}", show(value)));
        }
        out.push('\n');
        walk(&self.root, 1, &show, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn equals(expected: &'static str) -> Predicate<&'static str> {
        Predicate::new(move |x: &&'static str| *x == expected)
    }

    fn always(result: bool) -> Predicate<&'static str> {
        Predicate::new(move |_: &&'static str| result)
    }

    #[test]
    fn test_get_matching_value() {
        let mut index = MatchIndex::new();
        let p1 = equals("feature1");
        let p2 = equals("feature2");

        index.set_value(&[p1, p2], "pred1-pred2-value");

        assert_eq!(index.get_value(&["feature1", "feature2"]), Some(&"pred1-pred2-value"));
    }

    #[test]
    fn test_missing_value_depth() {
        let mut index = MatchIndex::new();
        let p1 = equals("feature1");
        let p2 = equals("feature2");

        index.set_value(&[p1, p2], "pred1-pred2-value");

        // Too few features lands on an internal node.
        assert_eq!(index.get_value(&["feature1"]), None);
        // Too many features walks off the end of the path.
        assert_eq!(index.get_value(&["feature1", "feature2", "feature3"]), None);
    }

    #[test]
    fn test_unsatisfied_features() {
        let mut index = MatchIndex::new();
        index.set_value(&[always(true), always(false)], "value");

        assert_eq!(index.get_value(&["feature1", "feature2"]), None);
    }

    #[test]
    fn test_set_overrides() {
        let mut index = MatchIndex::new();
        let p1 = equals("feature1");
        let p2 = equals("feature2");

        assert_eq!(index.set_value(&[p1.clone(), p2.clone()], "old"), None);
        assert_eq!(index.set_value(&[p1, p2], "new"), Some("old"));

        assert_eq!(index.get_value(&["feature1", "feature2"]), Some(&"new"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_empty_sequence_uses_root() {
        let mut index: MatchIndex<&str, u32> = MatchIndex::new();
        assert_eq!(index.get_value(&[]), None);

        index.set_value(&[], 7);

        assert_eq!(index.get_value(&[]), Some(&7));
        assert_eq!(index.node_count(), 1);
    }

    #[test]
    fn test_prefix_sharing() {
        let mut index = MatchIndex::new();
        let p1 = equals("a");
        let p2 = equals("b");
        let p3 = equals("c");

        index.set_value(&[p1.clone(), p2], 1);
        index.set_value(&[p1, p3], 2);

        // root -> p1 -> {p2, p3}
        assert_eq!(index.node_count(), 4);
        assert_eq!(index.get_value(&["a", "b"]), Some(&1));
        assert_eq!(index.get_value(&["a", "c"]), Some(&2));
        assert_eq!(index.get_value(&["a", "a"]), None);
    }

    #[test]
    fn test_behaviourally_equal_predicates_stay_separate() {
        let mut index = MatchIndex::new();
        index.set_value(&[equals("a")], 1);
        index.set_value(&[equals("a")], 2);

        assert_eq!(index.node_count(), 3);
        assert_eq!(index.len(), 2);
        // The later edge wins the tie.
        assert_eq!(index.get_value(&["a"]), Some(&2));
    }

    #[test]
    fn test_most_recent_edge_wins() {
        let mut index = MatchIndex::new();
        let old = always(true);
        let new = equals("x");

        index.set_value(&[old, always(true)], "old");
        index.set_value(&[new, always(true)], "new");

        assert_eq!(index.get_value(&["x", "y"]), Some(&"new"));
        // Only the older, broader edge accepts this one.
        assert_eq!(index.get_value(&["z", "y"]), Some(&"old"));
    }

    #[test]
    fn test_no_backtracking_after_choice() {
        let mut index = MatchIndex::new();
        let any = always(true);

        index.set_value(&[any, equals("left")], "left");
        index.set_value(&[equals("x"), equals("right")], "right");

        // "x" commits to the newer edge; its subtree has no "left" path.
        assert_eq!(index.get_value(&["x", "left"]), None);
        assert_eq!(index.get_value(&["y", "left"]), Some(&"left"));
    }

    #[test]
    fn test_get_exact_follows_identity() {
        let mut index = MatchIndex::new();
        let p1 = equals("a");
        let p2 = always(true);

        index.set_value(&[p1.clone(), p2.clone()], 1);

        assert_eq!(index.get_exact(&[p1.clone(), p2]), Some(&1));
        assert_eq!(index.get_exact(&[p1.clone()]), None);
        // Accepts the same features, but is a different predicate.
        assert_eq!(index.get_exact(&[p1, always(true)]), None);
    }

    #[test]
    fn test_short_circuits_on_first_match() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counted = {
            let calls = Arc::clone(&calls);
            Predicate::new(move |_: &&'static str| {
                calls.fetch_add(1, Ordering::SeqCst);
                true
            })
        };

        let mut index = MatchIndex::new();
        index.set_value(&[counted], 1);
        index.set_value(&[always(true)], 2);

        assert_eq!(index.get_value(&["f"]), Some(&2));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_debug_rendering() {
        let mut index = MatchIndex::new();
        let num = Predicate::named("number", |x: &&'static str| x.parse::<f64>().is_ok());
        let any = Predicate::named("any", |_: &&'static str| true);

        index.set_value(&[num.clone(), num.clone()], "add");
        index.set_value(&[num, any], "first");

        let rendered = format!("{:?}", index);
        assert_eq!(
            rendered,
            "<root>\n  number\n    number => \"add\"\n    any => \"first\"\n"
        );

        let rendered = index.render_with(|name| name.to_uppercase());
        assert_eq!(rendered, "<root>\n  number\n    number => ADD\n    any => FIRST\n");
    }
}
