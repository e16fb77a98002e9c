//! Connected-Component Resolver: groups roots whose subtrees overlap.
//!
//! The hierarchy is not a strict forest: a node with several parents
//! bridges otherwise-separate root subtrees. Two roots belong to the same
//! component iff their descendant sets intersect, transitively.

use std::collections::{BTreeSet, HashSet};

use crate::query::Thesaurus;
use crate::GraphError;

impl Thesaurus {
    /// Partition the roots into connected components.
    ///
    /// Fixed-point pairwise merge: one component per root, each paired
    /// with its full descendant set; index-ordered pairs are scanned and
    /// the first intersecting pair is merged (the union lands at the
    /// lower index, its descendant set is recomputed from scratch), then
    /// the scan restarts. A full pass with no merge terminates.
    ///
    /// Only the merged component's descendant set is recomputed:
    /// [`Thesaurus::descendants`] is pure, so the untouched components'
    /// sets cannot have changed and the resulting partition and output
    /// order match a full recomputation.
    pub fn connected_components(&self) -> Result<Vec<BTreeSet<String>>, GraphError> {
        let mut components: Vec<BTreeSet<String>> = self
            .roots(None)
            .into_iter()
            .map(|root| BTreeSet::from([root.id]))
            .collect();

        let mut reachable: Vec<HashSet<String>> = components
            .iter()
            .map(|roots| self.reachable_union(roots))
            .collect::<Result<_, _>>()?;

        while let Some((i, j)) = first_intersecting_pair(&reachable) {
            let absorbed = components.remove(j);
            reachable.remove(j);
            components[i].extend(absorbed);
            reachable[i] = self.reachable_union(&components[i])?;
        }

        Ok(components)
    }

    /// Union of the descendant value lists of a component's roots,
    /// coerced to a set for intersection testing.
    fn reachable_union(&self, roots: &BTreeSet<String>) -> Result<HashSet<String>, GraphError> {
        let mut out = HashSet::new();
        for root in roots {
            out.extend(self.descendants(root)?);
        }
        Ok(out)
    }
}

fn first_intersecting_pair(sets: &[HashSet<String>]) -> Option<(usize, usize)> {
    for i in 0..sets.len() {
        for j in i + 1..sets.len() {
            if !sets[i].is_disjoint(&sets[j]) {
                return Some((i, j));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::build_thesaurus;

    fn groups(t: &Thesaurus) -> Vec<Vec<String>> {
        t.connected_components()
            .unwrap()
            .into_iter()
            .map(|set| set.into_iter().collect())
            .collect()
    }

    #[test]
    fn disjoint_trees_stay_in_singleton_groups() {
        let t = build_thesaurus(
            &["R1", "a", "b", "R2", "c"],
            &[("R1", "a"), ("R1", "b"), ("R2", "c")],
        );

        assert_eq!(groups(&t), vec![vec!["R1"], vec!["R2"]]);
    }

    #[test]
    fn roots_sharing_a_descendant_are_merged() {
        // X has two parents; R1 and R2 are otherwise separate roots.
        let t = build_thesaurus(&["R1", "R2", "X"], &[("R1", "X"), ("R2", "X")]);

        assert_eq!(groups(&t), vec![vec!["R1", "R2"]]);
    }

    #[test]
    fn merging_is_transitive_across_bridges() {
        // R1 and R2 share X; R2 and R3 share Y; R4 is separate.
        let t = build_thesaurus(
            &["R1", "R2", "R3", "R4", "X", "Y", "z"],
            &[
                ("R1", "X"),
                ("R2", "X"),
                ("R2", "Y"),
                ("R3", "Y"),
                ("R4", "z"),
            ],
        );

        assert_eq!(groups(&t), vec![vec!["R1", "R2", "R3"], vec!["R4"]]);
    }

    #[test]
    fn every_root_lands_in_exactly_one_group() {
        let t = build_thesaurus(
            &["R1", "R2", "R3", "a", "b", "c"],
            &[("R1", "a"), ("R2", "b"), ("R3", "c"), ("R1", "b")],
        );

        let components = t.connected_components().unwrap();
        let mut seen = std::collections::HashSet::new();
        for group in &components {
            for root in group {
                assert!(seen.insert(root.clone()), "{root} appeared twice");
            }
        }
        let root_count = t.roots(None).len();
        assert_eq!(seen.len(), root_count);
        // R1 and R2 both reach b.
        assert_eq!(components.len(), 2);
    }

    #[test]
    fn a_graph_without_roots_has_no_components() {
        // A two-node cycle has no root and no component.
        let t = build_thesaurus(&["A", "B"], &[("A", "B"), ("B", "A")]);
        assert!(t.connected_components().unwrap().is_empty());
    }
}
