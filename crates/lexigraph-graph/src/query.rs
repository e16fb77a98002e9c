//! Graph Query Engine: structural queries over the linked thesaurus.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::records::{Pos, Synset};
use crate::store::RecordStore;
use crate::GraphError;

/// A display hierarchy: every level maps a synset's display name to the
/// subtree beneath it; leaves map to empty maps. Sibling name collisions
/// overwrite one subtree with another, which is an accepted approximation
/// for display output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeNode(pub BTreeMap<String, TreeNode>);

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.0.is_empty()
    }
}

/// The read-only query surface over a fully loaded and linked store.
///
/// Constructing a `Thesaurus` consumes the store, so the two-phase load
/// (records, then relations) is necessarily complete before the first
/// query: there is no partial-query mode. All results are value
/// snapshots.
#[derive(Debug)]
pub struct Thesaurus {
    store: RecordStore,
}

impl Thesaurus {
    pub fn new(store: RecordStore) -> Self {
        let dangling = store.dangling_sense_count();
        if dangling > 0 {
            tracing::warn!(dangling, "senses reference synsets that were not loaded");
        }
        Self { store }
    }

    pub fn sense_count(&self) -> usize {
        self.store.sense_count()
    }

    pub fn synset_count(&self) -> usize {
        self.store.synset_count()
    }

    /// All synsets, optionally filtered by part of speech.
    pub fn synsets(&self, pos: Option<Pos>) -> Vec<Synset> {
        self.store.all(pos)
    }

    pub fn synset(&self, id: &str) -> Result<Synset, GraphError> {
        self.store.get(id)
    }

    /// Synsets with no parents and at least one child, in store order.
    pub fn roots(&self, pos: Option<Pos>) -> Vec<Synset> {
        self.store
            .iter_synsets()
            .filter(|s| s.is_root())
            .filter(|s| pos.map_or(true, |p| s.part_of_speech == p))
            .cloned()
            .collect()
    }

    /// Synsets with both relation sets empty.
    pub fn without_relations(&self) -> Vec<Synset> {
        self.store
            .iter_synsets()
            .filter(|s| s.is_isolated())
            .cloned()
            .collect()
    }

    /// Direct hypernym-children of a synset (one hop).
    pub fn children(&self, id: &str) -> Result<Vec<String>, GraphError> {
        Ok(self.node(id)?.hypernym_for.clone())
    }

    /// All transitive descendants, by depth-first expansion over
    /// `hypernym_for`.
    ///
    /// Each identifier is appended once per hop it is reached on, so a
    /// node with several parents inside the subtree appears once per
    /// in-edge; the result is a value list, not a set, and downstream
    /// set-building callers must deduplicate themselves. A visited-set
    /// guard stops re-descending into an already-expanded node, which
    /// keeps cycles terminating.
    pub fn descendants(&self, id: &str) -> Result<Vec<String>, GraphError> {
        let root = self.node(id)?;

        let mut out = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(root.id.as_str());
        let mut stack: Vec<&Synset> = vec![root];

        while let Some(synset) = stack.pop() {
            for child_id in &synset.hypernym_for {
                out.push(child_id.clone());
                if visited.insert(child_id) {
                    stack.push(self.node(child_id)?);
                }
            }
        }

        Ok(out)
    }

    /// The display hierarchy under a root synset, keyed by display name
    /// at every level.
    ///
    /// Built without native recursion: a guarded depth-first pass
    /// produces a post-order, then subtrees are assembled children-first.
    /// A back-edge into a node whose subtree is still open (a cycle)
    /// renders as a leaf.
    pub fn tree(&self, root_id: &str) -> Result<TreeNode, GraphError> {
        let root = self.node(root_id)?;

        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(root.id.as_str());
        let mut order: Vec<&Synset> = Vec::new();
        let mut stack: Vec<(&Synset, bool)> = vec![(root, false)];

        while let Some((synset, finished)) = stack.pop() {
            if finished {
                order.push(synset);
                continue;
            }
            stack.push((synset, true));
            for child_id in &synset.hypernym_for {
                if visited.insert(child_id) {
                    stack.push((self.node(child_id)?, false));
                }
            }
        }

        let mut built: HashMap<&str, TreeNode> = HashMap::new();
        for synset in order {
            let mut children = BTreeMap::new();
            for child_id in &synset.hypernym_for {
                let child = self.node(child_id)?;
                let subtree = built.get(child.id.as_str()).cloned().unwrap_or_default();
                children.insert(child.name.clone(), subtree);
            }
            built.insert(synset.id.as_str(), TreeNode(children));
        }

        let subtree = built.remove(root.id.as_str()).unwrap_or_default();
        let mut top = BTreeMap::new();
        top.insert(root.name.clone(), subtree);
        Ok(TreeNode(top))
    }

    fn node(&self, id: &str) -> Result<&Synset, GraphError> {
        self.store
            .synset_ref(id)
            .ok_or_else(|| GraphError::SynsetNotFound { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{build_thesaurus, tree_names};

    #[test]
    fn roots_children_descendants_for_a_small_tree() {
        // A is the hypernym of B and C, no other links.
        let t = build_thesaurus(&["A", "B", "C"], &[("A", "B"), ("A", "C")]);

        let root_ids: Vec<String> = t.roots(None).into_iter().map(|s| s.id).collect();
        assert_eq!(root_ids, vec!["A"]);

        assert_eq!(t.children("A").unwrap(), vec!["B", "C"]);
        assert_eq!(t.children("B").unwrap(), Vec::<String>::new());

        let mut descendants = t.descendants("A").unwrap();
        descendants.sort();
        assert_eq!(descendants, vec!["B", "C"]);
    }

    #[test]
    fn roots_can_be_filtered_by_part_of_speech() {
        use crate::records::Pos;
        use crate::tests::{relation, synset_record};
        use crate::{link, RecordStore};

        let mut store = RecordStore::load(
            vec![],
            vec![
                synset_record("n1", "metal", Pos::Noun),
                synset_record("n2", "steel", Pos::Noun),
                synset_record("v1", "move", Pos::Verb),
                synset_record("v2", "run", Pos::Verb),
            ],
        )
        .unwrap();
        link(&mut store, &[relation("n1", "n2"), relation("v1", "v2")]).unwrap();
        let t = Thesaurus::new(store);

        let noun_roots: Vec<String> = t.roots(Some(Pos::Noun)).into_iter().map(|s| s.id).collect();
        assert_eq!(noun_roots, vec!["n1"]);
        assert_eq!(t.roots(None).len(), 2);
    }

    #[test]
    fn isolated_synsets_are_neither_roots_nor_related() {
        let t = build_thesaurus(&["A", "B", "island"], &[("A", "B")]);

        let isolated: Vec<String> = t.without_relations().into_iter().map(|s| s.id).collect();
        assert_eq!(isolated, vec!["island"]);

        let root_ids: Vec<String> = t.roots(None).into_iter().map(|s| s.id).collect();
        assert_eq!(root_ids, vec!["A"]);
    }

    #[test]
    fn descendants_keep_one_entry_per_incoming_edge() {
        // X has two parents inside the subtree of R.
        let t = build_thesaurus(
            &["R", "P1", "P2", "X"],
            &[("R", "P1"), ("R", "P2"), ("P1", "X"), ("P2", "X")],
        );

        let descendants = t.descendants("R").unwrap();
        let x_count = descendants.iter().filter(|id| id.as_str() == "X").count();
        assert_eq!(x_count, 2, "X is reached on two hops");
        assert_eq!(descendants.len(), 4);
    }

    #[test]
    fn descendants_terminate_on_a_cycle() {
        let t = build_thesaurus(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);

        let mut descendants = t.descendants("A").unwrap();
        descendants.sort();
        // The cycle edge re-reaches A itself; expansion still stops once
        // every node has been expanded.
        assert_eq!(descendants, vec!["A", "B", "C"]);
    }

    #[test]
    fn tree_is_nested_by_display_name() {
        let t = build_thesaurus(&["A", "B", "C", "D"], &[("A", "B"), ("A", "C"), ("B", "D")]);

        let tree = t.tree("A").unwrap();
        assert_eq!(tree_names(&tree), vec!["name-A"]);

        let under_a = &tree.0["name-A"];
        assert_eq!(tree_names(under_a), vec!["name-B", "name-C"]);

        let under_b = &under_a.0["name-B"];
        assert_eq!(tree_names(under_b), vec!["name-D"]);
        assert!(under_b.0["name-D"].is_leaf());
        assert!(under_a.0["name-C"].is_leaf());
    }

    #[test]
    fn tree_terminates_on_a_cycle_rendering_the_back_edge_as_a_leaf() {
        let t = build_thesaurus(&["A", "B"], &[("A", "B"), ("B", "A")]);

        let tree = t.tree("A").unwrap();
        let under_a = &tree.0["name-A"];
        let under_b = &under_a.0["name-B"];
        // B's child A is the open ancestor; it renders as a leaf.
        assert_eq!(tree_names(under_b), vec!["name-A"]);
        assert!(under_b.0["name-A"].is_leaf());
    }

    #[test]
    fn sibling_display_name_collisions_overwrite() {
        use crate::records::{Pos, SynsetRecord};
        use crate::tests::relation;
        use crate::{link, RecordStore};

        // B and C share a display name; C's subtree wins.
        let records = vec![
            SynsetRecord {
                id: "A".to_string(),
                name: "top".to_string(),
                definition: String::new(),
                part_of_speech: Pos::Noun,
                sense_ids: vec![],
            },
            SynsetRecord {
                id: "B".to_string(),
                name: "twin".to_string(),
                definition: String::new(),
                part_of_speech: Pos::Noun,
                sense_ids: vec![],
            },
            SynsetRecord {
                id: "C".to_string(),
                name: "twin".to_string(),
                definition: String::new(),
                part_of_speech: Pos::Noun,
                sense_ids: vec![],
            },
            SynsetRecord {
                id: "D".to_string(),
                name: "under-c".to_string(),
                definition: String::new(),
                part_of_speech: Pos::Noun,
                sense_ids: vec![],
            },
        ];
        let mut store = RecordStore::load(vec![], records).unwrap();
        link(
            &mut store,
            &[relation("A", "B"), relation("A", "C"), relation("C", "D")],
        )
        .unwrap();
        let t = Thesaurus::new(store);

        let tree = t.tree("A").unwrap();
        let under_top = &tree.0["top"];
        assert_eq!(tree_names(under_top), vec!["twin"]);
        // The later sibling (C, which has a child) overwrote B's empty subtree.
        assert_eq!(tree_names(&under_top.0["twin"]), vec!["under-c"]);
    }

    #[test]
    fn lookups_on_unknown_identifiers_fail_locally() {
        let t = build_thesaurus(&["A", "B"], &[("A", "B")]);

        for err in [
            t.synset("ghost").unwrap_err(),
            t.children("ghost").unwrap_err(),
            t.descendants("ghost").unwrap_err(),
            t.tree("ghost").unwrap_err(),
        ] {
            assert_eq!(
                err,
                GraphError::SynsetNotFound {
                    id: "ghost".to_string()
                }
            );
        }

        // The graph stays valid after a failed lookup.
        assert_eq!(t.children("A").unwrap(), vec!["B"]);
    }

    #[test]
    fn queries_are_idempotent() {
        let t = build_thesaurus(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("A", "C"), ("C", "D")],
        );

        assert_eq!(t.roots(None), t.roots(None));
        assert_eq!(t.synsets(None), t.synsets(None));
        assert_eq!(t.descendants("A").unwrap(), t.descendants("A").unwrap());
        assert_eq!(t.tree("A").unwrap(), t.tree("A").unwrap());
        assert_eq!(
            t.connected_components().unwrap(),
            t.connected_components().unwrap()
        );
    }
}
