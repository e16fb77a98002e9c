//! Relation Linker: wires hypernym/hyponym back-references onto synsets.

use crate::records::RelationRecord;
use crate::store::RecordStore;
use crate::GraphError;

/// Relation kinds applied as hierarchy edges. Every other kind label is
/// ignored rather than rejected, so newer relation vocabularies still
/// load cleanly.
pub const HYPERNYM_KINDS: [&str; 2] = ["hypernym", "instance hypernym"];

pub fn is_hypernym_kind(kind: &str) -> bool {
    HYPERNYM_KINDS.contains(&kind)
}

/// Apply a batch of relation records to the store.
///
/// Both endpoints of every applicable record are validated before
/// anything is written: an unknown endpoint fails the whole batch with
/// [`GraphError::UnknownSynsetReference`] and leaves the store untouched.
/// Each applied edge is recorded symmetrically in one step: the child
/// identifier goes into the parent's `hypernym_for` and the parent
/// identifier into the child's `hyponym_for`. Duplicate records produce
/// duplicate entries, matching the raw record stream.
///
/// Returns the number of applied edges.
pub fn link(store: &mut RecordStore, relations: &[RelationRecord]) -> Result<usize, GraphError> {
    let applicable: Vec<&RelationRecord> = relations
        .iter()
        .filter(|r| is_hypernym_kind(&r.kind))
        .collect();

    for record in &applicable {
        for id in [&record.parent_id, &record.child_id] {
            if !store.contains(id) {
                return Err(GraphError::UnknownSynsetReference { id: id.clone() });
            }
        }
    }

    for record in &applicable {
        store
            .synset_mut(&record.parent_id)?
            .hypernym_for
            .push(record.child_id.clone());
        store
            .synset_mut(&record.child_id)?
            .hyponym_for
            .push(record.parent_id.clone());
    }

    Ok(applicable.len())
}
