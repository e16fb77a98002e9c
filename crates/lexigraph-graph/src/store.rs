//! Record Store: identifier-keyed mappings of loaded senses and synsets.

use indexmap::IndexMap;

use crate::records::{Pos, Sense, Synset, SynsetRecord};
use crate::{GraphError, RecordKind};

/// Raw parsed records keyed by identifier.
///
/// Insertion order is preserved so that root enumeration, and therefore
/// component merging, is deterministic for a given record order.
#[derive(Debug, Default)]
pub struct RecordStore {
    senses: IndexMap<String, Sense>,
    synsets: IndexMap<String, Synset>,
}

impl RecordStore {
    /// Ingest sense and synset records.
    ///
    /// Fails with [`GraphError::DuplicateIdentifier`] on the first
    /// identifier repeated within either mapping.
    pub fn load(senses: Vec<Sense>, synsets: Vec<SynsetRecord>) -> Result<Self, GraphError> {
        let mut store = Self::default();

        for sense in senses {
            if store.senses.contains_key(&sense.id) {
                return Err(GraphError::DuplicateIdentifier {
                    kind: RecordKind::Sense,
                    id: sense.id,
                });
            }
            store.senses.insert(sense.id.clone(), sense);
        }

        for record in synsets {
            if store.synsets.contains_key(&record.id) {
                return Err(GraphError::DuplicateIdentifier {
                    kind: RecordKind::Synset,
                    id: record.id,
                });
            }
            store
                .synsets
                .insert(record.id.clone(), Synset::from_record(record));
        }

        tracing::info!(
            senses = store.senses.len(),
            synsets = store.synsets.len(),
            "loaded thesaurus records"
        );

        Ok(store)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.synsets.contains_key(id)
    }

    /// Defensive copy of one synset.
    pub fn get(&self, id: &str) -> Result<Synset, GraphError> {
        self.synsets
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::SynsetNotFound { id: id.to_string() })
    }

    /// Defensive copies of all synsets, optionally filtered by part of
    /// speech, in insertion order.
    pub fn all(&self, pos: Option<Pos>) -> Vec<Synset> {
        self.synsets
            .values()
            .filter(|s| pos.map_or(true, |p| s.part_of_speech == p))
            .cloned()
            .collect()
    }

    pub fn sense_count(&self) -> usize {
        self.senses.len()
    }

    pub fn synset_count(&self) -> usize {
        self.synsets.len()
    }

    /// Senses whose owning synset was never loaded. Tolerated (callers
    /// may operate on partial data) but counted, never dropped.
    pub fn dangling_sense_count(&self) -> usize {
        self.senses
            .values()
            .filter(|s| !self.synsets.contains_key(&s.synset_id))
            .count()
    }

    pub(crate) fn synset_ref(&self, id: &str) -> Option<&Synset> {
        self.synsets.get(id)
    }

    pub(crate) fn synset_mut(&mut self, id: &str) -> Result<&mut Synset, GraphError> {
        self.synsets
            .get_mut(id)
            .ok_or_else(|| GraphError::SynsetNotFound { id: id.to_string() })
    }

    pub(crate) fn iter_synsets(&self) -> impl Iterator<Item = &Synset> {
        self.synsets.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{sense, synset_record};

    #[test]
    fn loads_records_and_reports_counts() {
        let store = RecordStore::load(
            vec![sense("w1", "s1"), sense("w2", "s1")],
            vec![synset_record("s1", "metal", Pos::Noun)],
        )
        .unwrap();

        assert_eq!(store.sense_count(), 2);
        assert_eq!(store.synset_count(), 1);
        assert_eq!(store.get("s1").unwrap().name, "metal");
    }

    #[test]
    fn duplicate_sense_identifier_is_fatal() {
        let err = RecordStore::load(vec![sense("w1", "s1"), sense("w1", "s2")], vec![])
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateIdentifier {
                kind: RecordKind::Sense,
                id: "w1".to_string(),
            }
        );
    }

    #[test]
    fn duplicate_synset_identifier_is_fatal() {
        let err = RecordStore::load(
            vec![],
            vec![
                synset_record("s1", "metal", Pos::Noun),
                synset_record("s1", "alloy", Pos::Noun),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateIdentifier {
                kind: RecordKind::Synset,
                id: "s1".to_string(),
            }
        );
    }

    #[test]
    fn unknown_lookup_reports_the_missing_identifier() {
        let store = RecordStore::load(vec![], vec![]).unwrap();
        let err = store.get("nope").unwrap_err();
        assert_eq!(
            err,
            GraphError::SynsetNotFound {
                id: "nope".to_string()
            }
        );
    }

    #[test]
    fn all_filters_by_part_of_speech_in_insertion_order() {
        let store = RecordStore::load(
            vec![],
            vec![
                synset_record("s1", "run", Pos::Verb),
                synset_record("s2", "metal", Pos::Noun),
                synset_record("s3", "walk", Pos::Verb),
            ],
        )
        .unwrap();

        let verbs: Vec<String> = store
            .all(Some(Pos::Verb))
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(verbs, vec!["s1", "s3"]);

        let everything: Vec<String> = store.all(None).into_iter().map(|s| s.id).collect();
        assert_eq!(everything, vec!["s1", "s2", "s3"]);
    }

    #[test]
    fn query_results_are_snapshots_not_shared_references() {
        let store = RecordStore::load(vec![], vec![synset_record("s1", "metal", Pos::Noun)])
            .unwrap();

        let mut copy = store.get("s1").unwrap();
        copy.hypernym_for.push("garbage".to_string());
        copy.name = "mutated".to_string();

        let fresh = store.get("s1").unwrap();
        assert_eq!(fresh.name, "metal");
        assert!(fresh.hypernym_for.is_empty());
    }

    #[test]
    fn dangling_senses_are_kept_and_counted() {
        let store = RecordStore::load(
            vec![sense("w1", "s1"), sense("w2", "ghost")],
            vec![synset_record("s1", "metal", Pos::Noun)],
        )
        .unwrap();

        assert_eq!(store.sense_count(), 2);
        assert_eq!(store.dangling_sense_count(), 1);
    }
}
