//! Value types for thesaurus records and linked synsets.
//!
//! Records are built field by field against a fixed schema by the ingest
//! boundary; nothing here accepts arbitrary attribute bags.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Part of speech
// ============================================================================

/// Part-of-speech tag carried by synsets and the split record files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pos {
    Noun,
    Verb,
    Adjective,
}

impl Pos {
    /// The load order of the split record files.
    pub const ALL: [Pos; 3] = [Pos::Noun, Pos::Verb, Pos::Adjective];

    /// Canonical tag as carried by `part_of_speech` attributes.
    pub fn tag(self) -> &'static str {
        match self {
            Pos::Noun => "N",
            Pos::Verb => "V",
            Pos::Adjective => "Adj",
        }
    }

    /// Single-letter tag used in record file names (`senses.A.xml`).
    pub fn file_tag(self) -> &'static str {
        match self {
            Pos::Noun => "N",
            Pos::Verb => "V",
            Pos::Adjective => "A",
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Raised when a record carries a part-of-speech tag outside the fixed
/// schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognized part-of-speech tag: {0}")]
pub struct UnknownPosTag(pub String);

impl FromStr for Pos {
    type Err = UnknownPosTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Pos::Noun),
            "V" => Ok(Pos::Verb),
            "A" | "Adj" => Ok(Pos::Adjective),
            other => Err(UnknownPosTag(other.to_string())),
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// A single lexical realization (word or phrase) belonging to a synset.
///
/// Immutable once loaded; owned exclusively by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sense {
    pub id: String,
    /// Owning synset. Should resolve to a loaded synset; a dangling
    /// reference is tolerated (partial data) but counted at load time.
    pub synset_id: String,
    pub synt_type: String,
    pub name: String,
    pub lemma: String,
    pub main_word: bool,
    pub poses: String,
    pub meaning: String,
}

/// A parsed synset record, before relation linking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynsetRecord {
    pub id: String,
    pub name: String,
    pub definition: String,
    pub part_of_speech: Pos,
    /// Owned sense identifiers, in record order.
    pub sense_ids: Vec<String>,
}

/// A concept node with its hierarchy back-references.
///
/// `hypernym_for` lists this synset's children (it is their hypernym);
/// `hyponym_for` lists its parents. Both are populated by the relation
/// linker and kept symmetric: B is in A's `hypernym_for` iff A is in B's
/// `hyponym_for`. The domain/antonym/pos-synonymy sets are carried for
/// collaborators outside this core and are never computed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Synset {
    pub id: String,
    pub name: String,
    pub definition: String,
    pub part_of_speech: Pos,
    pub sense_ids: Vec<String>,
    pub hypernym_for: Vec<String>,
    pub hyponym_for: Vec<String>,
    pub domain_for: Vec<String>,
    pub antonym: Vec<String>,
    pub pos_synonymy: Vec<String>,
}

impl Synset {
    pub(crate) fn from_record(record: SynsetRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            definition: record.definition,
            part_of_speech: record.part_of_speech,
            sense_ids: record.sense_ids,
            hypernym_for: Vec::new(),
            hyponym_for: Vec::new(),
            domain_for: Vec::new(),
            antonym: Vec::new(),
            pos_synonymy: Vec::new(),
        }
    }

    /// No parents, at least one child.
    pub fn is_root(&self) -> bool {
        self.hyponym_for.is_empty() && !self.hypernym_for.is_empty()
    }

    /// No hierarchy relations at all.
    pub fn is_isolated(&self) -> bool {
        self.hyponym_for.is_empty() && self.hypernym_for.is_empty()
    }
}

/// A raw relation record: parent identifier, child identifier, kind label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRecord {
    pub parent_id: String,
    pub child_id: String,
    pub kind: String,
}
