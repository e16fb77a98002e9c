//! Lexigraph core: an in-memory thesaurus hierarchy graph.
//!
//! The pipeline is strictly one-way:
//!
//! - [`RecordStore`] ingests parsed sense and synset records into two
//!   identifier-keyed mappings (identifier uniqueness is enforced).
//! - [`link`] wires hypernym/hyponym back-references onto synsets,
//!   symmetrically per edge.
//! - [`Thesaurus`] answers structural queries: roots, direct children,
//!   transitive descendants, display trees, isolated synsets.
//! - [`Thesaurus::connected_components`] partitions the roots into groups
//!   whose descendant sets transitively overlap.
//!
//! The graph is built once (records, then relations) and is read-only for
//! the rest of the process. Every query returns value snapshots, never
//! references into internal storage, so callers cannot corrupt the loaded
//! graph. The relation graph is a general digraph and may contain cycles:
//! all traversals use explicit work-stacks with a visited-set guard, so a
//! node is expanded at most once and descendant sets stabilize once every
//! reachable node has been seen.

pub mod components;
pub mod link;
pub mod query;
pub mod records;
pub mod store;


use std::fmt;

use thiserror::Error;

pub use link::{is_hypernym_kind, link, HYPERNYM_KINDS};
pub use query::{Thesaurus, TreeNode};
pub use records::{Pos, RelationRecord, Sense, Synset, SynsetRecord, UnknownPosTag};
pub use store::RecordStore;

/// Which record mapping an identifier collided in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Sense,
    Synset,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Sense => f.write_str("sense"),
            RecordKind::Synset => f.write_str("synset"),
        }
    }
}

/// Errors raised by the graph core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// The same identifier appeared twice within one mapping. Fatal for
    /// the whole load: identifier uniqueness is load-bearing for every
    /// later lookup.
    #[error("duplicate {kind} identifier: {id}")]
    DuplicateIdentifier { kind: RecordKind, id: String },

    /// A relation record named a synset that was never loaded. Fatal
    /// during linking: a dangling relation indicates corrupt input and
    /// must not be silently dropped.
    #[error("relation references unknown synset: {id}")]
    UnknownSynsetReference { id: String },

    /// Per-call lookup failure. Local to the call; the loaded graph
    /// stays valid.
    #[error("synset not found: {id}")]
    SynsetNotFound { id: String },
}
