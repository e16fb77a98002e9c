//! XML ingestion for the lexigraph thesaurus (boundary adapter).
//!
//! This crate sits at the interop boundary:
//!
//! - It parses the on-disk XML record sets (untrusted input).
//! - It emits typed records for the graph core and drives the two-phase
//!   load (records, then relations).
//! - It does *not* define graph semantics; `lexigraph-graph` does that.
//!
//! A thesaurus directory holds up to nine files, split by part of speech:
//! `senses.{N,V,A}.xml`, `synsets.{N,V,A}.xml` and
//! `synset_relations.{N,V,A}.xml`. Thesauri are routinely shipped with
//! only some parts of speech present, so a missing file is a non-fatal
//! signal: the remaining files of that category are skipped with a
//! warning. Everything else (malformed XML, schema violations, duplicate
//! identifiers, dangling relation endpoints) aborts the load — a
//! partially linked graph is never handed to queries.

pub mod parser;

use std::path::{Path, PathBuf};

use lexigraph_graph::{
    link, GraphError, Pos, RecordStore, Sense, SynsetRecord, Thesaurus, UnknownPosTag,
};
use thiserror::Error;

/// Errors raised while ingesting a thesaurus directory.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML in {}: {source}", path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    #[error("{}: <{element}> is missing required attribute `{attribute}`", path.display())]
    MissingAttribute {
        path: PathBuf,
        element: &'static str,
        attribute: &'static str,
    },

    #[error("{}: <{element}> carries unrecognized attribute `{attribute}`", path.display())]
    UnexpectedAttribute {
        path: PathBuf,
        element: &'static str,
        attribute: String,
    },

    #[error("{}: attribute `{attribute}` has invalid value `{value}`", path.display())]
    InvalidAttributeValue {
        path: PathBuf,
        attribute: &'static str,
        value: String,
    },

    #[error("{}: unexpected element <{element}>", path.display())]
    UnexpectedElement { path: PathBuf, element: String },

    #[error("{}: {source}", path.display())]
    PartOfSpeech {
        path: PathBuf,
        #[source]
        source: UnknownPosTag,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Observability summary of one directory load.
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub senses: usize,
    pub synsets: usize,
    pub relations_applied: usize,
    /// Expected files that were absent, plus the rest of their category.
    pub skipped_files: Vec<PathBuf>,
}

pub fn sense_file(dir: &Path, pos: Pos) -> PathBuf {
    dir.join(format!("senses.{}.xml", pos.file_tag()))
}

pub fn synset_file(dir: &Path, pos: Pos) -> PathBuf {
    dir.join(format!("synsets.{}.xml", pos.file_tag()))
}

pub fn relation_file(dir: &Path, pos: Pos) -> PathBuf {
    dir.join(format!("synset_relations.{}.xml", pos.file_tag()))
}

/// Load a thesaurus directory and return the query engine plus a load
/// summary.
///
/// Phase one ingests the sense files and then the synset files, per part
/// of speech, into the record store; phase two parses and links each
/// relation file. The two-phase load completes fully before the
/// `Thesaurus` is constructed.
pub fn load_dir(dir: &Path) -> Result<(Thesaurus, LoadSummary), IngestError> {
    let mut summary = LoadSummary::default();

    let mut record_files: Vec<(RecordFileKind, PathBuf)> = Vec::new();
    for pos in Pos::ALL {
        record_files.push((RecordFileKind::Senses, sense_file(dir, pos)));
    }
    for pos in Pos::ALL {
        record_files.push((RecordFileKind::Synsets, synset_file(dir, pos)));
    }

    let mut senses: Vec<Sense> = Vec::new();
    let mut synsets: Vec<SynsetRecord> = Vec::new();
    for idx in 0..record_files.len() {
        let (kind, path) = &record_files[idx];
        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "record file not found; skipping the remaining record files"
            );
            summary
                .skipped_files
                .extend(record_files[idx..].iter().map(|(_, p)| p.clone()));
            break;
        }
        tracing::info!(path = %path.display(), "loading records");
        match kind {
            RecordFileKind::Senses => senses.extend(parser::parse_sense_file(path)?),
            RecordFileKind::Synsets => synsets.extend(parser::parse_synset_file(path)?),
        }
    }

    let mut store = RecordStore::load(senses, synsets)?;
    summary.senses = store.sense_count();
    summary.synsets = store.synset_count();

    let relation_files: Vec<PathBuf> = Pos::ALL.iter().map(|p| relation_file(dir, *p)).collect();
    for idx in 0..relation_files.len() {
        let path = &relation_files[idx];
        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "relation file not found; skipping the remaining relation files"
            );
            summary
                .skipped_files
                .extend(relation_files[idx..].iter().cloned());
            break;
        }
        tracing::info!(path = %path.display(), "loading relations");
        let records = parser::parse_relation_file(path)?;
        summary.relations_applied += link(&mut store, &records)?;
    }

    Ok((Thesaurus::new(store), summary))
}

#[derive(Debug, Clone, Copy)]
enum RecordFileKind {
    Senses,
    Synsets,
}
