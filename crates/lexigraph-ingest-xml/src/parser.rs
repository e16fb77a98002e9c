//! Event-based parsers for the three thesaurus record formats.
//!
//! Every record element is validated against a fixed attribute schema:
//! a missing required attribute or an attribute outside the schema is a
//! fatal error, never an anonymous attribute bag.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use lexigraph_graph::{RelationRecord, Sense, SynsetRecord};

use crate::IngestError;

// ============================================================================
// Entry points
// ============================================================================

pub fn parse_sense_file(path: &Path) -> Result<Vec<Sense>, IngestError> {
    parse_senses(open(path)?, path)
}

pub fn parse_synset_file(path: &Path) -> Result<Vec<SynsetRecord>, IngestError> {
    parse_synsets(open(path)?, path)
}

pub fn parse_relation_file(path: &Path) -> Result<Vec<RelationRecord>, IngestError> {
    parse_relations(open(path)?, path)
}

/// In-memory variants, mainly for tests and embedding.
pub fn parse_senses_str(xml: &str) -> Result<Vec<Sense>, IngestError> {
    parse_senses(Reader::from_reader(xml.as_bytes()), Path::new("<memory>"))
}

pub fn parse_synsets_str(xml: &str) -> Result<Vec<SynsetRecord>, IngestError> {
    parse_synsets(Reader::from_reader(xml.as_bytes()), Path::new("<memory>"))
}

pub fn parse_relations_str(xml: &str) -> Result<Vec<RelationRecord>, IngestError> {
    parse_relations(Reader::from_reader(xml.as_bytes()), Path::new("<memory>"))
}

fn open(path: &Path) -> Result<Reader<BufReader<File>>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = Reader::from_reader(BufReader::new(file));
    reader.trim_text(true);
    Ok(reader)
}

// ============================================================================
// Per-format parsers
// ============================================================================

fn parse_senses<R: BufRead>(mut reader: Reader<R>, path: &Path) -> Result<Vec<Sense>, IngestError> {
    let mut out = Vec::new();
    let mut buf = Vec::new();
    loop {
        match read_event(&mut reader, &mut buf, path)? {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"senses" => {}
                b"sense" => out.push(sense_from_attrs(&e, path)?),
                other => return Err(unexpected_element(other, path)),
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}

fn parse_synsets<R: BufRead>(
    mut reader: Reader<R>,
    path: &Path,
) -> Result<Vec<SynsetRecord>, IngestError> {
    let mut out = Vec::new();
    let mut current: Option<SynsetRecord> = None;
    let mut buf = Vec::new();
    loop {
        match read_event(&mut reader, &mut buf, path)? {
            Event::Start(e) => match e.name().as_ref() {
                b"synsets" => {}
                b"synset" if current.is_none() => current = Some(synset_from_attrs(&e, path)?),
                b"sense" if current.is_some() => {
                    let id = nested_sense_id(&e, path)?;
                    if let Some(record) = current.as_mut() {
                        record.sense_ids.push(id);
                    }
                }
                other => return Err(unexpected_element(other, path)),
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"synsets" => {}
                b"synset" if current.is_none() => out.push(synset_from_attrs(&e, path)?),
                b"sense" if current.is_some() => {
                    let id = nested_sense_id(&e, path)?;
                    if let Some(record) = current.as_mut() {
                        record.sense_ids.push(id);
                    }
                }
                other => return Err(unexpected_element(other, path)),
            },
            Event::End(e) => {
                if e.name().as_ref() == b"synset" {
                    if let Some(record) = current.take() {
                        out.push(record);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}

fn parse_relations<R: BufRead>(
    mut reader: Reader<R>,
    path: &Path,
) -> Result<Vec<RelationRecord>, IngestError> {
    let mut out = Vec::new();
    let mut buf = Vec::new();
    loop {
        match read_event(&mut reader, &mut buf, path)? {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"relations" => {}
                b"relation" => out.push(relation_from_attrs(&e, path)?),
                other => return Err(unexpected_element(other, path)),
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}

// ============================================================================
// Fixed-schema attribute extraction
// ============================================================================

/// Attributes of one element, consumed field by field so that leftovers
/// (attributes outside the schema) can be rejected.
struct AttrSchema {
    path: PathBuf,
    element: &'static str,
    attrs: Vec<(String, String)>,
}

impl AttrSchema {
    fn new(start: &BytesStart, path: &Path, element: &'static str) -> Result<Self, IngestError> {
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| IngestError::Xml {
                path: path.to_path_buf(),
                source: quick_xml::Error::InvalidAttr(e),
            })?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|source| IngestError::Xml {
                    path: path.to_path_buf(),
                    source,
                })?
                .into_owned();
            attrs.push((key, value));
        }
        Ok(Self {
            path: path.to_path_buf(),
            element,
            attrs,
        })
    }

    fn take(&mut self, name: &'static str) -> Result<String, IngestError> {
        match self.attrs.iter().position(|(key, _)| key == name) {
            Some(idx) => Ok(self.attrs.remove(idx).1),
            None => Err(IngestError::MissingAttribute {
                path: self.path.clone(),
                element: self.element,
                attribute: name,
            }),
        }
    }

    fn finish(self) -> Result<(), IngestError> {
        match self.attrs.into_iter().next() {
            Some((key, _)) => Err(IngestError::UnexpectedAttribute {
                path: self.path,
                element: self.element,
                attribute: key,
            }),
            None => Ok(()),
        }
    }
}

fn sense_from_attrs(start: &BytesStart, path: &Path) -> Result<Sense, IngestError> {
    let mut schema = AttrSchema::new(start, path, "sense")?;
    let sense = Sense {
        id: schema.take("id")?,
        synset_id: schema.take("synset_id")?,
        synt_type: schema.take("synt_type")?,
        name: schema.take("name")?,
        lemma: schema.take("lemma")?,
        main_word: parse_flag(schema.take("main_word")?, path)?,
        poses: schema.take("poses")?,
        meaning: schema.take("meaning")?,
    };
    schema.finish()?;
    Ok(sense)
}

fn synset_from_attrs(start: &BytesStart, path: &Path) -> Result<SynsetRecord, IngestError> {
    let mut schema = AttrSchema::new(start, path, "synset")?;
    let pos_tag = schema.take("part_of_speech")?;
    let record = SynsetRecord {
        id: schema.take("id")?,
        name: schema.take("ruthes_name")?,
        definition: schema.take("definition")?,
        part_of_speech: pos_tag.parse().map_err(|source| IngestError::PartOfSpeech {
            path: path.to_path_buf(),
            source,
        })?,
        sense_ids: Vec::new(),
    };
    schema.finish()?;
    Ok(record)
}

fn nested_sense_id(start: &BytesStart, path: &Path) -> Result<String, IngestError> {
    let mut schema = AttrSchema::new(start, path, "sense")?;
    let id = schema.take("id")?;
    schema.finish()?;
    Ok(id)
}

fn relation_from_attrs(start: &BytesStart, path: &Path) -> Result<RelationRecord, IngestError> {
    let mut schema = AttrSchema::new(start, path, "relation")?;
    let record = RelationRecord {
        parent_id: schema.take("parent_id")?,
        child_id: schema.take("child_id")?,
        kind: schema.take("name")?,
    };
    schema.finish()?;
    Ok(record)
}

fn parse_flag(value: String, path: &Path) -> Result<bool, IngestError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "" | "0" | "false" | "no" => Ok(false),
        _ => Err(IngestError::InvalidAttributeValue {
            path: path.to_path_buf(),
            attribute: "main_word",
            value,
        }),
    }
}

fn read_event<'b, R: BufRead>(
    reader: &mut Reader<R>,
    buf: &'b mut Vec<u8>,
    path: &Path,
) -> Result<Event<'b>, IngestError> {
    reader.read_event_into(buf).map_err(|source| IngestError::Xml {
        path: path.to_path_buf(),
        source,
    })
}

fn unexpected_element(name: &[u8], path: &Path) -> IngestError {
    IngestError::UnexpectedElement {
        path: path.to_path_buf(),
        element: String::from_utf8_lossy(name).into_owned(),
    }
}
