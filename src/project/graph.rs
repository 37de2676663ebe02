//! The object graph: an arena of records keyed by identifier.

use std::collections::BTreeMap;

use super::guid::Guid;
use super::isa::Isa;
use crate::error::{ProjectError, Result};
use crate::plist::Value;

/// One object of the project file.
///
/// The `isa` tag is lifted out of the payload so it can never be missing;
/// every other key stays in the generic `fields` map, in key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    isa: Isa,
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Creates an empty record of the given kind.
    #[must_use]
    pub fn new(isa: Isa) -> Self {
        Self { isa, fields: BTreeMap::new() }
    }

    /// Lifts a decoded dictionary into a record.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::MalformedRecord`] if the value is not a
    /// dictionary or carries no string `isa`.
    pub fn from_value(guid: &str, value: Value) -> Result<Self> {
        let Value::Dictionary(mut fields) = value else {
            return Err(malformed(guid, "object is not a dictionary"));
        };
        match fields.remove("isa") {
            Some(Value::String(isa)) => Ok(Self { isa: Isa::parse(&isa), fields }),
            Some(_) => Err(malformed(guid, "isa is not a string")),
            None => Err(malformed(guid, "missing isa")),
        }
    }

    /// Builder-style setter used when minting new records.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// The record's kind.
    #[must_use]
    pub fn isa(&self) -> &Isa {
        &self.isa
    }

    /// All keys except `isa`, in ascending order.
    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// Raw value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String value for a key; absent if missing or not a string.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// The `name` field.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.string("name")
    }

    /// The `path` field.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.string("path")
    }

    /// The `fileRef` field of a build file.
    #[must_use]
    pub fn file_ref(&self) -> Option<&str> {
        self.string("fileRef")
    }

    /// String elements of an array field such as `children` or `files`.
    pub fn list(&self, key: &str) -> impl Iterator<Item = &str> {
        self.get(key).and_then(Value::as_array).unwrap_or(&[]).iter().filter_map(Value::as_str)
    }

    /// Mutable access to an array field.
    pub fn list_mut(&mut self, key: &str) -> Option<&mut Vec<Value>> {
        self.fields.get_mut(key).and_then(Value::as_array_mut)
    }

    /// Sets a key, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }
}

/// The whole project: top-level keys plus the object arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectGraph {
    header: BTreeMap<String, Value>,
    objects: BTreeMap<Guid, Record>,
    root: Guid,
}

impl ObjectGraph {
    /// Attaches a graph to a decoded document.
    ///
    /// Every key of the top-level dictionary except `objects` is kept
    /// verbatim. `rootObject` names the root record.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::MalformedRecord`] if the document shape is
    /// wrong or any object lacks `isa`.
    pub fn from_value(document: Value) -> Result<Self> {
        let Value::Dictionary(mut header) = document else {
            return Err(malformed(DOCUMENT, "top level is not a dictionary"));
        };
        let Some(Value::Dictionary(raw)) = header.remove("objects") else {
            return Err(malformed(DOCUMENT, "missing objects dictionary"));
        };
        let root = header
            .get("rootObject")
            .and_then(Value::as_str)
            .map(Guid::from)
            .ok_or_else(|| malformed(DOCUMENT, "missing rootObject"))?;

        let mut objects = BTreeMap::new();
        for (guid, value) in raw {
            let record = Record::from_value(&guid, value)?;
            objects.insert(Guid::new(guid), record);
        }
        if !objects.contains_key(&root) {
            return Err(malformed(root.as_str(), "rootObject does not name an object"));
        }
        Ok(Self { header, objects, root })
    }

    /// Top-level keys other than `objects`.
    #[must_use]
    pub fn header(&self) -> &BTreeMap<String, Value> {
        &self.header
    }

    /// Identifier of the root (project) object.
    #[must_use]
    pub fn root_guid(&self) -> &Guid {
        &self.root
    }

    /// Looks up a record.
    #[must_use]
    pub fn get(&self, guid: &str) -> Option<&Record> {
        self.objects.get(guid)
    }

    /// Looks up a record for mutation.
    pub fn get_mut(&mut self, guid: &str) -> Option<&mut Record> {
        self.objects.get_mut(guid)
    }

    /// Whether a record with this identifier exists.
    #[must_use]
    pub fn contains(&self, guid: &str) -> bool {
        self.objects.contains_key(guid)
    }

    /// The reference heuristic: a string is a reference exactly when it is
    /// a live identifier in this graph.
    ///
    /// The file format has no reference type, so a plain value that
    /// happens to equal an identifier is also treated as a reference.
    #[must_use]
    pub fn reference(&self, value: &str) -> Option<&Guid> {
        self.objects.get_key_value(value).map(|(guid, _)| guid)
    }

    /// Inserts or replaces a record.
    pub fn insert(&mut self, guid: Guid, record: Record) {
        self.objects.insert(guid, record);
    }

    /// Removes a record, returning it if it existed.
    pub fn remove(&mut self, guid: &str) -> Option<Record> {
        self.objects.remove(guid)
    }

    /// All records in ascending identifier order.
    pub fn records(&self) -> impl Iterator<Item = (&Guid, &Record)> {
        self.objects.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Identifier of the root object's `mainGroup`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::MalformedRecord`] if the root has no main
    /// group or it names no record.
    pub fn main_group_guid(&self) -> Result<&Guid> {
        self.get(self.root.as_str())
            .and_then(|root| root.string("mainGroup"))
            .and_then(|main| self.reference(main))
            .ok_or_else(|| malformed(self.root.as_str(), "mainGroup does not name an object"))
    }

    /// Identifiers that appear in `children`, `files` or `fileRef` but name
    /// no record.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<(Guid, String)> {
        let mut dangling = Vec::new();
        for (guid, record) in &self.objects {
            let refs = record.list("children").chain(record.list("files")).chain(record.file_ref());
            for target in refs {
                if !self.contains(target) {
                    dangling.push((guid.clone(), target.to_string()));
                }
            }
        }
        dangling
    }
}

const DOCUMENT: &str = "(document)";

fn malformed(guid: &str, reason: &str) -> ProjectError {
    ProjectError::MalformedRecord { guid: guid.to_string(), reason: reason.to_string() }
}
