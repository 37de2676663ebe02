//! Reference-resolving views over graph records.

use std::hash::{Hash, Hasher};

use serde::Serialize;

use super::graph::{ObjectGraph, Record};
use super::guid::Guid;
use super::isa::Isa;
use crate::plist::Value;

/// A transient, parent-linked view of one record.
///
/// Views hold only the identifier and read the record on every access, so
/// they never observe stale children. Two views are equal when they point
/// at the same identifier in the same graph.
#[derive(Debug, Clone)]
pub struct NodeView<'g> {
    graph: &'g ObjectGraph,
    guid: &'g Guid,
    parent: Option<Box<NodeView<'g>>>,
}

/// A field value with identifier-shaped strings resolved to views.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'g> {
    /// A string naming a live record.
    Node(NodeView<'g>),
    /// Any other string.
    Scalar(&'g str),
    /// An array, element-wise resolved.
    List(Vec<Resolved<'g>>),
    /// A dictionary with keys and values resolved.
    Map(Vec<(Resolved<'g>, Resolved<'g>)>),
}

impl<'g> NodeView<'g> {
    /// Creates a view of `guid` with no parent.
    ///
    /// Returns `None` if the identifier names no record.
    #[must_use]
    pub fn new(graph: &'g ObjectGraph, guid: &str) -> Option<Self> {
        graph.reference(guid).map(|guid| Self { graph, guid, parent: None })
    }

    /// A view of `guid` whose parent is this view.
    pub(crate) fn child_view(&self, guid: &'g Guid) -> Self {
        Self { graph: self.graph, guid, parent: Some(Box::new(self.clone())) }
    }

    /// The identifier this view is bound to.
    #[must_use]
    pub fn guid(&self) -> &'g Guid {
        self.guid
    }

    /// The view this one was reached from, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&NodeView<'g>> {
        self.parent.as_deref()
    }

    /// The underlying record, read fresh from the graph.
    #[must_use]
    pub fn record(&self) -> Option<&'g Record> {
        self.graph.get(self.guid.as_str())
    }

    /// Resolves a field. `isa` is served from the record's tag.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Resolved<'g>> {
        let record = self.record()?;
        if key == "isa" {
            return Some(Resolved::Scalar(record.isa().as_str()));
        }
        record.get(key).map(|value| self.resolve(value))
    }

    /// Applies the reference heuristic to a raw value, recursively.
    #[must_use]
    pub fn resolve(&self, value: &'g Value) -> Resolved<'g> {
        match value {
            Value::String(s) => self.resolve_str(s),
            Value::Array(items) => Resolved::List(items.iter().map(|v| self.resolve(v)).collect()),
            Value::Dictionary(map) => Resolved::Map(
                map.iter().map(|(k, v)| (self.resolve_str(k), self.resolve(v))).collect(),
            ),
        }
    }

    fn resolve_str(&self, s: &'g str) -> Resolved<'g> {
        match self.graph.reference(s) {
            Some(guid) => Resolved::Node(self.child_view(guid)),
            None => Resolved::Scalar(s),
        }
    }

    /// The record's kind.
    #[must_use]
    pub fn isa(&self) -> Option<&'g Isa> {
        self.record().map(Record::isa)
    }

    /// The `name` field.
    #[must_use]
    pub fn name(&self) -> Option<&'g str> {
        self.record().and_then(Record::name)
    }

    /// The `path` field.
    #[must_use]
    pub fn path(&self) -> Option<&'g str> {
        self.record().and_then(Record::path)
    }

    /// The `sourceTree` field.
    #[must_use]
    pub fn source_tree(&self) -> Option<&'g str> {
        self.record().and_then(|r| r.string("sourceTree"))
    }

    /// Resolvable `children`, in file order. Dangling identifiers are
    /// skipped.
    #[must_use]
    pub fn children(&self) -> Vec<NodeView<'g>> {
        let Some(record) = self.record() else {
            return Vec::new();
        };
        record.list("children").filter_map(|id| self.graph.reference(id)).map(|g| self.child_view(g)).collect()
    }

    /// Name for display: `name`, else `path`, else empty.
    #[must_use]
    pub fn label(&self) -> &'g str {
        self.name().or_else(|| self.path()).unwrap_or("")
    }
}

impl PartialEq for NodeView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.guid == other.guid
    }
}

impl Eq for NodeView<'_> {}

impl Hash for NodeView<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.guid.hash(state);
    }
}

/// JSON summary of a view, references expanded one level.
#[derive(Debug, Serialize)]
pub struct NodeSummary<'g> {
    /// Identifier.
    pub guid: &'g Guid,
    /// Kind name.
    pub isa: &'g str,
    /// Fields with references replaced by short summaries.
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl<'g> NodeView<'g> {
    /// Builds the JSON summary used by the `dump` command.
    #[must_use]
    pub fn summary(&self) -> Option<NodeSummary<'g>> {
        let record = self.record()?;
        let fields = record
            .fields()
            .iter()
            .map(|(key, value)| (key.clone(), resolved_json(&self.resolve(value))))
            .collect();
        Some(NodeSummary { guid: self.guid, isa: record.isa().as_str(), fields })
    }
}

fn resolved_json(value: &Resolved<'_>) -> serde_json::Value {
    match value {
        Resolved::Node(node) => serde_json::json!({
            "guid": node.guid(),
            "isa": node.isa().map(Isa::as_str),
            "name": node.name(),
            "path": node.path(),
        }),
        Resolved::Scalar(s) => serde_json::Value::String((*s).to_string()),
        Resolved::List(items) => items.iter().map(resolved_json).collect(),
        Resolved::Map(entries) => serde_json::Value::Object(
            entries
                .iter()
                .map(|(k, v)| {
                    let key = match k {
                        Resolved::Node(node) => node.guid().to_string(),
                        Resolved::Scalar(s) => (*s).to_string(),
                        _ => String::new(),
                    };
                    (key, resolved_json(v))
                })
                .collect(),
        ),
    }
}

impl ObjectGraph {
    /// A view of the root (project) object.
    #[must_use]
    pub fn root(&self) -> NodeView<'_> {
        NodeView { graph: self, guid: self.root_guid(), parent: None }
    }
}
