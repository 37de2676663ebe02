//! Writes the graph back to the legacy property-list text format.

use std::collections::BTreeMap;

use super::comments::CommentTable;
use super::graph::{ObjectGraph, Record};
use super::guid::Guid;
use super::isa::{Layout, SECTIONS};
use crate::error::{ProjectError, Result};
use crate::plist::Value;

const HEADER: &str = "// !$*UTF8*$!\n";

/// Renders the whole project file.
///
/// # Errors
///
/// Returns [`ProjectError::UnknownSection`] if any record's kind has no
/// output section; such a record would otherwise vanish from the file.
pub fn write_project(graph: &ObjectGraph) -> Result<String> {
    let sections = group_sections(graph)?;
    let comments = CommentTable::build(graph);
    let mut writer = Writer { out: String::from(HEADER), comments: &comments };

    writer.out.push_str("{\n");
    let mut keys: Vec<&str> = graph.header().keys().map(String::as_str).collect();
    keys.push("objects");
    keys.sort_unstable();
    for key in keys {
        writer.out.push('\t');
        writer.string(key);
        writer.out.push_str(" = ");
        match graph.header().get(key) {
            Some(value) => writer.value(value, "\t", Layout::Multiline),
            None => writer.objects(&sections),
        }
        writer.out.push_str(";\n");
    }
    writer.out.push_str("}\n");
    Ok(writer.out)
}

type Sections<'g> = Vec<(&'static str, Layout, Vec<(&'g Guid, &'g Record)>)>;

/// Buckets records by section, in section order; entries stay in ascending
/// identifier order because the arena is sorted.
fn group_sections(graph: &ObjectGraph) -> Result<Sections<'_>> {
    let mut buckets: BTreeMap<usize, Vec<(&Guid, &Record)>> = BTreeMap::new();
    for (guid, record) in graph.records() {
        let Some((index, _)) = record.isa().section() else {
            return Err(ProjectError::UnknownSection {
                guid: guid.to_string(),
                isa: record.isa().to_string(),
            });
        };
        buckets.entry(index).or_default().push((guid, record));
    }
    Ok(buckets
        .into_iter()
        .map(|(index, entries)| {
            let (name, layout) = SECTIONS[index];
            (name, layout, entries)
        })
        .collect())
}

struct Writer<'c> {
    out: String,
    comments: &'c CommentTable,
}

impl Writer<'_> {
    fn objects(&mut self, sections: &Sections<'_>) {
        self.out.push_str("{\n");
        for (name, layout, entries) in sections {
            self.out.push_str(&format!("\n/* Begin {name} section */"));
            for (guid, record) in entries {
                self.out.push_str("\n\t\t");
                self.string(guid.as_str());
                self.out.push_str(" = ");
                self.record(record, "\t\t", *layout);
                self.out.push(';');
            }
            self.out.push_str(&format!("\n/* End {name} section */\n"));
        }
        self.out.push_str("\t}");
    }

    fn record(&mut self, record: &Record, indent: &str, layout: Layout) {
        let isa = Value::String(record.isa().as_str().to_string());
        let entries = std::iter::once(("isa", &isa))
            .chain(record.fields().iter().map(|(k, v)| (k.as_str(), v)));
        self.map(entries, indent, layout);
    }

    fn map<'v>(
        &mut self,
        entries: impl Iterator<Item = (&'v str, &'v Value)>,
        indent: &str,
        layout: Layout,
    ) {
        let inner = format!("{indent}\t");
        self.out.push('{');
        self.open(layout);
        for (key, value) in entries {
            self.pad(&inner, layout);
            self.string(key);
            self.out.push_str(" = ");
            self.value(value, &inner, layout);
            self.out.push(';');
            self.separate(layout);
        }
        self.close(indent, layout);
        self.out.push('}');
    }

    fn value(&mut self, value: &Value, indent: &str, layout: Layout) {
        match value {
            Value::String(s) => self.string(s),
            Value::Array(items) => {
                let inner = format!("{indent}\t");
                self.out.push('(');
                self.open(layout);
                for item in items {
                    self.pad(&inner, layout);
                    self.value(item, &inner, layout);
                    self.out.push(',');
                    self.separate(layout);
                }
                self.close(indent, layout);
                self.out.push(')');
            }
            Value::Dictionary(map) => {
                self.map(map.iter().map(|(k, v)| (k.as_str(), v)), indent, layout);
            }
        }
    }

    /// Writes a scalar, quoted when needed, followed by its comment when the
    /// text is an annotated identifier.
    fn string(&mut self, s: &str) {
        if is_unquoted_safe(s) {
            self.out.push_str(s);
        } else {
            self.out.push('"');
            self.out.push_str(&escape(s));
            self.out.push('"');
        }
        if let Some(comment) = self.comments.get(s) {
            self.out.push_str(" /* ");
            self.out.push_str(comment);
            self.out.push_str(" */");
        }
    }

    fn open(&mut self, layout: Layout) {
        if layout == Layout::Multiline {
            self.out.push('\n');
        }
    }

    fn pad(&mut self, indent: &str, layout: Layout) {
        if layout == Layout::Multiline {
            self.out.push_str(indent);
        }
    }

    fn separate(&mut self, layout: Layout) {
        self.out.push(match layout {
            Layout::Multiline => '\n',
            Layout::Compact => ' ',
        });
    }

    fn close(&mut self, indent: &str, layout: Layout) {
        if layout == Layout::Multiline {
            self.out.push_str(indent);
        }
    }
}

/// Alphanumerics plus `.`, `_`, `/` and `-` may be written bare.
fn is_unquoted_safe(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || "._/-".contains(c))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}
