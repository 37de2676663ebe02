//! Trailing `/* comment */` annotations for identifiers in the output.
//!
//! Comments are derived in two ordered passes. The first pass looks at each
//! record on its own. The second pass copies and substitutes text that the
//! first pass produced for *other* records: build files take the comment of
//! their file reference, and target configuration lists get the target's
//! name spliced into a placeholder.

use std::collections::BTreeMap;

use super::graph::ObjectGraph;
use super::isa::Isa;

const PROJECT_LIST: &str = "Build configuration list for PBXProject \"Unity-iPhone\"";
const TARGET_LIST: &str = "Build configuration list for PBXNativeTarget \"TARGET_NAME\"";
const TARGET_PLACEHOLDER: &str = "TARGET_NAME";
const ROOT_COMMENT: &str = "Project Object";
const TYPE_PREFIX: &str = "PBX";
const TYPE_SUFFIX_LEN: usize = 10;

/// Output of the first pass: each record's comment computed in isolation.
#[derive(Debug, Default)]
pub struct OwnComments<'g>(BTreeMap<&'g str, String>);

/// Final identifier → comment table consumed by the serializer.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CommentTable(BTreeMap<String, String>);

impl CommentTable {
    /// Runs both passes over the graph.
    #[must_use]
    pub fn build(graph: &ObjectGraph) -> Self {
        second_pass(graph, first_pass(graph))
    }

    /// The comment for an identifier, if one was assigned.
    #[must_use]
    pub fn get(&self, guid: &str) -> Option<&str> {
        self.0.get(guid).map(String::as_str)
    }
}

/// Pass 1: `name`, else `path`, else a kind-derived label.
#[must_use]
pub fn first_pass(graph: &ObjectGraph) -> OwnComments<'_> {
    let mut comments = BTreeMap::new();
    let mut project_lists = Vec::new();

    for (guid, record) in graph.records() {
        if let Some(text) = record.name().or_else(|| record.path()) {
            comments.insert(guid.as_str(), text.to_string());
        } else if *record.isa() == Isa::Project {
            if let Some(list) = record.string("buildConfigurationList") {
                project_lists.push(list);
            }
        } else if let Some(stem) = record.isa().as_str().strip_prefix(TYPE_PREFIX) {
            let end = stem.len().saturating_sub(TYPE_SUFFIX_LEN);
            comments.insert(guid.as_str(), stem.get(..end).unwrap_or_default().to_string());
        } else {
            comments.insert(guid.as_str(), TARGET_LIST.to_string());
        }
    }

    // Applied last so a list visited after its project keeps this text.
    for list in project_lists {
        comments.insert(list, PROJECT_LIST.to_string());
    }
    OwnComments(comments)
}

/// Pass 2: propagate file reference comments to build files, name target
/// configuration lists, and pin the root object's comment.
#[must_use]
pub fn second_pass(graph: &ObjectGraph, own: OwnComments<'_>) -> CommentTable {
    let mut table: BTreeMap<String, String> =
        own.0.into_iter().map(|(guid, text)| (guid.to_string(), text)).collect();

    for (guid, record) in graph.records() {
        if let Some(file_ref) = record.file_ref() {
            if let Some(text) = table.get(file_ref).cloned() {
                table.insert(guid.to_string(), text);
            }
        }
        if record.isa().is_target() {
            let name = table.get(guid.as_str()).cloned().unwrap_or_default();
            if let Some(list) = record.string("buildConfigurationList") {
                if let Some(text) = table.get_mut(list) {
                    *text = text.replace(TARGET_PLACEHOLDER, &name);
                }
            }
        }
    }

    table.insert(graph.root_guid().to_string(), ROOT_COMMENT.to_string());
    table.retain(|_, text| !text.is_empty());
    CommentTable(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plist::decode;

    fn graph() -> ObjectGraph {
        let text = r#"{
            objects = {
                P0 = { isa = PBXProject; buildConfigurationList = L0; mainGroup = G0; targets = ( T0 ); };
                L0 = { isa = XCConfigurationList; buildConfigurations = ( C0 ); };
                L1 = { isa = XCConfigurationList; buildConfigurations = ( C0 ); };
                C0 = { isa = XCBuildConfiguration; name = Release; };
                T0 = { isa = PBXNativeTarget; name = Unity-iPhone; buildConfigurationList = L1; buildPhases = ( S0 ); };
                S0 = { isa = PBXSourcesBuildPhase; files = ( B0 ); };
                B0 = { isa = PBXBuildFile; fileRef = F0; };
                F0 = { isa = PBXFileReference; path = Classes/main.mm; };
                G0 = { isa = PBXGroup; children = ( F0 ); };
                X0 = { isa = PBXContainerItemProxy; };
            };
            rootObject = P0;
        }"#;
        ObjectGraph::from_value(decode(text).unwrap()).unwrap()
    }

    #[test]
    fn name_then_path_then_kind() {
        let table = CommentTable::build(&graph());
        assert_eq!(table.get("C0"), Some("Release"));
        assert_eq!(table.get("F0"), Some("Classes/main.mm"));
        assert_eq!(table.get("S0"), Some("Sources"));
    }

    #[test]
    fn kind_label_strips_prefix_and_fixed_suffix() {
        let table = CommentTable::build(&graph());
        assert_eq!(table.get("X0"), Some("Containe"));
        // "PBXGroup" is shorter than the suffix, leaving nothing to show.
        assert_eq!(table.get("G0"), None);
    }

    #[test]
    fn build_file_inherits_file_reference_comment() {
        let table = CommentTable::build(&graph());
        assert_eq!(table.get("B0"), Some("Classes/main.mm"));
    }

    #[test]
    fn configuration_lists_use_templates() {
        let table = CommentTable::build(&graph());
        assert_eq!(table.get("L0"), Some("Build configuration list for PBXProject \"Unity-iPhone\""));
        assert_eq!(
            table.get("L1"),
            Some("Build configuration list for PBXNativeTarget \"Unity-iPhone\"")
        );
    }

    #[test]
    fn root_object_is_pinned() {
        let table = CommentTable::build(&graph());
        assert_eq!(table.get("P0"), Some("Project Object"));
    }
}
