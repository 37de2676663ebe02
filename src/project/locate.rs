//! Slash-delimited location paths over the group hierarchy.

use std::collections::HashSet;

use super::graph::ObjectGraph;
use super::node::NodeView;
use crate::error::{ProjectError, Result};

/// Resolves `path` to a node by walking `children` from the main group.
///
/// Empty segments are ignored, so `//`, `/` and the empty string all name
/// the main group, and `//Classes/main.m` equals `Classes/main.m`. Each
/// segment matches the first child, in `children` order, whose `name` or
/// `path` equals it. Dangling children are skipped.
///
/// # Errors
///
/// Returns [`ProjectError::NotFound`] carrying the full requested path if any
/// segment has no match, or [`ProjectError::MalformedRecord`] if the project
/// has no main group.
pub fn find_location<'g>(graph: &'g ObjectGraph, path: &str) -> Result<NodeView<'g>> {
    let main = graph.main_group_guid()?;
    let mut current = graph.root().child_view(main);

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let mut children = current.children();
        let found = children
            .iter()
            .position(|c| c.name() == Some(segment) || c.path() == Some(segment));
        match found {
            Some(index) => current = children.swap_remove(index),
            None => return Err(ProjectError::NotFound { path: path.to_string() }),
        }
    }
    Ok(current)
}

/// Finds the view of `guid` reachable from the main group, with its full
/// parent chain, by depth-first search over `children`.
///
/// Returns `None` if the record is not in the group hierarchy.
#[must_use]
pub fn locate_guid<'g>(graph: &'g ObjectGraph, guid: &str) -> Option<NodeView<'g>> {
    let main = graph.main_group_guid().ok()?;
    let mut stack = vec![graph.root().child_view(main)];
    let mut seen = HashSet::new();
    while let Some(node) = stack.pop() {
        if node.guid().as_str() == guid {
            return Some(node);
        }
        if seen.insert(node.guid()) {
            stack.extend(node.children().into_iter().rev());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plist::decode;

    fn graph() -> ObjectGraph {
        let text = r#"{
            objects = {
                P0 = { isa = PBXProject; mainGroup = G0; };
                G0 = { isa = PBXGroup; children = ( GONE, G1, F2 ); name = CustomTemplate; };
                G1 = { isa = PBXGroup; children = ( F1 ); path = Classes; };
                F1 = { isa = PBXFileReference; name = main.m; path = Classes/main.m; };
                F2 = { isa = PBXFileReference; path = Classes; };
            };
            rootObject = P0;
        }"#;
        ObjectGraph::from_value(decode(text).unwrap()).unwrap()
    }

    #[test]
    fn root_markers_name_main_group() {
        let graph = graph();
        for path in ["//", "/", ""] {
            assert_eq!(find_location(&graph, path).unwrap().guid().as_str(), "G0");
        }
    }

    #[test]
    fn matches_name_or_path() {
        let graph = graph();
        let node = find_location(&graph, "//Classes/main.m").unwrap();
        assert_eq!(node.guid().as_str(), "F1");
        assert_eq!(node.parent().map(|p| p.guid().as_str()), Some("G1"));
    }

    #[test]
    fn first_match_in_child_order_wins() {
        let graph = graph();
        // G1 and F2 both have path Classes; G1 comes first.
        assert_eq!(find_location(&graph, "Classes").unwrap().guid().as_str(), "G1");
    }

    #[test]
    fn path_match_before_name_match_wins_by_order() {
        let text = r#"{
            objects = {
                P0 = { isa = PBXProject; mainGroup = G0; };
                G0 = { isa = PBXGroup; children = ( A1, B2 ); };
                A1 = { isa = PBXGroup; children = ( ); path = Libs; };
                B2 = { isa = PBXGroup; children = ( ); name = Libs; };
            };
            rootObject = P0;
        }"#;
        let graph = ObjectGraph::from_value(decode(text).unwrap()).unwrap();
        assert_eq!(find_location(&graph, "//Libs").unwrap().guid().as_str(), "A1");
    }

    #[test]
    fn locate_guid_keeps_parent_chain() {
        let graph = graph();
        let node = locate_guid(&graph, "F1").unwrap();
        assert_eq!(node.parent().and_then(NodeView::parent).map(|p| p.guid().as_str()), Some("G0"));
        assert!(locate_guid(&graph, "P0").is_none());
    }

    #[test]
    fn missing_segment_reports_full_path() {
        let graph = graph();
        let err = find_location(&graph, "//Classes/nope.m").unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { ref path } if path == "//Classes/nope.m"));
    }
}
