//! Text renderings of the group hierarchy for the `tree` and `find` commands.

use std::collections::HashSet;

use regex::Regex;

use crate::error::{ProjectError, Result};
use crate::project::{Guid, NodeView};

/// How tree lines are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TreeStyle {
    /// Indented with `|--` connectors.
    #[default]
    Bullet,
    /// One full `//group/child` location per line.
    Flat,
}

/// Renders `node` and its descendants.
///
/// `location` is the path the node was found at; flat lines are built on
/// it, and a flat leaf with both a name and a path ends in `-> path`. With
/// `dirs_only`, descendants without children are left out.
#[must_use]
pub fn tree_lines(node: &NodeView<'_>, location: &str, style: TreeStyle, dirs_only: bool) -> Vec<String> {
    let mut seen = HashSet::new();
    match style {
        TreeStyle::Bullet => bullet(node, dirs_only, &mut seen),
        TreeStyle::Flat => {
            let mut lines = Vec::new();
            flat(node, &canonical(location), dirs_only, &mut seen, &mut lines);
            lines
        }
    }
}

/// Flat lines under `node` that match `search`.
///
/// A purely alphanumeric search is treated as a substring; anything else is
/// a regular expression anchored at the start of the line.
///
/// # Errors
///
/// Returns [`ProjectError::InvalidPattern`] if `search` is not a valid
/// regular expression.
pub fn find_lines(node: &NodeView<'_>, location: &str, search: &str) -> Result<Vec<String>> {
    let pattern = if !search.is_empty() && search.chars().all(char::is_alphanumeric) {
        format!("^.*{search}.*")
    } else {
        format!("^(?:{search})")
    };
    let re = Regex::new(&pattern)
        .map_err(|source| ProjectError::InvalidPattern { pattern: search.to_string(), source })?;
    Ok(tree_lines(node, location, TreeStyle::Flat, false)
        .into_iter()
        .filter(|line| re.is_match(line))
        .collect())
}

/// `//` followed by the non-empty segments of `location`.
fn canonical(location: &str) -> String {
    let segments: Vec<&str> = location.split('/').filter(|s| !s.is_empty()).collect();
    format!("//{}", segments.join("/"))
}

fn visible<'g>(node: &NodeView<'g>, dirs_only: bool) -> Vec<NodeView<'g>> {
    node.children().into_iter().filter(|c| !dirs_only || !c.children().is_empty()).collect()
}

fn bullet<'g>(node: &NodeView<'g>, dirs_only: bool, seen: &mut HashSet<&'g Guid>) -> Vec<String> {
    let mut lines = vec![bullet_label(node)];
    if !seen.insert(node.guid()) {
        return lines;
    }
    let children = visible(node, dirs_only);
    let last = children.len().saturating_sub(1);
    for (i, child) in children.iter().enumerate() {
        let (first, rest) = if i == last { ("`-- ", "    ") } else { ("|-- ", "|   ") };
        for (j, line) in bullet(child, dirs_only, seen).into_iter().enumerate() {
            let connector = if j == 0 { first } else { rest };
            lines.push(format!("  {connector}{line}"));
        }
    }
    seen.remove(node.guid());
    lines
}

fn bullet_label(node: &NodeView<'_>) -> String {
    let isa = node.isa().map_or("?", |isa| isa.as_str());
    match (node.name(), node.path()) {
        _ if node.isa().is_some_and(|isa| isa.is_group()) => format!("\"{}\" ({isa})", node.label()),
        (Some(name), Some(path)) => format!("\"{name}\" -> \"{path}\""),
        (Some(name), None) => format!("\"{name}\""),
        (None, Some(path)) => format!("\"{path}\""),
        (None, None) => format!("({isa})"),
    }
}

fn flat<'g>(
    node: &NodeView<'g>,
    line: &str,
    dirs_only: bool,
    seen: &mut HashSet<&'g Guid>,
    lines: &mut Vec<String>,
) {
    match (node.children().is_empty(), node.name(), node.path()) {
        (true, Some(_), Some(path)) => lines.push(format!("{line} -> {path}")),
        _ => lines.push(line.to_string()),
    }
    if !seen.insert(node.guid()) {
        return;
    }
    for child in visible(node, dirs_only) {
        let joined = if line.ends_with('/') {
            format!("{line}{}", child.label())
        } else {
            format!("{line}/{}", child.label())
        };
        flat(&child, &joined, dirs_only, seen, lines);
    }
    seen.remove(node.guid());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plist::decode;
    use crate::project::{find_location, ObjectGraph};

    fn graph() -> ObjectGraph {
        let text = r#"{
            objects = {
                P0 = { isa = PBXProject; mainGroup = G0; };
                G0 = { isa = PBXGroup; children = ( G1, F2 ); name = CustomTemplate; };
                G1 = { isa = PBXGroup; children = ( F1, G2 ); path = Classes; };
                G2 = { isa = PBXGroup; children = ( ); name = Empty; };
                F1 = { isa = PBXFileReference; name = main.m; path = Classes/main.m; };
                F2 = { isa = PBXFileReference; path = Info.plist; };
            };
            rootObject = P0;
        }"#;
        ObjectGraph::from_value(decode(text).unwrap()).unwrap()
    }

    #[test]
    fn bullet_tree_draws_connectors() {
        let graph = graph();
        let root = find_location(&graph, "//").unwrap();
        let lines = tree_lines(&root, "//", TreeStyle::Bullet, false);
        assert_eq!(
            lines,
            vec![
                "\"CustomTemplate\" (PBXGroup)",
                "  |-- \"Classes\" (PBXGroup)",
                "  |     |-- \"main.m\" -> \"Classes/main.m\"",
                "  |     `-- \"Empty\" (PBXGroup)",
                "  `-- \"Info.plist\"",
            ]
        );
    }

    #[test]
    fn flat_tree_uses_full_locations() {
        let graph = graph();
        let root = find_location(&graph, "//").unwrap();
        let lines = tree_lines(&root, "", TreeStyle::Flat, false);
        assert_eq!(
            lines,
            vec![
                "//",
                "//Classes",
                "//Classes/main.m -> Classes/main.m",
                "//Classes/Empty",
                "//Info.plist",
            ]
        );
        let classes = find_location(&graph, "Classes").unwrap();
        assert_eq!(tree_lines(&classes, "Classes/", TreeStyle::Flat, false)[1], "//Classes/main.m -> Classes/main.m");
    }

    #[test]
    fn dirs_only_keeps_nodes_with_children() {
        let graph = graph();
        let root = find_location(&graph, "//").unwrap();
        assert_eq!(tree_lines(&root, "//", TreeStyle::Flat, true), vec!["//", "//Classes"]);
    }

    #[test]
    fn find_wraps_plain_words_and_anchors_patterns() {
        let graph = graph();
        let root = find_location(&graph, "//").unwrap();
        assert_eq!(find_lines(&root, "//", "main").unwrap(), vec!["//Classes/main.m -> Classes/main.m"]);
        assert_eq!(find_lines(&root, "//", "//Info").unwrap(), vec!["//Info.plist"]);
        assert!(find_lines(&root, "//", "Info").unwrap().len() == 1);
        assert!(find_lines(&root, "//", r"\.plist").unwrap().is_empty());
        assert!(matches!(find_lines(&root, "//", "("), Err(ProjectError::InvalidPattern { .. })));
    }
}
