//! Graph edits that keep cross-references consistent.
//!
//! Every edit here maintains three links: group `children` lists, build
//! phase `files` lists and build file `fileRef`s. Removing a record removes
//! whatever pointed at it through those links.

use std::path::{Component, Path, PathBuf};

use regex::Regex;

use super::filetype::{classify, is_opaque_bundle, BuildPhaseKind};
use super::graph::{ObjectGraph, Record};
use super::guid::Guid;
use super::isa::Isa;
use super::locate::locate_guid;
use super::node::NodeView;
use super::XcodeProject;
use crate::error::{ProjectError, Result};
use crate::plist::Value;

const SOURCE_ROOT: &str = "SOURCE_ROOT";
const ABSOLUTE: &str = "<absolute>";
const GROUP: &str = "<group>";

/// How a new file reference's `path` is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeKind {
    /// Relative to the source root (`SOURCE_ROOT`).
    #[default]
    SourceRoot,
    /// Absolute (`<absolute>`).
    Absolute,
}

impl TreeKind {
    fn source_tree(self) -> &'static str {
        match self {
            Self::SourceRoot => SOURCE_ROOT,
            Self::Absolute => ABSOLUTE,
        }
    }
}

/// Records created by [`XcodeProject::add_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedFile {
    /// The new file reference.
    pub file_ref: Guid,
    /// One build file per matching build phase.
    pub build_files: Vec<Guid>,
}

/// Records created by [`XcodeProject::add_folder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddedFolder {
    /// Group standing for the top folder, if one was created or reused.
    pub group: Option<Guid>,
    /// Groups created during the walk.
    pub groups: Vec<Guid>,
    /// File references created during the walk.
    pub files: Vec<Guid>,
    /// Entries left out because they failed or matched an exclude pattern.
    pub skipped: Vec<PathBuf>,
}

impl XcodeProject<'_> {
    /// Adds a file (or opaque bundle) under `parent`.
    ///
    /// A relative `fs_path` is taken from the source root. Any file
    /// reference under `parent` that already points at the same file is
    /// removed first, together with its build files, so re-adding a file
    /// never duplicates build entries. With `create_build_files`, one build
    /// file is added to every phase of the file's kind across all targets.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::MissingFilesystemEntry`] if the path does not
    /// exist, or [`ProjectError::NotFound`] if `parent` names no group.
    pub fn add_file(
        &mut self,
        parent: &Guid,
        fs_path: &Path,
        create_build_files: bool,
        tree: TreeKind,
    ) -> Result<AddedFile> {
        let abs = normalize(&self.source_root.join(fs_path));
        if !self.ctx.fs.exists(&abs) {
            return Err(ProjectError::MissingFilesystemEntry { path: abs });
        }
        self.require_group(parent)?;

        let file_type = classify(&abs, self.ctx.fs.is_dir(&abs));
        let path = match tree {
            TreeKind::SourceRoot => relative_path(&self.source_root, &abs),
            TreeKind::Absolute => abs.display().to_string(),
        };
        let name = abs.file_name().map_or_else(|| path.clone(), |n| n.to_string_lossy().into_owned());

        if let Some(existing) = self.child_file_ref_for(parent, &abs, &path) {
            tracing::debug!(guid = %existing, %path, "replacing existing file reference");
            self.remove_node(&existing, Some(parent))?;
        }

        let file_ref = self.mint_id();
        let record = Record::new(Isa::FileReference)
            .with("lastKnownFileType", file_type.type_tag)
            .with("name", name)
            .with("path", path.as_str())
            .with("sourceTree", tree.source_tree());
        self.graph.insert(file_ref.clone(), record);
        self.graph.push_ref(parent, "children", &file_ref);

        let mut build_files = Vec::new();
        if let (true, Some(kind)) = (create_build_files, file_type.phase) {
            for phase in self.graph.build_phases(kind) {
                let build_file = self.mint_id();
                let record = Record::new(Isa::BuildFile).with("fileRef", file_ref.as_str());
                self.graph.insert(build_file.clone(), record);
                self.graph.push_ref(&phase, "files", &build_file);
                build_files.push(build_file);
            }
        }

        tracing::debug!(%file_ref, %path, file_type = file_type.type_tag, build_files = build_files.len(), "added file");
        Ok(AddedFile { file_ref, build_files })
    }

    /// Adds a folder under `parent` as a group, walking its contents.
    ///
    /// Hidden entries (leading `.`) are skipped with their whole subtree.
    /// Entries whose full path matches any of `excludes` (unanchored regex
    /// search) are skipped. Opaque bundles are added as single files.
    /// Groups are reused by name, so adding the same folder twice refreshes
    /// its files instead of nesting a copy. Without `recursive` only the
    /// folder's direct files are added.
    ///
    /// Entries that vanish or cannot be read during the walk are logged and
    /// recorded in [`AddedFolder::skipped`].
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::InvalidPattern`] for a bad exclude pattern,
    /// [`ProjectError::MissingFilesystemEntry`] if `fs_path` does not exist,
    /// or [`ProjectError::NotFound`] if `parent` names no group.
    pub fn add_folder(
        &mut self,
        parent: &Guid,
        fs_path: &Path,
        excludes: &[String],
        recursive: bool,
    ) -> Result<AddedFolder> {
        let excludes = compile(excludes)?;
        let abs = normalize(&self.source_root.join(fs_path));
        if !self.ctx.fs.exists(&abs) {
            return Err(ProjectError::MissingFilesystemEntry { path: abs });
        }
        self.require_group(parent)?;

        let mut added = AddedFolder::default();
        if !self.ctx.fs.is_dir(&abs) || is_opaque_bundle(&abs) {
            let file = self.add_file(parent, &abs, true, TreeKind::SourceRoot)?;
            added.files.push(file.file_ref);
            return Ok(added);
        }
        if is_hidden(&abs) || is_excluded(&excludes, &abs) {
            added.skipped.push(abs);
            return Ok(added);
        }

        let entries = self.ctx.fs.list_dir(&abs).map_err(|e| ProjectError::Io {
            context: format!("listing {}", abs.display()),
            message: e.to_string(),
        })?;
        let group = self.find_or_create_group(parent, &abs, &mut added);
        added.group = Some(group.clone());
        self.walk(&group, &abs, entries, &excludes, recursive, &mut added)?;

        tracing::debug!(
            folder = %abs.display(),
            groups = added.groups.len(),
            files = added.files.len(),
            skipped = added.skipped.len(),
            "added folder"
        );
        Ok(added)
    }

    fn walk(
        &mut self,
        group: &Guid,
        dir: &Path,
        entries: Vec<String>,
        excludes: &[Regex],
        recursive: bool,
        added: &mut AddedFolder,
    ) -> Result<()> {
        for entry in entries {
            let path = dir.join(&entry);
            if entry.starts_with('.') {
                continue;
            }
            if is_excluded(excludes, &path) {
                tracing::debug!(path = %path.display(), "excluded");
                added.skipped.push(path);
                continue;
            }

            if self.ctx.fs.is_dir(&path) && !is_opaque_bundle(&path) {
                if !recursive {
                    continue;
                }
                match self.ctx.fs.list_dir(&path) {
                    Ok(children) => {
                        let sub = self.find_or_create_group(group, &path, added);
                        self.walk(&sub, &path, children, excludes, recursive, added)?;
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable folder");
                        added.skipped.push(path);
                    }
                }
                continue;
            }

            match self.add_file(group, &path, true, TreeKind::SourceRoot) {
                Ok(file) => added.files.push(file.file_ref),
                Err(e @ (ProjectError::MissingFilesystemEntry { .. } | ProjectError::Io { .. })) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping entry");
                    added.skipped.push(path);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Removes the node at a location path, with everything under it.
    ///
    /// Returns the identifiers of every removed record.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::NotFound`] if the path does not resolve, or
    /// [`ProjectError::RootRemoval`] for the main group.
    pub fn remove_location(&mut self, path: &str) -> Result<Vec<Guid>> {
        let (guid, parent) = self.located_with_parent(path)?;
        self.remove_node(&guid, Some(&parent))
    }

    /// Detaches `guid` from `parent` (if given) and deletes it recursively.
    ///
    /// Deletion removes every build file whose `fileRef` is the node, then
    /// each child depth-first, then the record. Build files that are already
    /// gone are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::RootRemoval`] for the root object or the main
    /// group.
    pub fn remove_node(&mut self, guid: &Guid, parent: Option<&Guid>) -> Result<Vec<Guid>> {
        if guid == self.graph.root_guid() || self.graph.main_group_guid().is_ok_and(|m| m == guid) {
            return Err(ProjectError::RootRemoval);
        }
        if let Some(parent) = parent {
            self.graph.detach_child(parent, guid);
        }
        let mut removed = Vec::new();
        self.graph.delete_recursive(guid, &mut removed);
        tracing::debug!(%guid, removed = removed.len(), "removed node");
        Ok(removed)
    }

    /// Rebuilds a group from the folder it is linked to.
    ///
    /// The group and everything under it is removed and the folder is added
    /// again into the same parent, at the same position among its siblings.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::NotFound`] if the path does not resolve,
    /// [`ProjectError::StaleLink`] if the group has no path or its folder is
    /// gone, or the error that stopped the rebuild. On any error the graph
    /// is left as it was.
    pub fn sync_location(&mut self, path: &str) -> Result<AddedFolder> {
        let (guid, parent) = self.located_with_parent(path)?;
        let folder = {
            let node = self.find_location(path)?;
            if node.path().is_none() {
                return Err(ProjectError::StaleLink { path: path.to_string() });
            }
            self.folder_of(&node).unwrap_or_default()
        };
        if !self.ctx.fs.is_dir(&folder) {
            return Err(ProjectError::StaleLink { path: folder.display().to_string() });
        }

        let index = self.graph.get(parent.as_str()).and_then(|r| r.list("children").position(|c| c == guid.as_str()));
        let snapshot = self.graph.clone();
        let rebuilt = self
            .remove_node(&guid, Some(&parent))
            .and_then(|_| self.add_folder(&parent, &folder, &[], true));
        let added = match rebuilt {
            Ok(added) => added,
            Err(e) => {
                self.graph = snapshot;
                return Err(e);
            }
        };

        if let (Some(index), Some(group)) = (index, &added.group) {
            self.graph.detach_child(&parent, group);
            if let Some(children) = self.graph.get_mut(parent.as_str()).and_then(|r| r.list_mut("children")) {
                let index = index.min(children.len());
                children.insert(index, Value::from(group.as_str()));
            }
        }
        tracing::debug!(location = path, folder = %folder.display(), files = added.files.len(), "synced group");
        Ok(added)
    }

    /// The directory a node stands for on disk, following `sourceTree`.
    ///
    /// `<absolute>` paths are taken as is, `<group>` paths are joined onto
    /// the parent group's folder, and anything else is joined onto the
    /// source root.
    #[must_use]
    pub fn folder_of(&self, node: &NodeView<'_>) -> Option<PathBuf> {
        let path = node.path();
        match node.source_tree() {
            Some(ABSOLUTE) => path.map(PathBuf::from),
            Some(GROUP) => {
                let base = match node.parent() {
                    Some(parent) if parent.isa().is_some_and(Isa::is_group) => self.folder_of(parent)?,
                    _ => self.source_root.clone(),
                };
                Some(normalize(&path.map_or(base.clone(), |p| base.join(p))))
            }
            _ => Some(normalize(&path.map_or_else(|| self.source_root.clone(), |p| self.source_root.join(p)))),
        }
    }

    fn located_with_parent(&self, path: &str) -> Result<(Guid, Guid)> {
        let node = self.find_location(path)?;
        let parent = node
            .parent()
            .filter(|p| p.isa().is_some_and(Isa::is_group))
            .ok_or(ProjectError::RootRemoval)?;
        Ok((node.guid().clone(), parent.guid().clone()))
    }

    fn require_group(&self, guid: &Guid) -> Result<()> {
        match self.graph.get(guid.as_str()) {
            Some(record) if record.isa().is_group() => Ok(()),
            _ => Err(ProjectError::NotFound { path: guid.to_string() }),
        }
    }

    fn mint_id(&self) -> Guid {
        loop {
            let id = Guid::new(self.ctx.id_gen.generate_id());
            if !self.graph.contains(id.as_str()) {
                return id;
            }
        }
    }

    /// A file reference under `parent` pointing at `abs`, either by its
    /// resolved location or by an identical `path` string.
    fn child_file_ref_for(&self, parent: &Guid, abs: &Path, path: &str) -> Option<Guid> {
        let parent = locate_guid(&self.graph, parent.as_str())
            .or_else(|| NodeView::new(&self.graph, parent.as_str()))?;
        let found = parent.children().into_iter().find(|child| {
            child.isa() == Some(&Isa::FileReference)
                && (child.path() == Some(path) || self.folder_of(child).as_deref() == Some(abs))
        });
        found.map(|child| child.guid().clone())
    }

    fn find_or_create_group(&mut self, parent: &Guid, dir: &Path, added: &mut AddedFolder) -> Guid {
        let name = dir.file_name().map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        let existing = self.graph.get(parent.as_str()).and_then(|p| {
            p.list("children")
                .filter_map(|c| self.graph.reference(c))
                .find(|c| self.graph.get(c.as_str()).is_some_and(|r| r.isa().is_group() && r.name() == Some(name.as_str())))
                .cloned()
        });
        if let Some(group) = existing {
            return group;
        }

        let guid = self.mint_id();
        let record = Record::new(Isa::Group)
            .with("children", Value::Array(Vec::new()))
            .with("name", name)
            .with("path", relative_path(&self.source_root, dir))
            .with("sourceTree", SOURCE_ROOT);
        self.graph.insert(guid.clone(), record);
        self.graph.push_ref(parent, "children", &guid);
        added.groups.push(guid.clone());
        guid
    }
}

impl ObjectGraph {
    /// Appends `item` to an identifier list such as `children` or `files`,
    /// creating the list if the record has none.
    fn push_ref(&mut self, owner: &Guid, key: &str, item: &Guid) {
        let Some(record) = self.get_mut(owner.as_str()) else {
            return;
        };
        if record.list_mut(key).is_none() {
            record.set(key, Value::Array(Vec::new()));
        }
        if let Some(list) = record.list_mut(key) {
            list.push(Value::from(item.as_str()));
        }
    }

    /// Removes every occurrence of `child` from a record's `children`.
    fn detach_child(&mut self, parent: &Guid, child: &Guid) {
        if let Some(children) = self.get_mut(parent.as_str()).and_then(|r| r.list_mut("children")) {
            children.retain(|c| c.as_str() != Some(child.as_str()));
        }
    }

    /// Phases of `kind` listed by any target, in target then phase order.
    fn build_phases(&self, kind: BuildPhaseKind) -> Vec<Guid> {
        let want = kind.isa();
        let mut phases: Vec<Guid> = Vec::new();
        for (_, target) in self.records().filter(|(_, r)| r.isa().is_target()) {
            for phase in target.list("buildPhases").filter_map(|p| self.reference(p)) {
                let matches = self.get(phase.as_str()).is_some_and(|r| *r.isa() == want);
                if matches && !phases.contains(phase) {
                    phases.push(phase.clone());
                }
            }
        }
        phases
    }

    fn delete_recursive(&mut self, guid: &Guid, removed: &mut Vec<Guid>) {
        let Some(record) = self.remove(guid.as_str()) else {
            return;
        };
        removed.push(guid.clone());

        let build_files: Vec<Guid> = self
            .records()
            .filter(|(_, r)| *r.isa() == Isa::BuildFile && r.file_ref() == Some(guid.as_str()))
            .map(|(g, _)| g.clone())
            .collect();
        for build_file in build_files {
            self.remove(build_file.as_str());
            self.strip_from_phases(&build_file);
            removed.push(build_file);
        }

        for child in record.list("children").map(Guid::from) {
            self.delete_recursive(&child, removed);
        }
    }

    fn strip_from_phases(&mut self, build_file: &Guid) {
        let phases: Vec<Guid> = self
            .records()
            .filter(|(_, r)| r.isa().is_build_phase())
            .map(|(g, _)| g.clone())
            .collect();
        for phase in phases {
            if let Some(files) = self.get_mut(phase.as_str()).and_then(|r| r.list_mut("files")) {
                files.retain(|f| f.as_str() != Some(build_file.as_str()));
            }
        }
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|source| ProjectError::InvalidPattern { pattern: p.clone(), source })
        })
        .collect()
}

fn is_excluded(excludes: &[Regex], path: &Path) -> bool {
    let text = path.to_string_lossy();
    excludes.iter().any(|re| re.is_match(&text))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name().is_some_and(|n| n.to_string_lossy().starts_with('.'))
}

/// Resolves `.` and `..` components without touching the disk.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// `target` relative to `base`, joined with `/`. Falls back to the full
/// target when only one of the two is absolute.
fn relative_path(base: &Path, target: &Path) -> String {
    let base = normalize(base);
    let target = normalize(target);
    if base.has_root() != target.has_root() {
        return target.display().to_string();
    }
    let from: Vec<Component<'_>> = base.components().collect();
    let to: Vec<Component<'_>> = target.components().collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    let mut parts = vec!["..".to_string(); from.len() - common];
    parts.extend(to[common..].iter().map(|c| c.as_os_str().to_string_lossy().into_owned()));
    parts.join("/")
}
