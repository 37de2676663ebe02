//! In-memory port implementations for tests.
//!
//! These run the full project pipeline without touching the disk or
//! drawing random identifiers, so expected output can be spelled out
//! exactly.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::context::ServiceContext;
use crate::ports::filesystem::FileSystem;
use crate::ports::id_gen::IdGenerator;

#[derive(Debug, Default)]
struct Tree {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
}

/// A shared in-memory filesystem.
///
/// Clones see the same tree, so a test can keep a handle and change "disk"
/// contents after the filesystem has been moved into a context.
#[derive(Debug, Clone, Default)]
pub struct MemFs {
    tree: Arc<Mutex<Tree>>,
}

impl MemFs {
    /// Creates an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Creates a file (and its parent directories) with the given contents.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: &str) {
        let path = path.as_ref();
        let mut tree = self.lock();
        if let Some(parent) = path.parent() {
            insert_dirs(&mut tree, parent);
        }
        tree.files.insert(path.to_path_buf(), contents.to_string());
    }

    /// Creates a directory and its ancestors.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        insert_dirs(&mut self.lock(), path.as_ref());
    }

    /// Removes a file or a directory with everything under it.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut tree = self.lock();
        tree.files.retain(|p, _| !p.starts_with(path));
        tree.dirs.retain(|p| !p.starts_with(path));
    }

    /// Current contents of a file, if it exists.
    #[must_use]
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.lock().files.get(path.as_ref()).cloned()
    }
}

fn insert_dirs(tree: &mut Tree, dir: &Path) {
    for ancestor in dir.ancestors() {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        tree.dirs.insert(ancestor.to_path_buf());
    }
}

impl FileSystem for MemFs {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.contents(path).ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.add_file(path, contents);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let tree = self.lock();
        tree.files.contains_key(path) || tree.dirs.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.lock().dirs.contains(path)
    }

    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let tree = self.lock();
        if !tree.dirs.contains(path) {
            return Err(format!("Not a directory: {}", path.display()).into());
        }
        let names: BTreeSet<String> = tree
            .files
            .keys()
            .chain(tree.dirs.iter())
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        Ok(names.into_iter().collect())
    }
}

/// Mints `000000000000000000000001`, `000000000000000000000002`, ...
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Creates a generator whose first identifier is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{n:024X}")
    }
}

/// A context over `fs` with sequential identifiers.
#[must_use]
pub fn context(fs: &MemFs) -> ServiceContext {
    ServiceContext::with_ports(Box::new(fs.clone()), Box::new(SequentialIdGenerator::new()))
}

/// Source root of the [`sample_fs`] project.
pub const SAMPLE_ROOT: &str = "/work";

/// Bundle path of the [`sample_fs`] project.
pub const SAMPLE_PROJECT: &str = "/work/App.xcodeproj";

/// A small single-target iOS project: `Classes/main.m` in the sources phase,
/// with empty resources and frameworks phases.
pub const SAMPLE_PBXPROJ: &str = include_str!("../tests/fixtures/App.pbxproj");

/// An in-memory copy of [`SAMPLE_PBXPROJ`] at [`SAMPLE_PROJECT`], with
/// `Classes/main.m` on disk under [`SAMPLE_ROOT`].
#[must_use]
pub fn sample_fs() -> MemFs {
    let fs = MemFs::new();
    fs.add_file(Path::new(SAMPLE_PROJECT).join("project.pbxproj"), SAMPLE_PBXPROJ);
    fs.add_file(Path::new(SAMPLE_ROOT).join("Classes/main.m"), "int main(void) { return 0; }\n");
    fs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_files_and_directories_once() {
        let fs = MemFs::new();
        fs.add_file("/p/Classes/b.m", "");
        fs.add_file("/p/Classes/a.m", "");
        fs.add_dir("/p/Classes/Empty");
        let names = fs.list_dir(Path::new("/p/Classes")).unwrap();
        assert_eq!(names, vec!["Empty", "a.m", "b.m"]);
        assert!(fs.is_dir(Path::new("/p")));
        assert!(fs.exists(Path::new("/p/Classes/a.m")));
        assert!(!fs.is_dir(Path::new("/p/Classes/a.m")));
    }

    #[test]
    fn remove_drops_subtree() {
        let fs = MemFs::new();
        fs.add_file("/p/Classes/a.m", "");
        fs.remove("/p/Classes");
        assert!(!fs.exists(Path::new("/p/Classes/a.m")));
        assert!(fs.list_dir(Path::new("/p")).unwrap().is_empty());
    }

    #[test]
    fn sequential_ids_are_24_hex_digits() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.generate_id(), "000000000000000000000001");
        assert_eq!(ids.generate_id(), "000000000000000000000002");
    }
}
