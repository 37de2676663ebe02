//! The project graph model and its load / edit / save session.
//!
//! [`XcodeProject`] ties a decoded [`ObjectGraph`] to the file it came from
//! and to the ports used to read folders and mint identifiers. Navigation
//! goes through [`NodeView`] and [`find_location`]; edits go through the
//! methods in `mutate`; [`XcodeProject::to_text`] regenerates the file.

pub mod comments;
pub mod filetype;
pub mod graph;
pub mod guid;
pub mod isa;
pub mod locate;
mod mutate;
pub mod node;
pub mod serialize;

use std::path::{Path, PathBuf};

pub use graph::{ObjectGraph, Record};
pub use guid::Guid;
pub use isa::Isa;
pub use locate::find_location;
pub use mutate::{AddedFile, AddedFolder, TreeKind};
pub use node::{NodeView, Resolved};

use crate::context::ServiceContext;
use crate::error::{ProjectError, Result};
use crate::plist;

const PBXPROJ: &str = "project.pbxproj";

/// One loaded project file and the session state around it.
pub struct XcodeProject<'a> {
    ctx: &'a ServiceContext,
    pbxproj_path: PathBuf,
    source_root: PathBuf,
    graph: ObjectGraph,
}

impl<'a> XcodeProject<'a> {
    /// Loads a project from a `.xcodeproj` bundle or the `project.pbxproj`
    /// file inside one.
    ///
    /// The source root is the directory that contains the bundle.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Io`] if the file cannot be read, and decode or
    /// malformed-record errors if its contents are not a project.
    pub fn load(ctx: &'a ServiceContext, path: &Path) -> Result<Self> {
        let (pbxproj_path, bundle) = if path.file_name().is_some_and(|n| n == PBXPROJ) {
            (path.to_path_buf(), path.parent().unwrap_or(Path::new("")).to_path_buf())
        } else {
            (path.join(PBXPROJ), path.to_path_buf())
        };
        let source_root = bundle.parent().unwrap_or(Path::new("")).to_path_buf();

        let text = ctx.fs.read_to_string(&pbxproj_path).map_err(|e| ProjectError::Io {
            context: format!("reading {}", pbxproj_path.display()),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %pbxproj_path.display(), bytes = text.len(), "loaded project file");
        Self::from_text(ctx, &text, pbxproj_path, source_root)
    }

    /// Builds a session from already-read project text.
    ///
    /// # Errors
    ///
    /// Returns decode or malformed-record errors.
    pub fn from_text(
        ctx: &'a ServiceContext,
        text: &str,
        pbxproj_path: PathBuf,
        source_root: PathBuf,
    ) -> Result<Self> {
        let graph = ObjectGraph::from_value(plist::decode(text)?)?;
        Ok(Self { ctx, pbxproj_path, source_root, graph })
    }

    /// The object graph.
    #[must_use]
    pub fn graph(&self) -> &ObjectGraph {
        &self.graph
    }

    /// Directory that source-root-relative paths are resolved against.
    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// The `project.pbxproj` file this session writes to.
    #[must_use]
    pub fn pbxproj_path(&self) -> &Path {
        &self.pbxproj_path
    }

    /// Resolves a location path; see [`find_location`].
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::NotFound`] if the path does not resolve.
    pub fn find_location(&self, path: &str) -> Result<NodeView<'_>> {
        find_location(&self.graph, path)
    }

    /// Regenerates the full file text.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::UnknownSection`] if a record cannot be
    /// placed in the output.
    pub fn to_text(&self) -> Result<String> {
        for (owner, target) in self.graph.dangling_references() {
            tracing::warn!(%owner, %target, "record refers to a missing object");
        }
        serialize::write_project(&self.graph)
    }

    /// Writes the regenerated text over the project file.
    ///
    /// The whole buffer is produced before anything is written.
    ///
    /// # Errors
    ///
    /// Returns serialization errors, or [`ProjectError::Io`] if the write
    /// fails.
    pub fn save(&self) -> Result<()> {
        let text = self.to_text()?;
        self.ctx.fs.write(&self.pbxproj_path, &text).map_err(|e| ProjectError::Io {
            context: format!("writing {}", self.pbxproj_path.display()),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %self.pbxproj_path.display(), objects = self.graph.len(), "saved project");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, sample_fs, SAMPLE_PROJECT, SAMPLE_ROOT};

    #[test]
    fn loads_from_bundle_or_pbxproj_path() {
        let fs = sample_fs();
        let ctx = context(&fs);
        let from_bundle = XcodeProject::load(&ctx, Path::new(SAMPLE_PROJECT)).unwrap();
        let from_file =
            XcodeProject::load(&ctx, &Path::new(SAMPLE_PROJECT).join(PBXPROJ)).unwrap();
        assert_eq!(from_bundle.source_root(), Path::new(SAMPLE_ROOT));
        assert_eq!(from_file.source_root(), Path::new(SAMPLE_ROOT));
        assert_eq!(from_bundle.graph(), from_file.graph());
    }

    #[test]
    fn missing_file_is_io_error() {
        let fs = crate::testing::MemFs::new();
        let ctx = context(&fs);
        let err = XcodeProject::load(&ctx, Path::new("/nowhere/App.xcodeproj")).err().unwrap();
        assert!(matches!(err, ProjectError::Io { .. }));
    }

    #[test]
    fn round_trip_is_stable() {
        let fs = sample_fs();
        let ctx = context(&fs);
        let project = XcodeProject::load(&ctx, Path::new(SAMPLE_PROJECT)).unwrap();
        project.save().unwrap();

        let reloaded = XcodeProject::load(&ctx, Path::new(SAMPLE_PROJECT)).unwrap();
        assert_eq!(project.graph(), reloaded.graph());
        assert_eq!(project.to_text().unwrap(), reloaded.to_text().unwrap());
    }

    #[test]
    fn round_trip_keeps_xcode_comments() {
        let fs = sample_fs();
        let ctx = context(&fs);
        let text = XcodeProject::load(&ctx, Path::new(SAMPLE_PROJECT)).unwrap().to_text().unwrap();
        assert!(text.contains(
            "\t\t1D60589B0D05DD56006BFB54 /* main.m */ = {isa = PBXBuildFile; fileRef = 29B97316FDCFA39411CA2CEA /* main.m */; };"
        ));
        assert!(text.contains("buildConfigurationList = 1D6058960D05DD3E006BFB54 /* Build configuration list for PBXNativeTarget \"App\" */;"));
        assert!(text.contains("\t\t\t\t1D60588E0D05DD3D006BFB54 /* Sources */,\n"));
        assert!(text.contains("\trootObject = 29B97313FDCFA39411CA2CEA /* Project Object */;\n"));
        assert!(text.contains("\t\t\tprojectDirPath = \"\";\n"));
    }
}
