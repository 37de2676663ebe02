//! `xprojedit addfiles` command.

use std::path::{Path, PathBuf};

use crate::cli::SaveArgs;
use crate::context::ServiceContext;
use crate::project::TreeKind;

/// Execute the `addfiles` command.
///
/// Files are added in order; the first missing file aborts the command
/// before anything is saved.
///
/// # Errors
///
/// Returns an error string if the project cannot be loaded, the target
/// location is not a group, a file is missing, or saving fails.
pub fn run(
    ctx: &ServiceContext,
    project: &Path,
    files: &[PathBuf],
    location: &str,
    absolute: bool,
    create_build_files: bool,
    save: &SaveArgs,
) -> Result<(), String> {
    let mut project = super::open(ctx, project)?;
    let parent = super::group_at(&project, location)?;
    let tree = if absolute { TreeKind::Absolute } else { TreeKind::SourceRoot };

    for file in files {
        let path = super::absolute(file)?;
        let added = project
            .add_file(&parent, &path, create_build_files, tree)
            .map_err(|e| e.to_string())?;
        eprintln!("Added {} ({} build files).", path.display(), added.build_files.len());
    }
    super::finish(&project, save)
}
