//! `xprojedit rmgrp` command.

use std::path::Path;

use crate::cli::SaveArgs;
use crate::context::ServiceContext;

/// Execute the `rmgrp` command.
///
/// # Errors
///
/// Returns an error string if the project cannot be loaded, the location
/// does not resolve or names the main group, or saving fails.
pub fn run(ctx: &ServiceContext, project: &Path, location: &str, save: &SaveArgs) -> Result<(), String> {
    let mut project = super::open(ctx, project)?;
    let removed = project.remove_location(location).map_err(|e| e.to_string())?;
    eprintln!("Removed {location} ({} objects).", removed.len());
    super::finish(&project, save)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, sample_fs, SAMPLE_PROJECT};

    #[test]
    fn removes_and_saves() {
        let fs = sample_fs();
        let ctx = context(&fs);
        run(&ctx, Path::new(SAMPLE_PROJECT), "//Classes", &SaveArgs { no_save: false }).unwrap();

        let saved = fs.contents(Path::new(SAMPLE_PROJECT).join("project.pbxproj")).unwrap();
        assert!(!saved.contains("080E96DDFE201D6D7F000001"));
        assert!(!saved.contains("main.m"));
    }

    #[test]
    fn nosave_leaves_file_alone() {
        let fs = sample_fs();
        let ctx = context(&fs);
        let path = Path::new(SAMPLE_PROJECT).join("project.pbxproj");
        let before = fs.contents(&path);
        run(&ctx, Path::new(SAMPLE_PROJECT), "//Classes", &SaveArgs { no_save: true }).unwrap();
        assert_eq!(fs.contents(&path), before);
    }
}
