//! `xprojedit addfolder` command.

use std::path::Path;

use crate::cli::SaveArgs;
use crate::context::ServiceContext;

/// Execute the `addfolder` command.
///
/// # Errors
///
/// Returns an error string if the project cannot be loaded, the target
/// location is not a group, the folder is missing, an exclude pattern is
/// invalid, or saving fails.
pub fn run(
    ctx: &ServiceContext,
    project: &Path,
    folder: &Path,
    location: &str,
    excludes: &[String],
    recursive: bool,
    save: &SaveArgs,
) -> Result<(), String> {
    let mut project = super::open(ctx, project)?;
    let parent = super::group_at(&project, location)?;
    let folder = super::absolute(folder)?;
    let added = project
        .add_folder(&parent, &folder, excludes, recursive)
        .map_err(|e| e.to_string())?;
    for path in &added.skipped {
        eprintln!("Skipped {}", path.display());
    }
    eprintln!("Added {} groups and {} files.", added.groups.len(), added.files.len());
    super::finish(&project, save)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::XcodeProject;
    use crate::testing::{context, sample_fs, SAMPLE_PROJECT};

    #[test]
    fn adds_folder_under_location_and_saves() {
        let fs = sample_fs();
        fs.add_file("/work/Libs/util.c", "");
        fs.add_file("/work/Libs/util.c.bak", "");
        let ctx = context(&fs);
        let excludes = vec!["\\.bak$".to_string()];

        run(&ctx, Path::new(SAMPLE_PROJECT), Path::new("/work/Libs"), "Classes", &excludes, true, &SaveArgs { no_save: false })
            .unwrap();

        let project = XcodeProject::load(&ctx, Path::new(SAMPLE_PROJECT)).unwrap();
        assert!(project.find_location("Classes/Libs/util.c").is_ok());
        assert!(project.find_location("Classes/Libs/util.c.bak").is_err());
    }

    #[test]
    fn target_must_be_a_group() {
        let fs = sample_fs();
        fs.add_dir("/work/Libs");
        let ctx = context(&fs);
        let err = run(
            &ctx,
            Path::new(SAMPLE_PROJECT),
            Path::new("/work/Libs"),
            "Classes/main.m",
            &[],
            true,
            &SaveArgs { no_save: true },
        )
        .unwrap_err();
        assert_eq!(err, "Classes/main.m is not a group");
    }
}
