//! `xprojedit tree` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::render::{tree_lines, TreeStyle};

/// Execute the `tree` command.
///
/// # Errors
///
/// Returns an error string if the project cannot be loaded or the location
/// does not resolve.
pub fn run(
    ctx: &ServiceContext,
    project: &Path,
    location: &str,
    style: TreeStyle,
    dirs_only: bool,
) -> Result<(), String> {
    for line in render(ctx, project, location, style, dirs_only)? {
        println!("{line}");
    }
    Ok(())
}

/// The lines `run` prints.
///
/// # Errors
///
/// Returns an error string if the project cannot be loaded or the location
/// does not resolve.
pub fn render(
    ctx: &ServiceContext,
    project: &Path,
    location: &str,
    style: TreeStyle,
    dirs_only: bool,
) -> Result<Vec<String>, String> {
    let project = super::open(ctx, project)?;
    let node = project.find_location(location).map_err(|e| e.to_string())?;
    Ok(tree_lines(&node, location, style, dirs_only))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, sample_fs, SAMPLE_PROJECT};

    #[test]
    fn renders_sample_hierarchy() {
        let fs = sample_fs();
        let ctx = context(&fs);
        let lines = render(&ctx, Path::new(SAMPLE_PROJECT), "//", TreeStyle::Flat, false).unwrap();
        assert_eq!(lines, vec!["//", "//Classes", "//Classes/main.m", "//Products", "//Products/App.app"]);
    }

    #[test]
    fn unknown_location_is_reported() {
        let fs = sample_fs();
        let ctx = context(&fs);
        let err = render(&ctx, Path::new(SAMPLE_PROJECT), "//Nope", TreeStyle::Bullet, false).unwrap_err();
        assert_eq!(err, "could not find //Nope");
    }
}
