//! `xprojedit find` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::render::find_lines;

/// Execute the `find` command, printing every matching location.
///
/// # Errors
///
/// Returns an error string if the project cannot be loaded, the location
/// does not resolve, or the search is not a valid pattern.
pub fn run(ctx: &ServiceContext, project: &Path, search: &str, location: &str) -> Result<(), String> {
    let project = super::open(ctx, project)?;
    let node = project.find_location(location).map_err(|e| e.to_string())?;
    let matches = find_lines(&node, location, search).map_err(|e| e.to_string())?;
    if matches.is_empty() {
        println!("No matches for {search}.");
    }
    for line in matches {
        println!("{line}");
    }
    Ok(())
}
