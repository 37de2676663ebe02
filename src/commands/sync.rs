//! `xprojedit syncgrp` command.

use std::path::Path;

use crate::cli::SaveArgs;
use crate::context::ServiceContext;

/// Execute the `syncgrp` command.
///
/// # Errors
///
/// Returns an error string if the project cannot be loaded, the group is
/// not linked to an existing folder, or saving fails.
pub fn run(ctx: &ServiceContext, project: &Path, location: &str, save: &SaveArgs) -> Result<(), String> {
    let mut project = super::open(ctx, project)?;
    let added = project.sync_location(location).map_err(|e| e.to_string())?;
    eprintln!(
        "Synced {location}: {} groups, {} files, {} skipped.",
        added.groups.len(),
        added.files.len(),
        added.skipped.len()
    );
    super::finish(&project, save)
}
