//! Command dispatch and handlers.

pub mod add_files;
pub mod add_folder;
pub mod dump;
pub mod find;
pub mod remove;
pub mod sync;
pub mod tree;

use std::env;
use std::path::{Path, PathBuf};

use crate::cassette::session::RecordingSession;
use crate::cli::{Command, SaveArgs};
use crate::context::ServiceContext;
use crate::project::{Guid, XcodeProject};

/// Dispatch a parsed command to its handler.
///
/// When `XPROJEDIT_RECORD` is set to a directory path, all port interactions
/// are recorded to per-port cassette files in that directory.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let (ctx, session) = if let Ok(path) = env::var("XPROJEDIT_RECORD") {
        let project = command.project().display().to_string();
        let (ctx, session) = ServiceContext::recording_at(Path::new(&path), &project)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(), None)
    };

    let result = dispatch_with_context(command, &ctx);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the command fails.
pub fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<(), String> {
    match command {
        Command::Tree { project, location, style, dirs_only } => {
            tree::run(ctx, project, location, *style, *dirs_only)
        }
        Command::Find { project, search, location } => find::run(ctx, project, search, location),
        Command::AddFolder { project, folder, location, excludes, no_recursive, save } => {
            add_folder::run(ctx, project, folder, location, excludes, !*no_recursive, save)
        }
        Command::AddFiles { project, files, location, absolute, no_build_files, save } => {
            add_files::run(ctx, project, files, location, *absolute, !*no_build_files, save)
        }
        Command::Remove { project, location, save } => remove::run(ctx, project, location, save),
        Command::Sync { project, location, save } => sync::run(ctx, project, location, save),
        Command::Dump { project, location } => dump::run(ctx, project, location),
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

/// Makes a command-line path absolute against the working directory.
fn absolute(path: &Path) -> Result<PathBuf, String> {
    std::path::absolute(path).map_err(|e| format!("Invalid path {}: {e}", path.display()))
}

/// Loads the project named on the command line.
fn open<'a>(ctx: &'a ServiceContext, project: &Path) -> Result<XcodeProject<'a>, String> {
    XcodeProject::load(ctx, &absolute(project)?).map_err(|e| e.to_string())
}

/// Identifier of the group at `location`.
fn group_at(project: &XcodeProject<'_>, location: &str) -> Result<Guid, String> {
    let node = project.find_location(location).map_err(|e| e.to_string())?;
    if !node.isa().is_some_and(crate::project::Isa::is_group) {
        return Err(format!("{location} is not a group"));
    }
    Ok(node.guid().clone())
}

/// Writes the project, or prints it when saving is disabled.
fn finish(project: &XcodeProject<'_>, save: &SaveArgs) -> Result<(), String> {
    if save.no_save {
        print!("{}", project.to_text().map_err(|e| e.to_string())?);
        Ok(())
    } else {
        project.save().map_err(|e| e.to_string())
    }
}
