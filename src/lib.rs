//! Core library entry for the `xprojedit` CLI.
//!
//! The project model lives in [`project`]: load a file into an
//! [`project::XcodeProject`], navigate it with location paths, edit it with
//! the add/remove/sync operations and write it back byte-for-byte in the
//! format Xcode expects.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod plist;
pub mod ports;
pub mod project;
pub mod render;
#[cfg(test)]
mod testing;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["xprojedit", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_reports_missing_project() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("Missing.xcodeproj");
        let args = [OsStr::new("xprojedit"), OsStr::new("tree"), missing.as_os_str()];
        let err = run(args).unwrap_err();
        assert!(err.contains("project.pbxproj"), "{err}");
    }
}
