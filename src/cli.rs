//! CLI argument definitions.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::render::TreeStyle;

/// Top-level CLI parser for `xprojedit`.
#[derive(Debug, Parser)]
#[command(name = "xprojedit", version, about = "Inspect and edit Xcode project files")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by commands that modify the project.
#[derive(Debug, Clone, Args)]
pub struct SaveArgs {
    /// Print the regenerated project file instead of writing it.
    #[arg(long = "nosave", alias = "dry-run")]
    pub no_save: bool,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the group hierarchy under a location.
    Tree {
        /// Path to the `.xcodeproj` bundle or its `project.pbxproj`.
        project: PathBuf,
        /// Location to start from, e.g. `//Classes`.
        #[arg(default_value = "//")]
        location: String,
        /// Line style.
        #[arg(long, value_enum, default_value_t = TreeStyle::Bullet)]
        style: TreeStyle,
        /// Only show groups that have children.
        #[arg(long)]
        dirs_only: bool,
    },
    /// Search full locations with a regular expression.
    Find {
        /// Path to the `.xcodeproj` bundle or its `project.pbxproj`.
        project: PathBuf,
        /// Plain word (substring match) or regex anchored at line start.
        search: String,
        /// Location to search under.
        #[arg(long, default_value = "//")]
        location: String,
    },
    /// Add a folder as a group, recursively.
    #[command(name = "addfolder")]
    AddFolder {
        /// Path to the `.xcodeproj` bundle or its `project.pbxproj`.
        project: PathBuf,
        /// Folder on disk to add.
        folder: PathBuf,
        /// Group to add the folder under.
        #[arg(long = "to", default_value = "//")]
        location: String,
        /// Regex matched against full paths; matching entries are skipped.
        #[arg(long = "exclude")]
        excludes: Vec<String>,
        /// Only add the folder's direct files.
        #[arg(long)]
        no_recursive: bool,
        #[command(flatten)]
        save: SaveArgs,
    },
    /// Add files to a group.
    #[command(name = "addfiles")]
    AddFiles {
        /// Path to the `.xcodeproj` bundle or its `project.pbxproj`.
        project: PathBuf,
        /// Files on disk to add.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Group to add the files under.
        #[arg(long = "to", default_value = "//")]
        location: String,
        /// Record absolute paths instead of source-root-relative ones.
        #[arg(long)]
        absolute: bool,
        /// Do not add the files to any build phase.
        #[arg(long)]
        no_build_files: bool,
        #[command(flatten)]
        save: SaveArgs,
    },
    /// Remove a group or file and everything under it.
    #[command(name = "rmgrp")]
    Remove {
        /// Path to the `.xcodeproj` bundle or its `project.pbxproj`.
        project: PathBuf,
        /// Location to remove.
        location: String,
        #[command(flatten)]
        save: SaveArgs,
    },
    /// Rebuild a group from the folder it is linked to.
    #[command(name = "syncgrp")]
    Sync {
        /// Path to the `.xcodeproj` bundle or its `project.pbxproj`.
        project: PathBuf,
        /// Location of the group to rebuild.
        location: String,
        #[command(flatten)]
        save: SaveArgs,
    },
    /// Print a node as JSON with references expanded one level.
    Dump {
        /// Path to the `.xcodeproj` bundle or its `project.pbxproj`.
        project: PathBuf,
        /// Location of the node.
        #[arg(default_value = "//")]
        location: String,
    },
}

impl Command {
    /// The project path every command operates on.
    #[must_use]
    pub fn project(&self) -> &Path {
        match self {
            Self::Tree { project, .. }
            | Self::Find { project, .. }
            | Self::AddFolder { project, .. }
            | Self::AddFiles { project, .. }
            | Self::Remove { project, .. }
            | Self::Sync { project, .. }
            | Self::Dump { project, .. } => project,
        }
    }
}
