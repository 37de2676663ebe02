//! Object kinds and the fixed output section table.

use std::fmt;

/// How the records of one section are laid out in the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One key per line, nested values indented.
    Multiline,
    /// The whole record on a single line.
    Compact,
}

/// The kind of an object record, taken from its `isa` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Isa {
    /// `PBXBuildFile`: joins one file reference to one build phase.
    BuildFile,
    /// `PBXCopyFilesBuildPhase`.
    CopyFilesBuildPhase,
    /// `PBXFileReference`: one file or bundle on disk.
    FileReference,
    /// `PBXFrameworksBuildPhase`.
    FrameworksBuildPhase,
    /// `PBXGroup`: a folder-like node with ordered children.
    Group,
    /// `PBXHeadersBuildPhase`.
    HeadersBuildPhase,
    /// `PBXAggregateTarget`.
    AggregateTarget,
    /// `PBXNativeTarget`.
    NativeTarget,
    /// `PBXLegacyTarget`.
    LegacyTarget,
    /// `PBXProject`: the root object.
    Project,
    /// `PBXResourcesBuildPhase`.
    ResourcesBuildPhase,
    /// `PBXShellScriptBuildPhase`.
    ShellScriptBuildPhase,
    /// `PBXSourcesBuildPhase`.
    SourcesBuildPhase,
    /// `XCBuildConfiguration`.
    BuildConfiguration,
    /// `XCConfigurationList`.
    ConfigurationList,
    /// `PBXTargetDependency`.
    TargetDependency,
    /// `PBXVariantGroup`: localized variants of one file.
    VariantGroup,
    /// `PBXReferenceProxy`.
    ReferenceProxy,
    /// `PBXContainerItemProxy`.
    ContainerItemProxy,
    /// `PBXBuildRule`.
    BuildRule,
    /// `XCVersionGroup`: versioned data model bundle.
    VersionGroup,
    /// A type name with no section in the output file.
    Other(String),
}

/// Output sections in file order, with their layout.
///
/// The order is hand-curated and independent of the order in which records
/// were loaded or created.
pub const SECTIONS: &[(&str, Layout)] = &[
    ("PBXBuildFile", Layout::Compact),
    ("PBXCopyFilesBuildPhase", Layout::Multiline),
    ("PBXFileReference", Layout::Compact),
    ("PBXFrameworksBuildPhase", Layout::Multiline),
    ("PBXGroup", Layout::Multiline),
    ("PBXHeadersBuildPhase", Layout::Multiline),
    ("PBXAggregateTarget", Layout::Multiline),
    ("PBXNativeTarget", Layout::Multiline),
    ("PBXLegacyTarget", Layout::Multiline),
    ("PBXProject", Layout::Multiline),
    ("PBXResourcesBuildPhase", Layout::Multiline),
    ("PBXShellScriptBuildPhase", Layout::Multiline),
    ("PBXSourcesBuildPhase", Layout::Multiline),
    ("XCBuildConfiguration", Layout::Multiline),
    ("XCConfigurationList", Layout::Multiline),
    ("PBXTargetDependency", Layout::Multiline),
    ("PBXVariantGroup", Layout::Multiline),
    ("PBXReferenceProxy", Layout::Multiline),
    ("PBXContainerItemProxy", Layout::Multiline),
    ("PBXBuildRule", Layout::Multiline),
    ("XCVersionGroup", Layout::Multiline),
];

impl Isa {
    /// Maps a type name to its kind; unknown names become [`Isa::Other`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "PBXBuildFile" => Self::BuildFile,
            "PBXCopyFilesBuildPhase" => Self::CopyFilesBuildPhase,
            "PBXFileReference" => Self::FileReference,
            "PBXFrameworksBuildPhase" => Self::FrameworksBuildPhase,
            "PBXGroup" => Self::Group,
            "PBXHeadersBuildPhase" => Self::HeadersBuildPhase,
            "PBXAggregateTarget" => Self::AggregateTarget,
            "PBXNativeTarget" => Self::NativeTarget,
            "PBXLegacyTarget" => Self::LegacyTarget,
            "PBXProject" => Self::Project,
            "PBXResourcesBuildPhase" => Self::ResourcesBuildPhase,
            "PBXShellScriptBuildPhase" => Self::ShellScriptBuildPhase,
            "PBXSourcesBuildPhase" => Self::SourcesBuildPhase,
            "XCBuildConfiguration" => Self::BuildConfiguration,
            "XCConfigurationList" => Self::ConfigurationList,
            "PBXTargetDependency" => Self::TargetDependency,
            "PBXVariantGroup" => Self::VariantGroup,
            "PBXReferenceProxy" => Self::ReferenceProxy,
            "PBXContainerItemProxy" => Self::ContainerItemProxy,
            "PBXBuildRule" => Self::BuildRule,
            "XCVersionGroup" => Self::VersionGroup,
            other => Self::Other(other.to_string()),
        }
    }

    /// The type name as written in the file.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::BuildFile => "PBXBuildFile",
            Self::CopyFilesBuildPhase => "PBXCopyFilesBuildPhase",
            Self::FileReference => "PBXFileReference",
            Self::FrameworksBuildPhase => "PBXFrameworksBuildPhase",
            Self::Group => "PBXGroup",
            Self::HeadersBuildPhase => "PBXHeadersBuildPhase",
            Self::AggregateTarget => "PBXAggregateTarget",
            Self::NativeTarget => "PBXNativeTarget",
            Self::LegacyTarget => "PBXLegacyTarget",
            Self::Project => "PBXProject",
            Self::ResourcesBuildPhase => "PBXResourcesBuildPhase",
            Self::ShellScriptBuildPhase => "PBXShellScriptBuildPhase",
            Self::SourcesBuildPhase => "PBXSourcesBuildPhase",
            Self::BuildConfiguration => "XCBuildConfiguration",
            Self::ConfigurationList => "XCConfigurationList",
            Self::TargetDependency => "PBXTargetDependency",
            Self::VariantGroup => "PBXVariantGroup",
            Self::ReferenceProxy => "PBXReferenceProxy",
            Self::ContainerItemProxy => "PBXContainerItemProxy",
            Self::BuildRule => "PBXBuildRule",
            Self::VersionGroup => "XCVersionGroup",
            Self::Other(name) => name,
        }
    }

    /// Position and layout of this kind's output section, if it has one.
    #[must_use]
    pub fn section(&self) -> Option<(usize, Layout)> {
        let name = self.as_str();
        SECTIONS.iter().position(|(n, _)| *n == name).map(|i| (i, SECTIONS[i].1))
    }

    /// Build phases hold a `files` list of build file identifiers.
    #[must_use]
    pub fn is_build_phase(&self) -> bool {
        matches!(
            self,
            Self::CopyFilesBuildPhase
                | Self::FrameworksBuildPhase
                | Self::HeadersBuildPhase
                | Self::ResourcesBuildPhase
                | Self::ShellScriptBuildPhase
                | Self::SourcesBuildPhase
        )
    }

    /// Targets own a `buildPhases` list and a `buildConfigurationList`.
    #[must_use]
    pub fn is_target(&self) -> bool {
        matches!(self, Self::NativeTarget | Self::AggregateTarget | Self::LegacyTarget)
    }

    /// Group-like records hold an ordered `children` list.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group | Self::VariantGroup | Self::VersionGroup)
    }
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
