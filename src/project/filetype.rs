//! Extension → file type table used when new file references are minted.

use std::path::Path;

use super::isa::Isa;

/// The build phase a file type is associated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhaseKind {
    /// Compiled into the target.
    Sources,
    /// Linked against.
    Frameworks,
    /// Copied into the product bundle.
    Resources,
}

impl BuildPhaseKind {
    /// The `isa` of the phase records of this kind.
    #[must_use]
    pub fn isa(self) -> Isa {
        match self {
            Self::Sources => Isa::SourcesBuildPhase,
            Self::Frameworks => Isa::FrameworksBuildPhase,
            Self::Resources => Isa::ResourcesBuildPhase,
        }
    }
}

/// Inferred `lastKnownFileType` and build phase for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileType {
    /// Value written to `lastKnownFileType`.
    pub type_tag: &'static str,
    /// Phase the file belongs in, if any.
    pub phase: Option<BuildPhaseKind>,
}

/// Tag written for extensions the table does not know.
pub const UNKNOWN_TYPE: &str = "?";

/// Directory extensions treated as a single file rather than walked.
pub const OPAQUE_BUNDLES: &[&str] = &["bundle", "framework", "xcodeproj"];

use BuildPhaseKind::{Frameworks, Resources, Sources};

const TABLE: &[(&str, &str, Option<BuildPhaseKind>)] = &[
    ("a", "archive.ar", Some(Frameworks)),
    ("app", "wrapper.application", None),
    ("s", "sourcecode.asm", Some(Sources)),
    ("c", "sourcecode.c.c", Some(Sources)),
    ("cpp", "sourcecode.cpp.cpp", Some(Sources)),
    ("framework", "wrapper.framework", Some(Frameworks)),
    ("h", "sourcecode.c.h", None),
    ("hpp", "sourcecode.c.h", None),
    ("icns", "image.icns", Some(Resources)),
    ("m", "sourcecode.c.objc", Some(Sources)),
    ("j", "sourcecode.c.objc", Some(Sources)),
    ("mm", "sourcecode.cpp.objcpp", Some(Sources)),
    ("swift", "sourcecode.swift", Some(Sources)),
    ("nib", "wrapper.nib", Some(Resources)),
    ("xib", "file.xib", Some(Resources)),
    ("storyboard", "file.storyboard", Some(Resources)),
    ("plist", "text.plist.xml", Some(Resources)),
    ("strings", "text.plist.strings", Some(Resources)),
    ("json", "text.json", Some(Resources)),
    ("png", "image.png", Some(Resources)),
    ("jpg", "image.jpeg", Some(Resources)),
    ("tiff", "image.tiff", Some(Resources)),
    ("rtf", "text.rtf", Some(Resources)),
    ("txt", "text", Some(Resources)),
    ("xcassets", "folder.assetcatalog", Some(Resources)),
    ("xcdatamodeld", "wrapper.xcdatamodel", Some(Sources)),
    ("xcodeproj", "wrapper.pb-project", None),
    ("bundle", "wrapper.plug-in", Some(Resources)),
    ("dylib", "compiled.mach-o.dylib", Some(Frameworks)),
    ("tbd", "sourcecode.text-based-dylib-definition", Some(Frameworks)),
];

/// Classifies a filesystem entry by its extension.
///
/// Directories that are not opaque bundles are plain folders with no phase.
/// Files with an unmapped extension get [`UNKNOWN_TYPE`] and the resources
/// phase. Extension matching is case-sensitive.
#[must_use]
pub fn classify(path: &Path, is_dir: bool) -> FileType {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if is_dir && !is_opaque_bundle(path) {
        return FileType { type_tag: "folder", phase: None };
    }
    match TABLE.iter().find(|(e, _, _)| *e == ext) {
        Some(&(_, type_tag, phase)) => FileType { type_tag, phase },
        None => {
            tracing::warn!(path = %path.display(), "unknown file extension, treating as resource");
            FileType { type_tag: UNKNOWN_TYPE, phase: Some(Resources) }
        }
    }
}

/// Whether a directory is a package that is added whole.
#[must_use]
pub fn is_opaque_bundle(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|ext| OPAQUE_BUNDLES.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_to_phase() {
        let c = classify(Path::new("src/foo.c"), false);
        assert_eq!(c, FileType { type_tag: "sourcecode.c.c", phase: Some(Sources) });
        let png = classify(Path::new("Icon.png"), false);
        assert_eq!(png.phase, Some(Resources));
        let header = classify(Path::new("foo.h"), false);
        assert_eq!(header, FileType { type_tag: "sourcecode.c.h", phase: None });
    }

    #[test]
    fn unknown_extension_falls_back_to_resources() {
        let ft = classify(Path::new("notes.weird"), false);
        assert_eq!(ft, FileType { type_tag: UNKNOWN_TYPE, phase: Some(Resources) });
        let bare = classify(Path::new("Makefile"), false);
        assert_eq!(bare.type_tag, UNKNOWN_TYPE);
    }

    #[test]
    fn extension_match_is_case_sensitive() {
        assert_eq!(classify(Path::new("SHOUT.C"), false).type_tag, UNKNOWN_TYPE);
    }

    #[test]
    fn bundles_are_files_and_other_directories_are_folders() {
        let fw = classify(Path::new("Libs/UIKit.framework"), true);
        assert_eq!(fw, FileType { type_tag: "wrapper.framework", phase: Some(Frameworks) });
        let dir = classify(Path::new("Classes"), true);
        assert_eq!(dir, FileType { type_tag: "folder", phase: None });
        assert!(is_opaque_bundle(Path::new("Data.bundle")));
        assert!(!is_opaque_bundle(Path::new("Images.xcassets")));
    }
}
