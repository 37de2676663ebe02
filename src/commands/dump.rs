//! `xprojedit dump` command.

use std::path::Path;

use crate::context::ServiceContext;

/// Execute the `dump` command.
///
/// # Errors
///
/// Returns an error string if the project cannot be loaded or the location
/// does not resolve.
pub fn run(ctx: &ServiceContext, project: &Path, location: &str) -> Result<(), String> {
    println!("{}", render(ctx, project, location)?);
    Ok(())
}

/// Pretty-printed JSON for the node at `location`.
///
/// # Errors
///
/// Returns an error string if the project cannot be loaded or the location
/// does not resolve.
pub fn render(ctx: &ServiceContext, project: &Path, location: &str) -> Result<String, String> {
    let project = super::open(ctx, project)?;
    let node = project.find_location(location).map_err(|e| e.to_string())?;
    let summary = node.summary().ok_or_else(|| format!("{location} has no record"))?;
    serde_json::to_string_pretty(&summary).map_err(|e| format!("Failed to encode {location}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, sample_fs, SAMPLE_PROJECT};

    #[test]
    fn expands_children_one_level() {
        let fs = sample_fs();
        let ctx = context(&fs);
        let json = render(&ctx, Path::new(SAMPLE_PROJECT), "Classes").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["guid"], "080E96DDFE201D6D7F000001");
        assert_eq!(value["isa"], "PBXGroup");
        assert_eq!(value["fields"]["path"], "Classes");
        let child = &value["fields"]["children"][0];
        assert_eq!(child["isa"], "PBXFileReference");
        assert_eq!(child["path"], "main.m");
    }
}
