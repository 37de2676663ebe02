//! Service context bundling the port trait objects.

use std::path::Path;

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::id_gen::LiveIdGenerator;
use crate::adapters::recording::{RecordingFileSystem, RecordingIdGenerator};
use crate::adapters::replaying::{ReplayingFileSystem, ReplayingIdGenerator};
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::ports::filesystem::FileSystem;
use crate::ports::id_gen::IdGenerator;

/// Bundles the port trait objects a project session needs.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying).
pub struct ServiceContext {
    /// Filesystem for reading/writing the project and walking folders.
    pub fs: Box<dyn FileSystem>,
    /// Generator for new object identifiers.
    pub id_gen: Box<dyn IdGenerator>,
}

impl ServiceContext {
    /// Creates a live context backed by the real disk and random UUIDs.
    #[must_use]
    pub fn live() -> Self {
        Self { fs: Box::new(LiveFileSystem), id_gen: Box::new(LiveIdGenerator::new()) }
    }

    /// Creates a context from explicit port implementations.
    #[must_use]
    pub fn with_ports(fs: Box<dyn FileSystem>, id_gen: Box<dyn IdGenerator>) -> Self {
        Self { fs, id_gen }
    }

    /// Creates a recording context that captures every port interaction.
    ///
    /// Live adapters do the actual work. Cassettes are written when the
    /// returned session is finished, after this context has been dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(root: &Path, project: &str) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(root, project)?;
        let ctx = Self {
            fs: Box::new(RecordingFileSystem::new(
                Box::new(LiveFileSystem),
                std::sync::Arc::clone(&session.fs),
            )),
            id_gen: Box::new(RecordingIdGenerator::new(
                Box::new(LiveIdGenerator::new()),
                std::sync::Arc::clone(&session.id_gen),
            )),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a single cassette file.
    ///
    /// Both ports are served from the same cassette; each port/method pair
    /// keeps its own cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = load_cassette(path)?;
        Ok(Self {
            fs: Box::new(ReplayingFileSystem::new(CassetteReplayer::new(&cassette))),
            id_gen: Box::new(ReplayingIdGenerator::new(CassetteReplayer::new(&cassette))),
        })
    }

    /// Creates a replaying context from a recorded session directory
    /// holding `fs.cassette.yaml` and `id_gen.cassette.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if either cassette cannot be read or parsed.
    pub fn replaying_session(dir: &Path) -> Result<Self, String> {
        let fs = load_cassette(&dir.join("fs.cassette.yaml"))?;
        let id_gen = load_cassette(&dir.join("id_gen.cassette.yaml"))?;
        Ok(Self {
            fs: Box::new(ReplayingFileSystem::new(CassetteReplayer::new(&fs))),
            id_gen: Box::new(ReplayingIdGenerator::new(CassetteReplayer::new(&id_gen))),
        })
    }
}

fn load_cassette(path: &Path) -> Result<Cassette, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
    serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn replaying_context_serves_both_ports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.cassette.yaml");
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            project: "App.xcodeproj".into(),
            interactions: vec![
                Interaction {
                    seq: 0,
                    port: "fs".into(),
                    method: "exists".into(),
                    input: json!({"path": "/project/Classes"}),
                    output: json!(true),
                },
                Interaction {
                    seq: 1,
                    port: "id_gen".into(),
                    method: "generate_id".into(),
                    input: json!(null),
                    output: json!("1D6058910D05DD3D006BFB54"),
                },
            ],
        };
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();

        let ctx = ServiceContext::replaying(&path).unwrap();
        assert!(ctx.fs.exists(Path::new("/project/Classes")));
        assert_eq!(ctx.id_gen.generate_id(), "1D6058910D05DD3D006BFB54");
    }

    #[test]
    fn recording_context_writes_cassettes_after_drop() {
        let root = tempfile::tempdir().unwrap();
        let (ctx, session) = ServiceContext::recording_at(root.path(), "App.xcodeproj").unwrap();
        let id = ctx.id_gen.generate_id();
        drop(ctx);

        let dir = session.finish().unwrap();
        let content = std::fs::read_to_string(dir.join("id_gen.cassette.yaml")).unwrap();
        assert!(content.contains(&id));
    }
}
