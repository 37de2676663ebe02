//! Cassette data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded interaction with a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (`fs` or `id_gen`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Input data sent to the port.
    pub input: serde_json::Value,
    /// Output data returned from the port.
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Project file the session operated on.
    pub project: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yaml_keeps_interaction_payloads() {
        let cassette = Cassette {
            name: "add-files".into(),
            recorded_at: Utc::now(),
            project: "Unity-iPhone.xcodeproj".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "fs".into(),
                method: "list_dir".into(),
                input: json!({"path": "/project/Classes"}),
                output: json!({"ok": ["main.mm"]}),
            }],
        };
        let yaml = serde_yaml::to_string(&cassette).expect("serialize");
        assert!(yaml.contains("project: Unity-iPhone.xcodeproj"));
        let parsed: Cassette = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(parsed.interactions[0].output, json!({"ok": ["main.mm"]}));
    }
}
