//! Serves recorded outputs back from a cassette.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Hands out recorded outputs in recording order, one queue per
/// `port::method` pair.
///
/// Queues are independent: the order in which different methods were
/// called during recording does not have to be reproduced, only the order
/// within each method.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Builds the per-method queues from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// The recorded output of the next call to `port::method`.
    ///
    /// # Panics
    ///
    /// Panics if nothing (more) was recorded for the pair. A replayed edit
    /// that asks the disk a question the recording never saw has diverged
    /// from the recording, and there is no sensible answer to make up.
    pub fn next_output(&mut self, port: &str, method: &str) -> serde_json::Value {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut known: Vec<String> = self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            known.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for {port}::{method}; recorded pairs: [{}]",
                known.join(", ")
            );
        };
        match queue.pop_front() {
            Some(interaction) => interaction.output,
            None => panic!("Cassette exhausted: every recorded {port}::{method} call has been replayed"),
        }
    }

    /// Number of recorded calls not yet replayed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            project: "App.xcodeproj".into(),
            interactions,
        }
    }

    fn interaction(seq: u64, port: &str, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: port.into(), method: method.into(), input: json!(null), output }
    }

    #[test]
    fn serves_each_port_method_queue_independently() {
        let cassette = make_cassette(vec![
            interaction(0, "id_gen", "generate_id", json!("A1")),
            interaction(1, "fs", "is_dir", json!(true)),
            interaction(2, "id_gen", "generate_id", json!("A2")),
        ]);

        let mut replayer = CassetteReplayer::new(&cassette);
        assert_eq!(replayer.remaining(), 3);

        assert_eq!(replayer.next_output("fs", "is_dir"), json!(true));
        assert_eq!(replayer.next_output("id_gen", "generate_id"), json!("A1"));
        assert_eq!(replayer.next_output("id_gen", "generate_id"), json!("A2"));
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "every recorded id_gen::generate_id call")]
    fn exhausted_queue_panics() {
        let cassette = make_cassette(vec![interaction(0, "id_gen", "generate_id", json!("A1"))]);

        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_output("id_gen", "generate_id");
        let _ = replayer.next_output("id_gen", "generate_id");
    }

    #[test]
    #[should_panic(expected = "no interactions recorded for fs::list_dir")]
    fn unknown_pair_panics() {
        let cassette = make_cassette(vec![]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_output("fs", "list_dir");
    }
}
