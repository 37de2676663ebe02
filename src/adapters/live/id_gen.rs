//! Live adapter for the `IdGenerator` port.

use uuid::Uuid;

use crate::ports::IdGenerator;

/// Live ID generator backed by random UUIDs.
///
/// The first hyphen group of an uppercase v4 UUID is dropped, leaving the
/// 24 hex digits Xcode expects for an object key.
pub struct LiveIdGenerator;

impl LiveIdGenerator {
    /// Creates a new live ID generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for LiveIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for LiveIdGenerator {
    fn generate_id(&self) -> String {
        let uuid = Uuid::new_v4().hyphenated().to_string().to_uppercase();
        uuid.split('-').skip(1).collect()
    }
}
