//! Identifier generator port for minting object identifiers.

/// Generates identifiers for newly created project objects.
///
/// Identifiers are 24 uppercase hexadecimal characters, the shape Xcode uses
/// for object keys. Uniqueness is only guaranteed for the lifetime of one
/// generator instance.
pub trait IdGenerator: Send + Sync {
    /// Generates a new unique identifier string.
    fn generate_id(&self) -> String;
}
