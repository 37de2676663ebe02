//! Replaying adapters that serve recorded interactions.

pub mod filesystem;
pub mod id_gen;

pub use filesystem::ReplayingFileSystem;
pub use id_gen::ReplayingIdGenerator;
