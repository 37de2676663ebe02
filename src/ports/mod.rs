//! Port traits defining external boundaries.
//!
//! The project core touches the outside world through two ports: the
//! filesystem (reading and writing the project file, walking folders that
//! are added to groups) and the identifier generator. Implementations live
//! in `src/adapters/`.

pub mod filesystem;
pub mod id_gen;

pub use filesystem::FileSystem;
pub use id_gen::IdGenerator;
