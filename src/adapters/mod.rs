//! Port adapters: live disk/UUID access plus cassette recording and replay.

pub mod live;
pub mod recording;
pub mod replaying;
