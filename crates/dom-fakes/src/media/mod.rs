//! Fake media capture objects: tracks, streams and the ambient
//! `MediaStream` constructor.
//!
//! Tracks and streams are shared handles. Cloning a handle never copies the
//! underlying object, so a track held by several streams and audio nodes is
//! the same track everywhere.

pub mod global;
mod stream;
mod track;

pub use stream::{MediaStream, StreamInit, StreamOptions, TrackEvent};
pub use track::{MediaTrack, TrackKind, TrackOptions};
