//! Frame sinks for offline export.
//!
//! Sinks consume rendered frames in timeline order and are used by
//! [`crate::pipeline::export_to_sink`].

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Numbered PNG files.
pub mod png;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
