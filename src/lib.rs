//! papershred animates a still image being fed through a paper shredder.
//!
//! The sheet is cut into vertical strips that drop away with a small, reproducible jitter
//! as progress runs from 0 to 1. Every frame is a pure function of the sheet, the strip
//! count and the progress: the jitter stream is reset and re-seeded with [`SHRED_SEED`]
//! before each frame.
//!
//! # Pieces
//!
//! - [`JitterStream`]: xorshift128 over wrapping `u32` lanes.
//! - [`ShredRenderer`]: draws one frame into a [`Surface`].
//! - [`ShredderSession`]: play/pause/stop state machine driven by a [`Clock`] and
//!   [`run_frame_loop`].
//! - [`load_pixel_buffer`]: builds the sheet from encoded image bytes.
//! - [`export_to_sink`] and friends: offline rendering to PNG sequences or MP4.
//!
//! The core never fails: out-of-range settings are ignored and a missing sheet renders
//! the clear color only. Errors ([`ShredError`]) come from decoding, configuration and
//! encoding.
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
pub mod config;
pub mod encode;
pub mod jitter;
pub mod pipeline;
pub mod render;
pub mod session;

pub use assets::PreparedImage;
pub use assets::decode::{decode_image, decode_image_file};
pub use assets::load::{Fit, SheetOpts, compose_sheet, load_pixel_buffer, placement};
pub use config::ShredConfig;
pub use encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use encode::png::PngSequenceSink;
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{Canvas, Rgba8Premul};
pub use foundation::error::{ShredError, ShredResult};
pub use jitter::xorshift::{JitterStream, SHRED_SEED};
pub use pipeline::{
    ExportOpts, ExportStats, export_frames, export_to_sink, render_progress_frame,
    render_to_mp4, write_png_sequence,
};
pub use render::RenderSettings;
pub use render::present::{Presentation, present};
pub use render::shred::{
    GUTTER_PX, MAX_DEVIATION_PX, OVERSHOOT_PX, ShredRenderer, StripPlacement, cut_line,
    strip_layout,
};
pub use render::surface::{DirtyRect, FrameRGBA, PixelBuffer, Surface};
pub use session::{
    AnimationState, Clock, FrameLoopReport, FramePacer, IntervalPacer, ManualClock, ManualPacer,
    PlaybackPhase, ShredderSession, SystemClock, TickOutcome, run_frame_loop,
};
