//! Playback: the shredder state machine and the collaborators that drive it.
//!
//! Everything here is single-threaded. A [`ShredderSession`] owns its animation state,
//! sheet and output surface; [`run_frame_loop`] re-enters [`ShredderSession::tick`] once
//! per frame until nothing is scheduled.

/// Time sources.
pub mod clock;
/// Cooperative frame pacing and the frame loop.
pub mod frame_loop;
/// The playback state machine.
pub mod shredder;

pub use clock::{Clock, ManualClock, SystemClock};
pub use frame_loop::{FrameLoopReport, FramePacer, IntervalPacer, ManualPacer, run_frame_loop};
pub use shredder::{AnimationState, PlaybackPhase, ShredderSession, TickOutcome};
