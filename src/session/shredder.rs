use std::{ops::RangeInclusive, time::Duration};

use crate::{
    foundation::core::Canvas,
    jitter::xorshift::SHRED_SEED,
    render::{
        RenderSettings,
        present::Presentation,
        shred::ShredRenderer,
        surface::{PixelBuffer, Surface},
    },
    session::clock::Clock,
};

pub const DEFAULT_STRIP_COUNT: u32 = 15;
pub const STRIP_COUNT_RANGE: RangeInclusive<u32> = 2..=100;
pub const DEFAULT_DURATION_MS: u32 = 10_000;
pub const DURATION_SECS_RANGE: RangeInclusive<f64> = 1.0..=20.0;

/// Where playback currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlaybackPhase {
    Idle,
    Playing,
    Paused,
    Finished,
}

/// Snapshot of the animation parameters and position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationState {
    /// Position in `[0, 1]`.
    pub progress: f64,
    pub strip_count: u32,
    pub duration_ms: u32,
    pub playing: bool,
    /// Clock reading (ms) at which progress 0 would have been, given the current speed.
    pub start_ms: f64,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            progress: 0.0,
            strip_count: DEFAULT_STRIP_COUNT,
            duration_ms: DEFAULT_DURATION_MS,
            playing: false,
            start_ms: 0.0,
        }
    }
}

/// What a call to [`ShredderSession::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing when the frame fired; nothing drawn, nothing rescheduled.
    Cancelled,
    /// Drew a frame and asked for another.
    Rescheduled,
    /// Drew the final frame at progress 1.
    Finished,
}

type PlayStateListener = Box<dyn FnMut(bool)>;

/// One shredder animation: its settings, sheet, output surface and clock.
///
/// Setters never fail. Out-of-range values are ignored and leave the previous value in
/// place, so a host can forward raw slider input.
pub struct ShredderSession<C: Clock> {
    clock: C,
    renderer: ShredRenderer,
    surface: Surface,
    sheet: Option<PixelBuffer>,
    state: AnimationState,
    phase: PlaybackPhase,
    frame_requested: bool,
    frames_rendered: u64,
    on_play_state: Option<PlayStateListener>,
}

impl<C: Clock> ShredderSession<C> {
    pub fn new(canvas: Canvas, clock: C, settings: RenderSettings) -> Self {
        Self {
            clock,
            renderer: ShredRenderer::new(settings),
            surface: Surface::new(canvas),
            sheet: None,
            state: AnimationState::default(),
            phase: PlaybackPhase::Idle,
            frame_requested: false,
            frames_rendered: 0,
            on_play_state: None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn progress(&self) -> f64 {
        self.state.progress
    }

    pub fn strip_count(&self) -> u32 {
        self.state.strip_count
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.state.duration_ms))
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    /// Whether a frame callback is pending.
    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn sheet(&self) -> Option<&PixelBuffer> {
        self.sheet.as_ref()
    }

    /// Translation the host applies to the whole surface for the current progress.
    pub fn presentation(&self) -> Presentation {
        Presentation::for_progress(self.state.progress, self.surface.canvas().height)
    }

    /// Register the hook told about every play/pause flip (e.g. to relabel a toggle).
    pub fn on_play_state_changed(&mut self, listener: impl FnMut(bool) + 'static) {
        self.on_play_state = Some(Box::new(listener));
    }

    /// Swap the sheet. The surface follows the sheet's size. Nothing is redrawn until the
    /// next frame.
    pub fn set_sheet(&mut self, sheet: Option<PixelBuffer>) {
        if let Some(s) = &sheet
            && s.canvas() != self.surface.canvas()
        {
            self.surface = Surface::new(s.canvas());
        }
        self.sheet = sheet;
    }

    /// Returns `false` (and changes nothing) outside `2..=100`.
    pub fn set_strip_count(&mut self, n: u32) -> bool {
        if !STRIP_COUNT_RANGE.contains(&n) {
            tracing::debug!(n, "ignoring out-of-range strip count");
            return false;
        }
        self.state.strip_count = n;
        true
    }

    /// Returns `false` (and changes nothing) for non-finite values or values outside
    /// `1..=20` seconds.
    pub fn set_duration_seconds(&mut self, secs: f64) -> bool {
        if !secs.is_finite() || !DURATION_SECS_RANGE.contains(&secs) {
            tracing::debug!(secs, "ignoring out-of-range duration");
            return false;
        }
        self.state.duration_ms = (secs * 1000.0).round() as u32;
        true
    }

    /// Start or resume. A finished animation starts over from 0.
    pub fn play(&mut self) {
        if self.state.playing {
            return;
        }
        if self.phase == PlaybackPhase::Finished {
            self.state.progress = 0.0;
        }
        self.state.playing = true;
        self.phase = PlaybackPhase::Playing;
        self.anchor_start();
        tracing::debug!(progress = self.state.progress, "play");
        self.notify_play_state();
        self.tick();
    }

    /// Halt at the current progress. A pending frame becomes a no-op.
    pub fn pause(&mut self) {
        if !self.state.playing {
            return;
        }
        self.state.playing = false;
        self.phase = PlaybackPhase::Paused;
        tracing::debug!(progress = self.state.progress, "pause");
        self.notify_play_state();
    }

    /// Rewind to 0 from any phase and redraw.
    pub fn stop(&mut self) {
        self.state.playing = false;
        self.state.progress = 0.0;
        self.phase = PlaybackPhase::Idle;
        tracing::debug!("stop");
        self.render_current();
        self.notify_play_state();
    }

    pub fn toggle(&mut self) {
        if self.state.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Jump to `progress` (clamped to `[0, 1]`) and redraw. Playback, if running,
    /// continues from there. Non-finite values are ignored.
    pub fn seek(&mut self, progress: f64) {
        if !progress.is_finite() {
            return;
        }
        self.state.progress = progress.clamp(0.0, 1.0);
        if self.state.playing {
            self.anchor_start();
        } else if self.phase == PlaybackPhase::Finished {
            self.phase = PlaybackPhase::Paused;
        }
        self.render_current();
    }

    /// The frame callback: derive progress from the clock, draw, and reschedule unless
    /// playback ended or was cancelled.
    pub fn tick(&mut self) -> TickOutcome {
        self.frame_requested = false;
        if !self.state.playing {
            return TickOutcome::Cancelled;
        }

        let elapsed = self.clock.now_ms() - self.state.start_ms;
        let t = (elapsed / f64::from(self.state.duration_ms)).max(0.0);

        if t >= 1.0 {
            self.state.progress = 1.0;
            self.render_current();
            self.state.playing = false;
            self.phase = PlaybackPhase::Finished;
            tracing::debug!(frames = self.frames_rendered, "finished");
            self.notify_play_state();
            return TickOutcome::Finished;
        }

        self.state.progress = t;
        self.render_current();
        self.frame_requested = true;
        TickOutcome::Rescheduled
    }

    /// Redraw the surface for the current state.
    pub fn render_current(&mut self) {
        self.renderer.render(
            &mut self.surface,
            self.sheet.as_ref(),
            self.state.strip_count,
            SHRED_SEED,
            self.state.progress,
        );
        self.frames_rendered += 1;
    }

    fn anchor_start(&mut self) {
        self.state.start_ms =
            self.clock.now_ms() - f64::from(self.state.duration_ms) * self.state.progress;
    }

    fn notify_play_state(&mut self) {
        let playing = self.state.playing;
        if let Some(listener) = self.on_play_state.as_mut() {
            listener(playing);
        }
    }
}

impl<C: Clock> std::fmt::Debug for ShredderSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShredderSession")
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("frame_requested", &self.frame_requested)
            .field("canvas", &self.surface.canvas())
            .field("has_sheet", &self.sheet.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/shredder.rs"]
mod tests;
