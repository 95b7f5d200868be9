use std::time::{Duration, Instant};

use crate::session::{
    clock::{Clock, ManualClock},
    shredder::{ShredderSession, TickOutcome},
};

/// Blocks until the next frame should fire.
pub trait FramePacer {
    fn wait_for_frame(&mut self);
}

/// Real-time pacing on a fixed cadence (≈60 Hz by default).
///
/// Deadlines advance from the previous deadline, so sleep jitter does not accumulate. A
/// pacer that falls behind resynchronises instead of firing a burst of late frames.
#[derive(Clone, Debug)]
pub struct IntervalPacer {
    interval: Duration,
    next_deadline: Option<Instant>,
}

impl IntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_deadline: None,
        }
    }

    pub fn from_hz(hz: u32) -> Self {
        Self::new(Duration::from_secs(1) / hz.max(1))
    }
}

impl Default for IntervalPacer {
    fn default() -> Self {
        Self::from_hz(60)
    }
}

impl FramePacer for IntervalPacer {
    fn wait_for_frame(&mut self) {
        let now = Instant::now();
        let deadline = match self.next_deadline {
            Some(d) if d > now => d,
            _ => now + self.interval,
        };
        std::thread::sleep(deadline.saturating_duration_since(now));
        self.next_deadline = Some(deadline + self.interval);
    }
}

/// Advances a [`ManualClock`] by a fixed step instead of sleeping.
#[derive(Clone, Debug)]
pub struct ManualPacer {
    clock: ManualClock,
    step: Duration,
}

impl ManualPacer {
    pub fn new(clock: ManualClock, step: Duration) -> Self {
        Self { clock, step }
    }
}

impl FramePacer for ManualPacer {
    fn wait_for_frame(&mut self) {
        self.clock.advance(self.step);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLoopReport {
    /// Ticks delivered, including cancelled ones.
    pub ticks: u64,
    /// Outcome of the last tick, or `None` if nothing was scheduled.
    pub last: Option<TickOutcome>,
}

/// Deliver frame callbacks to `session` until it stops asking for them.
///
/// `between_frames` runs after each tick with the session, giving a host a place to
/// apply input (pause, seek, ...) the way UI events interleave with animation frames.
pub fn run_frame_loop<C, P, F>(
    session: &mut ShredderSession<C>,
    pacer: &mut P,
    mut between_frames: F,
) -> FrameLoopReport
where
    C: Clock,
    P: FramePacer + ?Sized,
    F: FnMut(&mut ShredderSession<C>, TickOutcome),
{
    let mut report = FrameLoopReport {
        ticks: 0,
        last: None,
    };
    while session.frame_requested() {
        pacer.wait_for_frame();
        let outcome = session.tick();
        report.ticks += 1;
        report.last = Some(outcome);
        between_frames(session, outcome);
    }
    tracing::debug!(ticks = report.ticks, last = ?report.last, "frame loop idle");
    report
}

#[cfg(test)]
#[path = "../../tests/unit/session/frame_loop.rs"]
mod tests;
