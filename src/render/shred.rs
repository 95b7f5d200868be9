use crate::{
    jitter::xorshift::JitterStream,
    render::{
        RenderSettings,
        surface::{DirtyRect, PixelBuffer, Surface},
    },
};

/// Extra drop (in pixels) past the full sheet height reached at progress 1.
pub const OVERSHOOT_PX: f64 = 15.0;

/// Largest vertical deviation (in pixels) a strip can get at progress 1.
pub const MAX_DEVIATION_PX: f64 = 15.0;

/// Width in pixels of the gap left between neighbouring strips.
pub const GUTTER_PX: f64 = 1.0;

/// Row where the intact part of the sheet ends and the strips begin.
///
/// `h` at progress 0, shrinking linearly to [`OVERSHOOT_PX`] at progress 1.
pub fn cut_line(height: f64, progress: f64) -> f64 {
    height * (1.0 - progress) + OVERSHOOT_PX * progress
}

/// Geometry of one strip for a given frame, in buffer pixels (not yet truncated).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StripPlacement {
    pub index: u32,
    /// Upward shift applied to the strip.
    pub deviation: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Compute every strip for one frame, drawing one jitter sample per strip.
///
/// A sample is consumed even at progress 0 so the stream advances identically
/// for every frame.
pub fn strip_layout(
    width: f64,
    height: f64,
    strip_count: u32,
    progress: f64,
    jitter: &mut JitterStream,
) -> Vec<StripPlacement> {
    let n = f64::from(strip_count);
    let strip_w = (width - GUTTER_PX * (n - 1.0)) / n;
    let y = cut_line(height, progress);

    (0..strip_count)
        .map(|index| {
            let deviation = MAX_DEVIATION_PX * jitter.next_f64() * progress;
            let i = f64::from(index);
            StripPlacement {
                index,
                deviation,
                x: strip_w * i + GUTTER_PX * i,
                y,
                width: strip_w,
                height: height - y,
            }
        })
        .collect()
}

/// Draws shredder frames, owning the jitter stream that is re-seeded every frame.
#[derive(Clone, Debug, Default)]
pub struct ShredRenderer {
    settings: RenderSettings,
    jitter: JitterStream,
}

impl ShredRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            jitter: JitterStream::new(),
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Jitter state left behind by the last frame.
    pub fn jitter(&self) -> &JitterStream {
        &self.jitter
    }

    /// Render one frame of the shredder into `surface`.
    ///
    /// With no buffer the surface is only cleared. Otherwise the intact top of the sheet
    /// is drawn down to [`cut_line`], then each strip below it is drawn shifted up by its
    /// deviation, with a [`GUTTER_PX`] gap between strips. `progress` is clamped to
    /// `[0, 1]`; `strip_count` of zero draws the intact part only.
    #[tracing::instrument(level = "trace", skip(self, surface, buffer))]
    pub fn render(
        &mut self,
        surface: &mut Surface,
        buffer: Option<&PixelBuffer>,
        strip_count: u32,
        seed: u32,
        progress: f64,
    ) {
        surface.clear(self.settings.clear_rgba);

        let Some(buffer) = buffer else {
            return;
        };

        let t = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };

        self.jitter.reset();
        self.jitter.set_seed(seed);

        let w = f64::from(buffer.width());
        let h = f64::from(buffer.height());

        surface.put_image_data(buffer, 0.0, 0.0, DirtyRect::new(0.0, 0.0, w, cut_line(h, t)));

        if strip_count == 0 {
            return;
        }
        for strip in strip_layout(w, h, strip_count, t, &mut self.jitter) {
            surface.put_image_data(
                buffer,
                0.0,
                -strip.deviation,
                DirtyRect::new(strip.x, strip.y, strip.width, strip.height),
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/shred.rs"]
mod tests;
