use std::path::Path;

use crate::{
    encode::{
        ffmpeg::{FfmpegSink, FfmpegSinkOpts},
        png::PngSequenceSink,
        sink::{FrameSink, InMemorySink, SinkConfig},
    },
    foundation::{
        core::Canvas,
        error::{ShredError, ShredResult},
    },
    jitter::xorshift::SHRED_SEED,
    render::{
        RenderSettings,
        present::{Presentation, present},
        shred::ShredRenderer,
        surface::{FrameRGBA, PixelBuffer, Surface},
    },
    session::shredder::{DEFAULT_DURATION_MS, DEFAULT_STRIP_COUNT, STRIP_COUNT_RANGE},
};

/// Options for offline export of the whole animation.
#[derive(Clone, Debug)]
pub struct ExportOpts {
    pub strip_count: u32,
    pub duration_ms: u32,
    pub fps: u32,
    /// Bake the presentation slide into each frame. Without it frames show the
    /// surface only.
    pub present: bool,
    pub settings: RenderSettings,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            strip_count: DEFAULT_STRIP_COUNT,
            duration_ms: DEFAULT_DURATION_MS,
            fps: 30,
            present: true,
            settings: RenderSettings::default(),
        }
    }
}

impl ExportOpts {
    pub fn validate(&self) -> ShredResult<()> {
        if !STRIP_COUNT_RANGE.contains(&self.strip_count) {
            return Err(ShredError::validation(format!(
                "strip count must be in 2..=100, got {}",
                self.strip_count
            )));
        }
        if !(1_000..=20_000).contains(&self.duration_ms) {
            return Err(ShredError::validation(format!(
                "duration must be between 1 and 20 seconds, got {}ms",
                self.duration_ms
            )));
        }
        if self.fps == 0 {
            return Err(ShredError::validation("fps must be non-zero"));
        }
        Ok(())
    }

    /// Frames covering progress 0 through 1 inclusive.
    pub fn frame_count(&self) -> u64 {
        let steps = (u64::from(self.duration_ms) * u64::from(self.fps)).div_ceil(1000);
        steps.max(1) + 1
    }

    pub fn progress_at(&self, idx: u64) -> f64 {
        let last = self.frame_count() - 1;
        (idx.min(last)) as f64 / last as f64
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub frames: u64,
}

/// Render a single frame at `progress`.
pub fn render_progress_frame(
    sheet: Option<&PixelBuffer>,
    canvas: Canvas,
    strip_count: u32,
    progress: f64,
    present_frame: bool,
    settings: &RenderSettings,
) -> FrameRGBA {
    let mut renderer = ShredRenderer::new(settings.clone());
    let mut surface = Surface::new(sheet.map_or(canvas, PixelBuffer::canvas));
    render_into(&mut renderer, &mut surface, sheet, strip_count, progress, present_frame)
}

fn render_into(
    renderer: &mut ShredRenderer,
    surface: &mut Surface,
    sheet: Option<&PixelBuffer>,
    strip_count: u32,
    progress: f64,
    present_frame: bool,
) -> FrameRGBA {
    renderer.render(surface, sheet, strip_count, SHRED_SEED, progress);
    if present_frame {
        present(
            surface,
            Presentation::for_progress(progress, surface.canvas().height),
        )
    } else {
        surface.to_frame()
    }
}

/// Render every frame of the animation into `sink`, in order.
#[tracing::instrument(skip(sheet, sink), fields(frames = opts.frame_count()))]
pub fn export_to_sink(
    sheet: Option<&PixelBuffer>,
    canvas: Canvas,
    opts: &ExportOpts,
    sink: &mut dyn FrameSink,
) -> ShredResult<ExportStats> {
    opts.validate()?;
    let canvas = sheet.map_or(canvas, PixelBuffer::canvas);
    let frame_count = opts.frame_count();

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: opts.fps,
        frame_count,
    })?;

    let mut renderer = ShredRenderer::new(opts.settings.clone());
    let mut surface = Surface::new(canvas);
    for idx in 0..frame_count {
        let frame = render_into(
            &mut renderer,
            &mut surface,
            sheet,
            opts.strip_count,
            opts.progress_at(idx),
            opts.present,
        );
        sink.push_frame(idx, &frame)?;
    }
    sink.end()?;

    tracing::info!(frames = frame_count, "export finished");
    Ok(ExportStats {
        frames: frame_count,
    })
}

/// Collect every frame in memory.
pub fn export_frames(
    sheet: Option<&PixelBuffer>,
    canvas: Canvas,
    opts: &ExportOpts,
) -> ShredResult<Vec<FrameRGBA>> {
    let mut sink = InMemorySink::new();
    export_to_sink(sheet, canvas, opts, &mut sink)?;
    Ok(sink.frames().iter().map(|(_, f)| f.clone()).collect())
}

/// Write `frame_#####.png` files into `dir`.
pub fn write_png_sequence(
    sheet: Option<&PixelBuffer>,
    canvas: Canvas,
    opts: &ExportOpts,
    dir: &Path,
) -> ShredResult<ExportStats> {
    let mut sink = PngSequenceSink::new(dir);
    export_to_sink(sheet, canvas, opts, &mut sink)
}

/// Encode the animation to MP4 with the system `ffmpeg`, flattening alpha over `bg_rgba`.
pub fn render_to_mp4(
    sheet: Option<&PixelBuffer>,
    canvas: Canvas,
    opts: &ExportOpts,
    out_path: &Path,
    bg_rgba: [u8; 4],
) -> ShredResult<ExportStats> {
    let mut sink_opts = FfmpegSinkOpts::new(out_path);
    sink_opts.bg_rgba = bg_rgba;
    let mut sink = FfmpegSink::new(sink_opts);
    export_to_sink(sheet, canvas, opts, &mut sink)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
