use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    assets::load::{Fit, SheetOpts},
    foundation::{
        core::{Canvas, Rgba8Premul},
        error::{ShredError, ShredResult},
    },
    pipeline::ExportOpts,
    render::RenderSettings,
    session::shredder::{
        DEFAULT_DURATION_MS, DEFAULT_STRIP_COUNT, DURATION_SECS_RANGE, STRIP_COUNT_RANGE,
    },
};

/// On-disk settings, JSON. Every field is optional.
///
/// ```json
/// { "strip_count": 24, "duration_secs": 6, "fit": "contain" }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShredConfig {
    pub canvas: Canvas,
    pub strip_count: u32,
    pub duration_secs: f64,
    pub fps: u32,
    /// Straight-alpha sheet background.
    pub background_rgba: [u8; 4],
    /// Drawn unscaled under the sheet image. Relative paths resolve against the config
    /// file's directory.
    pub background_image: Option<PathBuf>,
    pub fit: Fit,
    /// Straight-alpha surface clear color; transparent when absent.
    pub clear_rgba: Option<[u8; 4]>,
}

impl Default for ShredConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            strip_count: DEFAULT_STRIP_COUNT,
            duration_secs: f64::from(DEFAULT_DURATION_MS) / 1000.0,
            fps: 30,
            background_rgba: [255, 255, 255, 255],
            background_image: None,
            fit: Fit::Stretch,
            clear_rgba: None,
        }
    }
}

impl ShredConfig {
    pub fn from_json_str(s: &str) -> ShredResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| ShredError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a config file, resolving `background_image` next to it.
    pub fn load(path: &Path) -> ShredResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_json_str(&text)?;
        if let Some(bg) = cfg.background_image.as_mut()
            && bg.is_relative()
            && let Some(dir) = path.parent()
        {
            *bg = dir.join(&*bg);
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> ShredResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        if !STRIP_COUNT_RANGE.contains(&self.strip_count) {
            return Err(ShredError::validation(format!(
                "strip_count must be in 2..=100, got {}",
                self.strip_count
            )));
        }
        if !self.duration_secs.is_finite() || !DURATION_SECS_RANGE.contains(&self.duration_secs) {
            return Err(ShredError::validation(format!(
                "duration_secs must be in 1..=20, got {}",
                self.duration_secs
            )));
        }
        if self.fps == 0 {
            return Err(ShredError::validation("fps must be non-zero"));
        }
        Ok(())
    }

    pub fn duration_ms(&self) -> u32 {
        (self.duration_secs * 1000.0).round() as u32
    }

    pub fn sheet_opts(&self) -> SheetOpts {
        SheetOpts {
            canvas: self.canvas,
            background_rgba: self.background_rgba,
            fit: self.fit,
        }
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            clear_rgba: self
                .clear_rgba
                .map(|[r, g, b, a]| Rgba8Premul::from_straight_rgba(r, g, b, a).to_array()),
        }
    }

    pub fn export_opts(&self, present: bool) -> ExportOpts {
        ExportOpts {
            strip_count: self.strip_count,
            duration_ms: self.duration_ms(),
            fps: self.fps,
            present,
            settings: self.render_settings(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
