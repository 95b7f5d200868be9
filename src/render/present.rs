use crate::render::surface::{FrameRGBA, Surface};

/// Whole-surface translation layered on top of the shredded pixels.
///
/// The frame loop only redraws the surface; the sheet sliding out of view is this
/// separate, cheap offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Presentation {
    /// Downward shift as a percentage of the surface height.
    pub translate_percent: f64,
    /// Downward shift in pixels.
    pub translate_y: f64,
}

impl Presentation {
    pub fn for_progress(progress: f64, surface_height: u32) -> Self {
        let t = progress.clamp(0.0, 1.0);
        Self {
            translate_percent: t * 100.0,
            translate_y: t * f64::from(surface_height),
        }
    }

    /// CSS `transform` value a browser host can apply to its canvas element.
    pub fn css_transform(&self) -> String {
        format!("translateY({}%)", self.translate_percent)
    }
}

/// Bake `presentation` into a frame the size of `surface`.
///
/// Rows pushed past the bottom edge are dropped and vacated rows at the top are
/// transparent.
pub fn present(surface: &Surface, presentation: Presentation) -> FrameRGBA {
    let canvas = surface.canvas();
    let stride = canvas.width as usize * 4;
    let height = canvas.height as usize;
    let shift = (presentation.translate_y.round().max(0.0) as usize).min(height);

    let mut data = vec![0u8; canvas.byte_len()];
    let kept = height - shift;
    data[shift * stride..].copy_from_slice(&surface.data()[..kept * stride]);

    FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data,
        premultiplied: true,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/present.rs"]
mod tests;
