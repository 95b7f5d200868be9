use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::foundation::{
    core::{Canvas, unpremultiply_rgba8_in_place},
    error::{ShredError, ShredResult},
};

/// Immutable source image the shredder slices, already composited over its background.
///
/// Cloning is cheap; the pixels are shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    rgba8_premul: Arc<Vec<u8>>,
}

impl PixelBuffer {
    pub fn from_rgba8_premul(width: u32, height: u32, data: Vec<u8>) -> ShredResult<Self> {
        let canvas = Canvas::new(width, height)?;
        if data.len() != canvas.byte_len() {
            return Err(ShredError::validation(format!(
                "pixel buffer expects {} bytes for {width}x{height}, got {}",
                canvas.byte_len(),
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        })
    }

    pub fn solid(canvas: Canvas, rgba_premul: [u8; 4]) -> Self {
        let data = rgba_premul.repeat(canvas.pixel_count());
        Self {
            width: canvas.width,
            height: canvas.height,
            rgba8_premul: Arc::new(data),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba8_premul
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        pixel_at(&self.rgba8_premul, self.width, self.height, x, y)
    }

    fn row(&self, y: usize) -> &[u8] {
        let stride = self.width as usize * 4;
        &self.rgba8_premul[y * stride..(y + 1) * stride]
    }
}

/// Source rectangle of a [`Surface::put_image_data`] call, in buffer pixels.
///
/// Components are fractional on input and truncated toward zero when applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirtyRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DirtyRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Integer rect clipped to a `w`x`h` source, or `None` if nothing remains.
    fn resolve(self, w: i64, h: i64) -> Option<(i64, i64, i64, i64)> {
        let (mut x, mut y) = (to_long(self.x), to_long(self.y));
        let (mut rw, mut rh) = (to_long(self.width), to_long(self.height));

        if rw < 0 {
            x += rw;
            rw = -rw;
        }
        if rh < 0 {
            y += rh;
            rh = -rh;
        }
        if x < 0 {
            rw += x;
            x = 0;
        }
        if y < 0 {
            rh += y;
            y = 0;
        }
        rw = rw.min(w - x);
        rh = rh.min(h - y);

        (rw > 0 && rh > 0).then_some((x, y, rw, rh))
    }
}

/// Truncate toward zero into the `i32` range; NaN maps to 0.
fn to_long(v: f64) -> i64 {
    v.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i64
}

/// The mutable output target every frame is drawn into.
#[derive(Clone, Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; canvas.byte_len()],
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        pixel_at(&self.data, self.width, self.height, x, y)
    }

    /// Fill with `rgba_premul`, or transparent when `None`.
    pub fn clear(&mut self, rgba_premul: Option<[u8; 4]>) {
        let fill = rgba_premul.unwrap_or([0, 0, 0, 0]);
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&fill);
        }
    }

    /// Copy the `dirty` region of `src` so that buffer pixel `(sx, sy)` lands on
    /// surface pixel `(sx + dx, sy + dy)`.
    ///
    /// Pixels are replaced, not blended. Offsets and the dirty rect are truncated toward
    /// zero, a negative dirty extent flips the rect, and the copy is clipped to both the
    /// buffer and the surface.
    pub fn put_image_data(&mut self, src: &PixelBuffer, dx: f64, dy: f64, dirty: DirtyRect) {
        let Some((x, y, w, h)) = dirty.resolve(i64::from(src.width), i64::from(src.height))
        else {
            return;
        };
        let (dx, dy) = (to_long(dx), to_long(dy));
        let (sw, sh) = (i64::from(self.width), i64::from(self.height));

        let sx0 = x.max(-dx);
        let sx1 = (x + w).min(sw - dx);
        if sx0 >= sx1 {
            return;
        }

        let stride = self.width as usize * 4;
        for sy in y..y + h {
            let ty = sy + dy;
            if ty < 0 || ty >= sh {
                continue;
            }
            let src_row = src.row(sy as usize);
            let src_px = &src_row[sx0 as usize * 4..sx1 as usize * 4];
            let row_start = ty as usize * stride;
            let dst_start = row_start + (sx0 + dx) as usize * 4;
            self.data[dst_start..dst_start + src_px.len()].copy_from_slice(src_px);
        }
    }

    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.width,
            height: self.height,
            data: self.data.clone(),
            premultiplied: true,
        }
    }
}

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        pixel_at(&self.data, self.width, self.height, x, y)
    }

    /// Straight-alpha copy of the pixels, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut out);
        }
        out
    }

    pub fn save_png(&self, path: &Path) -> ShredResult<()> {
        image::save_buffer_with_format(
            path,
            &self.to_straight_rgba8(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

fn pixel_at(data: &[u8], width: u32, height: u32, x: u32, y: u32) -> Option<[u8; 4]> {
    if x >= width || y >= height {
        return None;
    }
    let i = (y as usize * width as usize + x as usize) * 4;
    Some([data[i], data[i + 1], data[i + 2], data[i + 3]])
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
