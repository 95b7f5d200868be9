use anyhow::Context as _;

use crate::{
    assets::{PreparedImage, decode::decode_image},
    foundation::{
        core::{Canvas, Rgba8Premul},
        error::{ShredError, ShredResult},
    },
    render::{composite::over, surface::PixelBuffer},
};

/// How the user image is mapped onto the sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    /// Scale to exactly the canvas size, ignoring aspect ratio.
    #[default]
    Stretch,
    /// Scale uniformly to fit inside the canvas and center.
    Contain,
}

#[derive(Clone, Debug)]
pub struct SheetOpts {
    pub canvas: Canvas,
    /// Straight-alpha fill under everything else.
    pub background_rgba: [u8; 4],
    pub fit: Fit,
}

impl Default for SheetOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            background_rgba: [255, 255, 255, 255],
            fit: Fit::Stretch,
        }
    }
}

/// Build the sheet the shredder cuts up.
///
/// The canvas is filled with the background color, `background` is drawn unscaled at the
/// origin, then `image` is drawn according to `opts.fit`. Both images are optional; with
/// neither the sheet is a plain background.
#[tracing::instrument(skip(image, background), fields(canvas = ?opts.canvas, fit = ?opts.fit))]
pub fn load_pixel_buffer(
    image: Option<&[u8]>,
    background: Option<&[u8]>,
    opts: &SheetOpts,
) -> ShredResult<PixelBuffer> {
    let image = image
        .map(decode_image)
        .transpose()
        .context("decode sheet image")?;
    let background = background
        .map(decode_image)
        .transpose()
        .context("decode background image")?;
    compose_sheet(image.as_ref(), background.as_ref(), opts)
}

/// [`load_pixel_buffer`] for already-decoded images.
pub fn compose_sheet(
    image: Option<&PreparedImage>,
    background: Option<&PreparedImage>,
    opts: &SheetOpts,
) -> ShredResult<PixelBuffer> {
    let canvas = Canvas::new(opts.canvas.width, opts.canvas.height)?;
    let [r, g, b, a] = opts.background_rgba;
    let fill = Rgba8Premul::from_straight_rgba(r, g, b, a).to_array();
    let mut data = fill.repeat(canvas.pixel_count());

    if let Some(bg) = background {
        draw_over(&mut data, canvas, bg, 0, 0);
    }

    if let Some(img) = image {
        let (w, h, x, y) = placement(img.width, img.height, canvas, opts.fit);
        tracing::debug!(w, h, x, y, "placing sheet image");
        let scaled = resize(img, w, h)?;
        draw_over(&mut data, canvas, &scaled, x, y);
    }

    PixelBuffer::from_rgba8_premul(canvas.width, canvas.height, data)
}

/// Target size and top-left corner of an `iw`x`ih` image on `canvas`.
pub fn placement(iw: u32, ih: u32, canvas: Canvas, fit: Fit) -> (u32, u32, i64, i64) {
    match fit {
        Fit::Stretch => (canvas.width, canvas.height, 0, 0),
        Fit::Contain => {
            let cw = f64::from(canvas.width);
            let ch = f64::from(canvas.height);
            let mag = (cw / f64::from(iw)).min(ch / f64::from(ih));
            let w = (f64::from(iw) * mag).round().max(1.0) as u32;
            let h = (f64::from(ih) * mag).round().max(1.0) as u32;
            let x = (i64::from(canvas.width) - i64::from(w)) / 2;
            let y = (i64::from(canvas.height) - i64::from(h)) / 2;
            (w, h, x, y)
        }
    }
}

fn resize(img: &PreparedImage, w: u32, h: u32) -> ShredResult<PreparedImage> {
    if img.width == w && img.height == h {
        return Ok(img.clone());
    }
    let src = image::RgbaImage::from_raw(img.width, img.height, img.rgba8_premul.to_vec())
        .ok_or_else(|| ShredError::render("prepared image size does not match its pixels"))?;
    let out = image::imageops::resize(&src, w, h, image::imageops::FilterType::Triangle);
    Ok(PreparedImage {
        width: w,
        height: h,
        rgba8_premul: std::sync::Arc::new(out.into_raw()),
    })
}

fn draw_over(dst: &mut [u8], canvas: Canvas, src: &PreparedImage, x: i64, y: i64) {
    let cw = i64::from(canvas.width);
    let ch = i64::from(canvas.height);
    for sy in 0..i64::from(src.height) {
        let ty = y + sy;
        if ty < 0 || ty >= ch {
            continue;
        }
        for sx in 0..i64::from(src.width) {
            let tx = x + sx;
            if tx < 0 || tx >= cw {
                continue;
            }
            let si = ((sy * i64::from(src.width) + sx) * 4) as usize;
            let di = ((ty * cw + tx) * 4) as usize;
            let s = &src.rgba8_premul[si..si + 4];
            let d = &mut dst[di..di + 4];
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/load.rs"]
mod tests;
