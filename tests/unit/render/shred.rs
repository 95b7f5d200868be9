use super::*;
use crate::{foundation::core::Canvas, jitter::xorshift::SHRED_SEED};

const CLEAR: [u8; 4] = [0, 0, 0, 0];

/// Opaque buffer where pixel `(x, y)` is `[x, y, 7, 255]`.
fn coord_buffer(w: u32, h: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[x as u8, y as u8, 7, 255]);
        }
    }
    PixelBuffer::from_rgba8_premul(w, h, data).unwrap()
}

fn px(x: u8, y: u8) -> Option<[u8; 4]> {
    Some([x, y, 7, 255])
}

fn render_once(buffer: &PixelBuffer, strips: u32, progress: f64) -> Surface {
    let mut surface = Surface::new(buffer.canvas());
    ShredRenderer::default().render(&mut surface, Some(buffer), strips, SHRED_SEED, progress);
    surface
}

#[test]
fn cut_line_endpoints() {
    assert_eq!(cut_line(600.0, 0.0), 600.0);
    assert_eq!(cut_line(600.0, 1.0), 15.0);
    assert_eq!(cut_line(40.0, 0.5), 27.5);
}

#[test]
fn progress_zero_reproduces_the_sheet() {
    let buffer = coord_buffer(8, 40);
    let surface = render_once(&buffer, 2, 0.0);
    assert_eq!(surface.data(), buffer.as_bytes());
}

#[test]
fn progress_zero_still_consumes_one_sample_per_strip() {
    let buffer = coord_buffer(8, 40);
    let mut surface = Surface::new(buffer.canvas());
    let mut renderer = ShredRenderer::default();
    renderer.render(&mut surface, Some(&buffer), 5, SHRED_SEED, 0.0);

    let mut expected = JitterStream::seeded(SHRED_SEED);
    for _ in 0..5 {
        expected.next_u32();
    }
    assert_eq!(renderer.jitter().state(), expected.state());
}

#[test]
fn progress_one_shifts_strips_and_leaves_gutters() {
    let buffer = coord_buffer(8, 40);
    let s = render_once(&buffer, 2, 1.0);

    // Intact top rows [0, 15).
    assert_eq!(s.pixel(0, 12), px(0, 12));
    assert_eq!(s.pixel(3, 14), px(3, 14));
    assert_eq!(s.pixel(7, 14), px(7, 14));

    // Strip 0: cols [0, 3), deviation 2.72469 -> up 2 rows.
    assert_eq!(s.pixel(0, 13), px(0, 15));
    assert_eq!(s.pixel(2, 37), px(2, 39));
    assert_eq!(s.pixel(0, 38), Some(CLEAR));

    // Strip 1: cols [4, 7), deviation 13.09056 -> up 13 rows, over the intact part.
    assert_eq!(s.pixel(5, 1), px(5, 1));
    assert_eq!(s.pixel(5, 2), px(5, 15));
    assert_eq!(s.pixel(6, 26), px(6, 39));
    assert_eq!(s.pixel(5, 27), Some(CLEAR));

    // Gutters below the cut stay blank.
    assert_eq!(s.pixel(3, 20), Some(CLEAR));
    assert_eq!(s.pixel(7, 20), Some(CLEAR));
}

#[test]
fn half_progress_truncates_cut_and_offsets() {
    let buffer = coord_buffer(8, 40);
    let s = render_once(&buffer, 2, 0.5);

    // Cut at 27.5: intact rows [0, 27), strips sample rows [27, 39).
    assert_eq!(s.pixel(0, 25), px(0, 25));
    assert_eq!(s.pixel(0, 26), px(0, 27));
    assert_eq!(s.pixel(0, 37), px(0, 38));
    assert_eq!(s.pixel(0, 38), Some(CLEAR));
    assert_eq!(s.pixel(0, 39), Some(CLEAR));

    // Strip 1 deviation 6.54528 -> up 6 rows.
    assert_eq!(s.pixel(5, 20), px(5, 20));
    assert_eq!(s.pixel(5, 21), px(5, 27));
}

#[test]
fn render_is_pure_for_identical_inputs() {
    let buffer = coord_buffer(16, 64);
    for t in [0.0, 0.25, 0.61, 1.0] {
        let a = render_once(&buffer, 4, t);
        let mut renderer = ShredRenderer::default();
        let mut b = Surface::new(buffer.canvas());
        // A dirty renderer gives the same result because every frame reseeds.
        renderer.render(&mut b, Some(&buffer), 4, SHRED_SEED, 0.9);
        renderer.render(&mut b, Some(&buffer), 4, SHRED_SEED, t);
        assert_eq!(a.data(), b.data(), "progress {t}");
    }
}

#[test]
fn missing_buffer_draws_background_only() {
    let canvas = Canvas::new(4, 4).unwrap();
    let mut surface = Surface::new(canvas);
    let mut renderer = ShredRenderer::new(RenderSettings {
        clear_rgba: Some([9, 9, 9, 255]),
    });
    renderer.render(&mut surface, None, 15, SHRED_SEED, 0.5);
    assert!(surface.data().chunks_exact(4).all(|p| p == [9, 9, 9, 255]));
}

#[test]
fn strip_layout_at_full_progress() {
    let mut jitter = JitterStream::seeded(SHRED_SEED);
    let strips = strip_layout(400.0, 600.0, 15, 1.0, &mut jitter);
    assert_eq!(strips.len(), 15);

    let dw = (400.0 - 14.0) / 15.0;
    for s in &strips {
        assert_eq!(s.height, 585.0);
        assert_eq!(s.y, 15.0);
        assert_eq!(s.width, dw);
        assert!(s.deviation >= 0.0 && s.deviation < MAX_DEVIATION_PX);
    }
    assert_eq!(strips[0].deviation, 15.0 * 0.181646);
    assert_eq!(strips[1].x, dw + 1.0);
    assert_eq!(strips[14].x, dw * 14.0 + 14.0);
}

#[test]
fn strip_layout_half_progress_scales_deviation() {
    let mut jitter = JitterStream::seeded(SHRED_SEED);
    let strips = strip_layout(400.0, 600.0, 15, 0.5, &mut jitter);
    assert_eq!(strips[0].deviation, 15.0 * 0.181646 * 0.5);
}
