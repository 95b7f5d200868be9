use super::*;

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

#[test]
fn pixel_buffer_rejects_wrong_length() {
    assert!(PixelBuffer::from_rgba8_premul(2, 2, vec![0u8; 15]).is_err());
    assert!(PixelBuffer::from_rgba8_premul(0, 2, vec![]).is_err());
}

#[test]
fn clear_fills_every_pixel() {
    let mut s = Surface::new(Canvas::new(3, 2).unwrap());
    s.clear(Some([1, 2, 3, 4]));
    assert!(s.data().chunks_exact(4).all(|p| p == [1, 2, 3, 4]));
    s.clear(None);
    assert!(s.data().iter().all(|&b| b == 0));
}

#[test]
fn put_full_rect_copies_buffer() {
    let src = coord_buffer(4, 3);
    let mut s = Surface::new(src.canvas());
    s.put_image_data(&src, 0.0, 0.0, DirtyRect::new(0.0, 0.0, 4.0, 3.0));
    assert_eq!(s.data(), src.as_bytes());
}

#[test]
fn dirty_rect_limits_copied_region_and_keeps_source_coordinates() {
    let src = coord_buffer(6, 6);
    let mut s = Surface::new(src.canvas());
    s.put_image_data(&src, 0.0, 0.0, DirtyRect::new(2.0, 3.0, 2.0, 2.0));
    assert_eq!(s.pixel(1, 3), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(2, 3), Some([2, 3, 7, 255]));
    assert_eq!(s.pixel(3, 4), Some([3, 4, 7, 255]));
    assert_eq!(s.pixel(4, 4), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(3, 5), Some([0, 0, 0, 0]));
}

#[test]
fn negative_offset_shifts_up_and_clips() {
    let src = coord_buffer(4, 8);
    let mut s = Surface::new(src.canvas());
    // -2.9 truncates to -2.
    s.put_image_data(&src, 0.0, -2.9, DirtyRect::new(0.0, 1.0, 4.0, 7.0));
    // Source row 1 would land on row -1 and is dropped.
    assert_eq!(s.pixel(0, 0), Some([0, 2, 7, 255]));
    assert_eq!(s.pixel(3, 5), Some([3, 7, 7, 255]));
    assert_eq!(s.pixel(0, 6), Some([0, 0, 0, 0]));
}

#[test]
fn fractional_rect_truncates_toward_zero() {
    let src = coord_buffer(8, 8);
    let mut s = Surface::new(src.canvas());
    s.put_image_data(&src, 0.0, 0.0, DirtyRect::new(4.5, 0.0, 3.5, 1.9));
    // x=4, width=3, height=1
    assert_eq!(s.pixel(3, 0), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(4, 0), Some([4, 0, 7, 255]));
    assert_eq!(s.pixel(6, 0), Some([6, 0, 7, 255]));
    assert_eq!(s.pixel(7, 0), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(4, 1), Some([0, 0, 0, 0]));
}

#[test]
fn negative_extent_flips_rect() {
    let src = coord_buffer(4, 4);
    let mut s = Surface::new(src.canvas());
    s.put_image_data(&src, 0.0, 0.0, DirtyRect::new(0.0, 3.0, 4.0, -2.0));
    // Flipped to y=1, height=2.
    assert_eq!(s.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(0, 1), Some([0, 1, 7, 255]));
    assert_eq!(s.pixel(0, 2), Some([0, 2, 7, 255]));
    assert_eq!(s.pixel(0, 3), Some([0, 0, 0, 0]));
}

#[test]
fn rect_outside_source_is_noop() {
    let src = coord_buffer(4, 4);
    let mut s = Surface::new(src.canvas());
    s.put_image_data(&src, 0.0, 0.0, DirtyRect::new(0.0, 4.0, 4.0, 10.0));
    s.put_image_data(&src, 100.0, 0.0, DirtyRect::new(0.0, 0.0, 4.0, 4.0));
    s.put_image_data(&src, 0.0, 0.0, DirtyRect::new(0.0, 0.0, f64::NAN, 4.0));
    assert!(s.data().iter().all(|&b| b == 0));
}

#[test]
fn straight_copy_unpremultiplies() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 0, 0, 128],
        premultiplied: true,
    };
    assert_eq!(frame.to_straight_rgba8(), vec![128, 0, 0, 128]);
}
