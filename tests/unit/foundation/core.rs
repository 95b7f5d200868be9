use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    let c = Canvas::new(4, 3).unwrap();
    assert_eq!(c.pixel_count(), 12);
    assert_eq!(c.byte_len(), 48);
}

#[test]
fn default_canvas_is_portrait_sheet() {
    assert_eq!(
        Canvas::default(),
        Canvas {
            width: 400,
            height: 600
        }
    );
}

#[test]
fn premul_rounds_half_up() {
    let p = Rgba8Premul::from_straight_rgba(100, 50, 200, 128);
    assert_eq!(
        p.to_array(),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}

#[test]
fn premultiply_clears_fully_transparent_color() {
    let mut px = vec![10, 20, 30, 0, 10, 20, 30, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0, 10, 20, 30, 255]);
}

#[test]
fn unpremultiply_restores_opaque_and_half_alpha() {
    let mut px = vec![128, 0, 64, 128, 7, 8, 9, 255];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[4..], &[7, 8, 9, 255]);
    assert_eq!(px[0], 255);
    assert_eq!(px[1], 0);
    assert_eq!(px[3], 128);
}
