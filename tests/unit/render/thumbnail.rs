use super::*;

fn red_frame(w: u32, h: u32) -> Surface {
    let mut s = Surface::new(w, h).unwrap();
    s.fill(Rgba8Premul::from_straight_rgba(255, 0, 0, 255));
    s
}

#[test]
fn portrait_frame_is_pillarboxed() {
    let mut r = Rasterizer::new();
    let t = thumbnail_surface(&mut r, &red_frame(108, 192), 64).unwrap();
    assert_eq!((t.width(), t.height()), (64, 64));
    assert_eq!(t.pixel(32, 32), Some([255, 0, 0, 255]));
    assert_eq!(t.pixel(2, 32), Some([0, 0, 0, 255]));
    assert_eq!(t.pixel(61, 32), Some([0, 0, 0, 255]));
}

#[test]
fn landscape_frame_is_letterboxed() {
    let mut r = Rasterizer::new();
    let t = thumbnail_surface(&mut r, &red_frame(200, 100), 64).unwrap();
    assert_eq!(t.pixel(32, 2), Some([0, 0, 0, 255]));
    assert_eq!(t.pixel(32, 32), Some([255, 0, 0, 255]));
}

#[test]
fn encoded_thumbnail_has_fixed_size() {
    let mut r = Rasterizer::new();
    let bytes = generate_thumbnail(&mut r, &red_frame(108, 192), THUMBNAIL_SIZE, THUMBNAIL_JPEG_QUALITY)
        .unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (640, 640));
}
