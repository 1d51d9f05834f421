use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(w, h, |_, _| image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let s = decode_image(&png_bytes(3, 2, [100, 50, 200, 128])).unwrap();
    assert_eq!((s.width(), s.height()), (3, 2));
    assert_eq!(
        s.pixel(2, 1).unwrap(),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn corrupt_image_is_a_media_load_error() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, StoryError::MediaLoad(_)));
}

#[test]
fn decode_svg_parse_ok_and_err() {
    let ok = br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"></svg>"#;
    parse_svg(ok).unwrap();
    assert!(matches!(parse_svg(b"<svg").unwrap_err(), StoryError::MediaLoad(_)));
}

#[test]
fn svg_sniffing() {
    assert!(looks_like_svg("sticker.SVG", b""));
    assert!(looks_like_svg("blob:1", b"  <svg xmlns='x'/>"));
    assert!(looks_like_svg("blob:1", b"<?xml version='1.0'?><svg/>"));
    assert!(!looks_like_svg("a.png", &png_bytes(1, 1, [0, 0, 0, 255])));
}
