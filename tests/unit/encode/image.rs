use super::*;

#[test]
fn quality_maps_onto_percent_scale() {
    assert_eq!(jpeg_quality_percent(0.92), 92);
    assert_eq!(jpeg_quality_percent(0.8), 80);
    assert_eq!(jpeg_quality_percent(0.0), 1);
    assert_eq!(jpeg_quality_percent(3.0), 100);
    assert_eq!(jpeg_quality_percent(f32::NAN), 100);
}

#[test]
fn flatten_premul_over_black_keeps_rgb() {
    let src = vec![128u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, [0, 0, 0]).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn flatten_over_white_fills_transparency() {
    let out = flatten_premul_to_rgb8(&[0, 0, 0, 0, 10, 20, 30, 255], [255, 255, 255]).unwrap();
    assert_eq!(out, vec![255, 255, 255, 10, 20, 30]);
}

#[test]
fn encode_jpeg_produces_decodable_image() {
    let mut s = Surface::new(16, 8).unwrap();
    s.fill(crate::foundation::core::Rgba8Premul::from_straight_rgba(200, 30, 30, 255));
    let bytes = encode_jpeg(&s, 0.92).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (16, 8));
    let px = decoded.get_pixel(8, 4);
    assert!(px[0] > 170 && px[1] < 70);
}

#[test]
fn lower_quality_is_not_larger_for_noisy_content() {
    let mut data = Vec::new();
    for i in 0..(64u32 * 64) {
        let v = (i.wrapping_mul(2_654_435_761) >> 24) as u8;
        data.extend_from_slice(&[v, v.wrapping_mul(3), v ^ 0x5a, 255]);
    }
    let s = Surface::from_premul(64, 64, data).unwrap();
    let hi = encode_jpeg(&s, 0.92).unwrap();
    let lo = encode_jpeg(&s, 0.5).unwrap();
    assert!(lo.len() < hi.len());
}
