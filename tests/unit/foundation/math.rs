use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u8(255, 128), 128);
}

#[test]
fn hash_is_deterministic_and_seed_sensitive() {
    assert_eq!(hash_u32(7, 3, 4), hash_u32(7, 3, 4));
    assert_ne!(hash_u32(7, 3, 4), hash_u32(8, 3, 4));
    assert_ne!(hash_u32(7, 3, 4), hash_u32(7, 4, 3));
}

#[test]
fn premultiply_then_unpremultiply_keeps_opaque_and_clears_transparent() {
    let mut px = vec![200u8, 100, 50, 255, 10, 20, 30, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[200, 100, 50, 255]);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);

    let mut half = vec![255u8, 0, 0, 128];
    premultiply_rgba8_in_place(&mut half);
    assert_eq!(half, vec![128, 0, 0, 128]);
    unpremultiply_rgba8_in_place(&mut half);
    assert_eq!(half, vec![255, 0, 0, 128]);
}

#[test]
fn opacity_to_u8_clamps() {
    assert_eq!(opacity_to_u8(-1.0), 0);
    assert_eq!(opacity_to_u8(0.5), 128);
    assert_eq!(opacity_to_u8(2.0), 255);
}
