use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255], 1.0), [255, 0, 0, 255]);
}

#[test]
fn over_dst_transparent_returns_scaled_src() {
    let src = [100, 110, 120, 200];
    assert_eq!(over([0, 0, 0, 0], src, 1.0), src);
}

#[test]
fn destination_out_removes_under_opaque_source() {
    let dst = [100, 50, 25, 255];
    assert_eq!(destination_out(dst, [0, 0, 0, 255], 1.0), [0, 0, 0, 0]);
    assert_eq!(destination_out(dst, [0, 0, 0, 0], 1.0), dst);
    let half = destination_out(dst, [0, 0, 0, 255], 0.5);
    assert!(half[3] > 120 && half[3] < 135);
}

#[test]
fn destination_in_keeps_only_under_source() {
    let dst = [100, 50, 25, 255];
    assert_eq!(destination_in(dst, [9, 9, 9, 255], 1.0), dst);
    assert_eq!(destination_in(dst, [0, 0, 0, 0], 1.0), [0, 0, 0, 0]);
}

#[test]
fn multiply_with_white_is_identity_and_black_darkens() {
    let dst = [120, 60, 30, 255];
    assert_eq!(multiply(dst, [255, 255, 255, 255], 1.0), dst);
    assert_eq!(multiply(dst, [0, 0, 0, 255], 1.0), [0, 0, 0, 255]);
    let half = multiply(dst, [0, 0, 0, 255], 0.5);
    assert_eq!(half[0], 60);
}

#[test]
fn overlay_mid_gray_source_is_nearly_identity() {
    let dst = [200, 40, 128, 255];
    let out = overlay(dst, [128, 128, 128, 255], 1.0);
    for i in 0..3 {
        assert!((i32::from(out[i]) - i32::from(dst[i])).abs() <= 2, "{out:?}");
    }
    assert_eq!(out[3], 255);
}

#[test]
fn overlay_brightens_light_and_darkens_dark() {
    let dst = [200, 40, 0, 255];
    let out = overlay(dst, [255, 255, 255, 255], 1.0);
    assert!(out[0] >= 200);
    let out = overlay(dst, [0, 0, 0, 255], 1.0);
    assert!(out[1] < 40);
}

#[test]
fn composite_in_place_checks_lengths() {
    let mut dst = vec![0u8; 8];
    assert!(composite_in_place(&mut dst, &[0u8; 4], 1.0, CompositeOp::SourceOver).is_err());
}

#[test]
fn mix_by_mask_selects_per_pixel() {
    let mut dst = vec![0, 0, 0, 255, 0, 0, 0, 255];
    let other = vec![255, 255, 255, 255, 255, 255, 255, 255];
    mix_by_mask_in_place(&mut dst, &other, &[0.0, 1.0]).unwrap();
    assert_eq!(&dst[0..4], &[0, 0, 0, 255]);
    assert_eq!(&dst[4..8], &[255, 255, 255, 255]);
}
