use super::*;

fn solid(px: [u8; 4]) -> Surface {
    Surface::from_premul(2, 2, px.repeat(4)).unwrap()
}

#[test]
fn none_and_identity_filters_leave_pixels_alone() {
    let orig = solid([200, 100, 50, 255]);
    let mut s = orig.clone();
    apply_filter(&mut s, "none").unwrap();
    assert_eq!(s, orig);
    apply_filter(&mut s, "brightness(1) contrast(1) saturate(1) hue-rotate(0deg)").unwrap();
    for (a, b) in s.data().iter().zip(orig.data()) {
        assert!((i32::from(*a) - i32::from(*b)).abs() <= 1);
    }
}

#[test]
fn grayscale_equalizes_channels() {
    let mut s = solid([200, 100, 50, 255]);
    apply_filter(&mut s, "grayscale(1)").unwrap();
    let px = s.pixel(0, 0).unwrap();
    assert!((i32::from(px[0]) - i32::from(px[1])).abs() <= 1);
    assert!((i32::from(px[1]) - i32::from(px[2])).abs() <= 1);
}

#[test]
fn brightness_scales_and_clamps() {
    let mut s = solid([100, 100, 100, 255]);
    apply_filter(&mut s, "brightness(0.5)").unwrap();
    assert_eq!(s.pixel(1, 1).unwrap(), [50, 50, 50, 255]);
    let mut s = solid([200, 200, 200, 255]);
    apply_filter(&mut s, "brightness(2)").unwrap();
    assert_eq!(s.pixel(0, 0).unwrap(), [255, 255, 255, 255]);
}

#[test]
fn opacity_reduces_alpha_and_stays_premultiplied() {
    let mut s = solid([255, 0, 0, 255]);
    apply_filter(&mut s, "opacity(0.5)").unwrap();
    let px = s.pixel(0, 0).unwrap();
    assert_eq!(px[3], 128);
    assert!(px[0] <= px[3]);
}

#[test]
fn transparent_pixels_are_untouched() {
    let orig = solid([0, 0, 0, 0]);
    let mut s = orig.clone();
    apply_filter(&mut s, "sepia(1) brightness(3)").unwrap();
    assert_eq!(s, orig);
}

#[test]
fn blur_on_uniform_surface_is_stable() {
    let orig = solid([40, 80, 120, 255]);
    let mut s = orig.clone();
    apply_filter(&mut s, "blur(3px)").unwrap();
    assert_eq!(s, orig);
}

#[test]
fn unknown_functions_are_ignored() {
    let orig = solid([10, 20, 30, 255]);
    let mut s = orig.clone();
    apply_filter(&mut s, "drop-shadow(1px 1px 1px red) invert(1)").unwrap();
    assert_eq!(s, orig);
}

#[test]
fn exponent_arguments_match_plain_decimals() {
    let mut a = solid([200, 100, 50, 255]);
    let mut b = a.clone();
    apply_filter(&mut a, "brightness(5e-1)").unwrap();
    apply_filter(&mut b, "brightness(0.5)").unwrap();
    assert_eq!(a, b);
}
