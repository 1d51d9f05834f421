use super::*;

#[test]
fn new_surface_is_transparent() {
    let s = Surface::new(3, 2).unwrap();
    assert_eq!(s.data().len(), 3 * 2 * 4);
    assert!(s.data().iter().all(|&b| b == 0));
    assert_eq!(s.pixel(2, 1), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(3, 0), None);
}

#[test]
fn fill_and_clear() {
    let mut s = Surface::new(2, 2).unwrap();
    s.fill(Rgba8Premul::BLACK);
    assert_eq!(s.pixel(1, 1), Some([0, 0, 0, 255]));
    s.clear();
    assert_eq!(s.pixel(1, 1), Some([0, 0, 0, 0]));
}

#[test]
fn from_premul_checks_length() {
    assert!(Surface::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(Surface::from_premul(0, 2, vec![]).is_err());
}

#[test]
fn straight_round_trip_for_half_alpha() {
    let s = Surface::from_straight_rgba8(1, 1, vec![255, 0, 0, 128]).unwrap();
    assert_eq!(s.pixel(0, 0), Some([128, 0, 0, 128]));
    assert_eq!(s.to_straight_rgba8(), vec![255, 0, 0, 128]);
}

#[test]
fn pixmap_conversion_preserves_bytes() {
    let s = Surface::from_premul(2, 1, vec![10, 20, 30, 40, 1, 2, 3, 255]).unwrap();
    let pm = s.to_pixmap().unwrap();
    let back = Surface::from_pixmap(&pm).unwrap();
    assert_eq!(back, s);
}
