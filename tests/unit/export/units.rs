use super::*;

#[test]
fn print_widths_at_1200_dpi() {
    assert_eq!(cm_to_px(15.0, 1200.0), 7087);
    assert_eq!(cm_to_px(10.0, 1200.0), 4724);
}

#[test]
fn degenerate_inputs_clamp_to_zero() {
    assert_eq!(cm_to_px(-1.0, 1200.0), 0);
    assert_eq!(cm_to_px(f64::NAN, 1200.0), 0);
}

#[test]
fn mm_roundtrip() {
    for mm in [0.0, 1.0, 5.0, 10.0, 150.0] {
        let back = px_to_mm(mm_to_px(mm, 600.0), 600.0);
        assert!((back - mm).abs() < 1e-9);
    }
    assert!((mm_to_px(25.4, 600.0) - 600.0).abs() < 1e-9);
}
