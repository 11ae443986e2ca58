use super::*;

const EPS: f64 = 1e-9;

#[test]
fn wide_image_fills_width() {
    let fit = contain_fit(Size::new(300.0, 452.0), Size::new(4000.0, 3000.0)).unwrap();
    assert!((fit.display.width - 300.0).abs() < EPS);
    assert!((fit.display.height - 225.0).abs() < EPS);
    assert!((fit.centering.x).abs() < EPS);
    assert!((fit.centering.y - 113.5).abs() < EPS);
}

#[test]
fn tall_image_fills_height() {
    let fit = contain_fit(Size::new(465.0, 276.0), Size::new(1000.0, 2000.0)).unwrap();
    assert!((fit.display.height - 276.0).abs() < EPS);
    assert!((fit.display.width - 138.0).abs() < EPS);
    assert!((fit.centering.x - 163.5).abs() < EPS);
    assert!(fit.centering.y.abs() < EPS);
}

#[test]
fn equal_aspect_fills_both_axes() {
    let fit = contain_fit(Size::new(200.0, 300.0), Size::new(400.0, 600.0)).unwrap();
    assert!((fit.display.width - 200.0).abs() < EPS);
    assert!((fit.display.height - 300.0).abs() < EPS);
}

#[test]
fn contained_and_touching_for_many_aspects() {
    let slots = [(300.0, 452.0), (465.0, 276.0), (130.0, 130.0), (483.0, 725.0)];
    let images = [
        (1.0, 1.0),
        (4000.0, 3000.0),
        (3000.0, 4000.0),
        (1920.0, 1080.0),
        (10.0, 1000.0),
        (1000.0, 10.0),
    ];
    for (sw, sh) in slots {
        for (iw, ih) in images {
            let fit = contain_fit(Size::new(sw, sh), Size::new(iw, ih)).unwrap();
            assert!(fit.display.width <= sw + EPS);
            assert!(fit.display.height <= sh + EPS);
            assert!(fit.centering.x >= -EPS && fit.centering.y >= -EPS);
            let touches_w = (fit.display.width - sw).abs() < 1e-6;
            let touches_h = (fit.display.height - sh).abs() < 1e-6;
            assert!(touches_w || touches_h, "slot {sw}x{sh} image {iw}x{ih}");
            let aspect = fit.display.width / fit.display.height;
            assert!((aspect - iw / ih).abs() < 1e-6);
        }
    }
}

#[test]
fn degenerate_sizes_yield_none() {
    assert!(contain_fit(Size::new(100.0, 100.0), Size::new(0.0, 10.0)).is_none());
    assert!(contain_fit(Size::new(100.0, 100.0), Size::new(f64::NAN, 10.0)).is_none());
    assert!(contain_fit(Size::new(0.0, 100.0), Size::new(10.0, 10.0)).is_none());
}

#[test]
fn origin_adds_slot_centering_and_offset() {
    let slot = crate::layout::registry::layout_for("2h").unwrap().slots[1];
    let fit = fit_in_slot(&slot, Size::new(4000.0, 3000.0)).unwrap();
    let o = fit.origin(&slot, Vec2::new(5.0, -2.0));
    assert!((o.x - (331.0 + 0.0 + 5.0)).abs() < EPS);
    assert!((o.y - (16.0 + 113.5 - 2.0)).abs() < EPS);
    assert_eq!(fit.scaled(2.0), Size::new(600.0, 450.0));
}
