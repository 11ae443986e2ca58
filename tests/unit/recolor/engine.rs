use super::*;

fn raster(px: &[[u8; 4]]) -> Raster {
    Raster::from_rgba8(px.len() as u32, 1, px.concat()).unwrap()
}

fn artwork(r: Raster) -> Artwork {
    Artwork {
        source: "frame/test.png".to_string(),
        raster: Arc::new(r),
    }
}

#[test]
fn predicate_thresholds() {
    assert!(is_paintable([245, 245, 245, 11]));
    assert!(is_paintable([255, 255, 255, 255]));
    assert!(!is_paintable([255, 255, 255, 10]));
    assert!(!is_paintable([244, 255, 255, 255]));
    assert!(!is_paintable([255, 244, 255, 255]));
    assert!(!is_paintable([255, 255, 244, 255]));
}

#[test]
fn near_white_takes_color_and_keeps_alpha() {
    let input = raster(&[
        [255, 255, 255, 255],
        [250, 246, 249, 128],
        [10, 20, 30, 255],
        [255, 255, 255, 5],
        [244, 250, 250, 255],
    ]);
    let out = recolor_near_white(&input, "#112233").unwrap();
    let px = out.pixels().unwrap();
    assert_eq!(&px[0..4], &[0x11, 0x22, 0x33, 255]);
    assert_eq!(&px[4..8], &[0x11, 0x22, 0x33, 128]);
    assert_eq!(&px[8..12], &[10, 20, 30, 255]);
    assert_eq!(&px[12..16], &[255, 255, 255, 5]);
    assert_eq!(&px[16..20], &[244, 250, 250, 255]);
}

#[test]
fn exhaustive_opaque_near_white_block() {
    let color = Rgb8::new(200, 10, 90);
    let mut px = Vec::new();
    for r in 240..=255u8 {
        for g in [240u8, 245, 255] {
            for b in [244u8, 245, 255] {
                px.push([r, g, b, 255]);
            }
        }
    }
    let input = raster(&px);
    let out = recolor_near_white(&input, &color.to_hex()).unwrap();
    for (src, dst) in px.iter().zip(out.pixels().unwrap().chunks_exact(4)) {
        if src[0] >= 245 && src[1] >= 245 && src[2] >= 245 {
            assert_eq!(dst, &[color.r, color.g, color.b, 255]);
        } else {
            assert_eq!(dst, src.as_slice());
        }
    }
}

#[test]
fn input_is_untouched_and_rerun_is_identical() {
    let input = raster(&[[255, 255, 255, 255], [0, 0, 0, 0]]);
    let before = input.pixels().unwrap().to_vec();
    let a = recolor_near_white(&input, "#abc").unwrap();
    let b = recolor_near_white(&input, "#abc").unwrap();
    assert_eq!(input.pixels().unwrap(), before.as_slice());
    assert_eq!(a.pixels().unwrap(), b.pixels().unwrap());
}

#[test]
fn bad_color_or_tainted_pixels_yield_none() {
    let input = raster(&[[255, 255, 255, 255]]);
    assert!(recolor_near_white(&input, "not-a-color").is_none());
    assert!(recolor_near_white(&input.clone().tainted(), "#fff").is_none());
}

#[test]
fn cache_recomputes_only_on_input_change() {
    let art = artwork(raster(&[[255, 255, 255, 255]]));
    let mut cache = RecolorCache::new();

    let a = cache.processed(&art, "#FF0000").unwrap();
    let b = cache.processed(&art, "#ff0000").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.computations(), 1);

    let c = cache.processed(&art, "#00ff00").unwrap();
    assert_eq!(&c.pixels().unwrap()[..3], &[0, 255, 0]);
    assert_eq!(cache.computations(), 2);

    let other = Artwork {
        source: "frame/other.png".to_string(),
        raster: art.raster.clone(),
    };
    cache.processed(&other, "#00ff00");
    assert_eq!(cache.computations(), 3);

    cache.invalidate();
    cache.processed(&other, "#00ff00");
    assert_eq!(cache.computations(), 4);
}

#[test]
fn cache_remembers_failures() {
    let art = artwork(raster(&[[255, 255, 255, 255]]).tainted());
    let mut cache = RecolorCache::new();
    assert!(cache.processed(&art, "#123456").is_none());
    assert!(cache.processed(&art, "#123456").is_none());
    assert_eq!(cache.computations(), 1);
}
