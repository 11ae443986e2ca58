use std::io::Cursor;

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "cutframe_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, w: u32, h: u32) {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([9, 8, 7, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, &buf).unwrap();
}

#[test]
fn minimal_session_uses_defaults() {
    let s = SessionFile::from_json(r#"{ "frame": "2h" }"#).unwrap();
    assert_eq!(s.frame, FrameType::TwoHorizontal);
    assert_eq!(s.device, DeviceClass::Desktop);
    assert!(s.images.is_empty() && s.texts.is_empty() && s.fonts.is_empty());
}

#[test]
fn image_and_text_fields_default() {
    let s = SessionFile::from_json(
        r##"{
            "frame": "4",
            "device": "mobile",
            "images": [{ "slot": "slot-3", "source": "a.png" }],
            "texts": [{ "text": "hi", "color": "#ff0000" }]
        }"##,
    )
    .unwrap();
    let img = &s.images[0];
    assert_eq!((img.offset_x, img.offset_y, img.scale, img.rotation), (0.0, 0.0, 1.0, 0.0));
    let t = &s.texts[0];
    assert_eq!(t.style.color, "#ff0000");
    assert_eq!(t.style.font_size, 32.0);
    assert!(t.x.is_none());
    assert_eq!(s.device, DeviceClass::Mobile);
}

#[test]
fn malformed_sessions_are_rejected() {
    assert!(matches!(
        SessionFile::from_json(r#"{ "frame": "3x" }"#),
        Err(CutError::Serde(_))
    ));
    assert!(matches!(
        SessionFile::from_json(r#"{ "frame": "2h", "stage_width": -5 }"#),
        Err(CutError::Validation(_))
    ));
    assert!(matches!(
        SessionFile::from_json(
            r#"{ "frame": "2h", "images": [{ "slot": "slot-9", "source": "a.png" }] }"#
        ),
        Err(CutError::Validation(_))
    ));
    assert!(SessionFile::from_json(r#"{ "frame": "2h", "bogus": 1 }"#).is_err());
}

#[test]
fn relative_paths_resolve_against_base() {
    let s = SessionFile::from_json(
        r#"{
            "frame": "2h",
            "artwork_root": "art",
            "images": [{ "slot": "slot-1", "source": "pics/a.png" }],
            "fonts": ["/abs/font.ttf"]
        }"#,
    )
    .unwrap()
    .resolve_paths(Path::new("/base"));
    assert_eq!(s.artwork_root.as_deref(), Some(Path::new("/base/art")));
    assert_eq!(s.images[0].source, Path::new("/base/pics/a.png"));
    assert_eq!(s.fonts[0], Path::new("/abs/font.ttf"));
}

#[test]
fn build_editor_applies_session() {
    let dir = temp_dir("session_build");
    std::fs::create_dir_all(&dir).unwrap();
    write_png(&dir.join("a.png"), 60, 90);
    std::fs::write(
        dir.join("session.json"),
        r##"{
            "frame": "2h",
            "frame_color": "#112233",
            "stage_width": 359.5,
            "images": [{ "slot": "slot-2", "source": "a.png", "offset_x": 5, "scale": 1.5 }],
            "texts": [
                { "text": "default" },
                { "text": "placed", "x": 10, "y": 20 }
            ],
            "fonts": ["missing.ttf"]
        }"##,
    )
    .unwrap();

    let session = SessionFile::load(&dir.join("session.json")).unwrap();
    let editor = session.build_editor().unwrap();
    let state = editor.state();

    assert_eq!(state.frame_color(), "#112233");
    let img = state.image_in_slot("slot-2").unwrap();
    assert_eq!(img.transform.offset_x, 5.0);
    assert_eq!(img.transform.scale_x, 1.5);
    assert_eq!(editor.decoded().loaded_count(), 1);

    let texts = state.texts();
    assert_eq!(texts.len(), 2);
    let default = state.layout().unwrap().default_text_position();
    assert_eq!(texts[0].position, default);
    assert_eq!(texts[1].position, Point::new(10.0, 20.0));

    let stage = editor.stage().unwrap();
    assert!((stage.scale() - 0.5).abs() < 1e-12);
}

#[test]
fn missing_image_file_fails_build() {
    let s = SessionFile::from_json(
        r#"{ "frame": "2h", "images": [{ "slot": "slot-1", "source": "/no/such/file.png" }] }"#,
    )
    .unwrap();
    assert!(s.build_editor().is_err());
}

#[test]
fn non_image_source_is_rejected() {
    let dir = temp_dir("session_pdf");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("notes.pdf"), b"%PDF-1.4").unwrap();

    let s = SessionFile::from_json(
        r#"{ "frame": "2h", "images": [{ "slot": "slot-1", "source": "notes.pdf" }] }"#,
    )
    .unwrap()
    .resolve_paths(&dir);
    let err = s.build_editor().unwrap_err();
    assert!(matches!(err, CutError::Validation(_)));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn session_fonts_are_registered() {
    let font = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts/Tuffy.ttf");
    let mut s =
        SessionFile::from_json(r#"{ "frame": "2h", "texts": [{ "text": "hi" }] }"#).unwrap();
    s.fonts.push(font);
    let mut editor = s.build_editor().unwrap();
    assert_eq!(editor.text_engine_mut().families(), ["Tuffy"]);
}
