use super::*;

#[test]
fn strict_hex_pattern() {
    assert!(is_strict_hex("#fff"));
    assert!(is_strict_hex("#A1b2C3"));
    assert!(!is_strict_hex("fff"));
    assert!(!is_strict_hex("#ffff"));
    assert!(!is_strict_hex("#ggg"));
    assert!(!is_strict_hex(" #fff"));
}

#[test]
fn array_form_drops_invalid_entries() {
    let p = Palette::parse(r##"["#fff", "not-a-color", "#112233"]"##).unwrap();
    assert_eq!(p.colors(), ["#fff", "#112233"]);
}

#[test]
fn object_form_and_non_strings() {
    let p = Palette::parse(r##"{"frameColors": ["#ABC", 7, null, "#123"]}"##).unwrap();
    assert_eq!(p.colors(), ["#ABC", "#123"]);
}

#[test]
fn caps_at_max() {
    let entries: Vec<String> = (0..40).map(|i| format!("\"#{i:06x}\"")).collect();
    let json = format!("[{}]", entries.join(","));
    let p = Palette::parse(&json).unwrap();
    assert_eq!(p.colors().len(), MAX_PALETTE_COLORS);
    assert_eq!(p.colors()[0], "#000000");
}

#[test]
fn failures_keep_defaults() {
    let default = Palette::default();
    assert_eq!(default.colors().len(), 8);
    assert_eq!(Palette::from_json("{not json"), default);
    assert_eq!(Palette::from_json(r#"["nope"]"#), default);
    assert_eq!(Palette::from_json(r#"{"other": []}"#), default);
    assert_eq!(
        Palette::load(Path::new("/definitely/not/here/palette.json")),
        default
    );
}

#[test]
fn defaults_are_strict_hex() {
    assert!(DEFAULT_FRAME_COLORS.iter().all(|c| is_strict_hex(c)));
}
