use super::*;

fn with_frame(frame: FrameType) -> EditorState {
    EditorState::new().select_frame(Some(frame)).state
}

fn insert(state: &EditorState, slot: &str) -> (EditorState, ImageId, Vec<ImageId>) {
    let t = state.insert_image(slot).unwrap();
    let Some(Created::Image(id)) = t.created else {
        panic!("insert_image must report the new id");
    };
    (t.state, id, t.released)
}

#[test]
fn insert_requires_frame_and_known_slot() {
    let empty = EditorState::new();
    assert!(matches!(
        empty.insert_image("slot-1"),
        Err(CutError::NoFrameSelected)
    ));
    let s = with_frame(FrameType::Four);
    assert!(matches!(
        s.insert_image("slot-99"),
        Err(CutError::Validation(_))
    ));
}

#[test]
fn replacing_slot_keeps_one_entry_and_releases_old() {
    let s = with_frame(FrameType::TwoHorizontal);
    let (s, first, released) = insert(&s, "slot-1");
    assert!(released.is_empty());
    let (s, second, released) = insert(&s, "slot-1");

    assert_ne!(first, second);
    assert_eq!(released, vec![first]);
    let in_slot: Vec<_> = s.images().iter().filter(|i| i.slot_id == "slot-1").collect();
    assert_eq!(in_slot.len(), 1);
    assert_eq!(in_slot[0].id, second);
}

#[test]
fn replacing_selected_image_clears_selection() {
    let s = with_frame(FrameType::TwoHorizontal);
    let (s, first, _) = insert(&s, "slot-1");
    let s = s.select(Some(Selection::Image(first)));
    let (s, _, _) = insert(&s, "slot-1");
    assert_eq!(s.selection(), None);
}

#[test]
fn frame_change_clears_everything() {
    let s = with_frame(FrameType::Four);
    let (s, a, _) = insert(&s, "slot-1");
    let (s, b, _) = insert(&s, "slot-2");
    let (s, _) = s.insert_text("hi".into(), TextStyle::default()).unwrap();
    let s = s
        .select(Some(Selection::Image(a)))
        .select_slot(Some("slot-1".into()));

    let t = s.select_frame(Some(FrameType::Six));
    assert_eq!(t.released, vec![a, b]);
    assert!(t.state.images().is_empty());
    assert!(t.state.texts().is_empty());
    assert_eq!(t.state.selection(), None);
    assert_eq!(t.state.selected_slot(), None);
    assert_eq!(t.state.frame(), Some(FrameType::Six));
}

#[test]
fn same_frame_reselect_drops_text_and_its_selection() {
    let s = with_frame(FrameType::Four);
    let (s, text) = s.insert_text("hi".into(), TextStyle::default()).unwrap();
    let s = s.select(Some(Selection::Text(text)));

    let t = s.select_frame(Some(FrameType::Four));
    assert!(t.released.is_empty());
    assert!(t.state.texts().is_empty());
    assert_eq!(t.state.selection(), None);

    let (s, img, _) = insert(&t.state, "slot-2");
    let s = s
        .select(Some(Selection::Image(img)))
        .select_slot(Some("slot-2".into()));
    let t = s.select_frame(Some(FrameType::Four));
    assert_eq!(t.state.selection(), Some(Selection::Image(img)));
    assert_eq!(t.state.selected_slot(), Some("slot-2"));
    assert_eq!(t.state.images().len(), 1);
}

#[test]
fn old_snapshot_is_untouched() {
    let s0 = with_frame(FrameType::Four);
    let (s1, id, _) = insert(&s0, "slot-1");
    let s2 = s1.apply_transform(id, TransformPatch::scale(2.0));
    assert!(s0.images().is_empty());
    assert_eq!(s1.image(id).unwrap().transform.scale_x, 1.0);
    assert_eq!(s2.image(id).unwrap().transform.scale_x, 2.0);
    assert!(!Arc::ptr_eq(s1.images_handle(), s2.images_handle()));
}

#[test]
fn transform_commits_per_field() {
    let s = with_frame(FrameType::Four);
    let (s, id, _) = insert(&s, "slot-1");
    let s = s.apply_transform(
        id,
        TransformPatch {
            offset_x: Some(f64::NAN),
            offset_y: Some(3.0),
            scale: Some(1.5),
            rotation: None,
        },
    );
    let t = s.image(id).unwrap().transform;
    assert_eq!((t.offset_x, t.offset_y), (0.0, 3.0));
    assert_eq!((t.scale_x, t.scale_y), (1.5, 1.5));
}

#[test]
fn numeric_scale_targets_selected_slot() {
    let s = with_frame(FrameType::Four);
    let (s, a, _) = insert(&s, "slot-1");
    let (s, b, _) = insert(&s, "slot-2");

    let untouched = s.set_scale_percent(20.0);
    assert_eq!(untouched.image(a).unwrap().transform.scale_x, 1.0);

    let s = s.select_slot(Some("slot-2".into())).set_scale_percent(20.0);
    assert_eq!(s.image(b).unwrap().transform.scale_x, 2.0);
    assert_eq!(s.image(a).unwrap().transform.scale_x, 1.0);

    let s = s.set_scale_percent(0.5);
    assert_eq!(s.image(b).unwrap().transform.scale_y, 0.1);
    let s = s.set_scale_percent(f64::NAN);
    assert_eq!(s.image(b).unwrap().transform.scale_y, 0.1);
}

#[test]
fn delete_image_releases_and_deselects() {
    let s = with_frame(FrameType::Four);
    let (s, id, _) = insert(&s, "slot-3");
    let s = s.select(Some(Selection::Image(id)));
    let t = s.delete_image(id);
    assert_eq!(t.released, vec![id]);
    assert!(t.state.images().is_empty());
    assert_eq!(t.state.selection(), None);

    assert!(t.state.delete_image(id).released.is_empty());
}

#[test]
fn text_lifecycle() {
    let s = with_frame(FrameType::TwoVertical);
    let (s, id) = s.insert_text("Hello".into(), TextStyle::default()).unwrap();
    let item = s.text(id).unwrap();
    assert_eq!(item.position, Point::new(483.0 * 0.5, 719.0 * 0.88));

    let s = s.move_text(id, Point::new(10.0, 20.0));
    assert_eq!(s.text(id).unwrap().position, Point::new(10.0, 20.0));
    let s = s.move_text(id, Point::new(f64::NAN, 0.0));
    assert_eq!(s.text(id).unwrap().position, Point::new(10.0, 20.0));

    let s = s.update_text(
        id,
        TextPatch {
            text: Some("Bye".into()),
            font_size: Some(-3.0),
            italic: Some(true),
            ..TextPatch::default()
        },
    );
    let item = s.text(id).unwrap();
    assert_eq!(item.text, "Bye");
    assert_eq!(item.style.font_size, 32.0);
    assert!(item.style.italic);

    let s = s.select(Some(Selection::Text(id))).delete_text(id);
    assert!(s.texts().is_empty());
    assert_eq!(s.selection(), None);
}

#[test]
fn reduce_routes_messages() {
    let s = EditorState::new();
    let t = s.reduce(Message::SelectFrame(Some(FrameType::Four))).unwrap();
    let t = t
        .state
        .reduce(Message::InsertImage {
            slot_id: "slot-2".into(),
        })
        .unwrap();
    assert!(matches!(t.created, Some(Created::Image(_))));
    let t = t
        .state
        .reduce(Message::SetFrameColor("#123456".into()))
        .unwrap();
    assert_eq!(t.state.frame_color(), "#123456");
    assert!(matches!(
        EditorState::new().reduce(Message::InsertText {
            text: "x".into(),
            style: TextStyle::default()
        }),
        Err(CutError::NoFrameSelected)
    ));
}

#[test]
fn ids_are_never_reused() {
    let s = with_frame(FrameType::Four);
    let (s, a, _) = insert(&s, "slot-1");
    let s = s.delete_image(a).state;
    let (_, b, _) = insert(&s, "slot-1");
    assert_ne!(a, b);
}
