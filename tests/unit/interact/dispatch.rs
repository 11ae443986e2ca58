use super::*;
use crate::foundation::core::Size;
use crate::layout::fit::fit_in_slot;

static SLOT: Slot = Slot {
    id: "slot-1",
    x: 100.0,
    y: 50.0,
    width: 200.0,
    height: 100.0,
};

struct Scene {
    transform: ImageTransform,
    text_at: Point,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            transform: ImageTransform::default(),
            text_at: Point::new(40.0, 40.0),
        }
    }
}

impl SceneQuery for Scene {
    fn image_geometry(&self, id: ImageId) -> Option<ImageGeometry> {
        (id == ImageId(1)).then(|| ImageGeometry {
            slot: &SLOT,
            fit: fit_in_slot(&SLOT, Size::new(100.0, 100.0)).unwrap(),
            transform: self.transform,
        })
    }

    fn text_position(&self, id: TextId) -> Option<Point> {
        (id == TextId(2)).then_some(self.text_at)
    }
}

fn down(at: Point) -> InputEvent {
    InputEvent::pointer(EventKind::PointerDown, at)
}
fn mv(at: Point) -> InputEvent {
    InputEvent::pointer(EventKind::PointerMove, at)
}
fn up(at: Point) -> InputEvent {
    InputEvent::pointer(EventKind::PointerUp, at)
}

#[test]
fn every_pair_has_a_route() {
    for t in [
        TargetKind::EmptySlot,
        TargetKind::Image,
        TargetKind::Text,
        TargetKind::Stage,
    ] {
        for k in [
            EventKind::PointerDown,
            EventKind::PointerMove,
            EventKind::PointerUp,
            EventKind::Wheel,
        ] {
            assert!(ROUTES.iter().any(|(key, _)| *key == (t, k)), "{t:?}/{k:?}");
        }
    }
}

#[test]
fn stage_click_clears_both_selections() {
    let mut d = Dispatcher::new();
    let out = d.dispatch(HitTarget::Stage, down(Point::ZERO), &Scene::default());
    assert!(out.actions.contains(&Action::Select(None)));
    assert!(out.actions.contains(&Action::SelectSlot(None)));
}

#[test]
fn empty_slot_click_opens_picker() {
    let mut d = Dispatcher::new();
    let scene = Scene::default();
    let target = HitTarget::EmptySlot("slot-2");
    let out = d.dispatch(target, down(Point::ZERO), &scene);
    assert!(
        out.actions
            .contains(&Action::SelectSlot(Some("slot-2".to_string())))
    );
    let out = d.dispatch(target, up(Point::ZERO), &scene);
    assert_eq!(
        out.actions,
        vec![Action::OpenFilePicker {
            slot_id: "slot-2".to_string()
        }]
    );
    assert!(matches!(d.gesture(), Gesture::Idle));
}

#[test]
fn release_on_other_slot_does_not_open_picker() {
    let mut d = Dispatcher::new();
    let scene = Scene::default();
    d.dispatch(HitTarget::EmptySlot("slot-2"), down(Point::ZERO), &scene);
    let out = d.dispatch(HitTarget::EmptySlot("slot-3"), up(Point::ZERO), &scene);
    assert!(out.actions.is_empty());
}

#[test]
fn image_drag_is_live_then_committed_inside_envelope() {
    let mut d = Dispatcher::new();
    let scene = Scene::default();
    let target = HitTarget::Image(ImageId(1));

    // 100x100 image in a 200x100 slot: origin (150, 50).
    let out = d.dispatch(target, down(Point::new(160.0, 60.0)), &scene);
    assert!(
        out.actions
            .contains(&Action::Select(Some(Selection::Image(ImageId(1)))))
    );
    assert!(
        out.actions
            .contains(&Action::SelectSlot(Some("slot-1".to_string())))
    );

    d.dispatch(HitTarget::Stage, mv(Point::new(180.0, 70.0)), &scene);
    assert_eq!(
        d.live_image_position(ImageId(1)),
        Some(Point::new(170.0, 60.0))
    );

    // Far outside: clamps to the envelope max (300, 150).
    let out = d.dispatch(HitTarget::Stage, up(Point::new(5000.0, 5000.0)), &scene);
    assert_eq!(
        out.actions[0],
        Action::CommitTransform {
            id: ImageId(1),
            patch: TransformPatch::offset(Vec2::new(150.0, 100.0)),
        }
    );
    assert_eq!(d.live_image_position(ImageId(1)), None);
}

#[test]
fn release_in_place_commits_unchanged_offset() {
    let mut d = Dispatcher::new();
    let scene = Scene::default();
    let target = HitTarget::Image(ImageId(1));
    d.dispatch(target, down(Point::new(160.0, 60.0)), &scene);
    let out = d.dispatch(target, up(Point::new(160.0, 60.0)), &scene);
    assert_eq!(
        out.actions[0],
        Action::CommitTransform {
            id: ImageId(1),
            patch: TransformPatch::offset(Vec2::ZERO),
        }
    );
}

#[test]
fn release_without_pointer_or_motion_is_noop() {
    let mut d = Dispatcher::new();
    let scene = Scene::default();
    let target = HitTarget::Image(ImageId(1));
    d.dispatch(target, down(Point::new(160.0, 60.0)), &scene);
    let release = InputEvent {
        kind: EventKind::PointerUp,
        pointer: None,
        delta_y: 0.0,
    };
    let out = d.dispatch(target, release, &scene);
    assert!(out.actions.is_empty());
    assert!(matches!(d.gesture(), Gesture::Idle));
}

#[test]
fn nan_pointer_during_drag_is_ignored() {
    let mut d = Dispatcher::new();
    let scene = Scene::default();
    d.dispatch(HitTarget::Image(ImageId(1)), down(Point::new(160.0, 60.0)), &scene);
    d.dispatch(HitTarget::Stage, mv(Point::new(170.0, 60.0)), &scene);
    let out = d.dispatch(HitTarget::Stage, mv(Point::new(f64::NAN, 60.0)), &scene);
    assert!(out.actions.is_empty());
    assert_eq!(
        d.live_image_position(ImageId(1)),
        Some(Point::new(160.0, 50.0))
    );
}

#[test]
fn text_drag_commits_move() {
    let mut d = Dispatcher::new();
    let scene = Scene::default();
    d.dispatch(HitTarget::Text(TextId(2)), down(Point::new(45.0, 45.0)), &scene);
    d.dispatch(HitTarget::Stage, mv(Point::new(105.0, 65.0)), &scene);
    assert_eq!(
        d.live_text_position(TextId(2)),
        Some(Point::new(100.0, 60.0))
    );
    let out = d.dispatch(HitTarget::Text(TextId(2)), up(Point::new(105.0, 65.0)), &scene);
    assert_eq!(
        out.actions[0],
        Action::MoveText {
            id: TextId(2),
            position: Point::new(100.0, 60.0)
        }
    );
}

#[test]
fn wheel_selects_and_commits_and_is_consumed() {
    let mut d = Dispatcher::new();
    let scene = Scene::default();
    let out = d.dispatch(
        HitTarget::Image(ImageId(1)),
        InputEvent::wheel(Some(Point::new(200.0, 100.0)), -120.0),
        &scene,
    );
    assert!(out.consumed);
    assert_eq!(out.actions[0], Action::Select(Some(Selection::Image(ImageId(1)))));
    assert_eq!(out.actions[1], Action::SelectSlot(Some("slot-1".to_string())));
    let Action::CommitTransform { patch, .. } = &out.actions[2] else {
        panic!("expected a commit, got {:?}", out.actions[2]);
    };
    assert!((patch.scale.unwrap() - 1.1).abs() < 1e-12);
}

#[test]
fn wheel_on_stage_bubbles() {
    let mut d = Dispatcher::new();
    let out = d.dispatch(
        HitTarget::Stage,
        InputEvent::wheel(None, 1.0),
        &Scene::default(),
    );
    assert!(!out.consumed);
    assert!(out.actions.is_empty());
}
