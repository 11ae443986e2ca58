//! Pointer and wheel routing.
//!
//! Events arrive already hit-tested. A static table maps `(target kind, event kind)` to a handler;
//! handlers drive the gesture state machine and return [`Action`]s for the editor authority to
//! apply. The dispatcher never touches editor state itself.

use crate::{
    editor::state::{ImageTransform, Selection},
    foundation::core::{ImageId, Point, TextId, Vec2},
    foundation::math::{finite_point, finite_vec},
    interact::transform::{
        Envelope, TransformPatch, WheelInput, commit_offset, drag_position, wheel_zoom,
    },
    layout::fit::ContainFit,
    layout::registry::Slot,
};

/// What an event landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    /// A slot with no image in it.
    EmptySlot(&'static str),
    /// A placed image, through its slot's hit area.
    Image(ImageId),
    /// A text item.
    Text(TextId),
    /// Bare stage background.
    Stage,
}

/// Kind of input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    Wheel,
}

/// One input event in canvas space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputEvent {
    pub kind: EventKind,
    /// Pointer position, when the platform reports one.
    pub pointer: Option<Point>,
    /// Vertical wheel delta; zero for pointer events.
    pub delta_y: f64,
}

impl InputEvent {
    pub fn pointer(kind: EventKind, at: Point) -> Self {
        Self {
            kind,
            pointer: Some(at),
            delta_y: 0.0,
        }
    }

    pub fn wheel(at: Option<Point>, delta_y: f64) -> Self {
        Self {
            kind: EventKind::Wheel,
            pointer: at,
            delta_y,
        }
    }
}

/// Intended state change reported to the editor authority.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Select(Option<Selection>),
    SelectSlot(Option<String>),
    CommitTransform { id: ImageId, patch: TransformPatch },
    MoveText { id: TextId, position: Point },
    OpenFilePicker { slot_id: String },
    RenderNeeded,
}

/// Result of dispatching one event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dispatch {
    pub actions: Vec<Action>,
    /// The event was handled and must not bubble further.
    pub consumed: bool,
}

/// Geometry of a placed image as the dispatcher needs it.
#[derive(Clone, Copy, Debug)]
pub struct ImageGeometry {
    pub slot: &'static Slot,
    pub fit: ContainFit,
    pub transform: ImageTransform,
}

impl ImageGeometry {
    /// Current on-screen top-left.
    pub fn origin(&self) -> Point {
        self.fit.origin(self.slot, self.transform.offset())
    }

    fn envelope(&self) -> Envelope {
        Envelope::for_slot(self.slot, self.fit.scaled(self.transform.scale_x))
    }
}

/// Read-only scene lookups the handlers need.
pub trait SceneQuery {
    /// Geometry of a decoded, placed image. `None` while pending or broken.
    fn image_geometry(&self, id: ImageId) -> Option<ImageGeometry>;
    /// Current anchor of a text item.
    fn text_position(&self, id: TextId) -> Option<Point>;
}

/// In-progress gesture.
#[derive(Clone, Copy, Debug, Default)]
pub enum Gesture {
    #[default]
    Idle,
    DraggingImage {
        id: ImageId,
        geometry: ImageGeometry,
        grab: Vec2,
        position: Point,
        moved: bool,
    },
    DraggingText {
        id: TextId,
        grab: Vec2,
        position: Point,
        moved: bool,
    },
    PressedEmptySlot {
        slot_id: &'static str,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum TargetKind {
    EmptySlot,
    Image,
    Text,
    Stage,
}

impl HitTarget {
    fn kind(self) -> TargetKind {
        match self {
            Self::EmptySlot(_) => TargetKind::EmptySlot,
            Self::Image(_) => TargetKind::Image,
            Self::Text(_) => TargetKind::Text,
            Self::Stage => TargetKind::Stage,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Handler {
    PressEmptySlot,
    ReleaseEmptySlot,
    BeginImageDrag,
    BeginTextDrag,
    ClearSelection,
    ContinueGesture,
    EndGesture,
    WheelZoom,
    Ignore,
}

const ROUTES: &[((TargetKind, EventKind), Handler)] = &[
    ((TargetKind::EmptySlot, EventKind::PointerDown), Handler::PressEmptySlot),
    ((TargetKind::EmptySlot, EventKind::PointerMove), Handler::ContinueGesture),
    ((TargetKind::EmptySlot, EventKind::PointerUp), Handler::ReleaseEmptySlot),
    ((TargetKind::EmptySlot, EventKind::Wheel), Handler::Ignore),
    ((TargetKind::Image, EventKind::PointerDown), Handler::BeginImageDrag),
    ((TargetKind::Image, EventKind::PointerMove), Handler::ContinueGesture),
    ((TargetKind::Image, EventKind::PointerUp), Handler::EndGesture),
    ((TargetKind::Image, EventKind::Wheel), Handler::WheelZoom),
    ((TargetKind::Text, EventKind::PointerDown), Handler::BeginTextDrag),
    ((TargetKind::Text, EventKind::PointerMove), Handler::ContinueGesture),
    ((TargetKind::Text, EventKind::PointerUp), Handler::EndGesture),
    ((TargetKind::Text, EventKind::Wheel), Handler::Ignore),
    ((TargetKind::Stage, EventKind::PointerDown), Handler::ClearSelection),
    ((TargetKind::Stage, EventKind::PointerMove), Handler::ContinueGesture),
    ((TargetKind::Stage, EventKind::PointerUp), Handler::EndGesture),
    ((TargetKind::Stage, EventKind::Wheel), Handler::Ignore),
];

fn route(target: TargetKind, kind: EventKind) -> Handler {
    ROUTES
        .iter()
        .find(|(key, _)| *key == (target, kind))
        .map_or(Handler::Ignore, |(_, h)| *h)
}

/// Routes hit-tested input to transform math and holds the live gesture.
#[derive(Clone, Debug, Default)]
pub struct Dispatcher {
    gesture: Gesture,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Uncommitted on-screen top-left of an image being dragged.
    pub fn live_image_position(&self, id: ImageId) -> Option<Point> {
        match self.gesture {
            Gesture::DraggingImage {
                id: dragging,
                position,
                ..
            } if dragging == id => Some(position),
            _ => None,
        }
    }

    /// Uncommitted position of a text item being dragged.
    pub fn live_text_position(&self, id: TextId) -> Option<Point> {
        match self.gesture {
            Gesture::DraggingText {
                id: dragging,
                position,
                ..
            } if dragging == id => Some(position),
            _ => None,
        }
    }

    /// Drop any gesture without committing, e.g. when the frame changes under it.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Route one event.
    pub fn dispatch(
        &mut self,
        target: HitTarget,
        event: InputEvent,
        scene: &dyn SceneQuery,
    ) -> Dispatch {
        let handler = route(target.kind(), event.kind);
        tracing::trace!(?target, kind = ?event.kind, ?handler, "dispatch");
        match handler {
            Handler::PressEmptySlot => self.press_empty_slot(target),
            Handler::ReleaseEmptySlot => self.release_empty_slot(target, event),
            Handler::BeginImageDrag => self.begin_image_drag(target, event, scene),
            Handler::BeginTextDrag => self.begin_text_drag(target, event, scene),
            Handler::ClearSelection => {
                self.gesture = Gesture::Idle;
                Dispatch {
                    actions: vec![
                        Action::Select(None),
                        Action::SelectSlot(None),
                        Action::RenderNeeded,
                    ],
                    consumed: false,
                }
            }
            Handler::ContinueGesture => self.continue_gesture(event),
            Handler::EndGesture => self.end_gesture(event),
            Handler::WheelZoom => self.wheel(target, event, scene),
            Handler::Ignore => Dispatch::default(),
        }
    }

    fn press_empty_slot(&mut self, target: HitTarget) -> Dispatch {
        let HitTarget::EmptySlot(slot_id) = target else {
            return Dispatch::default();
        };
        self.gesture = Gesture::PressedEmptySlot { slot_id };
        Dispatch {
            actions: vec![
                Action::Select(None),
                Action::SelectSlot(Some(slot_id.to_string())),
                Action::RenderNeeded,
            ],
            consumed: true,
        }
    }

    fn release_empty_slot(&mut self, target: HitTarget, event: InputEvent) -> Dispatch {
        let pressed = match self.gesture {
            Gesture::PressedEmptySlot { slot_id } => Some(slot_id),
            _ => None,
        };
        match (pressed, target) {
            (Some(p), HitTarget::EmptySlot(r)) if p == r => {
                self.gesture = Gesture::Idle;
                Dispatch {
                    actions: vec![Action::OpenFilePicker {
                        slot_id: p.to_string(),
                    }],
                    consumed: true,
                }
            }
            _ => self.end_gesture(event),
        }
    }

    fn begin_image_drag(
        &mut self,
        target: HitTarget,
        event: InputEvent,
        scene: &dyn SceneQuery,
    ) -> Dispatch {
        let HitTarget::Image(id) = target else {
            return Dispatch::default();
        };
        let mut actions = vec![Action::Select(Some(Selection::Image(id)))];
        if let Some(geometry) = scene.image_geometry(id) {
            actions.push(Action::SelectSlot(Some(geometry.slot.id.to_string())));
            let origin = geometry.origin();
            let grab = event
                .pointer
                .and_then(finite_point)
                .and_then(|p| finite_vec(p - origin));
            if let (Some(grab), Some(position)) = (grab, finite_point(origin)) {
                self.gesture = Gesture::DraggingImage {
                    id,
                    geometry,
                    grab,
                    position,
                    moved: false,
                };
            }
        }
        actions.push(Action::RenderNeeded);
        Dispatch {
            actions,
            consumed: true,
        }
    }

    fn begin_text_drag(
        &mut self,
        target: HitTarget,
        event: InputEvent,
        scene: &dyn SceneQuery,
    ) -> Dispatch {
        let HitTarget::Text(id) = target else {
            return Dispatch::default();
        };
        if let (Some(pos), Some(pointer)) = (
            scene.text_position(id),
            event.pointer.and_then(finite_point),
        ) {
            if let Some(grab) = finite_vec(pointer - pos) {
                self.gesture = Gesture::DraggingText {
                    id,
                    grab,
                    position: pos,
                    moved: false,
                };
            }
        }
        Dispatch {
            actions: vec![
                Action::Select(Some(Selection::Text(id))),
                Action::RenderNeeded,
            ],
            consumed: true,
        }
    }

    fn continue_gesture(&mut self, event: InputEvent) -> Dispatch {
        let Some(pointer) = event.pointer else {
            return Dispatch::default();
        };
        match &mut self.gesture {
            Gesture::DraggingImage {
                geometry,
                grab,
                position,
                moved,
                ..
            } => {
                let Some(next) = drag_position(pointer, *grab, &geometry.envelope()) else {
                    tracing::debug!("non-finite drag position discarded");
                    return Dispatch::default();
                };
                *position = next;
                *moved = true;
            }
            Gesture::DraggingText {
                grab,
                position,
                moved,
                ..
            } => {
                let Some(next) = finite_point(pointer).and_then(|p| finite_point(p - *grab))
                else {
                    tracing::debug!("non-finite text drag discarded");
                    return Dispatch::default();
                };
                *position = next;
                *moved = true;
            }
            Gesture::Idle | Gesture::PressedEmptySlot { .. } => return Dispatch::default(),
        }
        Dispatch {
            actions: vec![Action::RenderNeeded],
            consumed: true,
        }
    }

    fn end_gesture(&mut self, event: InputEvent) -> Dispatch {
        if event.pointer.is_some() {
            // Fold the release position in before committing.
            self.continue_gesture(event);
        }
        let gesture = std::mem::take(&mut self.gesture);
        let mut actions = Vec::new();
        match gesture {
            Gesture::DraggingImage {
                id,
                geometry,
                position,
                moved: true,
                ..
            } => match commit_offset(position, geometry.slot, &geometry.fit) {
                Some(offset) => actions.push(Action::CommitTransform {
                    id,
                    patch: TransformPatch::offset(offset),
                }),
                None => tracing::debug!(image = %id, "non-finite offset discarded"),
            },
            Gesture::DraggingText {
                id,
                position,
                moved: true,
                ..
            } => actions.push(Action::MoveText { id, position }),
            _ => return Dispatch::default(),
        }
        actions.push(Action::RenderNeeded);
        Dispatch {
            actions,
            consumed: true,
        }
    }

    fn wheel(&mut self, target: HitTarget, event: InputEvent, scene: &dyn SceneQuery) -> Dispatch {
        let HitTarget::Image(id) = target else {
            return Dispatch::default();
        };
        let Some(geometry) = scene.image_geometry(id) else {
            return Dispatch {
                actions: Vec::new(),
                consumed: true,
            };
        };

        let mut actions = vec![
            Action::Select(Some(Selection::Image(id))),
            Action::SelectSlot(Some(geometry.slot.id.to_string())),
        ];
        let zoom = wheel_zoom(WheelInput {
            slot: geometry.slot,
            fit: geometry.fit,
            transform: geometry.transform,
            pointer: event.pointer,
            delta_y: event.delta_y,
        });
        match zoom {
            Some(z) => actions.push(Action::CommitTransform {
                id,
                patch: z.patch(),
            }),
            None => tracing::debug!(image = %id, "non-finite zoom discarded"),
        }
        actions.push(Action::RenderNeeded);
        Dispatch {
            actions,
            consumed: true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/dispatch.rs"]
mod tests;
