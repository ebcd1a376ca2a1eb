use std::collections::BTreeSet;

use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::window::CursorMoved;

use crate::interactions::{InteractionEvent, InteractionKind};
use crate::presentation::PresentationSet;
use crate::scroll::SmoothScroll;

pub struct PointerPlugin;

impl Plugin for PointerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerSample>()
            .init_resource::<TouchCapability>()
            .add_message::<InteractionEvent>()
            .add_systems(
                Update,
                (
                    (track_pointer, detect_touch).in_set(PresentationSet::Pointer),
                    emit_interactions.in_set(PresentationSet::Interact),
                ),
            );
    }
}

/// Latest pointer position in viewport pixels (top-left origin)
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct PointerSample {
    pub position: Vec2,
    /// Has the pointer produced any sample yet?
    pub seen: bool,
    /// Did the pointer move during the current frame?
    pub moved: bool,
}

/// Set once the device has produced touch input
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchCapability(pub bool);

/// Which coordinate space a hitbox rect lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSpace {
    /// Fixed to the window (nav bar, overlays)
    Viewport,
    /// Scrolls with the page
    Page,
}

/// Interactive area of an element, used for hover/click hit testing
#[derive(Component, Debug, Clone, Copy)]
pub struct Hitbox {
    pub rect: Rect,
    pub space: HitSpace,
    /// Current visual displacement (magnetic pull, floating), tracked so the
    /// hit area follows what is drawn
    pub offset: Vec2,
    /// Higher layers win clicks
    pub layer: i32,
    pub enabled: bool,
}

impl Hitbox {
    pub fn new(rect: Rect, space: HitSpace, layer: i32) -> Self {
        Self {
            rect,
            space,
            offset: Vec2::ZERO,
            layer,
            enabled: true,
        }
    }

    /// Rect in viewport pixels for the given page scroll
    pub fn viewport_rect(&self, scroll: f32) -> Rect {
        let shift = match self.space {
            HitSpace::Viewport => self.offset,
            HitSpace::Page => self.offset - Vec2::new(0.0, scroll),
        };
        Rect::from_corners(self.rect.min + shift, self.rect.max + shift)
    }

    pub fn contains(&self, point: Vec2, scroll: f32) -> bool {
        self.enabled && self.viewport_rect(scroll).contains(point)
    }
}

/// System: record the latest pointer position; last event of the frame wins
pub fn track_pointer(mut ev_cursor: MessageReader<CursorMoved>, mut sample: ResMut<PointerSample>) {
    sample.moved = false;
    for e in ev_cursor.read() {
        sample.position = e.position;
        sample.seen = true;
        sample.moved = true;
    }
}

/// System: flag touch capability on the first touch
pub fn detect_touch(mut touches: MessageReader<TouchInput>, mut touch: ResMut<TouchCapability>) {
    if touches.read().next().is_some() && !touch.0 {
        info!("Touch input detected");
        touch.0 = true;
    }
}

/// Entities under `point`, sorted for stable event order
fn hits_at<'a>(
    point: Vec2,
    scroll: f32,
    hitboxes: impl Iterator<Item = (Entity, &'a Hitbox)>,
) -> Vec<(Entity, Rect, i32)> {
    let mut hits: Vec<_> = hitboxes
        .filter(|(_, hitbox)| hitbox.contains(point, scroll))
        .map(|(entity, hitbox)| (entity, hitbox.viewport_rect(scroll), hitbox.layer))
        .collect();
    hits.sort_by_key(|(entity, _, _)| *entity);
    hits
}

/// Only the top layer under the pointer receives hover and clicks
fn topmost(hits: &[(Entity, Rect, i32)]) -> impl Iterator<Item = &(Entity, Rect, i32)> {
    let top = hits.iter().map(|(_, _, layer)| *layer).max();
    hits.iter().filter(move |(_, _, layer)| Some(*layer) == top)
}

/// Hits on the top layer under `point`; lower layers are covered
fn hovered_at<'a>(
    point: Vec2,
    scroll: f32,
    hitboxes: impl Iterator<Item = (Entity, &'a Hitbox)>,
) -> Vec<(Entity, Rect, i32)> {
    let hits = hits_at(point, scroll, hitboxes);
    topmost(&hits).copied().collect()
}

fn event(kind: InteractionKind, entity: Entity, rect: Rect, pointer: Vec2) -> InteractionEvent {
    InteractionEvent {
        entity,
        kind,
        pointer,
        rect,
    }
}

/// System: hit-test interactive elements and emit enter/leave/move/click
pub fn emit_interactions(
    pointer: Res<PointerSample>,
    scroll: Res<SmoothScroll>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut touches: MessageReader<TouchInput>,
    hitboxes: Query<(Entity, &Hitbox)>,
    mut hovered: Local<BTreeSet<Entity>>,
    mut out: MessageWriter<InteractionEvent>,
) {
    let scroll = scroll.scroll();

    let hits = if pointer.seen {
        hovered_at(pointer.position, scroll, hitboxes.iter())
    } else {
        Vec::new()
    };
    let now: BTreeSet<Entity> = hits.iter().map(|(entity, _, _)| *entity).collect();

    for &entity in hovered.difference(&now) {
        let rect = hitboxes
            .get(entity)
            .map(|(_, hitbox)| hitbox.viewport_rect(scroll))
            .unwrap_or_default();
        out.write(event(InteractionKind::Leave, entity, rect, pointer.position));
    }

    for &(entity, rect, _) in &hits {
        if !hovered.contains(&entity) {
            out.write(event(InteractionKind::Enter, entity, rect, pointer.position));
        }
        if pointer.moved {
            out.write(event(InteractionKind::Move, entity, rect, pointer.position));
        }
    }

    if mouse_buttons.just_pressed(MouseButton::Left) {
        for &(entity, rect, _) in &hits {
            out.write(event(InteractionKind::Click, entity, rect, pointer.position));
        }
    }

    // Taps click whatever is under the finger, hover state is mouse-only
    for touch in touches.read() {
        if touch.phase != TouchPhase::Started {
            continue;
        }
        for (entity, rect, _) in hovered_at(touch.position, scroll, hitboxes.iter()) {
            out.write(event(InteractionKind::Click, entity, rect, touch.position));
        }
    }

    *hovered = now;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, x + w, y + h)
    }

    #[test]
    fn test_page_hitbox_scrolls_with_page() {
        let hitbox = Hitbox::new(rect(100.0, 1000.0, 200.0, 100.0), HitSpace::Page, 0);
        assert!(!hitbox.contains(Vec2::new(150.0, 1050.0), 500.0));
        assert!(hitbox.contains(Vec2::new(150.0, 550.0), 500.0));
    }

    #[test]
    fn test_viewport_hitbox_ignores_scroll() {
        let hitbox = Hitbox::new(rect(0.0, 0.0, 50.0, 50.0), HitSpace::Viewport, 10);
        assert!(hitbox.contains(Vec2::new(25.0, 25.0), 4000.0));
    }

    #[test]
    fn test_offset_moves_hit_area() {
        let mut hitbox = Hitbox::new(rect(0.0, 0.0, 50.0, 50.0), HitSpace::Viewport, 0);
        hitbox.offset = Vec2::new(100.0, 0.0);
        assert!(!hitbox.contains(Vec2::new(25.0, 25.0), 0.0));
        assert!(hitbox.contains(Vec2::new(125.0, 25.0), 0.0));
    }

    #[test]
    fn test_disabled_hitbox_never_hits() {
        let mut hitbox = Hitbox::new(rect(0.0, 0.0, 50.0, 50.0), HitSpace::Viewport, 0);
        hitbox.enabled = false;
        assert!(!hitbox.contains(Vec2::new(25.0, 25.0), 0.0));
    }

    #[test]
    fn test_topmost_keeps_highest_layer_only() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let hits = vec![
            (a, rect(0.0, 0.0, 10.0, 10.0), 10),
            (b, rect(0.0, 0.0, 10.0, 10.0), 20),
        ];
        let top: Vec<Entity> = topmost(&hits).map(|(e, _, _)| *e).collect();
        assert_eq!(top, vec![b]);
    }

    #[test]
    fn test_cover_layer_hides_page_hitboxes() {
        let mut world = World::new();
        let card = Hitbox::new(rect(100.0, 1000.0, 300.0, 200.0), HitSpace::Page, 0);
        let mut cover = Hitbox::new(rect(0.0, 0.0, 1280.0, 800.0), HitSpace::Viewport, 20);
        let card_id = world.spawn_empty().id();
        let cover_id = world.spawn_empty().id();

        // Pointer over the card at scroll 800
        let point = Vec2::new(150.0, 250.0);
        cover.enabled = false;
        let hits = hovered_at(point, 800.0, [(card_id, &card), (cover_id, &cover)].into_iter());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, card_id);

        cover.enabled = true;
        let hits = hovered_at(point, 800.0, [(card_id, &card), (cover_id, &cover)].into_iter());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, cover_id);
    }
}
