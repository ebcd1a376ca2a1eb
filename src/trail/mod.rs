//! Custom cursor: an eased follower plus a chain of trailing dots.

pub mod interpolator;

use std::collections::BTreeSet;

use bevy::prelude::*;

use crate::camera::ViewportMetrics;
use crate::config::PresentationConfig;
use crate::input::{PointerSample, TouchCapability};
use crate::presentation::{PresentationSet, PresentationStartup};
use crate::ticker::FrameTicker;

pub use interpolator::{TrailInterpolator, ease_fraction};

pub struct TrailPlugin;

impl Plugin for TrailPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CursorHover>()
            .add_systems(Startup, init_trail.in_set(PresentationStartup::Features))
            .add_systems(
                Update,
                (
                    apply_touch_mode.in_set(PresentationSet::Pointer),
                    tick_trail
                        .in_set(PresentationSet::Animate)
                        .run_if(resource_exists::<TrailState>),
                    render_trail
                        .in_set(PresentationSet::Render)
                        .run_if(resource_exists::<TrailState>),
                ),
            );
    }
}

/// Per-frame rate at which the cursor grows/shrinks on hover
const HOVER_SCALE_RATE: f32 = 0.2;

/// The primary cursor element
#[derive(Component)]
pub struct CursorFollower;

/// Parent of the trailing dots
#[derive(Component)]
pub struct TrailContainer;

#[derive(Component, Debug, Clone, Copy)]
pub struct TrailDot {
    pub index: usize,
}

/// Hover targets currently under the pointer; the cursor grows while any are
#[derive(Resource, Debug, Default)]
pub struct CursorHover {
    over: BTreeSet<Entity>,
}

impl CursorHover {
    pub fn set(&mut self, entity: Entity, hovered: bool) {
        if hovered {
            self.over.insert(entity);
        } else {
            self.over.remove(&entity);
        }
    }

    pub fn is_active(&self) -> bool {
        !self.over.is_empty()
    }
}

/// Everything the running trail owns. Present only while the feature is live.
#[derive(Resource, Debug)]
pub struct TrailState {
    pub interpolator: TrailInterpolator,
    cursor: Entity,
    dots: Vec<Entity>,
    cursor_size: f32,
    dot_size: f32,
    active_scale: f32,
    /// Displayed cursor scale, eased toward 1 or `active_scale`
    hover_scale: f32,
}

impl TrailState {
    /// Build the trail and spawn its dots, or `None` when the page has no
    /// cursor element or no trail container.
    pub fn init(
        commands: &mut Commands,
        config: &PresentationConfig,
        cursor: Option<Entity>,
        container: Option<Entity>,
    ) -> Option<Self> {
        let (Some(cursor), Some(container)) = (cursor, container) else {
            info!("Cursor trail disabled: cursor element or trail container missing");
            return None;
        };

        let trail = &config.trail;
        let [r, g, b, a] = trail.dot_color;
        let dots = (0..trail.length)
            .map(|index| {
                commands
                    .spawn((
                        TrailDot { index },
                        Node {
                            position_type: PositionType::Absolute,
                            ..default()
                        },
                        BackgroundColor(Color::srgba(r, g, b, a)),
                        ChildOf(container),
                    ))
                    .id()
            })
            .collect();

        info!("Cursor trail initialised with {} nodes", trail.length);
        Some(Self {
            interpolator: TrailInterpolator::from_config(trail),
            cursor,
            dots,
            cursor_size: trail.cursor_size,
            dot_size: trail.dot_size,
            active_scale: trail.active_scale,
            hover_scale: 1.0,
        })
    }

    /// Despawn the dots; the caller removes the resource
    pub fn teardown(&self, commands: &mut Commands) {
        for &dot in &self.dots {
            commands.entity(dot).despawn();
        }
        info!("Cursor trail torn down");
    }
}

/// Center a square node of `size` on `center`
fn place(node: &mut Node, center: Vec2, size: f32) {
    node.left = Val::Px(center.x - size * 0.5);
    node.top = Val::Px(center.y - size * 0.5);
    node.width = Val::Px(size);
    node.height = Val::Px(size);
}

/// System: create the trail once the page has spawned its cursor layer
pub fn init_trail(
    mut commands: Commands,
    config: Res<PresentationConfig>,
    cursors: Query<Entity, With<CursorFollower>>,
    containers: Query<Entity, With<TrailContainer>>,
) {
    let cursor = cursors.iter().next();
    let container = containers.iter().next();
    if let Some(state) = TrailState::init(&mut commands, &config, cursor, container) {
        commands.insert_resource(state);
    }
}

/// System: one interpolation step per frame
pub fn tick_trail(
    ticker: Res<FrameTicker>,
    pointer: Res<PointerSample>,
    hover: Res<CursorHover>,
    mut state: ResMut<TrailState>,
) {
    let r = ticker.delta_ratio();
    state.interpolator.tick(pointer.position, r);

    let target = if hover.is_active() { state.active_scale } else { 1.0 };
    let blend = ease_fraction(HOVER_SCALE_RATE, r);
    state.hover_scale += (target - state.hover_scale) * blend;
}

/// System: write interpolated positions to the cursor and dot nodes
pub fn render_trail(
    state: Res<TrailState>,
    mut cursors: Query<&mut Node, (With<CursorFollower>, Without<TrailDot>)>,
    mut dots: Query<(&TrailDot, &mut Node), Without<CursorFollower>>,
) {
    let trail = &state.interpolator;

    if let Ok(mut node) = cursors.get_mut(state.cursor) {
        place(&mut node, trail.cursor(), state.cursor_size * state.hover_scale);
    }

    for (dot, mut node) in &mut dots {
        let Some(trail_node) = trail.nodes().get(dot.index) else {
            continue;
        };
        let size = state.dot_size * trail.node_scale(dot.index);
        place(&mut node, trail_node.position, size);
    }
}

/// System: hide the custom cursor on narrow touch screens and bring it back otherwise
pub fn apply_touch_mode(
    mut commands: Commands,
    config: Res<PresentationConfig>,
    touch: Res<TouchCapability>,
    metrics: Res<ViewportMetrics>,
    state: Option<Res<TrailState>>,
    mut layers: Query<
        (Entity, &mut Node, Has<CursorFollower>),
        Or<(With<CursorFollower>, With<TrailContainer>)>,
    >,
    mut hidden_before: Local<Option<bool>>,
) {
    let hidden = touch.0 && metrics.is_narrower_than(config.device.touch_breakpoint);
    if *hidden_before == Some(hidden) {
        return;
    }
    let first_run = hidden_before.is_none();
    *hidden_before = Some(hidden);

    let display = if hidden { Display::None } else { Display::Flex };
    for (_, mut node, _) in &mut layers {
        node.display = display;
    }

    if hidden {
        if let Some(state) = state {
            state.teardown(&mut commands);
            commands.remove_resource::<TrailState>();
        }
        info!("Touch device narrower than {}px: custom cursor hidden", config.device.touch_breakpoint);
    } else if !first_run && state.is_none() {
        let cursor = layers.iter().find(|(_, _, is_cursor)| *is_cursor).map(|(e, _, _)| e);
        let container = layers.iter().find(|(_, _, is_cursor)| !*is_cursor).map(|(e, _, _)| e);
        if let Some(state) = TrailState::init(&mut commands, &config, cursor, container) {
            commands.insert_resource(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_centers_node() {
        let mut node = Node::default();
        place(&mut node, Vec2::new(100.0, 50.0), 20.0);
        assert_eq!(node.left, Val::Px(90.0));
        assert_eq!(node.top, Val::Px(40.0));
        assert_eq!(node.width, Val::Px(20.0));
    }

    #[test]
    fn test_hover_stays_active_until_last_target_left() {
        let mut world = World::new();
        let link = world.spawn_empty().id();
        let button = world.spawn_empty().id();

        let mut hover = CursorHover::default();
        hover.set(link, true);
        hover.set(button, true);
        hover.set(link, false);
        assert!(hover.is_active());
        hover.set(button, false);
        assert!(!hover.is_active());
    }
}
