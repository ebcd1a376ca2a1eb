use bevy::prelude::*;

use super::{CONTENT_LEFT, CONTENT_TOP, SectionSlot, label, rgb};
use crate::anim::{Placement, Timeline, Tween};
use crate::camera::ViewportMetrics;
use crate::config::{PresentationConfig, SectionReveal, SectionSpec};
use crate::scroll::{ScrollTrigger, SmoothScroll, ToggleActions, TriggerGeometry, TriggerPosition};
use crate::ticker::FrameTicker;

const INSIGHT_CARD_WIDTH: f32 = 320.0;
const INSIGHT_CARD_HEIGHT: f32 = 220.0;
const INSIGHT_CARD_GAP: f32 = 32.0;

/// A scroll trigger playing a timeline of reveal entries
#[derive(Component, Debug, Clone)]
pub struct RevealDriver {
    trigger: ScrollTrigger,
    actions: ToggleActions,
    pub timeline: Timeline,
    /// Trigger element in page pixels
    top: f32,
    height: f32,
}

impl RevealDriver {
    pub fn new(
        start: TriggerPosition,
        end: TriggerPosition,
        actions: ToggleActions,
        timeline: Timeline,
        top: f32,
        height: f32,
    ) -> Self {
        Self {
            trigger: ScrollTrigger::new(start, end),
            actions,
            timeline,
            top,
            height,
        }
    }

    /// Apply toggle actions for whatever the scroll crossed, then advance the timeline
    pub fn step(&mut self, scroll: f32, viewport_height: f32, dt: f32) {
        let geometry = TriggerGeometry {
            element_top: self.top,
            element_height: self.height,
            viewport_height,
        };
        for &transition in self.trigger.update(scroll, &geometry) {
            self.actions.action_for(transition).apply(&mut self.timeline);
        }
        self.timeline.advance(dt);
    }
}

/// Element that fades up from `offset_y` below its resting place as its
/// timeline entry plays
#[derive(Component, Debug, Clone, Copy)]
pub struct Revealed {
    pub driver: Entity,
    pub entry: usize,
    pub base_top: f32,
    pub offset_y: f32,
    pub veil: Entity,
}

/// Section-coloured cover whose alpha stands in for the element's opacity
#[derive(Component)]
pub struct Veil;

fn veil(color: Color) -> impl Bundle {
    (
        Veil,
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(0.0),
            top: Val::Px(0.0),
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(color),
        ZIndex(10),
    )
}

/// Section reveal: the section's content fades up when the section scrolls in.
/// Returns the content container to put the section's own elements in.
pub fn spawn_section_reveal(
    commands: &mut Commands,
    section: Entity,
    slot: &SectionSlot,
    spec: &SectionSpec,
    reveal: &SectionReveal,
) -> Entity {
    let mut timeline = Timeline::paused();
    let entry = timeline.add(Tween::new(reveal.duration, reveal.ease), Placement::At(0.0));
    commands.entity(section).insert(RevealDriver::new(
        reveal.start,
        reveal.end,
        reveal.toggle_actions,
        timeline,
        slot.top,
        slot.height,
    ));

    let content = commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(reveal.offset_y),
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            ChildOf(section),
        ))
        .id();
    let cover = commands.spawn((veil(rgb(spec.color)), ChildOf(content))).id();
    commands.entity(content).insert(Revealed {
        driver: section,
        entry,
        base_top: 0.0,
        offset_y: reveal.offset_y,
        veil: cover,
    });
    content
}

/// Insights: cards reveal one after another once their container scrolls in
pub fn spawn_insights(
    commands: &mut Commands,
    section: Entity,
    slot: &SectionSlot,
    spec: &SectionSpec,
    config: &PresentationConfig,
) {
    let reveal = &config.reveal.insights;

    commands.spawn((
        label(&spec.title, 48.0, Color::WHITE, CONTENT_LEFT, 60.0),
        ChildOf(section),
    ));

    let mut timeline = Timeline::paused();
    let entries = timeline.add_staggered(
        spec.items.len(),
        Tween::new(reveal.duration, reveal.ease),
        reveal.stagger,
        Placement::At(0.0),
    );
    commands.entity(section).insert(RevealDriver::new(
        reveal.start,
        reveal.end,
        reveal.toggle_actions,
        timeline,
        slot.top + CONTENT_TOP,
        INSIGHT_CARD_HEIGHT,
    ));

    for ((i, item), entry) in spec.items.iter().enumerate().zip(entries) {
        let card = commands
            .spawn((
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(CONTENT_LEFT + i as f32 * (INSIGHT_CARD_WIDTH + INSIGHT_CARD_GAP)),
                    top: Val::Px(CONTENT_TOP + reveal.offset_y),
                    width: Val::Px(INSIGHT_CARD_WIDTH),
                    height: Val::Px(INSIGHT_CARD_HEIGHT),
                    ..default()
                },
                BackgroundColor(Color::srgb(0.12, 0.12, 0.16)),
                ChildOf(section),
            ))
            .id();
        commands.spawn((label(item, 22.0, Color::WHITE, 24.0, 24.0), ChildOf(card)));
        let cover = commands.spawn((veil(rgb(spec.color)), ChildOf(card))).id();
        commands.entity(card).insert(Revealed {
            driver: section,
            entry,
            base_top: CONTENT_TOP,
            offset_y: reveal.offset_y,
            veil: cover,
        });
    }
}

/// System: run every reveal trigger against the current scroll
pub fn drive_reveals(
    ticker: Res<FrameTicker>,
    scroll: Res<SmoothScroll>,
    metrics: Res<ViewportMetrics>,
    mut drivers: Query<&mut RevealDriver>,
) {
    let dt = ticker.delta_secs();
    for mut driver in &mut drivers {
        driver.step(scroll.scroll(), metrics.height, dt);
    }
}

/// System: move and unveil revealed elements from their timeline progress
pub fn apply_reveals(
    drivers: Query<&RevealDriver>,
    mut revealed: Query<(&Revealed, &mut Node)>,
    mut veils: Query<&mut BackgroundColor, With<Veil>>,
) {
    for (reveal, mut node) in &mut revealed {
        let Ok(driver) = drivers.get(reveal.driver) else {
            continue;
        };
        let progress = driver.timeline.progress(reveal.entry);
        node.top = Val::Px(reveal.base_top + reveal.offset_y * (1.0 - progress));
        if let Ok(mut cover) = veils.get_mut(reveal.veil) {
            cover.0 = cover.0.with_alpha(1.0 - progress);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section_driver() -> RevealDriver {
        let reveal = PresentationConfig::default().reveal.sections;
        let mut timeline = Timeline::paused();
        timeline.add(Tween::new(reveal.duration, reveal.ease), Placement::At(0.0));
        RevealDriver::new(
            reveal.start,
            reveal.end,
            reveal.toggle_actions,
            timeline,
            1000.0,
            600.0,
        )
    }

    #[test]
    fn test_hidden_until_trigger_start() {
        let mut driver = section_driver();
        // top 80% of an 800px viewport: starts at 1000 - 640 = 360
        driver.step(300.0, 800.0, 1.0);
        assert_eq!(driver.timeline.progress(0), 0.0);
    }

    #[test]
    fn test_plays_on_enter_and_reverses_on_leave_back() {
        let mut driver = section_driver();
        driver.step(400.0, 800.0, 0.0);
        for _ in 0..70 {
            driver.step(400.0, 800.0, 1.0 / 60.0);
        }
        assert!((driver.timeline.progress(0) - 1.0).abs() < 1e-4);

        driver.step(0.0, 800.0, 0.0);
        for _ in 0..70 {
            driver.step(0.0, 800.0, 1.0 / 60.0);
        }
        assert_eq!(driver.timeline.progress(0), 0.0);
    }

    #[test]
    fn test_leaving_forward_keeps_revealed() {
        let mut driver = section_driver();
        driver.step(400.0, 800.0, 2.0);
        // Past "top 20%" (1000 - 160 = 840): leave action is none
        driver.step(2000.0, 800.0, 2.0);
        assert!((driver.timeline.progress(0) - 1.0).abs() < 1e-4);
    }
}
