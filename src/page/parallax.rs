use bevy::prelude::*;

use super::{CONTENT_LEFT, CONTENT_TOP, SectionSlot, label};
use crate::camera::ViewportMetrics;
use crate::config::{ParallaxConfig, PresentationConfig, SectionSpec};
use crate::scroll::{ScrollTrigger, SmoothScroll, TriggerGeometry};

/// The media element is this much taller than its section so the drift never shows an edge
const MEDIA_OVERSCAN: f32 = 1.3;

/// Element drifting down by a share of its own height while its section
/// scrolls through the viewport
#[derive(Component, Debug, Clone)]
pub struct Parallax {
    trigger: ScrollTrigger,
    section_top: f32,
    section_height: f32,
    element_height: f32,
    base_top: f32,
    desktop_percent: f32,
    mobile_percent: f32,
    breakpoint: f32,
}

impl Parallax {
    pub fn new(config: &ParallaxConfig, slot: &SectionSlot, element_height: f32) -> Self {
        Self {
            trigger: ScrollTrigger::new(config.start, config.end),
            section_top: slot.top,
            section_height: slot.height,
            element_height,
            base_top: -config.desktop_percent / 100.0 * element_height,
            desktop_percent: config.desktop_percent,
            mobile_percent: config.mobile_percent,
            breakpoint: config.breakpoint,
        }
    }

    /// Drift in pixels at this scroll offset
    pub fn offset(&self, scroll: f32, viewport: &ViewportMetrics) -> f32 {
        let geometry = TriggerGeometry {
            element_top: self.section_top,
            element_height: self.section_height,
            viewport_height: viewport.height,
        };
        let percent = if viewport.is_narrower_than(self.breakpoint) {
            self.mobile_percent
        } else {
            self.desktop_percent
        };
        percent / 100.0 * self.element_height * self.trigger.progress(scroll, &geometry)
    }
}

pub fn spawn_visual_hook(
    commands: &mut Commands,
    content: Entity,
    slot: &SectionSlot,
    spec: &SectionSpec,
    config: &PresentationConfig,
) {
    let parallax = Parallax::new(&config.reveal.visual_hook, slot, slot.height * MEDIA_OVERSCAN);
    let [r, g, b] = spec.color;

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(0.0),
            top: Val::Px(parallax.base_top),
            width: Val::Percent(100.0),
            height: Val::Px(parallax.element_height),
            ..default()
        },
        BackgroundColor(Color::srgb(r * 3.0 + 0.05, g * 3.0 + 0.08, b * 3.0 + 0.15)),
        parallax,
        ChildOf(content),
    ));

    if !spec.title.is_empty() {
        commands.spawn((
            label(&spec.title, 56.0, Color::WHITE, CONTENT_LEFT, CONTENT_TOP),
            ZIndex(1),
            ChildOf(content),
        ));
    }
}

/// System: scrub parallax elements against the scroll
pub fn scrub_parallax(
    scroll: Res<SmoothScroll>,
    metrics: Res<ViewportMetrics>,
    mut elements: Query<(&Parallax, &mut Node)>,
) {
    for (parallax, mut node) in &mut elements {
        node.top = Val::Px(parallax.base_top + parallax.offset(scroll.scroll(), &metrics));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hook() -> Parallax {
        let config = PresentationConfig::default().reveal.visual_hook;
        let slot = SectionSlot {
            kind: crate::config::SectionKind::VisualHook,
            top: 2000.0,
            height: 700.0,
        };
        Parallax::new(&config, &slot, 1000.0)
    }

    fn viewport(width: f32) -> ViewportMetrics {
        ViewportMetrics {
            width,
            height: 800.0,
        }
    }

    #[test]
    fn test_scrub_spans_full_pass_through_viewport() {
        let hook = hook();
        // "top bottom" = 2000 - 800, "bottom top" = 2700
        assert_eq!(hook.offset(1200.0, &viewport(1280.0)), 0.0);
        assert!((hook.offset(1950.0, &viewport(1280.0)) - 100.0).abs() < 1e-3);
        assert!((hook.offset(2700.0, &viewport(1280.0)) - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_narrow_viewport_drifts_less() {
        let hook = hook();
        assert!((hook.offset(5000.0, &viewport(600.0)) - 100.0).abs() < 1e-3);
    }
}
