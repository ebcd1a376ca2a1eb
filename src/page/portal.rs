use std::f32::consts::TAU;

use bevy::prelude::*;

use super::{CONTENT_LEFT, SectionSlot, label, text_width};
use crate::camera::ViewportMetrics;
use crate::config::{PresentationConfig, SectionSpec};
use crate::scroll::{ScrollTrigger, SmoothScroll, TriggerGeometry};
use crate::ticker::FrameTicker;

const MARQUEE_FONT_SIZE: f32 = 96.0;
const PULSE_PERIOD: f32 = 2.0;
/// How quickly the pulse fades in and out, in intensity per second
const PULSE_FADE_RATE: f32 = 2.5;

fn section_geometry(slot: &SectionSlot, viewport_height: f32) -> TriggerGeometry {
    TriggerGeometry {
        element_top: slot.top,
        element_height: slot.height,
        viewport_height,
    }
}

/// Text sliding sideways by a share of its own width as the portal scrolls past
#[derive(Component, Debug, Clone)]
pub struct Marquee {
    trigger: ScrollTrigger,
    slot: SectionSlot,
    base_left: f32,
    width: f32,
    percent: f32,
}

impl Marquee {
    pub fn left(&self, scroll: f32, viewport_height: f32) -> f32 {
        let progress = self
            .trigger
            .progress(scroll, &section_geometry(&self.slot, viewport_height));
        self.base_left + self.percent / 100.0 * self.width * progress
    }
}

/// Background pulse while the portal is in the middle of the viewport
#[derive(Component, Debug, Clone)]
pub struct PortalPulse {
    trigger: ScrollTrigger,
    slot: SectionSlot,
    base: [f32; 3],
    pulse: [f32; 3],
    phase: f32,
    intensity: f32,
}

impl PortalPulse {
    pub fn is_pulsing(&self) -> bool {
        self.trigger.is_active()
    }

    /// Advance and return how far toward the pulse colour the background is
    pub fn step(&mut self, scroll: f32, viewport_height: f32, dt: f32) -> f32 {
        let geometry = section_geometry(&self.slot, viewport_height);
        let transitions = self.trigger.update(scroll, &geometry);
        if !transitions.is_empty() {
            debug!("Portal pulse {:?}", transitions);
        }

        let target = if self.is_pulsing() { 1.0 } else { 0.0 };
        let step = PULSE_FADE_RATE * dt;
        self.intensity += (target - self.intensity).clamp(-step, step);
        if self.intensity > 0.0 {
            self.phase = (self.phase + dt) % PULSE_PERIOD;
        } else {
            self.phase = 0.0;
        }

        self.intensity * (0.5 - 0.5 * (TAU * self.phase / PULSE_PERIOD).cos())
    }

    fn color(&self, mix: f32) -> Color {
        let [r, g, b] = std::array::from_fn(|i| self.base[i] + (self.pulse[i] - self.base[i]) * mix);
        Color::srgb(r, g, b)
    }
}

pub fn spawn_portal(
    commands: &mut Commands,
    section: Entity,
    slot: &SectionSlot,
    spec: &SectionSpec,
    config: &PresentationConfig,
) {
    let portal = &config.reveal.portal;
    commands.entity(section).insert(PortalPulse {
        trigger: ScrollTrigger::new(portal.pulse_start, portal.pulse_end),
        slot: *slot,
        base: spec.color,
        pulse: portal.pulse_color,
        phase: 0.0,
        intensity: 0.0,
    });

    for (row, text) in spec.items.iter().enumerate() {
        let top = slot.height * 0.5 - MARQUEE_FONT_SIZE * 0.6 + row as f32 * MARQUEE_FONT_SIZE * 1.2;
        commands.spawn((
            Marquee {
                trigger: ScrollTrigger::new(portal.marquee_start, portal.marquee_end),
                slot: *slot,
                base_left: CONTENT_LEFT,
                width: text_width(text, MARQUEE_FONT_SIZE),
                percent: portal.marquee_percent,
            },
            label(text, MARQUEE_FONT_SIZE, Color::WHITE, CONTENT_LEFT, top),
            ChildOf(section),
        ));
    }
}

/// System: scrub marquee text against the scroll
pub fn scrub_marquee(
    scroll: Res<SmoothScroll>,
    metrics: Res<ViewportMetrics>,
    mut marquees: Query<(&Marquee, &mut Node)>,
) {
    for (marquee, mut node) in &mut marquees {
        node.left = Val::Px(marquee.left(scroll.scroll(), metrics.height));
    }
}

/// System: pulse the portal background while its trigger is active
pub fn pulse_portal(
    ticker: Res<FrameTicker>,
    scroll: Res<SmoothScroll>,
    metrics: Res<ViewportMetrics>,
    mut portals: Query<(&mut PortalPulse, &mut BackgroundColor)>,
) {
    for (mut pulse, mut background) in &mut portals {
        let mix = pulse.step(scroll.scroll(), metrics.height, ticker.delta_secs());
        background.0 = pulse.color(mix);
    }
}
