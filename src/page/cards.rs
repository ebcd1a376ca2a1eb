use std::f32::consts::TAU;

use bevy::prelude::*;

use super::{CONTENT_LEFT, CONTENT_TOP, SectionSlot, label};
use crate::anim::{Tween, Vec2Tween};
use crate::config::{CardConfig, PresentationConfig, SectionSpec};
use crate::input::{HitSpace, Hitbox};
use crate::interactions::{Capabilities, Capability, Reaction, ReactionEvent};
use crate::ticker::FrameTicker;

const CARD_WIDTH: f32 = 300.0;
const CARD_HEIGHT: f32 = 360.0;
const CARD_GAP: f32 = 32.0;
/// Cards start below the section title
const CARDS_TOP: f32 = CONTENT_TOP + 100.0;

#[derive(Component, Debug, Clone, Copy)]
pub struct ServiceCard {
    pub glow: Entity,
}

/// Gentle vertical bob, started after a per-card delay
#[derive(Component, Debug, Clone, Copy)]
pub struct FloatingCard {
    base_top: f32,
    delay: f32,
    period: f32,
    amplitude: f32,
    elapsed: f32,
}

impl FloatingCard {
    pub fn new(index: usize, base_top: f32, config: &CardConfig) -> Self {
        Self {
            base_top,
            delay: index as f32 * config.float_delay_step,
            period: config.float_period,
            amplitude: config.float_amplitude,
            elapsed: 0.0,
        }
    }

    /// Current lift in pixels (negative is up)
    pub fn offset(&self) -> f32 {
        let t = self.elapsed - self.delay;
        if t <= 0.0 || self.period <= 0.0 {
            return 0.0;
        }
        -self.amplitude * (0.5 - 0.5 * (TAU * t / self.period).cos())
    }
}

/// Soft light spot that follows the pointer inside a card
#[derive(Component, Debug, Clone)]
pub struct GlowSpot {
    pub position: Vec2Tween,
    size: f32,
}

pub fn spawn_services(
    commands: &mut Commands,
    content: Entity,
    slot: &SectionSlot,
    spec: &SectionSpec,
    config: &PresentationConfig,
) {
    let cards = &config.cards;

    commands.spawn((
        label(&spec.title, 48.0, Color::WHITE, CONTENT_LEFT, CONTENT_TOP),
        ChildOf(content),
    ));

    for (index, item) in spec.items.iter().enumerate() {
        let left = CONTENT_LEFT + index as f32 * (CARD_WIDTH + CARD_GAP);
        let page_rect = Rect::new(
            left,
            slot.top + CARDS_TOP,
            left + CARD_WIDTH,
            slot.top + CARDS_TOP + CARD_HEIGHT,
        );
        let center = Vec2::new(CARD_WIDTH, CARD_HEIGHT) * 0.5;

        let card = commands
            .spawn((
                Name::new(format!("Service card {item}")),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(left),
                    top: Val::Px(CARDS_TOP),
                    width: Val::Px(CARD_WIDTH),
                    height: Val::Px(CARD_HEIGHT),
                    overflow: Overflow::clip(),
                    ..default()
                },
                BackgroundColor(Color::srgb(0.11, 0.11, 0.15)),
                FloatingCard::new(index, CARDS_TOP, cards),
                Hitbox::new(page_rect, HitSpace::Page, 0),
                Capabilities::new(&[Capability::CursorHover, Capability::CardGlow]),
                ChildOf(content),
            ))
            .id();

        let glow = commands
            .spawn((
                GlowSpot {
                    position: Vec2Tween::at_rest(center),
                    size: cards.glow_size,
                },
                Node {
                    position_type: PositionType::Absolute,
                    ..default()
                },
                BackgroundColor(Color::srgba(0.6, 0.7, 1.0, 0.08)),
                ChildOf(card),
            ))
            .id();
        commands.entity(card).insert(ServiceCard { glow });

        commands.spawn((label(item, 26.0, Color::WHITE, 28.0, 28.0), ChildOf(card)));
    }
}

/// System: bob the cards and keep their hit areas on them
pub fn float_cards(
    ticker: Res<FrameTicker>,
    mut cards: Query<(&mut FloatingCard, &mut Node, &mut Hitbox)>,
) {
    let dt = ticker.delta_secs();
    for (mut card, mut node, mut hitbox) in &mut cards {
        card.elapsed += dt;
        let offset = card.offset();
        node.top = Val::Px(card.base_top + offset);
        hitbox.offset.y = offset;
    }
}

/// System: send the glow spot toward the pointer's card-local position
pub fn react_card_glow(
    config: Res<PresentationConfig>,
    mut reactions: MessageReader<ReactionEvent>,
    cards: Query<&ServiceCard>,
    mut glows: Query<&mut GlowSpot>,
) {
    for event in reactions.read() {
        if event.reaction != Reaction::CardGlow {
            continue;
        }
        let Ok(card) = cards.get(event.entity) else {
            continue;
        };
        if let Ok(mut glow) = glows.get_mut(card.glow) {
            let tween = Tween::new(config.cards.glow_duration, config.cards.glow_ease);
            glow.position.retarget(event.source.local(), tween);
        }
    }
}

pub fn animate_card_glow(ticker: Res<FrameTicker>, mut glows: Query<(&mut GlowSpot, &mut Node)>) {
    let dt = ticker.delta_secs();
    for (mut glow, mut node) in &mut glows {
        glow.position.advance(dt);
        let center = glow.position.value();
        node.left = Val::Px(center.x - glow.size * 0.5);
        node.top = Val::Px(center.y - glow.size * 0.5);
        node.width = Val::Px(glow.size);
        node.height = Val::Px(glow.size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cards_start_floating_in_turn() {
        let config = CardConfig::default();
        let mut cards: Vec<FloatingCard> =
            (0..3).map(|i| FloatingCard::new(i, 0.0, &config)).collect();
        for card in &mut cards {
            card.elapsed = 0.75;
        }
        assert!(cards[0].offset() < 0.0);
        assert!(cards[1].offset() < 0.0);
        assert_eq!(cards[2].offset(), 0.0);
    }

    #[test]
    fn test_float_stays_within_amplitude() {
        let config = CardConfig::default();
        let mut card = FloatingCard::new(0, 0.0, &config);
        for _ in 0..600 {
            card.elapsed += 1.0 / 60.0;
            let offset = card.offset();
            assert!(offset <= 0.0 && offset >= -config.float_amplitude - 1e-4);
        }
    }

    #[test]
    fn test_peak_lift_at_half_period() {
        let config = CardConfig::default();
        let mut card = FloatingCard::new(0, 0.0, &config);
        card.elapsed = config.float_period * 0.5;
        assert!((card.offset() + config.float_amplitude).abs() < 1e-4);
    }
}
