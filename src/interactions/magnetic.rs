use bevy::prelude::*;

use super::{Reaction, ReactionEvent};
use crate::anim::{Tween, Vec2Tween};
use crate::config::{MagneticConfig, PresentationConfig};
use crate::input::Hitbox;
use crate::ticker::FrameTicker;

/// Element that leans toward the pointer while hovered and springs back on leave
#[derive(Component, Debug, Clone)]
pub struct Magnetic {
    /// Resting `left`/`top` of the node in pixels
    pub base: Vec2,
    pub offset: Vec2Tween,
}

impl Magnetic {
    pub fn new(base: Vec2) -> Self {
        Self {
            base,
            offset: Vec2Tween::default(),
        }
    }

    /// Lean toward `pointer`. `rect` is the element's current (displaced) viewport rect.
    pub fn pull(&mut self, pointer: Vec2, rect: Rect, config: &MagneticConfig) {
        let target = (pointer - rect.center()) * config.strength;
        self.offset
            .retarget(target, Tween::new(config.pull_duration, config.pull_ease));
    }

    pub fn release(&mut self, config: &MagneticConfig) {
        self.offset.retarget(
            Vec2::ZERO,
            Tween::new(config.release_duration, config.release_ease),
        );
    }
}

/// System: start pull/release tweens from dispatched reactions
pub fn react_magnetic(
    config: Res<PresentationConfig>,
    mut reactions: MessageReader<ReactionEvent>,
    mut magnets: Query<&mut Magnetic>,
) {
    for event in reactions.read() {
        let Ok(mut magnet) = magnets.get_mut(event.entity) else {
            continue;
        };
        match event.reaction {
            Reaction::MagneticPull => {
                magnet.pull(event.source.pointer, event.source.rect, &config.magnetic)
            }
            Reaction::MagneticRelease => magnet.release(&config.magnetic),
            _ => {}
        }
    }
}

/// System: advance magnetic offsets and move the node (and its hit area) with them
pub fn animate_magnetic(
    ticker: Res<FrameTicker>,
    mut magnets: Query<(&mut Magnetic, &mut Node, Option<&mut Hitbox>)>,
) {
    let dt = ticker.delta_secs();
    for (mut magnet, mut node, hitbox) in &mut magnets {
        if magnet.offset.is_finished() {
            continue;
        }
        magnet.offset.advance(dt);

        let offset = magnet.offset.value();
        let position = magnet.base + offset;
        node.left = Val::Px(position.x);
        node.top = Val::Px(position.y);
        if let Some(mut hitbox) = hitbox {
            hitbox.offset = offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(magnet: &mut Magnetic) {
        for _ in 0..120 {
            magnet.offset.advance(1.0 / 60.0);
        }
    }

    #[test]
    fn test_pull_is_fraction_of_pointer_offset() {
        let config = MagneticConfig::default();
        let mut magnet = Magnetic::new(Vec2::new(1000.0, 20.0));
        let rect = Rect::new(1000.0, 20.0, 1120.0, 60.0);

        // 40px right of and 10px below the center
        magnet.pull(Vec2::new(1100.0, 50.0), rect, &config);
        settle(&mut magnet);

        let offset = magnet.offset.value();
        assert!((offset.x - 12.0).abs() < 1e-3);
        assert!((offset.y - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_repeated_pull_settles_short_of_full_strength() {
        let config = MagneticConfig::default();
        let mut magnet = Magnetic::new(Vec2::ZERO);
        let rest = Rect::new(0.0, 0.0, 100.0, 100.0);
        let pointer = Vec2::new(90.0, 50.0);

        // Each move reports the rect where it is currently drawn
        for _ in 0..60 {
            let offset = magnet.offset.value();
            let drawn = Rect::from_corners(rest.min + offset, rest.max + offset);
            magnet.pull(pointer, drawn, &config);
            settle(&mut magnet);
        }

        let expected = 40.0 * config.strength / (1.0 + config.strength);
        let offset = magnet.offset.value();
        assert!((offset.x - expected).abs() < 1e-2);
        assert!(offset.y.abs() < 1e-3);
    }

    #[test]
    fn test_release_returns_to_rest() {
        let config = MagneticConfig::default();
        let mut magnet = Magnetic::new(Vec2::ZERO);
        magnet.pull(Vec2::new(200.0, 0.0), Rect::new(0.0, 0.0, 100.0, 100.0), &config);
        settle(&mut magnet);
        assert!(magnet.offset.value().x > 0.0);

        magnet.release(&config);
        settle(&mut magnet);
        assert!(magnet.offset.value().length() < 1e-3);
    }
}
