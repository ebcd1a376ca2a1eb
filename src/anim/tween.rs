use bevy::math::Vec2;

use super::easing::Ease;

/// Duration + ease: maps elapsed seconds to eased progress in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub duration: f32,
    pub ease: Ease,
}

impl Tween {
    pub fn new(duration: f32, ease: Ease) -> Self {
        Self { duration, ease }
    }

    /// Eased progress `elapsed` seconds after the tween started
    pub fn progress_at(&self, elapsed: f32) -> f32 {
        if self.duration <= 0.0 {
            return if elapsed >= 0.0 { 1.0 } else { 0.0 };
        }
        self.ease.apply((elapsed / self.duration).clamp(0.0, 1.0))
    }
}

/// A 2D value that tweens toward a target and can be retargeted mid-flight.
///
/// Retargeting restarts from wherever the value currently is, so a rapid
/// stream of retargets (one per pointer move) never jumps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2Tween {
    from: Vec2,
    to: Vec2,
    elapsed: f32,
    tween: Tween,
}

impl Vec2Tween {
    pub fn at_rest(value: Vec2) -> Self {
        Self {
            from: value,
            to: value,
            elapsed: 0.0,
            tween: Tween::new(0.0, Ease::Linear),
        }
    }

    pub fn retarget(&mut self, to: Vec2, tween: Tween) {
        self.from = self.value();
        self.to = to;
        self.elapsed = 0.0;
        self.tween = tween;
    }

    pub fn advance(&mut self, dt: f32) {
        if !self.is_finished() {
            self.elapsed += dt;
        }
    }

    pub fn value(&self) -> Vec2 {
        let t = self.tween.progress_at(self.elapsed);
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.tween.duration
    }
}

impl Default for Vec2Tween {
    fn default() -> Self {
        Self::at_rest(Vec2::ZERO)
    }
}
