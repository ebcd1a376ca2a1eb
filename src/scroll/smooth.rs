use bevy::prelude::*;

use crate::anim::Ease;
use crate::config::SmoothScrollConfig;

/// Eased page scroll.
///
/// Wheel input moves a target offset; the visible offset glides from wherever
/// it is to the target over `duration` seconds along the smooth-scroll curve.
/// Touch drags move the page 1:1 with the finger unless `smooth_touch` is
/// set, in which case they glide like the wheel, scaled by the touch multiplier.
#[derive(Resource, Debug, Clone)]
pub struct SmoothScroll {
    duration: f32,
    ease: Ease,
    wheel_multiplier: f32,
    touch_multiplier: f32,
    smooth_touch: bool,
    line_height: f32,

    animated: f32,
    target: f32,
    from: f32,
    elapsed: f32,
    animating: bool,
    limit: f32,
    stopped: bool,
}

impl SmoothScroll {
    pub fn new(config: &SmoothScrollConfig) -> Self {
        Self {
            duration: config.duration,
            ease: Ease::SmoothScroll,
            wheel_multiplier: config.wheel_multiplier,
            touch_multiplier: config.touch_multiplier,
            smooth_touch: config.smooth_touch,
            line_height: config.line_height,
            animated: 0.0,
            target: 0.0,
            from: 0.0,
            elapsed: 0.0,
            animating: false,
            limit: 0.0,
            stopped: false,
        }
    }

    /// Current visible scroll offset in pixels
    pub fn scroll(&self) -> f32 {
        self.animated
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn limit(&self) -> f32 {
        self.limit
    }

    /// Maximum scroll offset (page height minus viewport height)
    pub fn set_limit(&mut self, limit: f32) {
        self.limit = limit.max(0.0);
        self.target = self.target.clamp(0.0, self.limit);
        self.animated = self.animated.clamp(0.0, self.limit);
        self.from = self.from.clamp(0.0, self.limit);
    }

    /// Wheel delta in lines (`pixels == false`) or pixels, positive = scroll down
    pub fn on_wheel(&mut self, delta: f32, pixels: bool) {
        let delta = if pixels { delta } else { delta * self.line_height };
        self.scroll_to_eased(self.target + delta * self.wheel_multiplier);
    }

    /// Finger drag in pixels, positive = scroll down
    pub fn on_touch_drag(&mut self, delta: f32) {
        if self.smooth_touch {
            self.scroll_to_eased(self.target + delta * self.touch_multiplier);
        } else {
            // Native touch scrolling: the page follows the finger 1:1
            self.jump_to(self.target + delta);
        }
    }

    pub fn scroll_to_eased(&mut self, target: f32) {
        if self.stopped {
            return;
        }
        self.target = target.clamp(0.0, self.limit);
        self.from = self.animated;
        self.elapsed = 0.0;
        self.animating = true;
    }

    pub fn jump_to(&mut self, target: f32) {
        if self.stopped {
            return;
        }
        self.target = target.clamp(0.0, self.limit);
        self.animated = self.target;
        self.animating = false;
    }

    pub fn advance(&mut self, dt: f32) {
        if !self.animating {
            return;
        }
        self.elapsed += dt;
        let t = if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.animated = self.from + (self.target - self.from) * self.ease.apply(t);
        if t >= 1.0 {
            self.animated = self.target;
            self.animating = false;
        }
    }

    /// Freeze scrolling where it is and ignore input until `start`
    pub fn stop(&mut self) {
        self.stopped = true;
        self.target = self.animated;
        self.animating = false;
    }

    pub fn start(&mut self) {
        self.stopped = false;
    }
}

impl Default for SmoothScroll {
    fn default() -> Self {
        Self::new(&SmoothScrollConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scroller(limit: f32) -> SmoothScroll {
        let mut scroll = SmoothScroll::default();
        scroll.set_limit(limit);
        scroll
    }

    #[test]
    fn test_wheel_glides_to_target() {
        let mut scroll = scroller(5000.0);
        scroll.on_wheel(300.0, true);
        assert_eq!(scroll.scroll(), 0.0);

        scroll.advance(0.1);
        let early = scroll.scroll();
        assert!(early > 0.0 && early < 300.0);

        for _ in 0..120 {
            scroll.advance(1.0 / 60.0);
        }
        assert_eq!(scroll.scroll(), 300.0);
        assert_eq!(scroll.scroll(), scroll.target());
    }

    #[test]
    fn test_target_clamped_to_page() {
        let mut scroll = scroller(400.0);
        scroll.on_wheel(10_000.0, true);
        assert_eq!(scroll.target(), 400.0);
        scroll.on_wheel(-50_000.0, true);
        assert_eq!(scroll.target(), 0.0);
    }

    #[test]
    fn test_line_deltas_use_line_height() {
        let mut scroll = scroller(5000.0);
        scroll.on_wheel(3.0, false);
        assert!((scroll.target() - 3.0 * SmoothScrollConfig::default().line_height).abs() < 1e-3);
    }

    #[test]
    fn test_touch_drag_follows_finger() {
        let mut scroll = scroller(5000.0);
        scroll.on_touch_drag(50.0);
        assert_eq!(scroll.scroll(), 50.0);
    }

    #[test]
    fn test_smooth_touch_glides_with_multiplier() {
        let mut scroll = SmoothScroll::new(&SmoothScrollConfig {
            smooth_touch: true,
            ..SmoothScrollConfig::default()
        });
        scroll.set_limit(5000.0);
        scroll.on_touch_drag(50.0);
        assert_eq!(scroll.scroll(), 0.0);
        assert_eq!(scroll.target(), 100.0);
    }

    #[test]
    fn test_stop_freezes_and_ignores_input() {
        let mut scroll = scroller(5000.0);
        scroll.on_wheel(1000.0, true);
        scroll.advance(0.2);
        let frozen = scroll.scroll();

        scroll.stop();
        scroll.on_wheel(1000.0, true);
        scroll.advance(1.0);
        assert_eq!(scroll.scroll(), frozen);

        scroll.start();
        scroll.on_wheel(100.0, true);
        assert!((scroll.target() - (frozen + 100.0)).abs() < 1e-3);
    }

    #[test]
    fn test_shrinking_limit_pulls_scroll_back() {
        let mut scroll = scroller(5000.0);
        scroll.jump_to(3000.0);
        scroll.set_limit(1000.0);
        assert_eq!(scroll.scroll(), 1000.0);
    }
}
