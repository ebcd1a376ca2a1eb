//! Frame-rate independent cursor smoothing with a trailing chain of nodes.
//!
//! The cursor eases toward the latest pointer sample; node 0 eases toward the
//! cursor, node 1 toward node 0, and so on. Later nodes use a larger rate
//! base, which the ease formula turns into a slower approach, so the chain
//! stretches out behind the pointer like a tail.

use bevy::math::Vec2;

use crate::config::TrailConfig;

/// Fraction of the remaining distance closed in one tick.
///
/// `rate` is the fraction closed per nominal frame; `delta_ratio` is how many
/// nominal frames this tick represents. The result is always in [0, 1) for
/// `rate` in (0, 1) and finite `delta_ratio >= 0`, so a step never overshoots.
pub fn ease_fraction(rate: f32, delta_ratio: f32) -> f32 {
    1.0 - (1.0 - rate).powf(delta_ratio.max(0.0))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailParams {
    pub base_rate: f32,
    pub base_delay: f32,
    pub per_node_increment: f32,
}

impl From<&TrailConfig> for TrailParams {
    fn from(config: &TrailConfig) -> Self {
        Self {
            base_rate: config.base_rate,
            base_delay: config.base_delay,
            per_node_increment: config.per_node_increment,
        }
    }
}

impl Default for TrailParams {
    fn default() -> Self {
        Self::from(&TrailConfig::default())
    }
}

/// One link in the chain. Its index is fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailNode {
    pub position: Vec2,
    index: usize,
}

impl TrailNode {
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrailInterpolator {
    params: TrailParams,
    cursor: Vec2,
    nodes: Vec<TrailNode>,
}

impl TrailInterpolator {
    /// Allocate a chain of `length` nodes, everything parked at the origin
    pub fn new(length: usize, params: TrailParams) -> Self {
        Self {
            params,
            cursor: Vec2::ZERO,
            nodes: (0..length)
                .map(|index| TrailNode {
                    position: Vec2::ZERO,
                    index,
                })
                .collect(),
        }
    }

    pub fn from_config(config: &TrailConfig) -> Self {
        Self::new(config.length, TrailParams::from(config))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Smoothed position of the primary cursor
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn nodes(&self) -> &[TrailNode] {
        &self.nodes
    }

    /// Rate base for node `index`; grows with the index so later nodes lag more
    pub fn node_delay(&self, index: usize) -> f32 {
        self.params.base_delay + index as f32 * self.params.per_node_increment
    }

    /// Display scale for node `index`: 1 for the head, shrinking toward 0 at the tail
    pub fn node_scale(&self, index: usize) -> f32 {
        if self.nodes.is_empty() {
            return 1.0;
        }
        1.0 - index as f32 / self.nodes.len() as f32
    }

    /// Advance one tick toward `pointer`.
    ///
    /// Nodes update head to tail, and each node chases its predecessor's
    /// position as already updated in this same tick.
    pub fn tick(&mut self, pointer: Vec2, delta_ratio: f32) {
        let dt = ease_fraction(self.params.base_rate, delta_ratio);
        self.cursor += (pointer - self.cursor) * dt;

        let mut target = self.cursor;
        for i in 0..self.nodes.len() {
            let node_dt = ease_fraction(self.node_delay(i), delta_ratio);
            let node = &mut self.nodes[i];
            node.position += (target - node.position) * node_dt;
            target = node.position;
        }
    }
}
