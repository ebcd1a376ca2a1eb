use bevy::prelude::*;
use rand::Rng;

use super::{Reaction, ReactionEvent};
use crate::config::ScrambleConfig;
use crate::ticker::FrameTicker;

/// Text scramble: every interval the label is redrawn with a revealed prefix
/// of the real text and random letters after it; the prefix grows by
/// `reveal_step` characters per interval until the whole label is back.
#[derive(Debug, Clone, PartialEq)]
pub struct Scramble {
    target: Vec<char>,
    alphabet: Vec<char>,
    interval: f32,
    reveal_step: f32,
    iteration: f32,
    accumulated: f32,
    running: bool,
}

impl Scramble {
    pub fn new(text: &str, config: &ScrambleConfig) -> Self {
        Self {
            target: text.chars().collect(),
            alphabet: config.alphabet.chars().collect(),
            interval: config.interval_ms / 1000.0,
            reveal_step: config.reveal_step,
            iteration: 0.0,
            accumulated: 0.0,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start over from a fully scrambled label, cancelling any run in progress
    pub fn restart(&mut self) {
        self.iteration = 0.0;
        self.accumulated = 0.0;
        self.running = true;
    }

    /// One redraw: characters before `iteration` are real, the rest random
    fn frame<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.target
            .iter()
            .enumerate()
            .map(|(index, &letter)| {
                if (index as f32) < self.iteration || self.alphabet.is_empty() {
                    letter
                } else {
                    self.alphabet[rng.random_range(0..self.alphabet.len())]
                }
            })
            .collect()
    }

    /// Advance by `dt` seconds; returns the latest redraw if any interval elapsed
    pub fn advance<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> Option<String> {
        if !self.running {
            return None;
        }
        self.accumulated += dt;

        let mut latest = None;
        while self.running && self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            latest = Some(self.frame(rng));
            if self.iteration >= self.target.len() as f32 {
                self.running = false;
            }
            self.iteration += self.reveal_step;
        }
        latest
    }
}

/// Label that scrambles when hovered
#[derive(Component, Debug, Clone)]
pub struct ScrambleText(pub Scramble);

impl ScrambleText {
    pub fn new(text: &str, config: &ScrambleConfig) -> Self {
        Self(Scramble::new(text, config))
    }
}

/// System: restart the scramble on every entity the dispatch table picked
pub fn react_scramble(
    mut reactions: MessageReader<ReactionEvent>,
    mut labels: Query<&mut ScrambleText>,
) {
    for event in reactions.read() {
        if event.reaction != Reaction::Scramble {
            continue;
        }
        if let Ok(mut label) = labels.get_mut(event.entity) {
            label.0.restart();
        }
    }
}

/// System: redraw running scrambles
pub fn animate_scramble(
    ticker: Res<FrameTicker>,
    mut labels: Query<(&mut ScrambleText, &mut Text)>,
) {
    let dt = ticker.delta_secs();
    let mut rng = rand::rng();
    for (mut label, mut text) in &mut labels {
        if !label.0.is_running() {
            continue;
        }
        if let Some(frame) = label.0.advance(dt, &mut rng) {
            text.0 = frame;
        }
    }
}
