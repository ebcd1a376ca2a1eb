use std::ops::Range;

use bevy::prelude::*;

use super::{CONTENT_LEFT, label, text_width};
use crate::anim::{Ease, Placement, Timeline, Tween};
use crate::config::{HeroReveal, PresentationConfig, SectionSpec};
use crate::ticker::FrameTicker;

const TITLE_FONT_SIZE: f32 = 72.0;
const TITLE_TOP: f32 = 240.0;
const TAGLINE_FONT_SIZE: f32 = 28.0;

/// Intro sequence: title words rise into place one by one, then the tagline types in
#[derive(Resource, Debug, Clone)]
pub struct HeroTimeline {
    pub timeline: Timeline,
    words: Range<usize>,
    typing: usize,
    rise_offset: f32,
}

impl HeroTimeline {
    pub fn new(reveal: &HeroReveal, word_count: usize) -> Self {
        let mut timeline = Timeline::new();
        let words = timeline.add_staggered(
            word_count,
            Tween::new(reveal.word_duration, reveal.word_ease),
            reveal.word_stagger,
            Placement::At(reveal.delay),
        );
        let typing = timeline.add(
            Tween::new(reveal.type_duration, Ease::Linear),
            Placement::FromEnd(-reveal.type_overlap),
        );
        Self {
            timeline,
            words,
            typing,
            rise_offset: reveal.rise_offset,
        }
    }

    /// Vertical offset of word `index` inside its clip box
    pub fn word_offset(&self, index: usize) -> f32 {
        let entry = self.words.start + index;
        if !self.words.contains(&entry) {
            return 0.0;
        }
        self.rise_offset * (1.0 - self.timeline.progress(entry))
    }

    pub fn typing_progress(&self) -> f32 {
        self.timeline.linear_progress(self.typing)
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct HeroWord {
    pub index: usize,
}

#[derive(Component, Debug, Clone)]
pub struct HeroTagline {
    pub full: String,
}

/// First `progress` share of `full`, by characters
pub fn typed_prefix(full: &str, progress: f32) -> String {
    let total = full.chars().count();
    let shown = ((total as f32) * progress.clamp(0.0, 1.0)).floor() as usize;
    full.chars().take(shown).collect()
}

pub fn spawn_hero(
    commands: &mut Commands,
    section: Entity,
    spec: &SectionSpec,
    config: &PresentationConfig,
) {
    let reveal = &config.reveal.hero;
    let line_height = TITLE_FONT_SIZE * 1.2;
    let space = TITLE_FONT_SIZE * 0.3;

    let mut x = CONTENT_LEFT;
    let mut word_count = 0;
    for (index, word) in spec.title.split_whitespace().enumerate() {
        let width = text_width(word, TITLE_FONT_SIZE);
        // Each word sits in its own clip box so it appears to rise out of a slot
        let slot = commands
            .spawn((
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(x),
                    top: Val::Px(TITLE_TOP),
                    width: Val::Px(width),
                    height: Val::Px(line_height),
                    overflow: Overflow::clip(),
                    ..default()
                },
                ChildOf(section),
            ))
            .id();
        commands.spawn((
            HeroWord { index },
            label(word, TITLE_FONT_SIZE, Color::WHITE, 0.0, reveal.rise_offset),
            ChildOf(slot),
        ));
        x += width + space;
        word_count += 1;
    }

    commands.spawn((
        HeroTagline {
            full: reveal.tagline.clone(),
        },
        label(
            "",
            TAGLINE_FONT_SIZE,
            Color::srgb(0.7, 0.75, 0.85),
            CONTENT_LEFT,
            TITLE_TOP + line_height + 32.0,
        ),
        ChildOf(section),
    ));

    commands.insert_resource(HeroTimeline::new(reveal, word_count));
}

/// System: play the intro and write word offsets and the typed tagline
pub fn animate_hero(
    ticker: Res<FrameTicker>,
    mut hero: ResMut<HeroTimeline>,
    mut words: Query<(&HeroWord, &mut Node)>,
    mut taglines: Query<(&HeroTagline, &mut Text)>,
) {
    if !hero.timeline.is_active() {
        return;
    }
    hero.timeline.advance(ticker.delta_secs());

    for (word, mut node) in &mut words {
        node.top = Val::Px(hero.word_offset(word.index));
    }

    let progress = hero.typing_progress();
    for (tagline, mut text) in &mut taglines {
        let typed = typed_prefix(&tagline.full, progress);
        if text.0 != typed {
            text.0 = typed;
        }
    }
}
