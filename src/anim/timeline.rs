use std::ops::Range;

use super::tween::Tween;

/// Where a new entry lands on the timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Right after everything already on the timeline
    Sequential,
    /// Offset from the current end, e.g. `-0.5` overlaps the previous entry by half a second
    FromEnd(f32),
    /// Absolute start time in seconds
    At(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TimelineEntry {
    start: f32,
    tween: Tween,
}

impl TimelineEntry {
    fn end(&self) -> f32 {
        self.start + self.tween.duration
    }
}

/// A playhead over a set of tweens placed in time.
///
/// Entries are addressed by the index `add` returns; callers read eased
/// progress per entry and map it onto whatever property they animate.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
    playhead: f32,
    direction: Direction,
    paused: bool,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    /// A timeline that plays as soon as it is advanced
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            playhead: 0.0,
            direction: Direction::Forward,
            paused: false,
        }
    }

    /// A timeline parked at its start, waiting for something (a scroll trigger) to play it
    pub fn paused() -> Self {
        Self {
            paused: true,
            ..Self::new()
        }
    }

    pub fn add(&mut self, tween: Tween, placement: Placement) -> usize {
        let end = self.duration();
        let start = match placement {
            Placement::Sequential => end,
            Placement::FromEnd(offset) => end + offset,
            Placement::At(time) => time,
        }
        .max(0.0);

        self.entries.push(TimelineEntry { start, tween });
        self.entries.len() - 1
    }

    /// Add `count` copies of `tween`, each starting `stagger` seconds after the previous
    pub fn add_staggered(
        &mut self,
        count: usize,
        tween: Tween,
        stagger: f32,
        placement: Placement,
    ) -> Range<usize> {
        let first = self.entries.len();
        if count == 0 {
            return first..first;
        }

        let index = self.add(tween, placement);
        let origin = self.entries[index].start;
        for i in 1..count {
            self.add(tween, Placement::At(origin + i as f32 * stagger));
        }
        first..self.entries.len()
    }

    pub fn duration(&self) -> f32 {
        self.entries
            .iter()
            .map(TimelineEntry::end)
            .fold(0.0, f32::max)
    }

    pub fn advance(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        self.playhead = match self.direction {
            Direction::Forward => (self.playhead + dt).min(self.duration()),
            Direction::Reverse => (self.playhead - dt).max(0.0),
        };
    }

    /// Eased progress of one entry at the current playhead
    pub fn progress(&self, index: usize) -> f32 {
        self.entries
            .get(index)
            .map(|entry| entry.tween.progress_at(self.playhead - entry.start))
            .unwrap_or(0.0)
    }

    /// Linear progress of one entry, used for stepped effects such as typing
    pub fn linear_progress(&self, index: usize) -> f32 {
        self.entries
            .get(index)
            .map(|entry| {
                if entry.tween.duration <= 0.0 {
                    if self.playhead >= entry.start { 1.0 } else { 0.0 }
                } else {
                    ((self.playhead - entry.start) / entry.tween.duration).clamp(0.0, 1.0)
                }
            })
            .unwrap_or(0.0)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Is the playhead still moving?
    pub fn is_active(&self) -> bool {
        if self.paused {
            return false;
        }
        match self.direction {
            Direction::Forward => self.playhead < self.duration(),
            Direction::Reverse => self.playhead > 0.0,
        }
    }

    // === Playback controls ===

    pub fn play(&mut self) {
        self.direction = Direction::Forward;
        self.paused = false;
    }

    pub fn reverse(&mut self) {
        self.direction = Direction::Reverse;
        self.paused = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn restart(&mut self) {
        self.playhead = 0.0;
        self.play();
    }

    /// Jump back to the start and hold there
    pub fn reset(&mut self) {
        self.playhead = 0.0;
        self.direction = Direction::Forward;
        self.paused = true;
    }

    /// Jump to the end and hold there
    pub fn complete(&mut self) {
        self.playhead = self.duration();
        self.direction = Direction::Forward;
        self.paused = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::easing::Ease;

    fn linear(duration: f32) -> Tween {
        Tween::new(duration, Ease::Linear)
    }

    #[test]
    fn test_sequential_and_overlap_placement() {
        let mut timeline = Timeline::new();
        let words = timeline.add_staggered(3, linear(1.5), 0.1, Placement::At(0.5));
        let typing = timeline.add(linear(3.0), Placement::FromEnd(-0.5));

        assert_eq!(words, 0..3);
        // Last word ends at 0.5 + 0.2 + 1.5 = 2.2, typing starts 0.5s earlier
        assert!((timeline.duration() - (1.7 + 3.0)).abs() < 1e-5);
        timeline.advance(1.7);
        assert!(timeline.progress(typing).abs() < 1e-5);
        timeline.advance(1.5);
        assert!((timeline.progress(typing) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_stagger_offsets_entries() {
        let mut timeline = Timeline::new();
        let cards = timeline.add_staggered(3, linear(1.0), 0.2, Placement::Sequential);
        timeline.advance(0.5);

        let progress: Vec<f32> = cards.map(|i| timeline.progress(i)).collect();
        assert!((progress[0] - 0.5).abs() < 1e-5);
        assert!((progress[1] - 0.3).abs() < 1e-5);
        assert!((progress[2] - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_paused_timeline_holds_until_played() {
        let mut timeline = Timeline::paused();
        let entry = timeline.add(linear(1.0), Placement::Sequential);

        timeline.advance(0.5);
        assert_eq!(timeline.progress(entry), 0.0);

        timeline.play();
        timeline.advance(0.5);
        assert!((timeline.progress(entry) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_reverse_runs_back_to_start() {
        let mut timeline = Timeline::new();
        let entry = timeline.add(linear(1.0), Placement::Sequential);
        timeline.advance(2.0);
        assert_eq!(timeline.progress(entry), 1.0);
        assert!(!timeline.is_active());

        timeline.reverse();
        assert!(timeline.is_active());
        timeline.advance(0.25);
        assert!((timeline.progress(entry) - 0.75).abs() < 1e-5);
        timeline.advance(5.0);
        assert_eq!(timeline.progress(entry), 0.0);
    }

    #[test]
    fn test_reset_and_complete_pause() {
        let mut timeline = Timeline::new();
        let entry = timeline.add(linear(1.0), Placement::Sequential);

        timeline.complete();
        assert_eq!(timeline.progress(entry), 1.0);
        assert!(timeline.is_paused());

        timeline.reset();
        assert_eq!(timeline.progress(entry), 0.0);
        timeline.advance(0.5);
        assert_eq!(timeline.progress(entry), 0.0);
    }
}
