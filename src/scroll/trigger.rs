//! Scroll-bound triggers: map the page scroll offset onto enter/leave
//! transitions and scrub progress for one element.

use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::anim::Timeline;

#[derive(Debug, Error, PartialEq)]
pub enum TriggerParseError {
    #[error("trigger position {0:?} must be \"<element> <viewport>\"")]
    Shape(String),
    #[error("unknown anchor {0:?}")]
    Anchor(String),
    #[error("toggle actions {0:?} must name exactly four actions")]
    ActionCount(String),
    #[error("unknown toggle action {0:?}")]
    Action(String),
}

/// A point on an element or on the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// Fraction of the height: top = 0.0, center = 0.5, bottom = 1.0, "80%" = 0.8
    Fraction(f32),
    /// Pixels from the top edge
    Pixels(f32),
}

impl Anchor {
    fn resolve(self, extent: f32) -> f32 {
        match self {
            Anchor::Fraction(f) => f * extent,
            Anchor::Pixels(px) => px,
        }
    }
}

impl FromStr for Anchor {
    type Err = TriggerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TriggerParseError::Anchor(s.to_string());
        match s {
            "top" => Ok(Anchor::Fraction(0.0)),
            "center" => Ok(Anchor::Fraction(0.5)),
            "bottom" => Ok(Anchor::Fraction(1.0)),
            _ => {
                if let Some(pct) = s.strip_suffix('%') {
                    pct.parse::<f32>()
                        .map(|p| Anchor::Fraction(p / 100.0))
                        .map_err(|_| bad())
                } else if let Some(px) = s.strip_suffix("px") {
                    px.parse::<f32>().map(Anchor::Pixels).map_err(|_| bad())
                } else {
                    s.parse::<f32>().map(Anchor::Pixels).map_err(|_| bad())
                }
            }
        }
    }
}

/// "When `element` anchor meets `viewport` anchor", e.g. `top 80%`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct TriggerPosition {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl TriggerPosition {
    /// Scroll offset at which the two anchors line up
    pub fn resolve(&self, geometry: &TriggerGeometry) -> f32 {
        geometry.element_top + self.element.resolve(geometry.element_height)
            - self.viewport.resolve(geometry.viewport_height)
    }
}

impl FromStr for TriggerPosition {
    type Err = TriggerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(element), Some(viewport), None) => Ok(TriggerPosition {
                element: element.parse()?,
                viewport: viewport.parse()?,
            }),
            _ => Err(TriggerParseError::Shape(s.to_string())),
        }
    }
}

impl TryFrom<String> for TriggerPosition {
    type Error = TriggerParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Play,
    Pause,
    Resume,
    Reverse,
    Restart,
    Reset,
    Complete,
    None,
}

impl ToggleAction {
    pub fn apply(self, timeline: &mut Timeline) {
        match self {
            ToggleAction::Play => timeline.play(),
            ToggleAction::Pause => timeline.pause(),
            ToggleAction::Resume => timeline.resume(),
            ToggleAction::Reverse => timeline.reverse(),
            ToggleAction::Restart => timeline.restart(),
            ToggleAction::Reset => timeline.reset(),
            ToggleAction::Complete => timeline.complete(),
            ToggleAction::None => {}
        }
    }
}

impl FromStr for ToggleAction {
    type Err = TriggerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "play" => Ok(ToggleAction::Play),
            "pause" => Ok(ToggleAction::Pause),
            "resume" => Ok(ToggleAction::Resume),
            "reverse" => Ok(ToggleAction::Reverse),
            "restart" => Ok(ToggleAction::Restart),
            "reset" => Ok(ToggleAction::Reset),
            "complete" => Ok(ToggleAction::Complete),
            "none" => Ok(ToggleAction::None),
            other => Err(TriggerParseError::Action(other.to_string())),
        }
    }
}

/// Actions for onEnter, onLeave, onEnterBack, onLeaveBack, in that order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct ToggleActions([ToggleAction; 4]);

impl ToggleActions {
    pub fn action_for(&self, transition: TriggerTransition) -> ToggleAction {
        let slot = match transition {
            TriggerTransition::Enter => 0,
            TriggerTransition::Leave => 1,
            TriggerTransition::EnterBack => 2,
            TriggerTransition::LeaveBack => 3,
        };
        self.0[slot]
    }
}

impl Default for ToggleActions {
    fn default() -> Self {
        ToggleActions([
            ToggleAction::Play,
            ToggleAction::None,
            ToggleAction::None,
            ToggleAction::None,
        ])
    }
}

impl FromStr for ToggleActions {
    type Err = TriggerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let actions = s
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<ToggleAction>, _>>()?;
        let actions: [ToggleAction; 4] = actions
            .try_into()
            .map_err(|_| TriggerParseError::ActionCount(s.to_string()))?;
        Ok(ToggleActions(actions))
    }
}

impl TryFrom<String> for ToggleActions {
    type Error = TriggerParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Page-space placement of the trigger element plus the current viewport height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerGeometry {
    pub element_top: f32,
    pub element_height: f32,
    pub viewport_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Before,
    Active,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerTransition {
    Enter,
    Leave,
    EnterBack,
    LeaveBack,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollTrigger {
    start: TriggerPosition,
    end: TriggerPosition,
    state: TriggerState,
}

impl ScrollTrigger {
    pub fn new(start: TriggerPosition, end: TriggerPosition) -> Self {
        Self {
            start,
            end,
            state: TriggerState::Before,
        }
    }

    /// Start/end scroll offsets; end never precedes start
    pub fn range(&self, geometry: &TriggerGeometry) -> (f32, f32) {
        let start = self.start.resolve(geometry);
        let end = self.end.resolve(geometry).max(start);
        (start, end)
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == TriggerState::Active
    }

    /// Linear position of `scroll` within the trigger range, for scrubbed animations
    pub fn progress(&self, scroll: f32, geometry: &TriggerGeometry) -> f32 {
        let (start, end) = self.range(geometry);
        if end - start <= f32::EPSILON {
            return if scroll >= start { 1.0 } else { 0.0 };
        }
        ((scroll - start) / (end - start)).clamp(0.0, 1.0)
    }

    /// Move to the state for `scroll` and report the transitions crossed.
    ///
    /// Jumping over the whole range in one update reports both edges in the
    /// order they were crossed.
    pub fn update(&mut self, scroll: f32, geometry: &TriggerGeometry) -> &'static [TriggerTransition] {
        use TriggerState::*;
        use TriggerTransition::*;

        let (start, end) = self.range(geometry);
        let next = if scroll < start {
            Before
        } else if scroll > end {
            After
        } else {
            Active
        };

        let crossed: &'static [TriggerTransition] = match (self.state, next) {
            (Before, Active) => &[Enter],
            (Before, After) => &[Enter, Leave],
            (Active, After) => &[Leave],
            (After, Active) => &[EnterBack],
            (After, Before) => &[EnterBack, LeaveBack],
            (Active, Before) => &[LeaveBack],
            _ => &[],
        };
        self.state = next;
        crossed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::{Ease, Placement, Tween};

    fn geometry(top: f32, height: f32) -> TriggerGeometry {
        TriggerGeometry {
            element_top: top,
            element_height: height,
            viewport_height: 1000.0,
        }
    }

    fn trigger(start: &str, end: &str) -> ScrollTrigger {
        ScrollTrigger::new(start.parse().unwrap(), end.parse().unwrap())
    }

    #[test]
    fn test_parse_positions() {
        let pos: TriggerPosition = "top 80%".parse().unwrap();
        assert_eq!(pos.element, Anchor::Fraction(0.0));
        assert_eq!(pos.viewport, Anchor::Fraction(0.8));

        let pos: TriggerPosition = "bottom top".parse().unwrap();
        assert_eq!(pos.element, Anchor::Fraction(1.0));
        assert_eq!(pos.viewport, Anchor::Fraction(0.0));

        let pos: TriggerPosition = "center 120px".parse().unwrap();
        assert_eq!(pos.viewport, Anchor::Pixels(120.0));

        assert!("top".parse::<TriggerPosition>().is_err());
        assert!("top sideways".parse::<TriggerPosition>().is_err());
    }

    #[test]
    fn test_range_resolves_against_viewport() {
        let t = trigger("top 80%", "top 20%");
        let (start, end) = t.range(&geometry(2000.0, 600.0));
        assert!((start - 1200.0).abs() < 1e-3);
        assert!((end - 1800.0).abs() < 1e-3);
    }

    #[test]
    fn test_transitions_follow_scroll_direction() {
        let mut t = trigger("top 80%", "top 20%");
        let g = geometry(2000.0, 600.0);

        assert!(t.update(0.0, &g).is_empty());
        assert_eq!(t.update(1300.0, &g), &[TriggerTransition::Enter]);
        assert_eq!(t.update(1900.0, &g), &[TriggerTransition::Leave]);
        assert_eq!(t.update(1500.0, &g), &[TriggerTransition::EnterBack]);
        assert_eq!(t.update(100.0, &g), &[TriggerTransition::LeaveBack]);
    }

    #[test]
    fn test_jump_reports_both_edges() {
        let mut t = trigger("top 80%", "top 20%");
        let g = geometry(2000.0, 600.0);

        assert_eq!(
            t.update(5000.0, &g),
            &[TriggerTransition::Enter, TriggerTransition::Leave]
        );
        assert_eq!(
            t.update(0.0, &g),
            &[TriggerTransition::EnterBack, TriggerTransition::LeaveBack]
        );
    }

    #[test]
    fn test_scrub_progress() {
        let t = trigger("top bottom", "bottom top");
        let g = geometry(2000.0, 500.0);
        // start = 2000 - 1000 = 1000, end = 2500
        assert_eq!(t.progress(900.0, &g), 0.0);
        assert!((t.progress(1750.0, &g) - 0.5).abs() < 1e-5);
        assert_eq!(t.progress(3000.0, &g), 1.0);
    }

    #[test]
    fn test_toggle_actions_drive_timeline() {
        let actions: ToggleActions = "play none none reverse".parse().unwrap();
        assert_eq!(actions.action_for(TriggerTransition::Enter), ToggleAction::Play);
        assert_eq!(actions.action_for(TriggerTransition::Leave), ToggleAction::None);
        assert_eq!(
            actions.action_for(TriggerTransition::LeaveBack),
            ToggleAction::Reverse
        );

        let mut timeline = Timeline::paused();
        let entry = timeline.add(Tween::new(1.0, Ease::Linear), Placement::Sequential);
        actions
            .action_for(TriggerTransition::Enter)
            .apply(&mut timeline);
        timeline.advance(1.0);
        assert_eq!(timeline.progress(entry), 1.0);

        actions
            .action_for(TriggerTransition::LeaveBack)
            .apply(&mut timeline);
        timeline.advance(1.0);
        assert_eq!(timeline.progress(entry), 0.0);
    }

    #[test]
    fn test_toggle_actions_need_four_entries() {
        assert!("play none".parse::<ToggleActions>().is_err());
        assert!("play none none jump".parse::<ToggleActions>().is_err());
    }
}
