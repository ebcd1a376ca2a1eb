// config.rs

use bevy::prelude::Resource;
use serde::Deserialize;
use thiserror::Error;

use crate::anim::Ease;
use crate::scroll::trigger::{ToggleActions, TriggerPosition};

/// Built-in page configuration, embedded the same way the atlas data used to be
const DEFAULT_CONFIG_JSON: &str = include_str!("../assets/presentation.json");

/// Environment variable naming a JSON file that replaces the built-in config
pub const CONFIG_ENV_VAR: &str = "PRESENTATION_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse presentation config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid presentation config: {0}")]
    Invalid(String),
}

/// Everything the presentation layer can be tuned with
#[derive(Resource, Debug, Clone, Deserialize)]
pub struct PresentationConfig {
    #[serde(default)]
    pub ticker: TickerConfig,
    #[serde(default)]
    pub trail: TrailConfig,
    #[serde(default)]
    pub smooth_scroll: SmoothScrollConfig,
    #[serde(default)]
    pub magnetic: MagneticConfig,
    #[serde(default)]
    pub scramble: ScrambleConfig,
    #[serde(default)]
    pub cards: CardConfig,
    pub reveal: RevealConfig,
    #[serde(default)]
    pub device: DeviceConfig,
    pub page: PageLayout,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TickerConfig {
    pub fps: f32,
    pub lag_threshold_ms: f32,
    pub adjusted_lag_ms: f32,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            lag_threshold_ms: 500.0,
            adjusted_lag_ms: 33.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrailConfig {
    /// Number of trailing dots (fixed for the session)
    pub length: usize,
    /// Fraction of the remaining distance the cursor closes per nominal frame
    pub base_rate: f32,
    pub base_delay: f32,
    pub per_node_increment: f32,
    pub cursor_size: f32,
    pub dot_size: f32,
    /// Cursor size multiplier while hovering something interactive
    pub active_scale: f32,
    pub cursor_color: [f32; 4],
    pub dot_color: [f32; 4],
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            length: 20,
            base_rate: 0.2,
            base_delay: 0.15,
            per_node_increment: 0.02,
            cursor_size: 20.0,
            dot_size: 8.0,
            active_scale: 2.5,
            cursor_color: [1.0, 1.0, 1.0, 0.9],
            dot_color: [0.55, 0.75, 1.0, 0.6],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmoothScrollConfig {
    pub duration: f32,
    pub wheel_multiplier: f32,
    pub touch_multiplier: f32,
    pub smooth_touch: bool,
    /// Pixels per wheel "line" for line-based wheel deltas
    pub line_height: f32,
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self {
            duration: 1.2,
            wheel_multiplier: 1.0,
            touch_multiplier: 2.0,
            smooth_touch: false,
            line_height: 100.0 / 6.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MagneticConfig {
    pub strength: f32,
    pub pull_duration: f32,
    pub pull_ease: Ease,
    pub release_duration: f32,
    pub release_ease: Ease,
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self {
            strength: 0.3,
            pull_duration: 0.3,
            pull_ease: Ease::PowerOut(2),
            release_duration: 0.8,
            release_ease: Ease::ElasticOut {
                amplitude: 1.0,
                period: 0.3,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrambleConfig {
    pub alphabet: String,
    pub interval_ms: f32,
    /// How many characters get revealed per step
    pub reveal_step: f32,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            alphabet: "ABCDEFGHIJKLMNOPQRSTUVWXYZ".to_string(),
            interval_ms: 30.0,
            reveal_step: 1.0 / 3.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardConfig {
    /// Seconds between successive cards starting to float
    pub float_delay_step: f32,
    pub float_period: f32,
    pub float_amplitude: f32,
    pub glow_duration: f32,
    pub glow_ease: Ease,
    pub glow_size: f32,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            float_delay_step: 0.5,
            float_period: 6.0,
            float_amplitude: 12.0,
            glow_duration: 0.3,
            glow_ease: Ease::PowerOut(1),
            glow_size: 160.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevealConfig {
    pub hero: HeroReveal,
    pub sections: SectionReveal,
    pub insights: StaggerReveal,
    pub visual_hook: ParallaxConfig,
    pub portal: PortalConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeroReveal {
    pub rise_offset: f32,
    pub word_duration: f32,
    pub word_stagger: f32,
    pub delay: f32,
    pub word_ease: Ease,
    pub tagline: String,
    pub type_duration: f32,
    /// Seconds the typing overlaps the end of the word rise
    pub type_overlap: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionReveal {
    pub offset_y: f32,
    pub duration: f32,
    pub ease: Ease,
    pub start: TriggerPosition,
    pub end: TriggerPosition,
    pub toggle_actions: ToggleActions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaggerReveal {
    pub offset_y: f32,
    pub duration: f32,
    pub stagger: f32,
    pub ease: Ease,
    pub start: TriggerPosition,
    pub end: TriggerPosition,
    pub toggle_actions: ToggleActions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParallaxConfig {
    /// Drift as a percentage of the element's own height
    pub desktop_percent: f32,
    pub mobile_percent: f32,
    /// Viewports narrower than this use `mobile_percent`
    pub breakpoint: f32,
    pub start: TriggerPosition,
    pub end: TriggerPosition,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// Marquee drift as a percentage of its own width
    pub marquee_percent: f32,
    /// Scrub range of the marquee drift
    pub marquee_start: TriggerPosition,
    pub marquee_end: TriggerPosition,
    pub pulse_start: TriggerPosition,
    pub pulse_end: TriggerPosition,
    pub pulse_color: [f32; 3],
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    /// Touch devices narrower than this lose the custom cursor
    pub touch_breakpoint: f32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            touch_breakpoint: 1024.0,
        }
    }
}

/// Declarative page content; the page plugin turns this into UI nodes
#[derive(Debug, Clone, Deserialize)]
pub struct PageLayout {
    pub nav: NavLayout,
    /// Is there a cursor follower element on the page?
    #[serde(default = "default_true")]
    pub cursor_follower: bool,
    /// Is there a container for the trail dots?
    #[serde(default = "default_true")]
    pub trail_container: bool,
    pub sections: Vec<SectionSpec>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavLayout {
    pub height: f32,
    pub links: Vec<String>,
    pub contact_label: String,
    #[serde(default)]
    pub mobile_links: Vec<String>,
    #[serde(default = "default_true")]
    pub hamburger: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Hero,
    Services,
    VisualHook,
    Insights,
    TypographyPortal,
    Plain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionSpec {
    pub kind: SectionKind,
    pub height: f32,
    pub color: [f32; 3],
    #[serde(default)]
    pub title: String,
    /// Card labels, marquee text, etc. depending on `kind`
    #[serde(default)]
    pub items: Vec<String>,
}

impl PresentationConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PresentationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in config, or the file named by `PRESENTATION_CONFIG` when set
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => {
                log::info!("Loading presentation config from {path}");
                let json = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io { path, source })?;
                Self::from_json(&json)
            }
            Err(_) => Self::from_json(DEFAULT_CONFIG_JSON),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        let trail = &self.trail;
        if !(trail.base_rate > 0.0 && trail.base_rate < 1.0) {
            return invalid(format!("trail.base_rate {} must be in (0, 1)", trail.base_rate));
        }
        if trail.base_delay <= 0.0 || trail.per_node_increment < 0.0 {
            return invalid("trail.base_delay must be positive and per_node_increment non-negative".into());
        }
        if trail.length > 0 {
            let slowest = trail.base_delay + (trail.length - 1) as f32 * trail.per_node_increment;
            if slowest >= 1.0 {
                return invalid(format!(
                    "trail node {} would ease at rate {slowest}, must stay below 1",
                    trail.length - 1
                ));
            }
        }
        if self.ticker.fps <= 0.0 {
            return invalid(format!("ticker.fps {} must be positive", self.ticker.fps));
        }
        if self.scramble.interval_ms <= 0.0 || self.scramble.reveal_step <= 0.0 {
            return invalid("scramble interval and reveal step must be positive".into());
        }
        if self.scramble.alphabet.is_empty() {
            return invalid("scramble.alphabet must not be empty".into());
        }
        if self.smooth_scroll.duration < 0.0 {
            return invalid("smooth_scroll.duration must not be negative".into());
        }
        if let Some(section) = self.page.sections.iter().find(|s| s.height <= 0.0) {
            return invalid(format!("{:?} section has non-positive height", section.kind));
        }

        Ok(())
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self::from_json(DEFAULT_CONFIG_JSON).expect("Failed to parse embedded presentation.json")
    }
}
