//! Top-level plugin for the page's motion layer.
//!
//! Loads the config, checks the engine plugins it relies on, fixes the order
//! of the per-frame stages and installs every feature plugin.

use bevy::prelude::*;

use crate::camera::{ViewportMetrics, track_viewport};
use crate::config::PresentationConfig;
use crate::input::PointerPlugin;
use crate::interactions::InteractionsPlugin;
use crate::page::PagePlugin;
use crate::scroll::{ScrollPlugin, SmoothScroll};
use crate::ticker::{FrameTicker, advance_ticker};
use crate::trail::TrailPlugin;

/// Per-frame stages, run in this order
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresentationSet {
    /// Frame clock, viewport size, page extents
    Tick,
    /// Latest pointer sample and device capabilities
    Pointer,
    Scroll,
    /// Hit testing and dispatch
    Interact,
    /// Feature reactions to dispatched interactions
    React,
    Animate,
    /// Write animated values to UI nodes
    Render,
}

/// Startup stages: the page spawns its elements before features look for them
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresentationStartup {
    Page,
    Features,
}

#[derive(Default)]
pub struct PresentationPlugin {
    config: Option<PresentationConfig>,
}

impl PresentationPlugin {
    /// Use `config` instead of loading one
    pub fn with_config(config: PresentationConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

/// Engine plugins the presentation layer can't run without
fn missing_requirements(app: &App) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if !app.is_plugin_added::<bevy::time::TimePlugin>() {
        missing.push("TimePlugin");
    }
    if !app.is_plugin_added::<bevy::input::InputPlugin>() {
        missing.push("InputPlugin");
    }
    if !app.is_plugin_added::<bevy::window::WindowPlugin>() {
        missing.push("WindowPlugin");
    }
    missing
}

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        let missing = missing_requirements(app);
        if !missing.is_empty() {
            error!(
                "Presentation layer disabled, missing plugins: {}",
                missing.join(", ")
            );
            return;
        }

        let config = match &self.config {
            Some(config) => config.clone(),
            None => PresentationConfig::load().unwrap_or_else(|err| {
                error!("{err}; using the built-in presentation config");
                PresentationConfig::default()
            }),
        };

        info!(
            "Presentation: {} trail nodes, {} sections",
            config.trail.length,
            config.page.sections.len()
        );

        app.configure_sets(
            Update,
            (
                PresentationSet::Tick,
                PresentationSet::Pointer,
                PresentationSet::Scroll,
                PresentationSet::Interact,
                PresentationSet::React,
                PresentationSet::Animate,
                PresentationSet::Render,
            )
                .chain(),
        )
        .configure_sets(
            Startup,
            (PresentationStartup::Page, PresentationStartup::Features).chain(),
        )
        .insert_resource(FrameTicker::new(&config.ticker))
        .insert_resource(SmoothScroll::new(&config.smooth_scroll))
        .init_resource::<ViewportMetrics>()
        .insert_resource(config)
        .add_systems(
            Update,
            (advance_ticker, track_viewport).in_set(PresentationSet::Tick),
        )
        .add_plugins((
            PointerPlugin,
            ScrollPlugin,
            InteractionsPlugin,
            TrailPlugin,
            PagePlugin,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Hitbox, TouchCapability};
    use crate::page::menu::{MenuState, MobileOverlay};
    use crate::page::reveal::RevealDriver;
    use crate::trail::{TrailDot, TrailState};
    use bevy::window::ExitCondition;

    fn headless(config: PresentationConfig) -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            WindowPlugin {
                primary_window: None,
                exit_condition: ExitCondition::DontExit,
                ..default()
            },
            bevy::input::InputPlugin,
        ))
        .add_plugins(PresentationPlugin::with_config(config));
        app
    }

    fn dot_count(app: &mut App) -> usize {
        app.world_mut()
            .query::<&TrailDot>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn test_missing_engine_plugins_disable_everything() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(PresentationPlugin::with_config(PresentationConfig::default()));
        app.update();
        assert!(app.world().get_resource::<PresentationConfig>().is_none());
        assert!(app.world().get_resource::<TrailState>().is_none());
    }

    #[test]
    fn test_full_page_builds_trail() {
        let mut app = headless(PresentationConfig::default());
        app.update();
        assert!(app.world().get_resource::<TrailState>().is_some());
        assert_eq!(dot_count(&mut app), 20);
    }

    #[test]
    fn test_missing_cursor_skips_trail_but_reveals_run() {
        let mut config = PresentationConfig::default();
        config.page.cursor_follower = false;
        let mut app = headless(config);
        app.update();
        assert!(app.world().get_resource::<TrailState>().is_none());
        assert_eq!(dot_count(&mut app), 0);

        // Scroll into the closing section; its reveal should start playing
        app.world_mut().resource_mut::<SmoothScroll>().jump_to(3300.0);
        app.update();

        let playing = app
            .world_mut()
            .query::<&RevealDriver>()
            .iter(app.world())
            .filter(|driver| !driver.timeline.is_paused())
            .count();
        assert!(playing > 0);
    }

    #[test]
    fn test_open_menu_covers_page_hitboxes() {
        let mut app = headless(PresentationConfig::default());
        app.update();

        let cover_enabled = |app: &mut App| {
            app.world_mut()
                .query_filtered::<&Hitbox, With<MobileOverlay>>()
                .iter(app.world())
                .all(|hitbox| hitbox.enabled)
        };
        assert!(!cover_enabled(&mut app));

        app.world_mut().resource_mut::<MenuState>().set_open(true);
        app.update();
        assert!(cover_enabled(&mut app));
    }

    #[test]
    fn test_narrow_touch_device_tears_trail_down_and_back() {
        let mut app = headless(PresentationConfig::default());
        app.update();
        assert_eq!(dot_count(&mut app), 20);

        app.world_mut().resource_mut::<TouchCapability>().0 = true;
        app.world_mut().resource_mut::<ViewportMetrics>().width = 800.0;
        app.update();
        assert!(app.world().get_resource::<TrailState>().is_none());
        assert_eq!(dot_count(&mut app), 0);

        app.world_mut().resource_mut::<ViewportMetrics>().width = 1280.0;
        app.update();
        assert!(app.world().get_resource::<TrailState>().is_some());
        assert_eq!(dot_count(&mut app), 20);
    }
}
