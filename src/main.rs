use bevy::prelude::*;

mod anim;
mod camera;
mod config;
mod input;
mod interactions;
mod page;
mod presentation;
mod scroll;
mod ticker;
mod trail;

use bevy::window::WindowResolution;
use camera::CameraPlugin;
use presentation::PresentationPlugin;

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "We Make AI Work For You".into(),
            resolution: WindowResolution::new(1280, 800),
            resizable: true,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(CameraPlugin)
    .add_plugins(PresentationPlugin::default());

    app.run();
}
