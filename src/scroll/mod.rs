pub mod smooth;
pub mod trigger;

use std::collections::HashMap;

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;

use crate::presentation::PresentationSet;
use crate::ticker::FrameTicker;

pub use smooth::SmoothScroll;
pub use trigger::{ScrollTrigger, ToggleActions, TriggerGeometry, TriggerPosition};

pub struct ScrollPlugin;

impl Plugin for ScrollPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (scroll_from_wheel, scroll_from_touch, advance_scroll)
                .chain()
                .in_set(PresentationSet::Scroll),
        );
    }
}

/// System: wheel notches/pixels move the scroll target
pub fn scroll_from_wheel(mut wheel: MessageReader<MouseWheel>, mut scroll: ResMut<SmoothScroll>) {
    for ev in wheel.read() {
        // Bevy reports "away from the user" as positive, the page scrolls down on negative
        let pixels = matches!(ev.unit, MouseScrollUnit::Pixel);
        scroll.on_wheel(-ev.y, pixels);
    }
}

/// System: finger drags scroll the page
pub fn scroll_from_touch(
    mut touches: MessageReader<TouchInput>,
    mut scroll: ResMut<SmoothScroll>,
    mut last: Local<HashMap<u64, Vec2>>,
) {
    for touch in touches.read() {
        match touch.phase {
            TouchPhase::Started => {
                last.insert(touch.id, touch.position);
            }
            TouchPhase::Moved => {
                if let Some(previous) = last.insert(touch.id, touch.position) {
                    // Finger moving up drags the page down
                    scroll.on_touch_drag(previous.y - touch.position.y);
                }
            }
            TouchPhase::Ended | TouchPhase::Canceled => {
                last.remove(&touch.id);
            }
        }
    }
}

pub fn advance_scroll(ticker: Res<FrameTicker>, mut scroll: ResMut<SmoothScroll>) {
    scroll.advance(ticker.delta_secs());
}
