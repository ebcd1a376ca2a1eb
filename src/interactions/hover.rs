use bevy::prelude::*;

use super::{Reaction, ReactionEvent};
use crate::trail::CursorHover;

/// System: keep track of which hover targets the pointer is over
pub fn apply_cursor_hover(
    mut reactions: MessageReader<ReactionEvent>,
    mut hover: ResMut<CursorHover>,
) {
    for event in reactions.read() {
        if let Reaction::CursorActive(active) = event.reaction {
            hover.set(event.entity, active);
        }
    }
}
