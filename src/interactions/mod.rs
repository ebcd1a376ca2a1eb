//! Pointer interactions routed through a dispatch table.
//!
//! Hit testing (see `input.rs`) produces `InteractionEvent`s. Each element
//! declares what it can do through `Capabilities`; the `InteractionDispatch`
//! table maps (interaction kind, capability) to a `Reaction`, and the feature
//! systems consume the resulting `ReactionEvent`s.

pub mod hover;
pub mod magnetic;
pub mod scramble;

use std::collections::HashMap;

use bevy::prelude::*;

use crate::input::emit_interactions;
use crate::presentation::PresentationSet;

pub use hover::apply_cursor_hover;
pub use magnetic::{Magnetic, animate_magnetic, react_magnetic};
pub use scramble::{ScrambleText, animate_scramble, react_scramble};

pub struct InteractionsPlugin;

impl Plugin for InteractionsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InteractionDispatch>()
            .add_message::<ReactionEvent>()
            .add_systems(
                Update,
                (
                    dispatch_interactions
                        .in_set(PresentationSet::Interact)
                        .after(emit_interactions),
                    (apply_cursor_hover, react_magnetic, react_scramble)
                        .in_set(PresentationSet::React),
                    (animate_magnetic, animate_scramble).in_set(PresentationSet::Animate),
                ),
            );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Enter,
    Leave,
    Move,
    Click,
}

/// Something an element opts into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Grows the cursor follower while hovered
    CursorHover,
    /// Leans toward the pointer and springs back on leave
    Magnetic,
    /// Scrambles its label on enter
    Scramble,
    /// A glow spot follows the pointer inside the card
    CardGlow,
    /// Opens/closes the mobile menu
    MenuToggle,
    /// Mobile menu entry: closes the menu when clicked
    MenuLink,
}

#[derive(Component, Debug, Clone, Default)]
pub struct Capabilities(Vec<Capability>);

impl Capabilities {
    pub fn new(capabilities: &[Capability]) -> Self {
        Self(capabilities.to_vec())
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reaction {
    CursorActive(bool),
    MagneticPull,
    MagneticRelease,
    Scramble,
    CardGlow,
    ToggleMenu,
    CloseMenu,
}

/// Pointer activity over one interactive element
#[derive(Message, Debug, Clone, Copy)]
pub struct InteractionEvent {
    pub entity: Entity,
    pub kind: InteractionKind,
    /// Pointer position in viewport pixels
    pub pointer: Vec2,
    /// The element's hit rect in viewport pixels
    pub rect: Rect,
}

impl InteractionEvent {
    /// Pointer position relative to the element's top-left corner
    pub fn local(&self) -> Vec2 {
        self.pointer - self.rect.min
    }
}

/// A reaction picked by the dispatch table, addressed to one element
#[derive(Message, Debug, Clone, Copy)]
pub struct ReactionEvent {
    pub entity: Entity,
    pub reaction: Reaction,
    pub source: InteractionEvent,
}

#[derive(Resource, Debug, Clone)]
pub struct InteractionDispatch {
    table: HashMap<InteractionKind, Vec<(Capability, Reaction)>>,
}

impl InteractionDispatch {
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    pub fn register(&mut self, kind: InteractionKind, capability: Capability, reaction: Reaction) {
        self.table.entry(kind).or_default().push((capability, reaction));
    }

    /// Reactions for `kind` on an element with `capabilities`, in registration order
    pub fn reactions<'a>(
        &'a self,
        kind: InteractionKind,
        capabilities: &'a Capabilities,
    ) -> impl Iterator<Item = Reaction> + 'a {
        self.table
            .get(&kind)
            .into_iter()
            .flatten()
            .filter(|(capability, _)| capabilities.has(*capability))
            .map(|(_, reaction)| *reaction)
    }
}

impl Default for InteractionDispatch {
    /// The page's standard wiring
    fn default() -> Self {
        use Capability as C;
        use InteractionKind as K;

        let mut dispatch = Self::empty();
        dispatch.register(K::Enter, C::CursorHover, Reaction::CursorActive(true));
        dispatch.register(K::Leave, C::CursorHover, Reaction::CursorActive(false));
        dispatch.register(K::Move, C::Magnetic, Reaction::MagneticPull);
        dispatch.register(K::Leave, C::Magnetic, Reaction::MagneticRelease);
        dispatch.register(K::Enter, C::Scramble, Reaction::Scramble);
        dispatch.register(K::Move, C::CardGlow, Reaction::CardGlow);
        dispatch.register(K::Click, C::MenuToggle, Reaction::ToggleMenu);
        dispatch.register(K::Click, C::MenuLink, Reaction::CloseMenu);
        dispatch
    }
}

/// System: turn interactions into reactions via the dispatch table
pub fn dispatch_interactions(
    dispatch: Res<InteractionDispatch>,
    mut interactions: MessageReader<InteractionEvent>,
    capabilities: Query<&Capabilities>,
    mut out: MessageWriter<ReactionEvent>,
) {
    for interaction in interactions.read() {
        let Ok(caps) = capabilities.get(interaction.entity) else {
            continue;
        };
        for reaction in dispatch.reactions(interaction.kind, caps) {
            out.write(ReactionEvent {
                entity: interaction.entity,
                reaction,
                source: *interaction,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hover_only_element() {
        let dispatch = InteractionDispatch::default();
        let caps = Capabilities::new(&[Capability::CursorHover]);

        let enter: Vec<_> = dispatch.reactions(InteractionKind::Enter, &caps).collect();
        assert_eq!(enter, vec![Reaction::CursorActive(true)]);

        let leave: Vec<_> = dispatch.reactions(InteractionKind::Leave, &caps).collect();
        assert_eq!(leave, vec![Reaction::CursorActive(false)]);

        assert_eq!(dispatch.reactions(InteractionKind::Click, &caps).count(), 0);
    }

    #[test]
    fn test_magnetic_contact_button() {
        let dispatch = InteractionDispatch::default();
        let caps = Capabilities::new(&[
            Capability::CursorHover,
            Capability::Scramble,
            Capability::Magnetic,
        ]);

        let enter: Vec<_> = dispatch.reactions(InteractionKind::Enter, &caps).collect();
        assert_eq!(enter, vec![Reaction::CursorActive(true), Reaction::Scramble]);

        let leave: Vec<_> = dispatch.reactions(InteractionKind::Leave, &caps).collect();
        assert_eq!(
            leave,
            vec![Reaction::CursorActive(false), Reaction::MagneticRelease]
        );

        let moves: Vec<_> = dispatch.reactions(InteractionKind::Move, &caps).collect();
        assert_eq!(moves, vec![Reaction::MagneticPull]);
    }

    #[test]
    fn test_custom_registration() {
        let mut dispatch = InteractionDispatch::empty();
        dispatch.register(InteractionKind::Click, Capability::CardGlow, Reaction::CardGlow);
        let caps = Capabilities::new(&[Capability::CardGlow]);
        assert_eq!(dispatch.reactions(InteractionKind::Move, &caps).count(), 0);
        assert_eq!(dispatch.reactions(InteractionKind::Click, &caps).count(), 1);
    }

    #[test]
    fn test_local_position() {
        let mut world = World::new();
        let event = InteractionEvent {
            entity: world.spawn_empty().id(),
            kind: InteractionKind::Move,
            pointer: Vec2::new(130.0, 75.0),
            rect: Rect::new(100.0, 50.0, 300.0, 250.0),
        };
        assert_eq!(event.local(), Vec2::new(30.0, 25.0));
    }
}
