use bevy::prelude::*;

use super::{NAV_Z, OVERLAY_Z, label, text_width};
use crate::camera::ViewportMetrics;
use crate::config::PresentationConfig;
use crate::input::{HitSpace, Hitbox};
use crate::interactions::{Capabilities, Capability, Magnetic, Reaction, ReactionEvent, ScrambleText};
use crate::scroll::SmoothScroll;

/// Below this width the nav collapses into the hamburger
pub const NAV_BREAKPOINT: f32 = 768.0;

const NAV_LEFT: f32 = 24.0;
const LINK_FONT_SIZE: f32 = 18.0;
const LINK_GAP: f32 = 36.0;
const CONTACT_PADDING: Vec2 = Vec2::new(22.0, 10.0);
const HAMBURGER_SIZE: Vec2 = Vec2::new(32.0, 24.0);
const MOBILE_LINK_FONT_SIZE: f32 = 40.0;
const MOBILE_LINKS_TOP: f32 = 140.0;
const MOBILE_LINK_SPACING: f32 = 72.0;

#[derive(Resource, Debug, Default)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        if self.open != open {
            self.open = open;
        }
    }
}

/// Which nav layout an element belongs to
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavVariant {
    Desktop,
    Mobile,
}

#[derive(Component)]
pub struct MobileOverlay;

#[derive(Component)]
pub struct MobileLink;

fn text_rect(left: f32, top: f32, text: &str, font_size: f32) -> Rect {
    Rect::new(
        left,
        top,
        left + text_width(text, font_size),
        top + font_size * 1.2,
    )
}

/// Fixed nav bar, plus the hamburger and its overlay when enabled
pub fn spawn_nav(commands: &mut Commands, config: &PresentationConfig) {
    let nav = &config.page.nav;
    let text_top = (nav.height - LINK_FONT_SIZE * 1.2) * 0.5;

    let bar = commands
        .spawn((
            Name::new("Nav"),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                width: Val::Percent(100.0),
                height: Val::Px(nav.height),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.35)),
            // Covers the page under the bar; no capabilities of its own
            Hitbox::new(
                Rect::new(0.0, 0.0, f32::MAX, nav.height),
                HitSpace::Viewport,
                NAV_Z,
            ),
            GlobalZIndex(NAV_Z),
        ))
        .id();

    let mut x = NAV_LEFT;
    for link in &nav.links {
        commands.spawn((
            label(link, LINK_FONT_SIZE, Color::WHITE, x, text_top),
            ScrambleText::new(link, &config.scramble),
            Hitbox::new(text_rect(x, text_top, link, LINK_FONT_SIZE), HitSpace::Viewport, NAV_Z),
            Capabilities::new(&[Capability::CursorHover, Capability::Scramble]),
            NavVariant::Desktop,
            ChildOf(bar),
        ));
        x += text_width(link, LINK_FONT_SIZE) + LINK_GAP;
    }

    // Contact button: the text node carries its own padding and background
    let contact = &nav.contact_label;
    let contact_top = text_top - CONTACT_PADDING.y;
    let contact_size =
        Vec2::new(text_width(contact, LINK_FONT_SIZE), LINK_FONT_SIZE * 1.2) + CONTACT_PADDING * 2.0;
    commands.spawn((
        Text::new(contact),
        TextFont {
            font_size: LINK_FONT_SIZE,
            ..default()
        },
        TextColor(Color::BLACK),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(x),
            top: Val::Px(contact_top),
            padding: UiRect::axes(Val::Px(CONTACT_PADDING.x), Val::Px(CONTACT_PADDING.y)),
            ..default()
        },
        BackgroundColor(Color::srgb(0.85, 0.9, 1.0)),
        ScrambleText::new(contact, &config.scramble),
        Magnetic::new(Vec2::new(x, contact_top)),
        Hitbox::new(
            Rect::from_corners(Vec2::new(x, contact_top), Vec2::new(x, contact_top) + contact_size),
            HitSpace::Viewport,
            NAV_Z,
        ),
        Capabilities::new(&[
            Capability::CursorHover,
            Capability::Magnetic,
            Capability::Scramble,
        ]),
        NavVariant::Desktop,
        ChildOf(bar),
    ));

    if nav.hamburger {
        spawn_mobile_menu(commands, config);
    }
}

fn spawn_mobile_menu(commands: &mut Commands, config: &PresentationConfig) {
    let nav = &config.page.nav;
    let top = (nav.height - HAMBURGER_SIZE.y) * 0.5;

    let hamburger = commands
        .spawn((
            Name::new("Hamburger"),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(NAV_LEFT),
                top: Val::Px(top),
                width: Val::Px(HAMBURGER_SIZE.x),
                height: Val::Px(HAMBURGER_SIZE.y),
                display: Display::None,
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::SpaceBetween,
                ..default()
            },
            Hitbox::new(
                Rect::from_corners(Vec2::new(NAV_LEFT, top), Vec2::new(NAV_LEFT, top) + HAMBURGER_SIZE),
                HitSpace::Viewport,
                OVERLAY_Z + 10,
            ),
            Capabilities::new(&[Capability::CursorHover, Capability::MenuToggle]),
            NavVariant::Mobile,
            GlobalZIndex(OVERLAY_Z + 1),
        ))
        .id();
    for _ in 0..3 {
        commands.spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Px(3.0),
                ..default()
            },
            BackgroundColor(Color::WHITE),
            ChildOf(hamburger),
        ));
    }

    let mut cover = Hitbox::new(Rect::new(0.0, 0.0, f32::MAX, f32::MAX), HitSpace::Viewport, OVERLAY_Z);
    cover.enabled = false;
    let overlay = commands
        .spawn((
            MobileOverlay,
            cover,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                display: Display::None,
                ..default()
            },
            BackgroundColor(Color::srgba(0.02, 0.02, 0.04, 0.96)),
            GlobalZIndex(OVERLAY_Z),
        ))
        .id();

    for (i, link) in nav.mobile_links.iter().enumerate() {
        let top = MOBILE_LINKS_TOP + i as f32 * MOBILE_LINK_SPACING;
        let mut hitbox = Hitbox::new(
            text_rect(NAV_LEFT, top, link, MOBILE_LINK_FONT_SIZE),
            HitSpace::Viewport,
            OVERLAY_Z,
        );
        hitbox.enabled = false;
        commands.spawn((
            MobileLink,
            label(link, MOBILE_LINK_FONT_SIZE, Color::WHITE, NAV_LEFT, top),
            hitbox,
            Capabilities::new(&[Capability::CursorHover, Capability::MenuLink]),
            ChildOf(overlay),
        ));
    }
}

/// System: hamburger clicks toggle the menu, mobile link clicks close it
pub fn react_menu(mut reactions: MessageReader<ReactionEvent>, mut menu: ResMut<MenuState>) {
    for event in reactions.read() {
        match event.reaction {
            Reaction::ToggleMenu => {
                let open = !menu.is_open();
                menu.set_open(open);
            }
            Reaction::CloseMenu if menu.is_open() => menu.set_open(false),
            _ => {}
        }
    }
}

/// System: swap between desktop links and the hamburger at the breakpoint
pub fn apply_nav_breakpoint(
    metrics: Res<ViewportMetrics>,
    mut menu: ResMut<MenuState>,
    mut elements: Query<(&NavVariant, &mut Node, &mut Hitbox)>,
    mut narrow_before: Local<Option<bool>>,
) {
    let narrow = metrics.is_narrower_than(NAV_BREAKPOINT);
    if *narrow_before == Some(narrow) {
        return;
    }
    *narrow_before = Some(narrow);

    for (variant, mut node, mut hitbox) in &mut elements {
        let visible = (*variant == NavVariant::Mobile) == narrow;
        node.display = if visible { Display::Flex } else { Display::None };
        hitbox.enabled = visible;
    }

    // The overlay can't be closed once the hamburger is gone
    if !narrow && menu.is_open() {
        menu.set_open(false);
    }
}

/// System: show the overlay and hold the page still while the menu is open.
/// The open overlay's hit area covers everything beneath it.
pub fn sync_menu(
    menu: Res<MenuState>,
    mut scroll: ResMut<SmoothScroll>,
    mut overlays: Query<&mut Node, With<MobileOverlay>>,
    mut links: Query<&mut Hitbox, Or<(With<MobileLink>, With<MobileOverlay>)>>,
) {
    if !menu.is_changed() {
        return;
    }
    let open = menu.is_open();

    if open {
        scroll.stop();
    } else {
        scroll.start();
    }
    for mut node in &mut overlays {
        node.display = if open { Display::Flex } else { Display::None };
    }
    for mut hitbox in &mut links {
        hitbox.enabled = open;
    }
    debug!("Mobile menu {}", if open { "opened" } else { "closed" });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_close() {
        let mut menu = MenuState::default();
        assert!(!menu.is_open());
        menu.set_open(!menu.is_open());
        assert!(menu.is_open());
        menu.set_open(false);
        assert!(!menu.is_open());
    }

    #[test]
    fn test_text_rect_covers_label() {
        let rect = text_rect(24.0, 10.0, "About", 20.0);
        assert_eq!(rect.min, Vec2::new(24.0, 10.0));
        assert_eq!(rect.width(), 60.0);
        assert_eq!(rect.height(), 24.0);
    }
}
