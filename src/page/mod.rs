//! The page itself: sections stacked in a scrolled root, a fixed nav bar and
//! the cursor layer, plus the scroll-bound animations attached to them.

pub mod cards;
pub mod hero;
pub mod menu;
pub mod parallax;
pub mod portal;
pub mod reveal;

use bevy::prelude::*;

use crate::camera::ViewportMetrics;
use crate::config::{PageLayout, PresentationConfig, SectionKind};
use crate::presentation::{PresentationSet, PresentationStartup};
use crate::scroll::SmoothScroll;
use crate::trail::{CursorFollower, TrailContainer};

/// Left edge of section content
pub const CONTENT_LEFT: f32 = 80.0;

/// Top of section content, relative to the section
pub const CONTENT_TOP: f32 = 140.0;

/// Rough advance per character, as a fraction of the font size
const CHAR_WIDTH_FACTOR: f32 = 0.6;

/// Stacking order of the fixed layers
pub const NAV_Z: i32 = 10;
pub const OVERLAY_Z: i32 = 20;
pub const CURSOR_Z: i32 = 100;

pub struct PagePlugin;

impl Plugin for PagePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<menu::MenuState>()
            .add_systems(Startup, setup_page.in_set(PresentationStartup::Page))
            .add_systems(
                Update,
                (
                    update_scroll_limit.in_set(PresentationSet::Tick),
                    (menu::react_menu, cards::react_card_glow).in_set(PresentationSet::React),
                    (
                        hero::animate_hero.run_if(resource_exists::<hero::HeroTimeline>),
                        reveal::drive_reveals,
                        parallax::scrub_parallax,
                        portal::scrub_marquee,
                        portal::pulse_portal,
                        cards::float_cards,
                        cards::animate_card_glow,
                        menu::apply_nav_breakpoint,
                    )
                        .in_set(PresentationSet::Animate),
                    (apply_page_scroll, reveal::apply_reveals, menu::sync_menu)
                        .in_set(PresentationSet::Render),
                ),
            );
    }
}

#[derive(Component)]
pub struct PageRoot;

/// One section of the page, in page pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionSlot {
    pub kind: SectionKind,
    pub top: f32,
    pub height: f32,
}

impl SectionSlot {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Vertical layout of the page
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub sections: Vec<SectionSlot>,
    pub height: f32,
}

impl PageGeometry {
    pub fn from_layout(layout: &PageLayout) -> Self {
        let mut top = 0.0;
        let sections = layout
            .sections
            .iter()
            .map(|spec| {
                let slot = SectionSlot {
                    kind: spec.kind,
                    top,
                    height: spec.height,
                };
                top = slot.bottom();
                slot
            })
            .collect();
        Self {
            sections,
            height: top,
        }
    }

    /// Furthest the page can scroll with a viewport this tall
    pub fn scroll_limit(&self, viewport_height: f32) -> f32 {
        (self.height - viewport_height).max(0.0)
    }
}

/// Approximate rendered width of `text` at `font_size`
pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * CHAR_WIDTH_FACTOR
}

pub fn rgb([r, g, b]: [f32; 3]) -> Color {
    Color::srgb(r, g, b)
}

/// Absolutely positioned text node
pub fn label(text: &str, font_size: f32, color: Color, left: f32, top: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(color),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(left),
            top: Val::Px(top),
            ..default()
        },
    )
}

/// System: spawn the page from the layout config
pub fn setup_page(mut commands: Commands, config: Res<PresentationConfig>) {
    let layout = &config.page;
    let geometry = PageGeometry::from_layout(layout);

    let root = commands
        .spawn((
            PageRoot,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                width: Val::Percent(100.0),
                height: Val::Px(geometry.height),
                flex_direction: FlexDirection::Column,
                ..default()
            },
        ))
        .id();

    for (index, (spec, slot)) in layout.sections.iter().zip(&geometry.sections).enumerate() {
        let section = commands
            .spawn((
                Name::new(format!("Section {index} ({:?})", spec.kind)),
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Px(slot.height),
                    flex_shrink: 0.0,
                    overflow: Overflow::clip(),
                    ..default()
                },
                BackgroundColor(rgb(spec.color)),
                ChildOf(root),
            ))
            .id();

        match spec.kind {
            SectionKind::Hero => hero::spawn_hero(&mut commands, section, spec, &config),
            SectionKind::Insights => {
                reveal::spawn_insights(&mut commands, section, slot, spec, &config)
            }
            SectionKind::TypographyPortal => {
                portal::spawn_portal(&mut commands, section, slot, spec, &config)
            }
            SectionKind::Services | SectionKind::VisualHook | SectionKind::Plain => {
                let content = reveal::spawn_section_reveal(
                    &mut commands,
                    section,
                    slot,
                    spec,
                    &config.reveal.sections,
                );
                match spec.kind {
                    SectionKind::Services => {
                        cards::spawn_services(&mut commands, content, slot, spec, &config)
                    }
                    SectionKind::VisualHook => {
                        parallax::spawn_visual_hook(&mut commands, content, slot, spec, &config)
                    }
                    _ => {
                        commands.spawn((
                            label(&spec.title, 56.0, Color::WHITE, CONTENT_LEFT, CONTENT_TOP),
                            ChildOf(content),
                        ));
                    }
                }
            }
        }
    }

    menu::spawn_nav(&mut commands, &config);
    spawn_cursor_layer(&mut commands, layout, &config);

    info!(
        "Page built: {} sections, {}px tall",
        geometry.sections.len(),
        geometry.height
    );
    commands.insert_resource(geometry);
}

/// Cursor follower and trail container, above everything else
fn spawn_cursor_layer(commands: &mut Commands, layout: &PageLayout, config: &PresentationConfig) {
    if layout.trail_container {
        commands.spawn((
            TrailContainer,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            GlobalZIndex(CURSOR_Z),
        ));
    }

    if layout.cursor_follower {
        let [r, g, b, a] = config.trail.cursor_color;
        commands.spawn((
            CursorFollower,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Px(config.trail.cursor_size),
                height: Val::Px(config.trail.cursor_size),
                ..default()
            },
            BackgroundColor(Color::srgba(r, g, b, a)),
            GlobalZIndex(CURSOR_Z + 1),
        ));
    }
}

/// System: keep the scroll limit in step with the page and viewport heights
pub fn update_scroll_limit(
    geometry: Option<Res<PageGeometry>>,
    metrics: Res<ViewportMetrics>,
    mut scroll: ResMut<SmoothScroll>,
) {
    let Some(geometry) = geometry else {
        return;
    };
    let limit = geometry.scroll_limit(metrics.height);
    if (limit - scroll.limit()).abs() > f32::EPSILON {
        scroll.set_limit(limit);
    }
}

/// System: move the page root by the smoothed scroll offset
pub fn apply_page_scroll(scroll: Res<SmoothScroll>, mut roots: Query<&mut Node, With<PageRoot>>) {
    let Ok(mut node) = roots.single_mut() else {
        return;
    };
    node.top = Val::Px(-scroll.scroll());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_stack_top_to_bottom() {
        let geometry = PageGeometry::from_layout(&PresentationConfig::default().page);
        let mut expected_top = 0.0;
        for slot in &geometry.sections {
            assert_eq!(slot.top, expected_top);
            expected_top = slot.bottom();
        }
        assert_eq!(geometry.height, expected_top);
    }

    #[test]
    fn test_scroll_limit_never_negative() {
        let geometry = PageGeometry::from_layout(&PresentationConfig::default().page);
        assert_eq!(geometry.scroll_limit(geometry.height + 500.0), 0.0);
        assert_eq!(geometry.scroll_limit(800.0), geometry.height - 800.0);
    }

    #[test]
    fn test_text_width_scales_with_font() {
        assert_eq!(text_width("ABCD", 10.0), 24.0);
        assert_eq!(text_width("", 40.0), 0.0);
    }
}
