use bevy::prelude::*;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera);
    }
}

/// The page is pure UI; a 2D camera is all it needs to be drawn
fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Logical size of the primary window, in the same pixels pointer samples use
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportMetrics {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl ViewportMetrics {
    pub fn is_narrower_than(&self, breakpoint: f32) -> bool {
        self.width < breakpoint
    }
}

/// Update viewport metrics when the window is resized
pub fn track_viewport(mut metrics: ResMut<ViewportMetrics>, windows: Query<&Window>) {
    let Ok(window) = windows.single() else {
        return;
    };

    let width = window.width();
    let height = window.height();

    // Only touch the resource when the size actually changed
    if (width - metrics.width).abs() > 0.5 || (height - metrics.height).abs() > 0.5 {
        metrics.width = width;
        metrics.height = height;
        debug!("Viewport resized to {}x{}", width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint_is_exclusive() {
        let metrics = ViewportMetrics {
            width: 1024.0,
            height: 700.0,
        };
        assert!(!metrics.is_narrower_than(1024.0));
        assert!(metrics.is_narrower_than(1025.0));
    }
}
