pub mod easing;
pub mod timeline;
pub mod tween;

pub use easing::Ease;
pub use timeline::{Placement, Timeline};
pub use tween::{Tween, Vec2Tween};
