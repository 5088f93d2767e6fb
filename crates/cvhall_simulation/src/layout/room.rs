//! Room dimensions из количества дверей по категориям
//!
//! ```text
//! width  = clamp(n2 * min_spacing + width_margin, min_width, max_width)
//! depth  = clamp(n1 * min_spacing + depth_margin, min_depth, max_depth)
//! height = fixed
//! ```

use crate::config::LayoutConfig;

/// Размеры комнаты (immutable после создания)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomLayout {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl RoomLayout {
    /// `side_count` (n1, category A) → depth, `back_count` (n2, category B) → width
    pub fn from_counts(side_count: usize, back_count: usize, config: &LayoutConfig) -> Self {
        let width = clamp_dimension(
            back_count as f32 * config.min_spacing + config.width_margin,
            config.min_width,
            config.max_width,
        );
        let depth = clamp_dimension(
            side_count as f32 * config.min_spacing + config.depth_margin,
            config.min_depth,
            config.max_depth,
        );

        Self {
            width,
            depth,
            height: config.height.max(0.0),
        }
    }

    pub fn half_width(&self) -> f32 {
        self.width * 0.5
    }

    pub fn half_depth(&self) -> f32 {
        self.depth * 0.5
    }
}

/// `max(lo, min(hi, v))`, плюс floor 0: отрицательный размер невозможен даже при кривом конфиге
pub fn clamp_dimension(value: f32, lo: f32, hi: f32) -> f32 {
    lo.max(hi.min(value)).max(0.0)
}
