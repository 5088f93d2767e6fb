//! Door placement: pure функции (category, index, total, layout) → pose
//!
//! Category A (formation): боковая стена (x = -width/2), двери от входа вглубь.
//! Category B (travail): задняя стена (z = -depth/2), слева направо.
//! Вход в комнату: со стороны +Z.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use super::room::RoomLayout;
use crate::config::LayoutConfig;
use crate::data::Category;

/// Поза двери в локальных координатах комнаты
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorPlacement {
    pub position: Vec3,
    pub rotation_y: f32,
}

/// Side wall: index 0 ближе всего к входу, последний: глубже всего
pub fn place_side_wall_door(index: usize, total: usize, layout: &RoomLayout, config: &LayoutConfig) -> DoorPlacement {
    let wall_x = -layout.half_width();
    let available_depth = (layout.depth - config.entry_and_back_margin).max(0.0);
    let spacing = available_depth / total.max(1) as f32;
    let start_z = layout.half_depth() - config.half_margin;

    DoorPlacement {
        position: Vec3::new(wall_x, 0.0, start_z - index as f32 * spacing),
        rotation_y: FRAC_PI_2, // лицом внутрь комнаты
    }
}

/// Back wall: index 0 на `-available/2`, последний на `+available/2`
///
/// `max(total - 1, 1)`: одна дверь не делит на ноль.
pub fn place_back_wall_door(index: usize, total: usize, layout: &RoomLayout, config: &LayoutConfig) -> DoorPlacement {
    let wall_z = -layout.half_depth();
    let available_width = (layout.width - config.side_margins).max(0.0);
    let spacing = available_width / total.saturating_sub(1).max(1) as f32;
    let start_x = -available_width * 0.5;

    DoorPlacement {
        position: Vec3::new(start_x + index as f32 * spacing, 0.0, wall_z),
        rotation_y: 0.0, // лицом к входящему
    }
}

/// Dispatch по категории
pub fn place_door(
    category: Category,
    index: usize,
    total: usize,
    layout: &RoomLayout,
    config: &LayoutConfig,
) -> DoorPlacement {
    match category {
        Category::Formation => place_side_wall_door(index, total, layout, config),
        Category::Travail => place_back_wall_door(index, total, layout, config),
    }
}
