//! Navigation tunables (movement, camera, proximity radii, layout constants)
//!
//! Все константы: конфигурация, не derived. `Default` несёт значения,
//! с которыми walkthrough откалиброван; JSON-файл может переопределить любую
//! секцию частично (`#[serde(default)]` на каждом уровне).

use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use crate::input::KeyboardLayout;

/// Ошибки загрузки конфигурации
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Корневой конфиг навигации (Bevy Resource)
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub movement: MovementConfig,
    pub camera: CameraConfig,
    pub proximity: ProximityConfig,
    pub layout: LayoutConfig,
    /// Фиксированная точка спавна в hall (exit() телепортирует сюда)
    pub hall_spawn: [f32; 3],
    /// Upper bound для frame delta (после stall / background tab)
    pub max_frame_delta: f32,
    /// Teleporter self-rotation (rad/s)
    pub teleporter_spin_speed: f32,
    pub keyboard_layout: KeyboardLayout,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            movement: MovementConfig::default(),
            camera: CameraConfig::default(),
            proximity: ProximityConfig::default(),
            layout: LayoutConfig::default(),
            hall_spawn: [0.0, 0.0, 8.0],
            max_frame_delta: 0.1,
            teleporter_spin_speed: 1.5,
            keyboard_layout: KeyboardLayout::Qwerty,
        }
    }
}

impl NavigationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn hall_spawn(&self) -> Vec3 {
        Vec3::from_array(self.hall_spawn)
    }

    /// Clamp hostile frame delta в [0, max_frame_delta]
    pub fn clamp_delta(&self, delta: f32) -> f32 {
        if !delta.is_finite() {
            return 0.0;
        }
        delta.clamp(0.0, self.max_frame_delta.max(0.0))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// m/s
    pub move_speed: f32,
    /// Progress fraction per second для OrientationSmoother (facing)
    pub turn_rate: f32,
    /// Отступ от стен для room-bounds collision
    pub player_radius: f32,
    pub collide_with_walls: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            turn_rate: 10.0,
            player_radius: 0.5,
            collide_with_walls: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f32,
    pub height: f32,
    /// Look-at высота над позицией игрока
    pub eye_offset: f32,
    /// Position smoothing rate (1/s)
    pub smooth_rate: f32,
    /// Orbit-angle follow speed while advancing (progress fraction per second)
    pub follow_speed: f32,
    /// Множитель follow_speed при strafe / reverse-with-turn
    pub strafe_follow_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 6.0,
            height: 3.0,
            eye_offset: 1.5,
            smooth_rate: 8.0,
            follow_speed: 2.0,
            strafe_follow_factor: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    pub door_radius: f32,
    pub exhibit_radius: f32,
    pub teleporter_radius: f32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            door_radius: 2.5,
            exhibit_radius: 1.5,
            teleporter_radius: 2.0,
        }
    }
}

/// Константы SpatialLayoutGenerator
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub min_spacing: f32,
    pub width_margin: f32,
    pub depth_margin: f32,
    pub min_width: f32,
    pub max_width: f32,
    pub min_depth: f32,
    pub max_depth: f32,
    pub height: f32,
    /// Side wall: суммарный отступ у входа и у задней стены
    pub entry_and_back_margin: f32,
    /// Side wall: отступ первой двери от передней стены
    pub half_margin: f32,
    /// Back wall: суммарный отступ от боковых стен
    pub side_margins: f32,
    /// Sub-room: высота пьедестала exhibit cube
    pub exhibit_height: f32,
    /// Sub-room: entry point отступ от передней стены
    pub entry_offset: f32,
    /// Sub-room: teleporter отступ от передней стены
    pub teleporter_offset: f32,
    pub teleporter_height: f32,
    /// Мировой origin сгенерированной sub-room
    pub sub_room_origin: [f32; 3],
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_spacing: 4.0,
            width_margin: 8.0,
            depth_margin: 10.0,
            min_width: 16.0,
            max_width: 60.0,
            min_depth: 20.0,
            max_depth: 80.0,
            height: 6.0,
            entry_and_back_margin: 8.0,
            half_margin: 4.0,
            side_margins: 8.0,
            exhibit_height: 1.0,
            entry_offset: 3.5,
            teleporter_offset: 1.0,
            teleporter_height: 0.5,
            sub_room_origin: [0.0, 0.0, -200.0],
        }
    }
}

impl LayoutConfig {
    pub fn sub_room_origin(&self) -> Vec3 {
        Vec3::from_array(self.sub_room_origin)
    }
}
