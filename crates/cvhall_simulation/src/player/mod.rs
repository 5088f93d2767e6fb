//! Player state: один avatar на walkthrough
//!
//! Создаётся один раз при старте, мутируется каждый frame:
//! - position/velocity/facing: MovementController
//! - camera_angle: CameraRig::advance_angle
//! - teleport: RoomTransitionManager (enter/exit)

use bevy::prelude::*;

use crate::camera::CameraRig;

/// Состояние игрока (Resource)
///
/// Инварианты:
/// - `facing` и `camera_angle` меняются только через OrientationSmoother (или teleport)
/// - `velocity` пересчитывается каждый frame, никогда не накапливается
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Wrapped в (-π, π]
    pub facing: f32,
    /// Orbit angle камеры, независим от facing
    pub camera_angle: f32,
}

impl PlayerState {
    pub fn spawned_at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            facing: 0.0,
            camera_angle: 0.0,
        }
    }

    /// Teleport (enter/exit): позиция + сброс ориентации, камера snap за спину
    pub fn teleport(&mut self, position: Vec3, camera: &mut CameraRig) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.facing = 0.0;
        self.camera_angle = 0.0;
        camera.snap(self.position, self.camera_angle);
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::spawned_at(Vec3::ZERO)
    }
}
