//! Orbit camera rig (third-person, lazy follow)
//!
//! Камера стоит на `player + (sin a, 0, cos a) * distance + (0, height, 0)`
//! и смотрит на `player + (0, eye_offset, 0)`.

use bevy::prelude::*;

use crate::config::CameraConfig;
use crate::movement::{smooth_angle, wrap_angle, FollowMode};

/// Camera position + look-at target
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Orbit camera (Resource: одна камера на walkthrough)
///
/// Хранит текущую (сглаженную) позу. Orbit angle живёт в PlayerState,
/// rig только продвигает его через [`CameraRig::advance_angle`].
#[derive(Resource, Debug, Clone)]
pub struct CameraRig {
    pub distance: f32,
    pub height: f32,
    pub eye_offset: f32,
    /// 1/s, lerp factor = smooth_rate * dt (clamp ≤ 1)
    pub smooth_rate: f32,
    pub follow_speed: f32,
    pub strafe_follow_factor: f32,
    pose: CameraPose,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl CameraRig {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            distance: config.distance,
            height: config.height,
            eye_offset: config.eye_offset,
            smooth_rate: config.smooth_rate,
            follow_speed: config.follow_speed,
            strafe_follow_factor: config.strafe_follow_factor,
            pose: CameraPose::default(),
        }
    }

    /// Текущая применённая поза
    pub fn current_pose(&self) -> CameraPose {
        self.pose
    }

    /// Целевая поза для данной позиции/угла (без сглаживания, без side effects)
    pub fn target_pose(&self, player_position: Vec3, camera_angle: f32) -> CameraPose {
        let orbit = Vec3::new(camera_angle.sin(), 0.0, camera_angle.cos()) * self.distance;
        CameraPose {
            position: player_position + orbit + Vec3::Y * self.height,
            look_at: player_position + Vec3::Y * self.eye_offset,
        }
    }

    /// `immediate` = snap (teleport), иначе exponential smoothing позиции
    pub fn pose(&mut self, player_position: Vec3, camera_angle: f32, immediate: bool, delta: f32) -> CameraPose {
        let target = self.target_pose(player_position, camera_angle);

        if immediate {
            self.pose = target;
        } else {
            let factor = lerp_factor(self.smooth_rate, delta);
            self.pose = CameraPose {
                position: self.pose.position.lerp(target.position, factor),
                look_at: target.look_at,
            };
        }

        self.pose
    }

    /// Snap на целевую позу (используется при teleport)
    pub fn snap(&mut self, player_position: Vec3, camera_angle: f32) -> CameraPose {
        self.pose(player_position, camera_angle, true, 0.0)
    }

    /// Follow speed для режима движения
    ///
    /// - Advancing → полная
    /// - Strafing / reverse-with-turn → `strafe_follow_factor` × полная
    /// - Idle / PureReverse → 0 (камера заморожена)
    pub fn follow_rate(&self, mode: FollowMode) -> f32 {
        match mode {
            FollowMode::Advancing => self.follow_speed,
            FollowMode::Strafing => self.follow_speed * self.strafe_follow_factor,
            FollowMode::Idle | FollowMode::PureReverse => 0.0,
        }
    }

    /// Продвинуть orbit angle к facing персонажа (lazy follow)
    pub fn advance_angle(&self, camera_angle: f32, facing: f32, mode: FollowMode, delta: f32) -> f32 {
        let rate = self.follow_rate(mode);
        if rate <= 0.0 {
            return camera_angle;
        }
        wrap_angle(smooth_angle(camera_angle, facing, rate * delta))
    }
}

/// `rate * delta`, clamp в [0, 1] (delta после stall может быть огромным)
fn lerp_factor(rate: f32, delta: f32) -> f32 {
    let factor = rate * delta;
    if factor.is_nan() {
        0.0
    } else {
        factor.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::shortest_arc;
    use std::f32::consts::FRAC_PI_2;

    fn rig() -> CameraRig {
        CameraRig {
            distance: 6.0,
            height: 3.0,
            eye_offset: 1.5,
            smooth_rate: 8.0,
            follow_speed: 2.0,
            strafe_follow_factor: 0.6,
            pose: CameraPose::default(),
        }
    }

    #[test]
    fn test_target_pose_orbit_formula() {
        let player = Vec3::new(1.0, 0.0, 2.0);
        let pose = rig().target_pose(player, FRAC_PI_2);

        assert!((pose.position - Vec3::new(7.0, 3.0, 2.0)).length() < 1e-5, "{:?}", pose.position);
        assert_eq!(pose.look_at, Vec3::new(1.0, 1.5, 2.0));
    }

    #[test]
    fn test_immediate_snaps() {
        let mut rig = rig();
        let pose = rig.pose(Vec3::new(10.0, 0.0, 0.0), 0.0, true, 0.0);
        assert_eq!(pose.position, Vec3::new(10.0, 3.0, 6.0));
        assert_eq!(rig.current_pose(), pose);
    }

    #[test]
    fn test_smoothed_follow_moves_partially() {
        let mut rig = rig();
        rig.snap(Vec3::ZERO, 0.0);

        // factor = 8 * 0.05 = 0.4
        let pose = rig.pose(Vec3::new(10.0, 0.0, 0.0), 0.0, false, 0.05);
        assert!((pose.position.x - 4.0).abs() < 1e-4, "x = {}", pose.position.x);
        // look-at не сглаживается
        assert_eq!(pose.look_at, Vec3::new(10.0, 1.5, 0.0));
    }

    #[test]
    fn test_huge_delta_does_not_overshoot() {
        let mut rig = rig();
        rig.snap(Vec3::ZERO, 0.0);

        let pose = rig.pose(Vec3::new(10.0, 0.0, 0.0), 0.0, false, 30.0);
        assert_eq!(pose.position, rig.target_pose(Vec3::new(10.0, 0.0, 0.0), 0.0).position);
    }

    #[test]
    fn test_follow_rates_per_mode() {
        let rig = rig();
        assert_eq!(rig.follow_rate(FollowMode::Advancing), 2.0);
        assert!((rig.follow_rate(FollowMode::Strafing) - 1.2).abs() < 1e-6);
        assert_eq!(rig.follow_rate(FollowMode::Idle), 0.0);
        assert_eq!(rig.follow_rate(FollowMode::PureReverse), 0.0);
    }

    #[test]
    fn test_camera_frozen_while_idle_or_pure_reverse() {
        let rig = rig();
        assert_eq!(rig.advance_angle(0.4, 2.0, FollowMode::Idle, 0.1), 0.4);
        assert_eq!(rig.advance_angle(0.4, 2.0, FollowMode::PureReverse, 0.1), 0.4);
    }

    #[test]
    fn test_lazy_follow_never_faster_than_follow_speed() {
        let rig = rig();
        let delta = 0.1;

        let advancing = rig.advance_angle(0.0, 1.0, FollowMode::Advancing, delta);
        let strafing = rig.advance_angle(0.0, 1.0, FollowMode::Strafing, delta);

        // progress 0.2 и 0.12 от дуги 1.0
        assert!((advancing - 0.2).abs() < 1e-5);
        assert!((strafing - 0.12).abs() < 1e-5);
        assert!(strafing < advancing);
    }

    #[test]
    fn test_follow_wraps_through_pi() {
        let rig = rig();
        let next = rig.advance_angle(3.0, -3.0, FollowMode::Advancing, 0.5);
        // Полный шаг (progress 1.0) по кратчайшей дуге через π
        assert!(shortest_arc(next, -3.0).abs() < 1e-4);
        assert!(next > -std::f32::consts::PI && next <= std::f32::consts::PI);
    }
}
