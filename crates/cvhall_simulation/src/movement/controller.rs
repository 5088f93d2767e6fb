//! MovementController: input vector + camera heading → position/facing
//!
//! Pure step: читает текущее состояние, возвращает outcome. Записывает в
//! PlayerState вызывающий (player_movement_system), только если `moved`.

use std::f32::consts::{FRAC_PI_2, PI};

use bevy::prelude::*;

use super::collision::CollisionPredicate;
use super::orientation::{smooth_angle, wrap_angle};
use crate::config::MovementConfig;

/// Режим движения за кадр: определяет скорость lazy-follow камеры
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowMode {
    /// Нет input: камера заморожена
    Idle,
    /// Чистый назад (S без A/D): камера заморожена, персонаж разворачивается к камере
    PureReverse,
    /// Net-advancing (W, W+A, W+D): полная follow speed
    Advancing,
    /// Strafe (A/D) или reverse-with-turn (S+A/S+D): уменьшенная follow speed
    Strafing,
}

impl FollowMode {
    /// Классификация input (`x` = strafe, `y` = forward/back, +y = назад)
    pub fn classify(input: Vec2) -> Self {
        if is_zero_input(input) {
            FollowMode::Idle
        } else if is_pure_backward(input) {
            FollowMode::PureReverse
        } else if input.y < 0.0 {
            FollowMode::Advancing
        } else {
            FollowMode::Strafing
        }
    }
}

/// Результат одного шага движения
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementOutcome {
    pub position: Vec3,
    /// Wrapped в (-π, π]
    pub facing: f32,
    /// direction * move_speed (ноль если idle или blocked), пересчитывается каждый кадр
    pub velocity: Vec3,
    /// Был ненулевой input. false → state не трогаем вообще
    pub moved: bool,
    /// Collision predicate отклонил перемещение (facing всё равно поворачивается)
    pub blocked: bool,
    pub mode: FollowMode,
}

impl MovementOutcome {
    /// Режим для lazy-follow камеры: упёрся в стену = стоит на месте, камера заморожена
    pub fn camera_mode(&self) -> FollowMode {
        if self.blocked {
            FollowMode::Idle
        } else {
            self.mode
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementController {
    /// m/s
    pub move_speed: f32,
    /// Progress fraction per second
    pub turn_rate: f32,
}

impl Default for MovementController {
    fn default() -> Self {
        Self::from_config(&MovementConfig::default())
    }
}

impl MovementController {
    pub fn from_config(config: &MovementConfig) -> Self {
        Self {
            move_speed: config.move_speed,
            turn_rate: config.turn_rate,
        }
    }

    /// Один шаг движения
    ///
    /// # Arguments
    /// - `input`: pre-normalized vector, `x` ∈ [-1,1] strafe (+ = вправо), `y` ∈ [-1,1] (+ = назад)
    /// - `camera_angle`: orbit angle камеры (камера стоит в `(sin a, 0, cos a)` от игрока)
    /// - `delta`: уже clamped frame delta
    /// - `collision`: `None` = fail-open
    pub fn step(
        &self,
        input: Vec2,
        position: Vec3,
        facing: f32,
        camera_angle: f32,
        delta: f32,
        collision: Option<&dyn CollisionPredicate>,
    ) -> MovementOutcome {
        let mode = FollowMode::classify(input);

        if mode == FollowMode::Idle {
            return MovementOutcome {
                position,
                facing,
                velocity: Vec3::ZERO,
                moved: false,
                blocked: false,
                mode,
            };
        }

        let direction = world_direction(input, camera_angle);
        let velocity = direction * self.move_speed;
        let candidate = position + velocity * delta;

        let blocked = collision.is_some_and(|predicate| predicate.collides(candidate));
        let (new_position, velocity) = if blocked {
            (position, Vec3::ZERO)
        } else {
            (candidate, velocity)
        };

        // Pure backward: ровно обратный heading камеры (персонаж смотрит в камеру)
        let target_facing = if mode == FollowMode::PureReverse {
            camera_angle + PI
        } else {
            facing_for_direction(direction)
        };

        let new_facing = wrap_angle(smooth_angle(facing, target_facing, self.turn_rate * delta));

        MovementOutcome {
            position: new_position,
            facing: new_facing,
            velocity,
            moved: true,
            blocked,
            mode,
        }
    }
}

/// World-space направление движения (unit length, или ZERO для нулевого input)
///
/// forward = `(sin a, 0, cos a) * input.y`, strafe = `(sin(a+π/2), 0, cos(a+π/2)) * input.x`.
pub fn world_direction(input: Vec2, camera_angle: f32) -> Vec3 {
    let forward = Vec3::new(camera_angle.sin(), 0.0, camera_angle.cos()) * input.y;
    let strafe_angle = camera_angle + FRAC_PI_2;
    let strafe = Vec3::new(strafe_angle.sin(), 0.0, strafe_angle.cos()) * input.x;

    let sum = forward + strafe;
    let length = sum.length();
    if length > 0.0 {
        sum / length
    } else {
        Vec3::ZERO
    }
}

/// Facing, при котором персонаж смотрит вдоль `direction`
pub fn facing_for_direction(direction: Vec3) -> f32 {
    (-direction.x).atan2(-direction.z)
}

fn is_zero_input(input: Vec2) -> bool {
    // NaN от input source трактуем как "нет движения"
    input.is_nan() || input == Vec2::ZERO
}

/// Строгое `x == 0`: keyboard input даёт точные нули, аналоговый drift сюда не попадает
fn is_pure_backward(input: Vec2) -> bool {
    input.y > 0.0 && input.x == 0.0
}
