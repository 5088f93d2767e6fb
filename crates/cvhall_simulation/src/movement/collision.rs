//! Collision predicate (optional, fail-open)
//!
//! Отсутствие predicate = "никогда не коллайдим". Ошибкой это не является.

use bevy::prelude::*;

/// `(candidate_position) -> collides?`
pub trait CollisionPredicate {
    fn collides(&self, candidate: Vec3) -> bool;
}

impl<F> CollisionPredicate for F
where
    F: Fn(Vec3) -> bool,
{
    fn collides(&self, candidate: Vec3) -> bool {
        self(candidate)
    }
}

/// Внутренний AABB комнаты на XZ (стены минус player radius)
///
/// Коллизия = кандидат вне AABB. Y игнорируется (пол плоский).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl RoomBounds {
    /// Bounds комнаты `width × depth` с центром в `origin`, сжатые на `inset`
    ///
    /// Если inset больше половины размера: bounds схлопываются в центр (не инвертируются).
    pub fn from_room(origin: Vec3, width: f32, depth: f32, inset: f32) -> Self {
        let half_x = (width * 0.5 - inset).max(0.0);
        let half_z = (depth * 0.5 - inset).max(0.0);
        let center = Vec2::new(origin.x, origin.z);
        Self {
            min: center - Vec2::new(half_x, half_z),
            max: center + Vec2::new(half_x, half_z),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.y && point.z <= self.max.y
    }
}

impl CollisionPredicate for RoomBounds {
    fn collides(&self, candidate: Vec3) -> bool {
        !self.contains(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_bounds_inset() {
        let bounds = RoomBounds::from_room(Vec3::ZERO, 20.0, 26.0, 0.5);
        assert_eq!(bounds.min, Vec2::new(-9.5, -12.5));
        assert_eq!(bounds.max, Vec2::new(9.5, 12.5));

        assert!(!bounds.collides(Vec3::new(0.0, 0.0, 0.0)));
        assert!(!bounds.collides(Vec3::new(9.5, 3.0, 12.5))); // граница включена, Y игнорируется
        assert!(bounds.collides(Vec3::new(9.6, 0.0, 0.0)));
    }

    #[test]
    fn test_room_bounds_follow_origin() {
        let bounds = RoomBounds::from_room(Vec3::new(0.0, 0.0, -200.0), 16.0, 20.0, 0.5);
        assert!(!bounds.collides(Vec3::new(0.0, 0.0, -200.0)));
        assert!(bounds.collides(Vec3::ZERO));
    }

    #[test]
    fn test_degenerate_inset_collapses() {
        let bounds = RoomBounds::from_room(Vec3::ZERO, 1.0, 1.0, 5.0);
        assert_eq!(bounds.min, bounds.max);
    }

    #[test]
    fn test_closure_predicate() {
        let wall_at_x5 = |p: Vec3| p.x > 5.0;
        assert!(wall_at_x5.collides(Vec3::new(6.0, 0.0, 0.0)));
        assert!(!wall_at_x5.collides(Vec3::new(4.0, 0.0, 0.0)));
    }
}
