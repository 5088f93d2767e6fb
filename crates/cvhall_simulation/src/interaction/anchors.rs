//! Interactive anchors: двери, exhibit cubes, return-teleporter
//!
//! Tagged variant вместо иерархии: общий capability set
//! {position, activation_radius, is_near, set_highlighted, id} на
//! `InteractiveAnchor`, payload конкретного вида: в `AnchorKind`.

use std::fmt;

use bevy::prelude::*;

use crate::config::ProximityConfig;
use crate::data::{Category, ExhibitRecord};
use crate::movement::wrap_angle;

/// Stable identity анкора (уникальна в пределах комнаты)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(pub String);

impl AnchorId {
    pub fn door(record_id: &str) -> Self {
        Self(format!("door/{}", record_id))
    }

    pub fn exhibit(exhibit_id: &str) -> Self {
        Self(format!("exhibit/{}", exhibit_id))
    }

    pub fn teleporter() -> Self {
        Self("teleporter".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Вид анкора без payload (для events / фильтров)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKindTag {
    Door,
    Exhibit,
    Teleporter,
}

/// Payload конкретного вида
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorKind {
    Door {
        record_id: String,
        category: Category,
        /// Открыта навсегда после первого визита
        open: bool,
    },
    Exhibit {
        payload: ExhibitRecord,
    },
    Teleporter {
        /// Текущий угол self-rotation анимации
        spin: f32,
    },
}

impl AnchorKind {
    pub fn tag(&self) -> AnchorKindTag {
        match self {
            AnchorKind::Door { .. } => AnchorKindTag::Door,
            AnchorKind::Exhibit { .. } => AnchorKindTag::Exhibit,
            AnchorKind::Teleporter { .. } => AnchorKindTag::Teleporter,
        }
    }
}

/// Interactive anchor (владелец: комната, которая его создала)
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveAnchor {
    id: AnchorId,
    position: Vec3,
    rotation_y: f32,
    activation_radius: f32,
    highlighted: bool,
    kind: AnchorKind,
}

impl InteractiveAnchor {
    pub fn new(id: AnchorId, position: Vec3, rotation_y: f32, activation_radius: f32, kind: AnchorKind) -> Self {
        Self {
            id,
            position,
            rotation_y,
            activation_radius,
            highlighted: false,
            kind,
        }
    }

    pub fn door(record_id: &str, category: Category, position: Vec3, rotation_y: f32, radii: &ProximityConfig) -> Self {
        Self::new(
            AnchorId::door(record_id),
            position,
            rotation_y,
            radii.door_radius,
            AnchorKind::Door {
                record_id: record_id.to_string(),
                category,
                open: false,
            },
        )
    }

    pub fn exhibit(payload: ExhibitRecord, position: Vec3, radii: &ProximityConfig) -> Self {
        Self::new(
            AnchorId::exhibit(&payload.id),
            position,
            0.0,
            radii.exhibit_radius,
            AnchorKind::Exhibit { payload },
        )
    }

    pub fn teleporter(position: Vec3, radii: &ProximityConfig) -> Self {
        Self::new(
            AnchorId::teleporter(),
            position,
            0.0,
            radii.teleporter_radius,
            AnchorKind::Teleporter { spin: 0.0 },
        )
    }

    pub fn id(&self) -> &AnchorId {
        &self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn activation_radius(&self) -> f32 {
        self.activation_radius
    }

    pub fn kind(&self) -> &AnchorKind {
        &self.kind
    }

    pub fn tag(&self) -> AnchorKindTag {
        self.kind.tag()
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Planar distance (Y анкора приравнивается к Y точки: высота не влияет)
    pub fn planar_distance(&self, point: Vec3) -> f32 {
        let flattened = Vec3::new(self.position.x, point.y, self.position.z);
        flattened.distance(point)
    }

    /// Строго `<`: анкор ровно на threshold: "не рядом"
    pub fn is_near(&self, point: Vec3) -> bool {
        self.planar_distance(point) < self.activation_radius
    }

    /// Идемпотентно: возвращает true только если состояние реально поменялось
    pub fn set_highlighted(&mut self, highlighted: bool) -> bool {
        if self.highlighted == highlighted {
            return false;
        }
        self.highlighted = highlighted;
        true
    }

    /// Door → open (no-op для других видов). Возвращает true если поменялось
    pub fn open_door(&mut self) -> bool {
        match &mut self.kind {
            AnchorKind::Door { open, .. } if !*open => {
                *open = true;
                true
            }
            _ => false,
        }
    }

    /// Teleporter self-rotation (no-op для других видов)
    pub fn advance_spin(&mut self, angular_speed: f32, delta: f32) {
        if let AnchorKind::Teleporter { spin } = &mut self.kind {
            *spin = wrap_angle(*spin + angular_speed * delta);
        }
    }

    /// Человекочитаемая подпись для overlay hint
    pub fn label(&self) -> String {
        match &self.kind {
            AnchorKind::Door { record_id, category, .. } => format!("{} · {}", category.as_str(), record_id),
            AnchorKind::Exhibit { payload } => payload.title.clone(),
            AnchorKind::Teleporter { .. } => "Back to hall".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radii() -> ProximityConfig {
        ProximityConfig::default()
    }

    #[test]
    fn test_threshold_is_strict() {
        let door = InteractiveAnchor::door("acme", Category::Travail, Vec3::new(2.5, 0.0, 0.0), 0.0, &radii());

        assert!(!door.is_near(Vec3::ZERO)); // ровно 2.5: не рядом
        assert!(door.is_near(Vec3::new(1.0, 0.0, 0.0))); // 1.5 < 2.5
    }

    #[test]
    fn test_height_ignored() {
        let cube = InteractiveAnchor::exhibit(
            ExhibitRecord::fetch_error("x"),
            Vec3::new(0.0, 1.0, 1.0),
            &radii(),
        );
        // Точка на полу, cube на пьедестале высотой 1.0 → считается только XZ
        assert!((cube.planar_distance(Vec3::new(0.0, 0.0, 0.0)) - 1.0).abs() < 1e-6);
        assert!(cube.is_near(Vec3::new(0.0, -50.0, 0.2)));
    }

    #[test]
    fn test_set_highlighted_idempotent() {
        let mut tp = InteractiveAnchor::teleporter(Vec3::ZERO, &radii());

        assert!(tp.set_highlighted(true));
        assert!(!tp.set_highlighted(true)); // повтор: no-op
        assert!(tp.is_highlighted());
        assert!(tp.set_highlighted(false));
    }

    #[test]
    fn test_open_door_once() {
        let mut door = InteractiveAnchor::door("acme", Category::Travail, Vec3::ZERO, 0.0, &radii());
        assert!(door.open_door());
        assert!(!door.open_door());
        assert!(matches!(door.kind(), AnchorKind::Door { open: true, .. }));
    }

    #[test]
    fn test_spin_wraps() {
        let mut tp = InteractiveAnchor::teleporter(Vec3::ZERO, &radii());
        for _ in 0..100 {
            tp.advance_spin(1.5, 0.1);
        }
        let AnchorKind::Teleporter { spin } = tp.kind() else {
            panic!("teleporter expected");
        };
        assert!(*spin > -std::f32::consts::PI && *spin <= std::f32::consts::PI);
    }
}
