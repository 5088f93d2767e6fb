//! Room blueprints: layout + anchors, готовые к передаче в SceneHost
//!
//! Blueprint чисто логический: никаких mesh/material. SceneHost::build_room
//! превращает его в дерево узлов.

use bevy::prelude::*;

use super::doors::{place_back_wall_door, place_door, DoorPlacement};
use super::room::RoomLayout;
use crate::config::NavigationConfig;
use crate::data::{sort_chronologically, Category, ExhibitRecord, ExperienceRecord};
use crate::interaction::InteractiveAnchor;
use crate::movement::RoomBounds;

/// Какая комната описана
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomKind {
    Hall,
    SubRoom { record_id: String },
}

/// Полное описание комнаты
#[derive(Debug, Clone, PartialEq)]
pub struct RoomBlueprint {
    pub kind: RoomKind,
    pub title: String,
    /// Мировой центр пола комнаты
    pub origin: Vec3,
    pub layout: RoomLayout,
    /// Анкоры в мировых координатах, порядок = порядок регистрации
    pub anchors: Vec<InteractiveAnchor>,
    /// Куда телепортировать игрока при входе
    pub entry_point: Vec3,
    /// Построена из synthetic anchor после fetch failure
    pub degraded: bool,
}

impl RoomBlueprint {
    /// Walkable AABB (стены минус player radius)
    pub fn bounds(&self, player_radius: f32) -> RoomBounds {
        RoomBounds::from_room(self.origin, self.layout.width, self.layout.depth, player_radius)
    }

    pub fn record_id(&self) -> Option<&str> {
        match &self.kind {
            RoomKind::Hall => None,
            RoomKind::SubRoom { record_id } => Some(record_id),
        }
    }
}

/// Hall: formation → side wall, travail → back wall, каждая категория по start_date
pub fn hall_blueprint(records: &[ExperienceRecord], config: &NavigationConfig) -> RoomBlueprint {
    let mut formation: Vec<ExperienceRecord> =
        records.iter().filter(|r| r.category == Category::Formation).cloned().collect();
    let mut travail: Vec<ExperienceRecord> =
        records.iter().filter(|r| r.category == Category::Travail).cloned().collect();
    sort_chronologically(&mut formation);
    sort_chronologically(&mut travail);

    let layout = RoomLayout::from_counts(formation.len(), travail.len(), &config.layout);
    let origin = Vec3::ZERO;

    let mut anchors = Vec::with_capacity(formation.len() + travail.len());
    for group in [&formation, &travail] {
        let total = group.len();
        for (index, record) in group.iter().enumerate() {
            let DoorPlacement { position, rotation_y } =
                place_door(record.category, index, total, &layout, &config.layout);
            anchors.push(InteractiveAnchor::door(
                &record.id,
                record.category,
                origin + position,
                rotation_y,
                &config.proximity,
            ));
        }
    }

    RoomBlueprint {
        kind: RoomKind::Hall,
        title: "Hall".to_string(),
        origin,
        layout,
        anchors,
        entry_point: config.hall_spawn(),
        degraded: false,
    }
}

/// Degraded hall (fetch_all упал): минимальная комната + один error exhibit
pub fn degraded_hall_blueprint(message: &str, config: &NavigationConfig) -> RoomBlueprint {
    let layout = RoomLayout::from_counts(0, 0, &config.layout);
    let origin = Vec3::ZERO;
    let position = origin + Vec3::new(0.0, config.layout.exhibit_height, -layout.depth * 0.25);

    RoomBlueprint {
        kind: RoomKind::Hall,
        title: "Hall".to_string(),
        origin,
        layout,
        anchors: vec![InteractiveAnchor::exhibit(
            ExhibitRecord::fetch_error(message),
            position,
            &config.proximity,
        )],
        entry_point: config.hall_spawn(),
        degraded: true,
    }
}

/// Sub-room записи: exhibits в один ряд (back-wall spacing) + teleporter у входа
pub fn sub_room_blueprint(record: &ExperienceRecord, config: &NavigationConfig) -> RoomBlueprint {
    let layout = RoomLayout::from_counts(0, record.exhibits.len(), &config.layout);
    let origin = config.layout.sub_room_origin();
    let row_z = -layout.depth * 0.25;
    let total = record.exhibits.len();

    let mut anchors: Vec<InteractiveAnchor> = record
        .exhibits
        .iter()
        .enumerate()
        .map(|(index, exhibit)| {
            let slot = place_back_wall_door(index, total, &layout, &config.layout);
            let position = origin + Vec3::new(slot.position.x, config.layout.exhibit_height, row_z);
            InteractiveAnchor::exhibit(exhibit.clone(), position, &config.proximity)
        })
        .collect();
    anchors.push(teleporter_anchor(origin, &layout, config));

    RoomBlueprint {
        kind: RoomKind::SubRoom {
            record_id: record.id.clone(),
        },
        title: record.title.clone(),
        origin,
        layout,
        anchors,
        entry_point: entry_point(origin, &layout, config),
        degraded: false,
    }
}

/// Degraded sub-room (fetch_one упал): только teleporter обратно
pub fn degraded_sub_room_blueprint(record_id: &str, config: &NavigationConfig) -> RoomBlueprint {
    let layout = RoomLayout::from_counts(0, 0, &config.layout);
    let origin = config.layout.sub_room_origin();

    RoomBlueprint {
        kind: RoomKind::SubRoom {
            record_id: record_id.to_string(),
        },
        title: "Content unavailable".to_string(),
        origin,
        layout,
        anchors: vec![teleporter_anchor(origin, &layout, config)],
        entry_point: entry_point(origin, &layout, config),
        degraded: true,
    }
}

fn entry_point(origin: Vec3, layout: &RoomLayout, config: &NavigationConfig) -> Vec3 {
    origin + Vec3::new(0.0, 0.0, layout.half_depth() - config.layout.entry_offset)
}

fn teleporter_anchor(origin: Vec3, layout: &RoomLayout, config: &NavigationConfig) -> InteractiveAnchor {
    let position = origin
        + Vec3::new(
            0.0,
            config.layout.teleporter_height,
            layout.half_depth() - config.layout.teleporter_offset,
        );
    InteractiveAnchor::teleporter(position, &config.proximity)
}
