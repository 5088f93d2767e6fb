//! Hall + SubRoom: владельцы анкоров и scene handles

use bevy::prelude::*;

use super::state::VisitedSet;
use crate::config::NavigationConfig;
use crate::interaction::{AnchorKind, InteractiveAnchor};
use crate::layout::{RoomBlueprint, RoomLayout};
use crate::movement::RoomBounds;
use crate::scene::{Disposable, NodeId};

/// Hall (Resource). Никогда не уничтожается: только скрывается на время sub-room
#[derive(Resource)]
pub struct Hall {
    pub layout: RoomLayout,
    pub anchors: Vec<InteractiveAnchor>,
    pub bounds: RoomBounds,
    /// `None` пока hall не загружен (или scene не смог его построить)
    pub root: Option<NodeId>,
    pub degraded: bool,
    resources: Vec<Box<dyn Disposable>>,
}

impl Hall {
    pub fn new(blueprint: RoomBlueprint, root: Option<NodeId>, resources: Vec<Box<dyn Disposable>>, config: &NavigationConfig) -> Self {
        Self {
            bounds: blueprint.bounds(config.movement.player_radius),
            layout: blueprint.layout,
            anchors: blueprint.anchors,
            root,
            degraded: blueprint.degraded,
            resources,
        }
    }

    /// Пустой hall до завершения fetch_all
    pub fn empty(config: &NavigationConfig) -> Self {
        let layout = RoomLayout::from_counts(0, 0, &config.layout);
        Self {
            bounds: RoomBounds::from_room(Vec3::ZERO, layout.width, layout.depth, config.movement.player_radius),
            layout,
            anchors: Vec::new(),
            root: None,
            degraded: false,
            resources: Vec::new(),
        }
    }

    /// Открывает двери всех посещённых records. Возвращает сколько реально открылось
    pub fn open_visited(&mut self, visited: &VisitedSet) -> usize {
        self.anchors
            .iter_mut()
            .filter(|a| matches!(a.kind(), AnchorKind::Door { record_id, .. } if visited.contains(record_id)))
            .map(|a| a.open_door())
            .filter(|opened| *opened)
            .count()
    }

    pub fn door_count(&self) -> usize {
        self.anchors
            .iter()
            .filter(|a| matches!(a.kind(), AnchorKind::Door { .. }))
            .count()
    }

    /// Disposables, которые hall держит всю сессию
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

impl Default for Hall {
    fn default() -> Self {
        Self::empty(&NavigationConfig::default())
    }
}

/// Активная sub-room (ровно одна или ни одной)
pub struct SubRoom {
    pub record_id: String,
    pub title: String,
    pub layout: RoomLayout,
    pub anchors: Vec<InteractiveAnchor>,
    pub bounds: RoomBounds,
    pub entry_point: Vec3,
    pub root: NodeId,
    pub degraded: bool,
    pub(crate) resources: Vec<Box<dyn Disposable>>,
}
