//! Navigation events (presenter / overlay подписываются)

use bevy::prelude::*;

/// Hall построен (после fetch_all)
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct HallLoaded {
    pub doors: usize,
    pub degraded: bool,
}

/// Игрок вошёл в sub-room
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct RoomEntered {
    pub record_id: String,
    /// Комната собрана из synthetic teleporter после fetch failure
    pub degraded: bool,
}

/// Игрок вернулся в hall
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct RoomExited {
    pub record_id: String,
    /// Resources, которые не удалось освободить (warning, не ошибка)
    pub dispose_warnings: usize,
}
