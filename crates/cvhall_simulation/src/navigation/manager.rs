//! RoomTransitionManager: FSM InHall ⇄ InSubRoom
//!
//! Frame-driven:
//! 1. `request_enter`: берёт TransitionLock, стартует fetch_one, кладёт в pending
//! 2. `poll` (каждый frame): когда fetch готов, строит sub-room и переключает сцену
//! 3. `exit`: синхронный teardown sub-room, возврат в hall
//!
//! Guard живёт внутри pending entry → lock отпускается на любом пути.

use std::sync::{Mutex, PoisonError};

use bevy::prelude::*;

use super::rooms::{Hall, SubRoom};
use super::state::{NavigationState, TransitionGuard, TransitionLock, VisitedSet};
use crate::camera::CameraRig;
use crate::config::NavigationConfig;
use crate::data::{poll_fetch, DataService, ExperienceRecord, FetchFuture};
use crate::interaction::InteractiveAnchor;
use crate::layout::{degraded_sub_room_blueprint, sub_room_blueprint, RoomBlueprint};
use crate::movement::RoomBounds;
use crate::player::PlayerState;
use crate::scene::{dispose_all, DisposalReport, SceneError, SceneHost};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Всё, что переход мутирует (одалживается на один вызов)
pub struct TransitionContext<'a> {
    pub scene: &'a mut dyn SceneHost,
    pub player: &'a mut PlayerState,
    pub camera: &'a mut CameraRig,
    pub hall: &'a mut Hall,
    pub config: &'a NavigationConfig,
}

/// Ответ на request_enter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterRequest {
    Started,
    /// Lock занят (fetch предыдущего enter ещё в полёте)
    AlreadyTransitioning,
    /// Двери есть только в hall
    NotInHall,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Entered { record_id: String, degraded: bool },
    Exited { record_id: String, disposal: DisposalReport },
}

struct PendingEntry {
    record_id: String,
    /// Mutex только ради Sync (Resource); poll идёт через get_mut без блокировки
    fetch: Mutex<FetchFuture<ExperienceRecord>>,
    _guard: TransitionGuard,
}

/// Transition FSM (Resource)
#[derive(Resource, Default)]
pub struct RoomTransitionManager {
    state: NavigationState,
    visited: VisitedSet,
    lock: TransitionLock,
    pending: Option<PendingEntry>,
    active: Option<SubRoom>,
}

impl RoomTransitionManager {
    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn is_transitioning(&self) -> bool {
        self.lock.is_held()
    }

    pub fn pending_record(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.record_id.as_str())
    }

    pub fn is_visited(&self, record_id: &str) -> bool {
        self.visited.contains(record_id)
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn active_sub_room(&self) -> Option<&SubRoom> {
        self.active.as_ref()
    }

    pub fn active_sub_room_mut(&mut self) -> Option<&mut SubRoom> {
        self.active.as_mut()
    }

    /// Анкоры комнаты, в которой сейчас игрок
    pub fn active_anchors_mut<'a>(&'a mut self, hall: &'a mut Hall) -> &'a mut [InteractiveAnchor] {
        match self.active.as_mut() {
            Some(room) => &mut room.anchors,
            None => &mut hall.anchors,
        }
    }

    /// Walkable bounds активной комнаты
    pub fn active_bounds(&self, hall: &Hall) -> RoomBounds {
        self.active.as_ref().map_or(hall.bounds, |room| room.bounds)
    }

    /// Старт enter: re-entrant вызовы игнорируются (не ставятся в очередь)
    pub fn request_enter(&mut self, record_id: &str, data: &dyn DataService) -> EnterRequest {
        if self.state != NavigationState::InHall {
            crate::log(&format!("enter '{}' ignored: not in hall", record_id));
            return EnterRequest::NotInHall;
        }
        let Some(guard) = self.lock.try_acquire() else {
            crate::log(&format!("enter '{}' ignored: transition in progress", record_id));
            return EnterRequest::AlreadyTransitioning;
        };

        crate::log_info(&format!("🚪 Entering '{}' (fetching record)", record_id));
        self.pending = Some(PendingEntry {
            record_id: record_id.to_string(),
            fetch: Mutex::new(data.fetch_one(record_id)),
            _guard: guard,
        });
        EnterRequest::Started
    }

    /// Один poll pending fetch. `None`: нечего завершать в этом frame
    pub fn poll(&mut self, ctx: &mut TransitionContext) -> Option<Result<TransitionOutcome, TransitionError>> {
        let pending = self.pending.as_mut()?;
        let fetch = pending.fetch.get_mut().unwrap_or_else(PoisonError::into_inner);
        let result = poll_fetch(fetch)?;
        // pending (и guard) дропается в конце этой функции на любом пути
        let pending = self.pending.take()?;

        let blueprint = match result {
            Ok(record) => sub_room_blueprint(&record, ctx.config),
            Err(err) => {
                crate::log_warning(&format!(
                    "⚠️ fetch '{}' failed: {} → degraded room",
                    pending.record_id, err
                ));
                degraded_sub_room_blueprint(&pending.record_id, ctx.config)
            }
        };

        Some(self.complete_entry(blueprint, ctx))
    }

    fn complete_entry(&mut self, blueprint: RoomBlueprint, ctx: &mut TransitionContext) -> Result<TransitionOutcome, TransitionError> {
        let record_id = blueprint.record_id().unwrap_or_default().to_string();

        let built = match ctx.scene.build_room(&blueprint) {
            Ok(built) => built,
            Err(err) => {
                crate::log_error(&format!("❌ build room '{}' failed: {}", record_id, err));
                self.restore_hall(ctx);
                return Err(err.into());
            }
        };

        if let Err(err) = ctx.scene.attach(built.root) {
            crate::log_error(&format!("❌ attach room '{}' failed: {} → unwinding", record_id, err));
            ctx.scene.detach(built.root);
            dispose_all(built.resources);
            self.restore_hall(ctx);
            return Err(err.into());
        }

        if let Some(hall_root) = ctx.hall.root {
            ctx.scene.set_visible(hall_root, false);
        }
        ctx.player.teleport(blueprint.entry_point, ctx.camera);
        self.visited.insert(&record_id);
        self.state = NavigationState::InSubRoom;

        let degraded = blueprint.degraded;
        self.active = Some(SubRoom {
            bounds: blueprint.bounds(ctx.config.movement.player_radius),
            record_id: record_id.clone(),
            title: blueprint.title,
            layout: blueprint.layout,
            anchors: blueprint.anchors,
            entry_point: blueprint.entry_point,
            root: built.root,
            degraded,
            resources: built.resources,
        });

        crate::log_info(&format!(
            "✅ Entered '{}'{} → player at {:?}",
            record_id,
            if degraded { " (degraded)" } else { "" },
            ctx.player.position
        ));
        Ok(TransitionOutcome::Entered { record_id, degraded })
    }

    /// Выход в hall. `None` если sub-room нет (no-op)
    ///
    /// Pending enter отменяется (fetch дропается) до выхода.
    pub fn exit(&mut self, ctx: &mut TransitionContext) -> Option<TransitionOutcome> {
        if let Some(cancelled) = self.pending.take() {
            crate::log(&format!("enter '{}' cancelled by exit", cancelled.record_id));
        }

        let room = self.active.take()?;
        ctx.scene.detach(room.root);
        let disposal = dispose_all(room.resources);

        self.restore_hall(ctx);
        let opened = ctx.hall.open_visited(&self.visited);
        ctx.player.teleport(ctx.config.hall_spawn(), ctx.camera);

        crate::log_info(&format!(
            "🏛️ Exited '{}' → hall (disposed {}, warnings {}, doors opened {})",
            room.record_id, disposal.disposed, disposal.warnings, opened
        ));
        Some(TransitionOutcome::Exited {
            record_id: room.record_id,
            disposal,
        })
    }

    fn restore_hall(&mut self, ctx: &mut TransitionContext) {
        if let Some(hall_root) = ctx.hall.root {
            ctx.scene.set_visible(hall_root, true);
        }
        self.state = NavigationState::InHall;
    }
}
