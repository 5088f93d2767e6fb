//! Walkthrough systems (Update, `.chain()`)
//!
//! Порядок за frame:
//! 1. hall_loading: poll fetch_all (только до загрузки)
//! 2. player_movement: input → MovementController (clamped delta, room bounds)
//! 3. camera_follow: lazy orbit angle + smoothed pose
//! 4. teleporter_spin: анимация teleporter в sub-room
//! 5. proximity_scan: highlight + interaction candidate
//! 6. interaction_input: edge-triggered Interact / Exit
//! 7. transition_poll: завершение pending enter

use bevy::prelude::*;

use super::{DataBackend, FrameMotion, SceneBackend};
use crate::camera::CameraRig;
use crate::config::NavigationConfig;
use crate::input::{Action, InputBackend};
use crate::interaction::{
    AnchorKind, HighlightChanged, InteractionAvailable, InteractionHint, InteractionTriggered, ProximityDetector,
};
use crate::movement::{CollisionPredicate, MovementController};
use crate::navigation::{
    EnterRequest, Hall, HallLoaded, HallLoader, RoomEntered, RoomExited, RoomTransitionManager, TransitionContext,
    TransitionOutcome,
};
use crate::player::PlayerState;

/// Startup: камера за спиной на hall spawn, старт fetch_all
pub fn setup_walkthrough(
    config: Res<NavigationConfig>,
    data: Res<DataBackend>,
    mut camera: ResMut<CameraRig>,
    mut player: ResMut<PlayerState>,
    mut hall: ResMut<Hall>,
    mut loader: ResMut<HallLoader>,
) {
    *camera = CameraRig::from_config(&config.camera);
    *hall = Hall::empty(&config);
    player.teleport(config.hall_spawn(), &mut camera);
    loader.start(data.0.as_ref());

    crate::log_info(&format!(
        "🎮 Walkthrough ready: spawn {:?}, layout {}",
        config.hall_spawn(),
        config.keyboard_layout
    ));
}

pub fn hall_loading(
    config: Res<NavigationConfig>,
    mut loader: ResMut<HallLoader>,
    mut scene: ResMut<SceneBackend>,
    mut hall: ResMut<Hall>,
    mut detector: ResMut<ProximityDetector>,
    mut loaded: EventWriter<HallLoaded>,
) {
    if !loader.is_pending() {
        return;
    }
    let Some(report) = loader.poll(scene.0.as_mut(), &mut hall, &config) else {
        return;
    };

    detector.reset();
    loaded.write(HallLoaded {
        doors: report.doors,
        degraded: report.degraded,
    });
}

pub fn player_movement(
    time: Res<Time>,
    config: Res<NavigationConfig>,
    manager: Res<RoomTransitionManager>,
    hall: Res<Hall>,
    mut input: ResMut<InputBackend>,
    mut player: ResMut<PlayerState>,
    mut motion: ResMut<FrameMotion>,
) {
    input.0.begin_frame();

    let delta = config.clamp_delta(time.delta_secs());
    let controller = MovementController::from_config(&config.movement);
    let bounds = manager.active_bounds(&hall);
    let collision = config
        .movement
        .collide_with_walls
        .then_some(&bounds as &dyn CollisionPredicate);

    let outcome = controller.step(
        input.0.movement_vector(),
        player.position,
        player.facing,
        player.camera_angle,
        delta,
        collision,
    );

    if outcome.moved {
        player.position = outcome.position;
        player.facing = outcome.facing;
    }
    player.velocity = outcome.velocity;

    *motion = FrameMotion {
        mode: outcome.camera_mode(),
        delta,
    };
}

pub fn camera_follow(motion: Res<FrameMotion>, mut player: ResMut<PlayerState>, mut camera: ResMut<CameraRig>) {
    player.camera_angle = camera.advance_angle(player.camera_angle, player.facing, motion.mode, motion.delta);
    camera.pose(player.position, player.camera_angle, false, motion.delta);
}

pub fn teleporter_spin(config: Res<NavigationConfig>, motion: Res<FrameMotion>, mut manager: ResMut<RoomTransitionManager>) {
    let Some(room) = manager.active_sub_room_mut() else {
        return;
    };
    for anchor in room.anchors.iter_mut() {
        anchor.advance_spin(config.teleporter_spin_speed, motion.delta);
    }
}

pub fn proximity_scan(
    player: Res<PlayerState>,
    mut manager: ResMut<RoomTransitionManager>,
    mut hall: ResMut<Hall>,
    mut detector: ResMut<ProximityDetector>,
    mut highlights: EventWriter<HighlightChanged>,
    mut available: EventWriter<InteractionAvailable>,
) {
    let anchors = manager.active_anchors_mut(&mut hall);
    let report = detector.update(player.position, anchors);

    for (anchor, highlighted) in report.scan.highlight_changes {
        highlights.write(HighlightChanged { anchor, highlighted });
    }

    if report.candidate_changed {
        let hint = detector.candidate().and_then(|candidate| {
            anchors.iter().find(|a| a.id() == &candidate.id).map(|a| InteractionHint {
                anchor: a.id().clone(),
                kind: a.tag(),
                label: a.label(),
            })
        });
        available.write(InteractionAvailable { hint });
    }
}

#[allow(clippy::too_many_arguments)]
pub fn interaction_input(
    config: Res<NavigationConfig>,
    data: Res<DataBackend>,
    mut input: ResMut<InputBackend>,
    mut detector: ResMut<ProximityDetector>,
    mut manager: ResMut<RoomTransitionManager>,
    mut scene: ResMut<SceneBackend>,
    mut player: ResMut<PlayerState>,
    mut camera: ResMut<CameraRig>,
    mut hall: ResMut<Hall>,
    mut triggered: EventWriter<InteractionTriggered>,
    mut available: EventWriter<InteractionAvailable>,
    mut exited: EventWriter<RoomExited>,
) {
    // Оба edge читаются каждый frame (cleared on read)
    let interact = input.0.is_action_just_pressed(Action::Interact);
    let mut exit_requested = input.0.is_action_just_pressed(Action::Exit);

    if interact {
        let candidate = detector.candidate().cloned();
        let anchor = candidate.and_then(|candidate| {
            manager
                .active_anchors_mut(&mut hall)
                .iter()
                .find(|a| a.id() == &candidate.id)
                .cloned()
        });

        if let Some(anchor) = anchor {
            crate::log(&format!("interact → {}", anchor.id()));
            let (accepted, exhibit) = match anchor.kind() {
                // Отклонённый enter (transition в полёте) не виден presenter'у
                AnchorKind::Door { record_id, .. } => {
                    let request = manager.request_enter(record_id, data.0.as_ref());
                    (request == EnterRequest::Started, None)
                }
                AnchorKind::Exhibit { payload } => (true, Some(payload.clone())),
                AnchorKind::Teleporter { .. } => {
                    exit_requested = true;
                    (true, None)
                }
            };
            if accepted {
                triggered.write(InteractionTriggered {
                    anchor: anchor.id().clone(),
                    kind: anchor.tag(),
                    exhibit,
                });
            }
        }
    }

    if !exit_requested {
        return;
    }

    let mut ctx = TransitionContext {
        scene: scene.0.as_mut(),
        player: &mut *player,
        camera: &mut *camera,
        hall: &mut *hall,
        config: &config,
    };
    if let Some(TransitionOutcome::Exited { record_id, disposal }) = manager.exit(&mut ctx) {
        detector.reset();
        available.write(InteractionAvailable { hint: None });
        exited.write(RoomExited {
            record_id,
            dispose_warnings: disposal.warnings,
        });
    }
}

#[allow(clippy::too_many_arguments)]
pub fn transition_poll(
    config: Res<NavigationConfig>,
    mut manager: ResMut<RoomTransitionManager>,
    mut scene: ResMut<SceneBackend>,
    mut player: ResMut<PlayerState>,
    mut camera: ResMut<CameraRig>,
    mut hall: ResMut<Hall>,
    mut detector: ResMut<ProximityDetector>,
    mut available: EventWriter<InteractionAvailable>,
    mut entered: EventWriter<RoomEntered>,
) {
    let mut ctx = TransitionContext {
        scene: scene.0.as_mut(),
        player: &mut *player,
        camera: &mut *camera,
        hall: &mut *hall,
        config: &config,
    };

    match manager.poll(&mut ctx) {
        None => {}
        Some(Ok(TransitionOutcome::Entered { record_id, degraded })) => {
            detector.reset();
            available.write(InteractionAvailable { hint: None });
            entered.write(RoomEntered { record_id, degraded });
        }
        Some(Ok(TransitionOutcome::Exited { .. })) => {}
        Some(Err(err)) => {
            crate::log_error(&format!("❌ room transition failed: {}", err));
        }
    }
}
