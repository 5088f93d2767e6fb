//! Tests for RoomTransitionManager.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::hall_loader::HallLoader;
    use super::super::manager::*;
    use super::super::rooms::Hall;
    use super::super::state::NavigationState;
    use crate::camera::CameraRig;
    use crate::config::NavigationConfig;
    use crate::data::StaticDataService;
    use crate::interaction::{AnchorId, AnchorKind, AnchorKindTag};
    use crate::player::PlayerState;
    use crate::scene::{HeadlessScene, SceneError};

    const JSON: &str = r#"[
        { "id": "epita", "category": "formation", "title": "Engineering school", "start_date": "2016-09",
          "exhibits": [ { "id": "compiler", "title": "Tiger compiler" }, { "id": "raytracer", "title": "Raytracer" } ] },
        { "id": "acme", "category": "travail", "title": "Backend engineer", "start_date": "2021-03",
          "exhibits": [ { "id": "api", "title": "Public API" } ] }
    ]"#;

    /// Мир без менеджера (менеджер отдельно: иначе двойной &mut)
    struct World {
        config: NavigationConfig,
        scene: HeadlessScene,
        observer: HeadlessScene,
        player: PlayerState,
        camera: CameraRig,
        hall: Hall,
    }

    impl World {
        fn new() -> Self {
            let config = NavigationConfig::default();
            let mut scene = HeadlessScene::new();
            let observer = scene.clone();
            let mut hall = Hall::empty(&config);

            let mut loader = HallLoader::default();
            loader.start(&data());
            loader.poll(&mut scene, &mut hall, &config).expect("hall fetch is immediate");

            let mut camera = CameraRig::from_config(&config.camera);
            let mut player = PlayerState::spawned_at(Vec3::ZERO);
            player.teleport(config.hall_spawn(), &mut camera);

            Self {
                config,
                scene,
                observer,
                player,
                camera,
                hall,
            }
        }

        fn ctx(&mut self) -> TransitionContext<'_> {
            TransitionContext {
                scene: &mut self.scene,
                player: &mut self.player,
                camera: &mut self.camera,
                hall: &mut self.hall,
                config: &self.config,
            }
        }

        fn hall_root(&self) -> crate::scene::NodeId {
            self.hall.root.expect("hall attached")
        }
    }

    fn data() -> StaticDataService {
        StaticDataService::from_json(JSON).unwrap()
    }

    fn enter(manager: &mut RoomTransitionManager, world: &mut World, record_id: &str) -> TransitionOutcome {
        assert_eq!(manager.request_enter(record_id, &data()), EnterRequest::Started);
        manager.poll(&mut world.ctx()).expect("ready fetch").expect("enter succeeds")
    }

    #[test]
    fn test_enter_then_exit_round_trip() {
        let mut world = World::new();
        let mut manager = RoomTransitionManager::default();

        let entered = enter(&mut manager, &mut world, "acme");
        assert_eq!(
            entered,
            TransitionOutcome::Entered {
                record_id: "acme".into(),
                degraded: false
            }
        );
        assert_eq!(manager.state(), NavigationState::InSubRoom);
        assert!(!manager.is_transitioning());
        assert_eq!(world.player.position, Vec3::new(0.0, 0.0, -193.5));
        assert!(!world.observer.is_visible(world.hall_root()), "hall скрыт, не уничтожен");
        assert!(world.observer.node(world.hall_root()).is_some());

        let room = manager.active_sub_room().expect("active sub-room");
        let sub_root = room.root;
        assert!(world.observer.is_attached(sub_root));
        assert_eq!(room.anchors.len(), 2); // api + teleporter
        assert_eq!(room.anchors[0].id(), &AnchorId::exhibit("api"));
        assert_eq!(room.anchors[1].tag(), AnchorKindTag::Teleporter);

        let exited = manager.exit(&mut world.ctx()).expect("sub-room active");
        let TransitionOutcome::Exited { record_id, disposal } = exited else {
            panic!("exit outcome expected");
        };
        assert_eq!(record_id, "acme");
        assert_eq!(disposal.warnings, 0);

        assert_eq!(world.player.position, world.config.hall_spawn());
        assert!(world.observer.is_visible(world.hall_root()));
        assert!(world.observer.node(sub_root).is_none(), "sub-room узлы освобождены");
        assert!(manager.is_visited("acme"));
        assert_eq!(manager.state(), NavigationState::InHall);
        assert!(manager.active_sub_room().is_none());

        // Камера snap'нута за спину на spawn
        let expected = world.camera.target_pose(world.config.hall_spawn(), 0.0);
        assert_eq!(world.camera.current_pose(), expected);
    }

    #[test]
    fn test_exit_opens_visited_door() {
        let mut world = World::new();
        let mut manager = RoomTransitionManager::default();

        enter(&mut manager, &mut world, "acme");
        manager.exit(&mut world.ctx());

        let door_open = |id: &str| {
            world
                .hall
                .anchors
                .iter()
                .find(|a| a.id() == &AnchorId::door(id))
                .map(|a| matches!(a.kind(), AnchorKind::Door { open: true, .. }))
        };
        assert_eq!(door_open("acme"), Some(true));
        assert_eq!(door_open("epita"), Some(false));
    }

    #[test]
    fn test_second_enter_while_pending_is_ignored() {
        let mut world = World::new();
        let mut manager = RoomTransitionManager::default();
        let slow = data().with_latency(2);

        assert_eq!(manager.request_enter("acme", &slow), EnterRequest::Started);
        assert_eq!(manager.request_enter("epita", &slow), EnterRequest::AlreadyTransitioning);
        assert_eq!(manager.pending_record(), Some("acme"));

        assert!(manager.poll(&mut world.ctx()).is_none());
        assert!(manager.poll(&mut world.ctx()).is_none());
        assert_eq!(manager.state(), NavigationState::InHall);
        assert_eq!(world.player.position, world.config.hall_spawn());

        let outcome = manager.poll(&mut world.ctx()).expect("ready").expect("ok");
        assert!(matches!(outcome, TransitionOutcome::Entered { ref record_id, .. } if record_id == "acme"));
        assert!(!manager.is_visited("epita"));
        assert_eq!(world.observer.built_rooms(), 2); // hall + acme
    }

    #[test]
    fn test_enter_from_sub_room_is_rejected() {
        let mut world = World::new();
        let mut manager = RoomTransitionManager::default();

        enter(&mut manager, &mut world, "acme");
        assert_eq!(manager.request_enter("epita", &data()), EnterRequest::NotInHall);
    }

    #[test]
    fn test_fetch_failure_builds_degraded_room() {
        let mut world = World::new();
        let mut manager = RoomTransitionManager::default();

        manager.request_enter("acme", &StaticDataService::failing(503));
        let outcome = manager.poll(&mut world.ctx()).expect("ready").expect("degraded room still builds");

        assert_eq!(
            outcome,
            TransitionOutcome::Entered {
                record_id: "acme".into(),
                degraded: true
            }
        );
        let room = manager.active_sub_room().unwrap();
        assert!(room.degraded);
        assert_eq!(room.anchors.len(), 1);
        assert_eq!(room.anchors[0].tag(), AnchorKindTag::Teleporter);
        assert!(manager.is_visited("acme"));
        assert!(!manager.is_transitioning());
    }

    #[test]
    fn test_unknown_record_is_degraded() {
        let mut world = World::new();
        let mut manager = RoomTransitionManager::default();

        let outcome = enter(&mut manager, &mut world, "ghost");
        assert!(matches!(outcome, TransitionOutcome::Entered { degraded: true, .. }));
    }

    #[test]
    fn test_build_failure_unwinds() {
        let mut world = World::new();
        let mut manager = RoomTransitionManager::default();
        world.observer.fail_next_build();

        manager.request_enter("acme", &data());
        let result = manager.poll(&mut world.ctx()).expect("ready");

        assert!(matches!(result, Err(TransitionError::Scene(SceneError::BuildFailed(_)))));
        assert_eq!(manager.state(), NavigationState::InHall);
        assert!(world.observer.is_visible(world.hall_root()));
        assert_eq!(world.player.position, world.config.hall_spawn());
        assert!(!manager.is_visited("acme"));
        assert!(!manager.is_transitioning(), "guard освобождён на error path");

        // Следующая попытка проходит
        enter(&mut manager, &mut world, "acme");
        assert_eq!(manager.state(), NavigationState::InSubRoom);
    }

    #[test]
    fn test_attach_failure_disposes_built_room() {
        let mut world = World::new();
        let mut manager = RoomTransitionManager::default();
        let hall_nodes = world.observer.node_count();
        let disposed_before = world.observer.disposed_count();
        world.observer.fail_next_attach();

        manager.request_enter("acme", &data());
        let result = manager.poll(&mut world.ctx()).expect("ready");

        assert!(matches!(result, Err(TransitionError::Scene(SceneError::AttachFailed(_)))));
        // shell (2) + api (3) + teleporter (3) + root handle
        assert_eq!(world.observer.disposed_count() - disposed_before, 9);
        assert_eq!(world.observer.node_count(), hall_nodes);
        assert!(manager.active_sub_room().is_none());
        assert!(world.observer.is_visible(world.hall_root()));
    }

    #[test]
    fn test_exit_without_sub_room_is_noop() {
        let mut world = World::new();
        let mut manager = RoomTransitionManager::default();
        world.player.position = Vec3::new(1.0, 0.0, 1.0);

        assert!(manager.exit(&mut world.ctx()).is_none());
        assert_eq!(world.player.position, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(manager.state(), NavigationState::InHall);
    }

    #[test]
    fn test_exit_cancels_pending_enter() {
        let mut world = World::new();
        let mut manager = RoomTransitionManager::default();

        manager.request_enter("acme", &data().with_latency(5));
        assert!(manager.is_transitioning());

        assert!(manager.exit(&mut world.ctx()).is_none());
        assert!(!manager.is_transitioning());
        assert!(manager.pending_record().is_none());
        assert!(manager.poll(&mut world.ctx()).is_none());
        assert!(!manager.is_visited("acme"));
    }

    #[test]
    fn test_missing_label_parent_does_not_abort_teardown() {
        let mut world = World::new();
        let mut manager = RoomTransitionManager::default();

        enter(&mut manager, &mut world, "acme");
        let sub_root = manager.active_sub_room().unwrap().root;
        world.observer.orphan_overlay_labels();

        let Some(TransitionOutcome::Exited { disposal, .. }) = manager.exit(&mut world.ctx()) else {
            panic!("exit outcome expected");
        };
        assert_eq!(disposal.warnings, 2); // labels api + teleporter
        assert_eq!(disposal.disposed, 7);
        assert!(world.observer.node(sub_root).is_none());
        assert_eq!(world.player.position, world.config.hall_spawn());
    }

    #[test]
    fn test_visited_is_monotonic_across_trips() {
        let mut world = World::new();
        let mut manager = RoomTransitionManager::default();

        for id in ["acme", "epita", "acme"] {
            enter(&mut manager, &mut world, id);
            manager.exit(&mut world.ctx());
        }

        assert_eq!(manager.visited().iter().collect::<Vec<_>>(), vec!["acme", "epita"]);
        assert!(world
            .hall
            .anchors
            .iter()
            .all(|a| matches!(a.kind(), AnchorKind::Door { open: true, .. })));
    }
}
