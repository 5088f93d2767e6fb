//! WalkthroughPlugin: склейка navigation core с Bevy ECS
//!
//! Все компоненты ядра: обычные Resources; системы одалживают их на один вызов.
//! NavigationConfig / SceneBackend / DataBackend / InputBackend вставляются
//! ДО add_plugins: plugin подставляет defaults только для отсутствующих.

use std::sync::Arc;

use bevy::prelude::*;

use crate::camera::CameraRig;
use crate::config::NavigationConfig;
use crate::data::{DataService, StaticDataService};
use crate::input::{InputBackend, KeyboardInput};
use crate::interaction::{HighlightChanged, InteractionAvailable, InteractionTriggered, ProximityDetector};
use crate::movement::FollowMode;
use crate::navigation::{Hall, HallLoaded, HallLoader, RoomEntered, RoomExited, RoomTransitionManager};
use crate::player::PlayerState;
use crate::scene::{HeadlessScene, SceneHost};

pub mod systems;

pub use systems::*;

/// Scene host (renderer или HeadlessScene)
#[derive(Resource)]
pub struct SceneBackend(pub Box<dyn SceneHost>);

impl SceneBackend {
    pub fn new(host: impl SceneHost + 'static) -> Self {
        Self(Box::new(host))
    }
}

impl Default for SceneBackend {
    fn default() -> Self {
        Self::new(HeadlessScene::new())
    }
}

/// Источник résumé records
#[derive(Resource, Clone)]
pub struct DataBackend(pub Arc<dyn DataService>);

impl DataBackend {
    pub fn new(service: impl DataService) -> Self {
        Self(Arc::new(service))
    }
}

impl Default for DataBackend {
    fn default() -> Self {
        Self::new(StaticDataService::default())
    }
}

/// Итог движения этого frame (для camera_follow / teleporter_spin)
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FrameMotion {
    pub mode: FollowMode,
    /// Уже clamped delta
    pub delta: f32,
}

impl Default for FrameMotion {
    fn default() -> Self {
        Self {
            mode: FollowMode::Idle,
            delta: 0.0,
        }
    }
}

pub struct WalkthroughPlugin;

impl Plugin for WalkthroughPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<InteractionAvailable>()
            .add_event::<InteractionTriggered>()
            .add_event::<HighlightChanged>()
            .add_event::<HallLoaded>()
            .add_event::<RoomEntered>()
            .add_event::<RoomExited>();

        app.init_resource::<NavigationConfig>()
            .init_resource::<SceneBackend>()
            .init_resource::<DataBackend>()
            .init_resource::<PlayerState>()
            .init_resource::<CameraRig>()
            .init_resource::<Hall>()
            .init_resource::<HallLoader>()
            .init_resource::<ProximityDetector>()
            .init_resource::<RoomTransitionManager>()
            .init_resource::<FrameMotion>();

        // Keyboard по persisted layout, если платформа не подставила свой source
        if !app.world().contains_resource::<InputBackend>() {
            let layout = app.world().resource::<NavigationConfig>().keyboard_layout;
            app.insert_resource(InputBackend::new(KeyboardInput::new(layout)));
        }

        app.add_systems(Startup, setup_walkthrough);
        app.add_systems(
            Update,
            (
                hall_loading,
                player_movement,
                camera_follow,
                teleporter_spin,
                proximity_scan,
                interaction_input,
                transition_poll,
            )
                .chain(), // Последовательное выполнение (frame order)
        );
    }
}
