//! CVHALL Simulation Core
//!
//! Navigation + spatial interaction для 3D résumé walkthrough на Bevy 0.16.
//!
//! - Pure компоненты: OrientationSmoother, MovementController, CameraRig,
//!   ProximityDetector, SpatialLayoutGenerator, RoomTransitionManager
//! - WalkthroughPlugin склеивает их в per-frame schedule
//! - Рендер, overlay, HTTP, клавиатура: внешние коллабораторы за трейтами
//!   (SceneHost, DataService, InputSource, события для presenter)

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

pub mod camera;
pub mod config;
pub mod data;
pub mod input;
pub mod interaction;
pub mod layout;
pub mod logger;
pub mod movement;
pub mod navigation;
pub mod player;
pub mod scene;
pub mod walkthrough;

pub use camera::{CameraPose, CameraRig};
pub use config::{ConfigError, NavigationConfig};
pub use data::{DataService, ExhibitRecord, ExperienceRecord, FetchError, StaticDataService};
pub use input::{Action, InputBackend, InputSource, KeyboardInput, KeyboardLayout, ScriptedInput};
pub use interaction::{
    AnchorId, AnchorKind, AnchorKindTag, HighlightChanged, InteractionAvailable, InteractionTriggered,
    InteractiveAnchor, ProximityDetector,
};
pub use layout::{RoomBlueprint, RoomLayout};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use movement::{smooth_angle, wrap_angle, FollowMode, MovementController};
pub use navigation::{
    Hall, HallLoaded, NavigationState, RoomEntered, RoomExited, RoomTransitionManager, TransitionError,
};
pub use player::PlayerState;
pub use scene::{HeadlessScene, SceneHost};
pub use walkthrough::{DataBackend, SceneBackend, WalkthroughPlugin};

/// Создаёт minimal Bevy App для headless walkthrough
///
/// Время детерминированное: каждый `app.update()` продвигает часы ровно на
/// `1 / frame_hz` секунд.
pub fn create_headless_app(frame_hz: f64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / frame_hz.max(1.0),
        )));

    app
}
