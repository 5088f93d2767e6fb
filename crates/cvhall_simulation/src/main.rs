//! Headless walkthrough CVHALL
//!
//! Запускает Bevy App без рендера: hall из bundled résumé, скриптованный
//! проход к средней двери задней стены, осмотр exhibit, возврат в hall.
//!
//! Usage: `cvhall_simulation [config.json]`

use bevy::prelude::*;
use cvhall_simulation::logger::{set_log_level, LogLevel};
use cvhall_simulation::*;

const RESUME_JSON: &str = include_str!("../data/resume.json");
const FRAME_HZ: f64 = 60.0;

fn main() -> Result<(), FetchError> {
    let config = match std::env::args().nth(1) {
        Some(path) => NavigationConfig::from_json_file(&path).unwrap_or_else(|err| {
            log_warning(&format!("⚠️ config '{}' ignored: {}", path, err));
            NavigationConfig::default()
        }),
        None => NavigationConfig::default(),
    };

    // fetch_one имитирует сеть: 2 frame pending
    let data = StaticDataService::from_json(RESUME_JSON)?.with_latency(2);

    // Hall spawn (0,0,8) → вперёд до задней стены, к двери "freelance" (x = 0)
    let script = ScriptedInput::new()
        .wait(5)
        .walk(Vec2::new(0.0, -1.0), 270)
        .press(Action::Interact)
        .wait(10)
        // Sub-room entry → вперёд к центральному exhibit
        .walk(Vec2::new(0.0, -1.0), 132)
        .press(Action::Interact)
        .wait(30)
        .press(Action::Exit)
        .wait(10);

    println!("Starting CVHALL headless walkthrough ({} Hz)", FRAME_HZ);

    let mut app = create_headless_app(FRAME_HZ);
    // Debug-шум (каждый interact, отклонённые enter) не нужен рядом с отчётом по frame
    set_log_level(LogLevel::Info);
    app.insert_resource(config)
        .insert_resource(DataBackend::new(data))
        .insert_resource(InputBackend::new(script.clone()))
        .add_plugins(WalkthroughPlugin);

    let mut frame = 0u32;
    while !script.is_finished() {
        app.update();
        frame += 1;
        report_frame(&mut app, frame);
    }
    // Доиграть последний шаг сценария
    app.update();
    report_frame(&mut app, frame + 1);

    let manager = app.world().resource::<RoomTransitionManager>();
    let player = app.world().resource::<PlayerState>();
    println!(
        "Walkthrough complete: state {:?}, player at {:?}, visited {:?}",
        manager.state(),
        player.position,
        manager.visited().iter().collect::<Vec<_>>()
    );

    Ok(())
}

fn report_frame(app: &mut App, frame: u32) {
    let world = app.world_mut();

    for loaded in world.resource_mut::<Events<HallLoaded>>().drain() {
        println!("Frame {}: hall loaded ({} doors, degraded: {})", frame, loaded.doors, loaded.degraded);
    }
    for hint in world.resource_mut::<Events<InteractionAvailable>>().drain() {
        match hint.hint {
            Some(hint) => println!("Frame {}: [E] {}", frame, hint.label),
            None => println!("Frame {}: hint hidden", frame),
        }
    }
    for triggered in world.resource_mut::<Events<InteractionTriggered>>().drain() {
        match triggered.exhibit {
            Some(exhibit) => println!("Frame {}: inspecting '{}'", frame, exhibit.title),
            None => println!("Frame {}: activated {}", frame, triggered.anchor),
        }
    }
    for entered in world.resource_mut::<Events<RoomEntered>>().drain() {
        println!("Frame {}: entered '{}' (degraded: {})", frame, entered.record_id, entered.degraded);
    }
    for exited in world.resource_mut::<Events<RoomExited>>().drain() {
        println!("Frame {}: back in hall from '{}'", frame, exited.record_id);
    }
}
