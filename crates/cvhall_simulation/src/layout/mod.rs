//! SpatialLayoutGenerator: room dimensions, door placement, room blueprints
//!
//! Всё здесь: pure функции от (records, config). Никакого ECS, никакого scene.

pub mod blueprint;
pub mod doors;
pub mod room;


pub use blueprint::*;
pub use doors::*;
pub use room::*;
