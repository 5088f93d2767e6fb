//! Movement domain: player locomotion
//!
//! Содержит:
//! - OrientationSmoother (smooth_angle, wrap_angle)
//! - MovementController (input → velocity → position, facing)
//! - CollisionPredicate (optional, fail-open) + RoomBounds

pub mod collision;
pub mod controller;
pub mod orientation;


pub use collision::*;
pub use controller::*;
pub use orientation::*;
