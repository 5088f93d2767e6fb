//! Navigation domain: hall ⇄ sub-room transitions
//!
//! Содержит:
//! - NavigationState / VisitedSet / TransitionLock (RAII guard)
//! - Hall (Resource) + SubRoom
//! - RoomTransitionManager (FSM, frame-driven enter, synchronous exit)
//! - HallLoader (startup fetch_all → hall, degraded on failure)
//! - RoomEntered / RoomExited / HallLoaded events

pub mod events;
pub mod hall_loader;
pub mod manager;
pub mod rooms;
pub mod state;

#[cfg(test)]
mod manager_tests;

pub use events::*;
pub use hall_loader::*;
pub use manager::*;
pub use rooms::*;
pub use state::*;
