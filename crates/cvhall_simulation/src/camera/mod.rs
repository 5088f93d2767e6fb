//! Camera domain: orbit camera rig (lazy follow)

pub mod rig;

pub use rig::*;
