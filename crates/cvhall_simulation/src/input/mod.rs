//! Player input module
//!
//! ```text
//! Platform keyboard / script
//!     ↓
//! InputSource (KeyboardInput / ScriptedInput): InputBackend resource
//!     ↓
//! player_movement (movement_vector) + interaction_input (just_pressed)
//! ```

pub mod keyboard;
pub mod source;

pub use keyboard::*;
pub use source::*;
