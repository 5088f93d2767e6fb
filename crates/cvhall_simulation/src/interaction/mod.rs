//! Interaction domain: anchors, proximity scan, presenter events
//!
//! Содержит:
//! - InteractiveAnchor / AnchorKind (Door, Exhibit, Teleporter)
//! - ProximityDetector (planar distance, strict threshold, highlight toggling)
//! - InteractionAvailable / InteractionTriggered / HighlightChanged events

pub mod anchors;
pub mod events;
pub mod proximity;

pub use anchors::*;
pub use events::*;
pub use proximity::*;
