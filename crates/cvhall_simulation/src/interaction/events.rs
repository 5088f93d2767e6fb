//! Overlay presenter events
//!
//! Core только сообщает ЧТО доступно / что активировано.
//! КАК рисовать hint/карточку exhibit: забота presenter layer.

use bevy::prelude::*;

use super::anchors::{AnchorId, AnchorKindTag};
use crate::data::ExhibitRecord;

/// Hint для overlay ("нажми E чтобы войти")
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionHint {
    pub anchor: AnchorId,
    pub kind: AnchorKindTag,
    pub label: String,
}

/// Event: сменился interaction candidate (`None` = скрыть hint)
///
/// Отправляется только при смене кандидата, не каждый frame.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct InteractionAvailable {
    pub hint: Option<InteractionHint>,
}

/// Event: игрок активировал анкор (edge-triggered action)
///
/// Для exhibit несёт payload: presenter показывает карточку.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct InteractionTriggered {
    pub anchor: AnchorId,
    pub kind: AnchorKindTag,
    pub exhibit: Option<ExhibitRecord>,
}

/// Event: highlight анкора реально переключился
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HighlightChanged {
    pub anchor: AnchorId,
    pub highlighted: bool,
}
