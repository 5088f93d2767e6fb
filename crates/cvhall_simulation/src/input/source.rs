//! InputSource contract + ScriptedInput (headless runs, тесты)

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::prelude::*;

/// Edge-triggered действия
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// E / Enter: войти в дверь, осмотреть exhibit, телепорт
    Interact,
    /// Escape: вернуться в hall
    Exit,
}

pub trait InputSource: Send + Sync {
    /// Pre-normalized: длина 0 или 1
    fn movement_vector(&self) -> Vec2;

    /// Cleared on read
    fn is_action_just_pressed(&mut self, action: Action) -> bool;

    /// Вызывается один раз в начале каждого frame
    fn begin_frame(&mut self) {}
}

/// Текущий input backend (Resource)
#[derive(Resource)]
pub struct InputBackend(pub Box<dyn InputSource>);

impl InputBackend {
    pub fn new(source: impl InputSource + 'static) -> Self {
        Self(Box::new(source))
    }
}

/// Шаг сценария
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptStep {
    /// Держать направление N frames
    Move { direction: Vec2, frames: u32 },
    /// Нажать действие (в том же frame, что и следующий шаг)
    Press(Action),
}

#[derive(Debug, Default)]
struct ScriptState {
    steps: VecDeque<ScriptStep>,
    movement: Vec2,
    just_pressed: HashSet<Action>,
}

/// Programmable input. Клоны разделяют один сценарий -
/// тест может дописывать шаги после того, как источник уехал в InputBackend.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Направление нормализуется (или обнуляется, если NaN / ноль)
    pub fn walk(self, direction: Vec2, frames: u32) -> Self {
        self.push(ScriptStep::Move {
            direction: direction.normalize_or_zero(),
            frames,
        })
    }

    pub fn wait(self, frames: u32) -> Self {
        self.push(ScriptStep::Move {
            direction: Vec2::ZERO,
            frames,
        })
    }

    pub fn press(self, action: Action) -> Self {
        self.push(ScriptStep::Press(action))
    }

    pub fn push(self, step: ScriptStep) -> Self {
        self.state().steps.push_back(step);
        self
    }

    pub fn is_finished(&self) -> bool {
        self.state().steps.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn movement_vector(&self) -> Vec2 {
        self.state().movement
    }

    fn is_action_just_pressed(&mut self, action: Action) -> bool {
        self.state().just_pressed.remove(&action)
    }

    fn begin_frame(&mut self) {
        let mut guard = self.state();
        let state = &mut *guard;
        state.movement = Vec2::ZERO;

        while let Some(step) = state.steps.front_mut() {
            match *step {
                ScriptStep::Press(action) => {
                    state.just_pressed.insert(action);
                    state.steps.pop_front();
                }
                ScriptStep::Move { frames: 0, .. } => {
                    state.steps.pop_front();
                }
                ScriptStep::Move { direction, ref mut frames } => {
                    *frames -= 1;
                    if *frames == 0 {
                        state.steps.pop_front();
                    }
                    state.movement = direction;
                    break;
                }
            }
        }
    }
}
