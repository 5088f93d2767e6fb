//! Navigation state primitives: FSM state, visited set, transition lock

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Где сейчас игрок
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationState {
    #[default]
    InHall,
    InSubRoom,
}

/// Посещённые records (append-only, монотонно за сессию)
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl VisitedSet {
    /// true если запись новая
    pub fn insert(&mut self, record_id: &str) -> bool {
        if !self.members.insert(record_id.to_string()) {
            return false;
        }
        self.order.push(record_id.to_string());
        true
    }

    pub fn contains(&self, record_id: &str) -> bool {
        self.members.contains(record_id)
    }

    /// В порядке первого визита
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Reentrancy lock для enter()
///
/// Держится всё время, пока fetch в полёте. Освобождается Drop'ом guard'а,
/// поэтому любой путь (успех, degraded, ошибка scene, отмена) его отпускает.
#[derive(Debug, Clone, Default)]
pub struct TransitionLock {
    held: Arc<AtomicBool>,
}

impl TransitionLock {
    /// `None` если переход уже идёт
    pub fn try_acquire(&self) -> Option<TransitionGuard> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| TransitionGuard {
                held: Arc::clone(&self.held),
            })
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// RAII guard: lock отпускается при drop
#[derive(Debug)]
pub struct TransitionGuard {
    held: Arc<AtomicBool>,
}

impl Drop for TransitionGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}
