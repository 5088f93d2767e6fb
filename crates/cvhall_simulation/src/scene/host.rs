//! SceneHost contract: topology only (attach / detach / visibility)
//!
//! Meshes, materials, labels появляются только внутри `build_room`.
//! Core получает root node + список Disposable handles и больше ничего
//! не знает о том, как комната нарисована.

use std::fmt;

use crate::layout::RoomBlueprint;

/// Handle узла scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("cannot build room '{0}'")]
    BuildFailed(String),
    #[error("cannot attach node {0}")]
    AttachFailed(NodeId),
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisposeError {
    /// Overlay label, чей parent уже удалён
    #[error("parent of '{0}' is gone")]
    MissingParent(String),
}

/// Drawable resource (geometry, material, overlay label)
pub trait Disposable: Send + Sync {
    fn label(&self) -> &str;
    fn dispose(&mut self) -> Result<(), DisposeError>;
}

/// Результат build_room: root (ещё не attached) + всё, что нужно освободить
pub struct BuiltRoom {
    pub root: NodeId,
    pub resources: Vec<Box<dyn Disposable>>,
}

impl fmt::Debug for BuiltRoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltRoom")
            .field("root", &self.root)
            .field("resources", &self.resources.len())
            .finish()
    }
}

/// Scene graph host (renderer / headless table)
pub trait SceneHost: Send + Sync {
    fn build_room(&mut self, blueprint: &RoomBlueprint) -> Result<BuiltRoom, SceneError>;

    fn attach(&mut self, node: NodeId) -> Result<(), SceneError>;

    /// Best-effort: detach неизвестного узла: no-op
    fn detach(&mut self, node: NodeId);

    fn set_visible(&mut self, node: NodeId, visible: bool);
}

/// Итог teardown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisposalReport {
    pub disposed: usize,
    pub warnings: usize,
}

/// Освобождает все handles по порядку; ошибки: warning, teardown продолжается
pub fn dispose_all(resources: Vec<Box<dyn Disposable>>) -> DisposalReport {
    let mut report = DisposalReport::default();

    for mut resource in resources {
        match resource.dispose() {
            Ok(()) => report.disposed += 1,
            Err(err) => {
                report.warnings += 1;
                crate::log_warning(&format!("⚠️ dispose '{}': {}", resource.label(), err));
            }
        }
    }

    report
}
