//! HeadlessScene: in-memory SceneHost (headless runner, тесты)
//!
//! Node table вместо реального scene graph. Клоны разделяют одну таблицу,
//! поэтому тест может держать клон и смотреть состояние после того,
//! как оригинал уехал в `SceneBackend`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::host::{BuiltRoom, Disposable, DisposeError, NodeId, SceneError, SceneHost};
use crate::layout::RoomBlueprint;

/// Узел таблицы
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub attached: bool,
    pub visible: bool,
}

#[derive(Debug, Default)]
struct SceneTable {
    next_id: u64,
    nodes: HashMap<NodeId, SceneNode>,
    built_rooms: usize,
    fail_next_build: bool,
    fail_next_attach: bool,
}

impl SceneTable {
    fn spawn(&mut self, name: String, parent: Option<NodeId>) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(
            id,
            SceneNode {
                name,
                parent,
                attached: false,
                visible: true,
            },
        );
        id
    }

    /// Удаляет узел и его прямых детей
    fn free(&mut self, root: NodeId) {
        self.nodes.retain(|id, node| *id != root && node.parent != Some(root));
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessScene {
    table: Arc<Mutex<SceneTable>>,
    disposed: Arc<AtomicUsize>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, SceneTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Следующий build_room вернёт SceneError::BuildFailed
    pub fn fail_next_build(&self) {
        self.table().fail_next_build = true;
    }

    /// Следующий attach вернёт SceneError::AttachFailed
    pub fn fail_next_attach(&self) {
        self.table().fail_next_attach = true;
    }

    /// Удаляет anchor-узлы всех комнат раньше времени
    ///
    /// Overlay labels остаются без parent → dispose отдаёт MissingParent.
    pub fn orphan_overlay_labels(&self) {
        self.table()
            .nodes
            .retain(|_, node| !node.name.starts_with("anchor/"));
    }

    pub fn node(&self, id: NodeId) -> Option<SceneNode> {
        self.table().nodes.get(&id).cloned()
    }

    pub fn node_count(&self) -> usize {
        self.table().nodes.len()
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.attached)
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.visible)
    }

    pub fn built_rooms(&self) -> usize {
        self.table().built_rooms
    }

    /// Сколько resources успешно освобождено за всё время
    pub fn disposed_count(&self) -> usize {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl SceneHost for HeadlessScene {
    fn build_room(&mut self, blueprint: &RoomBlueprint) -> Result<BuiltRoom, SceneError> {
        let mut table = self.table();
        if std::mem::take(&mut table.fail_next_build) {
            return Err(SceneError::BuildFailed(blueprint.title.clone()));
        }

        let root = table.spawn(format!("room/{}", blueprint.title), None);
        let mut resources: Vec<Box<dyn Disposable>> = vec![
            self.resource(format!("geometry/shell/{}", blueprint.title)),
            self.resource(format!("material/shell/{}", blueprint.title)),
        ];

        for anchor in &blueprint.anchors {
            let node = table.spawn(format!("anchor/{}", anchor.id()), Some(root));
            resources.push(self.resource(format!("geometry/{}", anchor.id())));
            resources.push(self.resource(format!("material/{}", anchor.id())));
            resources.push(Box::new(OverlayLabel {
                label: format!("label/{}", anchor.id()),
                parent: node,
                table: Arc::clone(&self.table),
                disposed: Arc::clone(&self.disposed),
                done: false,
            }));
        }

        // Root освобождается последним: labels ещё видят своих parents
        resources.push(Box::new(NodeHandle {
            label: format!("node/room/{}", blueprint.title),
            node: root,
            table: Arc::clone(&self.table),
            disposed: Arc::clone(&self.disposed),
            done: false,
        }));

        table.built_rooms += 1;
        Ok(BuiltRoom { root, resources })
    }

    fn attach(&mut self, node: NodeId) -> Result<(), SceneError> {
        let mut table = self.table();
        if std::mem::take(&mut table.fail_next_attach) {
            return Err(SceneError::AttachFailed(node));
        }
        let entry = table.nodes.get_mut(&node).ok_or(SceneError::UnknownNode(node))?;
        entry.attached = true;
        Ok(())
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(entry) = self.table().nodes.get_mut(&node) {
            entry.attached = false;
        }
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        if let Some(entry) = self.table().nodes.get_mut(&node) {
            entry.visible = visible;
        }
    }
}

impl HeadlessScene {
    fn resource(&self, label: String) -> Box<dyn Disposable> {
        Box::new(HeadlessResource {
            label,
            disposed: Arc::clone(&self.disposed),
            done: false,
        })
    }
}

/// Geometry / material
struct HeadlessResource {
    label: String,
    disposed: Arc<AtomicUsize>,
    done: bool,
}

impl Disposable for HeadlessResource {
    fn label(&self) -> &str {
        &self.label
    }

    fn dispose(&mut self) -> Result<(), DisposeError> {
        if !std::mem::replace(&mut self.done, true) {
            self.disposed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Overlay label, прицепленный к anchor-узлу
struct OverlayLabel {
    label: String,
    parent: NodeId,
    table: Arc<Mutex<SceneTable>>,
    disposed: Arc<AtomicUsize>,
    done: bool,
}

impl Disposable for OverlayLabel {
    fn label(&self) -> &str {
        &self.label
    }

    fn dispose(&mut self) -> Result<(), DisposeError> {
        if std::mem::replace(&mut self.done, true) {
            return Ok(());
        }
        let parent_alive = self
            .table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .nodes
            .contains_key(&self.parent);
        if !parent_alive {
            return Err(DisposeError::MissingParent(self.label.clone()));
        }
        self.disposed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Root узел комнаты (free вместе с детьми)
struct NodeHandle {
    label: String,
    node: NodeId,
    table: Arc<Mutex<SceneTable>>,
    disposed: Arc<AtomicUsize>,
    done: bool,
}

impl Disposable for NodeHandle {
    fn label(&self) -> &str {
        &self.label
    }

    fn dispose(&mut self) -> Result<(), DisposeError> {
        if !std::mem::replace(&mut self.done, true) {
            self.table.lock().unwrap_or_else(PoisonError::into_inner).free(self.node);
            self.disposed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavigationConfig;
    use crate::layout::degraded_sub_room_blueprint;
    use crate::scene::dispose_all;

    fn blueprint() -> RoomBlueprint {
        degraded_sub_room_blueprint("acme", &NavigationConfig::default())
    }

    #[test]
    fn test_build_attach_dispose() {
        let mut scene = HeadlessScene::new();
        let built = scene.build_room(&blueprint()).unwrap();

        // shell (2) + teleporter (geometry, material, label) + root handle
        assert_eq!(built.resources.len(), 6);
        assert_eq!(scene.node_count(), 2);
        assert!(!scene.is_attached(built.root));

        scene.attach(built.root).unwrap();
        assert!(scene.is_attached(built.root));

        scene.detach(built.root);
        let report = dispose_all(built.resources);
        assert_eq!(report.disposed, 6);
        assert_eq!(report.warnings, 0);
        assert_eq!(scene.node_count(), 0);
        assert_eq!(scene.disposed_count(), 6);
    }

    #[test]
    fn test_fail_next_build_is_one_shot() {
        let mut scene = HeadlessScene::new();
        scene.fail_next_build();

        assert!(matches!(scene.build_room(&blueprint()), Err(SceneError::BuildFailed(_))));
        assert!(scene.build_room(&blueprint()).is_ok());
        assert_eq!(scene.built_rooms(), 1);
    }

    #[test]
    fn test_attach_unknown_node() {
        let mut scene = HeadlessScene::new();
        assert_eq!(scene.attach(NodeId(42)), Err(SceneError::UnknownNode(NodeId(42))));
    }

    #[test]
    fn test_orphaned_label_reports_missing_parent() {
        let mut scene = HeadlessScene::new();
        let built = scene.build_room(&blueprint()).unwrap();
        scene.orphan_overlay_labels();

        let report = dispose_all(built.resources);
        assert_eq!(report.warnings, 1);
        assert_eq!(report.disposed, 5);
    }

    #[test]
    fn test_clones_share_table() {
        let mut scene = HeadlessScene::new();
        let observer = scene.clone();
        let built = scene.build_room(&blueprint()).unwrap();

        scene.set_visible(built.root, false);
        assert!(!observer.is_visible(built.root));
    }
}
