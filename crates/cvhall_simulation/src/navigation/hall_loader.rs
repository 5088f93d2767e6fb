//! HallLoader: стартовое заполнение hall из fetch_all
//!
//! Fetch failure → degraded hall с одним error exhibit. Hall никогда не
//! остаётся непригодным.

use std::sync::{Mutex, PoisonError};

use bevy::prelude::*;

use super::rooms::Hall;
use crate::config::NavigationConfig;
use crate::data::{poll_fetch, DataService, ExperienceRecord, FetchFuture};
use crate::layout::{degraded_hall_blueprint, hall_blueprint};
use crate::scene::SceneHost;

/// Итог загрузки hall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HallReport {
    pub doors: usize,
    pub degraded: bool,
}

#[derive(Resource, Default)]
pub struct HallLoader {
    pending: Option<Mutex<FetchFuture<Vec<ExperienceRecord>>>>,
    loaded: bool,
}

impl HallLoader {
    pub fn start(&mut self, data: &dyn DataService) {
        crate::log_info("🏛️ Loading hall records");
        self.pending = Some(Mutex::new(data.fetch_all()));
        self.loaded = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Poll fetch_all; по готовности строит hall и заменяет им `hall`
    pub fn poll(&mut self, scene: &mut dyn SceneHost, hall: &mut Hall, config: &NavigationConfig) -> Option<HallReport> {
        let fetch = self.pending.as_mut()?.get_mut().unwrap_or_else(PoisonError::into_inner);
        let result = poll_fetch(fetch)?;
        self.pending = None;
        self.loaded = true;

        let blueprint = match result {
            Ok(records) => hall_blueprint(&records, config),
            Err(err) => {
                crate::log_warning(&format!("⚠️ fetch_all failed: {} → degraded hall", err));
                degraded_hall_blueprint(&err.to_string(), config)
            }
        };

        let (root, resources) = match scene.build_room(&blueprint) {
            Ok(built) => match scene.attach(built.root) {
                Ok(()) => (Some(built.root), built.resources),
                Err(err) => {
                    crate::log_error(&format!("❌ attach hall failed: {}", err));
                    crate::scene::dispose_all(built.resources);
                    (None, Vec::new())
                }
            },
            // Логический hall (анкоры, bounds) остаётся рабочим и без узлов
            Err(err) => {
                crate::log_error(&format!("❌ build hall failed: {}", err));
                (None, Vec::new())
            }
        };

        *hall = Hall::new(blueprint, root, resources, config);
        let report = HallReport {
            doors: hall.door_count(),
            degraded: hall.degraded,
        };

        crate::log_info(&format!(
            "🏛️ Hall ready: {} doors{}",
            report.doors,
            if report.degraded { " (degraded)" } else { "" }
        ));
        Some(report)
    }
}
