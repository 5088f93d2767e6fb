//! ProximityDetector: per-frame scan анкоров активной комнаты
//!
//! Порядок итерации = порядок регистрации (caller-defined, stable),
//! поэтому "первый рядом" детерминирован.

use bevy::prelude::*;

use super::anchors::{AnchorId, AnchorKindTag, InteractiveAnchor};

/// Анкор в радиусе (id + вид)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearAnchor {
    pub id: AnchorId,
    pub kind: AnchorKindTag,
}

/// Результат одного scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProximityScan {
    /// Все анкоры в радиусе, в порядке регистрации
    pub near: Vec<NearAnchor>,
    /// Реальные переключения highlight (повторная установка не попадает)
    pub highlight_changes: Vec<(AnchorId, bool)>,
}

impl ProximityScan {
    /// Single-selection: первый анкор в радиусе
    pub fn first_near(&self) -> Option<&NearAnchor> {
        self.near.first()
    }
}

/// Scan: planar distance vs per-anchor threshold + toggle highlight
pub fn scan_anchors(point: Vec3, anchors: &mut [InteractiveAnchor]) -> ProximityScan {
    let mut scan = ProximityScan::default();

    for anchor in anchors.iter_mut() {
        let near = anchor.is_near(point);
        if anchor.set_highlighted(near) {
            scan.highlight_changes.push((anchor.id().clone(), near));
        }
        if near {
            scan.near.push(NearAnchor {
                id: anchor.id().clone(),
                kind: anchor.tag(),
            });
        }
    }

    scan
}

/// Трекает текущего "interaction candidate" между кадрами
///
/// Нужен чтобы presenter получал InteractionAvailable только при смене кандидата,
/// а не каждый frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct ProximityDetector {
    candidate: Option<NearAnchor>,
}

/// Scan + изменился ли кандидат
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityReport {
    pub scan: ProximityScan,
    pub candidate_changed: bool,
}

impl ProximityDetector {
    pub fn candidate(&self) -> Option<&NearAnchor> {
        self.candidate.as_ref()
    }

    pub fn update(&mut self, point: Vec3, anchors: &mut [InteractiveAnchor]) -> ProximityReport {
        let scan = scan_anchors(point, anchors);
        let next = scan.first_near().cloned();
        let candidate_changed = next != self.candidate;
        self.candidate = next;

        ProximityReport { scan, candidate_changed }
    }

    /// Сброс при смене комнаты (анкоры старой комнаты больше не существуют)
    pub fn reset(&mut self) {
        self.candidate = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProximityConfig;
    use crate::data::{Category, ExhibitRecord};

    fn anchors() -> Vec<InteractiveAnchor> {
        let radii = ProximityConfig::default();
        vec![
            InteractiveAnchor::door("a", Category::Formation, Vec3::new(0.0, 0.0, 0.0), 0.0, &radii),
            InteractiveAnchor::door("b", Category::Formation, Vec3::new(1.0, 0.0, 0.0), 0.0, &radii),
            InteractiveAnchor::exhibit(ExhibitRecord::fetch_error("e"), Vec3::new(20.0, 1.0, 0.0), &radii),
        ]
    }

    #[test]
    fn test_first_near_follows_registration_order() {
        let mut anchors = anchors();
        // Ближе к "b", но "a" зарегистрирован первым
        let scan = scan_anchors(Vec3::new(1.0, 0.0, 0.0), &mut anchors);

        assert_eq!(scan.near.len(), 2);
        assert_eq!(scan.first_near().map(|a| a.id.clone()), Some(AnchorId::door("a")));
    }

    #[test]
    fn test_highlight_changes_only_on_transition() {
        let mut anchors = anchors();

        let first = scan_anchors(Vec3::ZERO, &mut anchors);
        assert_eq!(first.highlight_changes.len(), 2);

        let second = scan_anchors(Vec3::ZERO, &mut anchors);
        assert!(second.highlight_changes.is_empty(), "повторный scan не должен дёргать visuals");

        let away = scan_anchors(Vec3::new(-50.0, 0.0, 0.0), &mut anchors);
        assert_eq!(away.highlight_changes.len(), 2);
        assert!(away.highlight_changes.iter().all(|(_, on)| !on));
        assert!(anchors.iter().all(|a| !a.is_highlighted()));
    }

    #[test]
    fn test_detector_reports_candidate_change_once() {
        let mut detector = ProximityDetector::default();
        let mut anchors = anchors();

        assert!(detector.update(Vec3::ZERO, &mut anchors).candidate_changed);
        assert!(!detector.update(Vec3::ZERO, &mut anchors).candidate_changed);
        assert!(detector.update(Vec3::new(-50.0, 0.0, 0.0), &mut anchors).candidate_changed);
        assert!(detector.candidate().is_none());
    }

    #[test]
    fn test_empty_anchor_set() {
        let scan = scan_anchors(Vec3::ZERO, &mut []);
        assert!(scan.near.is_empty());
        assert!(scan.first_near().is_none());
    }
}
