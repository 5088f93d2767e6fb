//! Résumé records (door payloads + exhibit payloads)

use serde::{Deserialize, Serialize};

/// Категория двери → стена hall
///
/// - `Formation` (category A) → side wall
/// - `Travail` (category B) → back wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Formation,
    Travail,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Formation => "formation",
            Category::Travail => "travail",
        }
    }
}

/// Запись résumé (одна дверь hall, одна sub-room)
///
/// `fetch_all` отдаёт записи без `exhibits`, `fetch_one`: с вложенными exhibits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub id: String,
    pub category: Category,
    pub title: String,
    #[serde(default)]
    pub organization: Option<String>,
    /// ISO-8601 (`YYYY-MM` / `YYYY-MM-DD`): сортируем лексикографически
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub exhibits: Vec<ExhibitRecord>,
}

impl ExperienceRecord {
    /// Копия без вложенных exhibits (summary-форма для hall)
    pub fn summary_only(&self) -> Self {
        Self {
            exhibits: Vec::new(),
            ..self.clone()
        }
    }
}

/// Exhibit внутри sub-room (проект, навык, диплом…)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExhibitRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ExhibitRecord {
    /// Synthetic exhibit для degraded room/hall (fetch failure)
    pub fn fetch_error(message: impl Into<String>) -> Self {
        Self {
            id: "error".to_string(),
            title: "Content unavailable".to_string(),
            description: Some(message.into()),
            tags: Vec::new(),
        }
    }
}

/// Сортировка по start_date (stable: равные даты сохраняют порядок регистрации)
pub fn sort_chronologically(records: &mut [ExperienceRecord]) {
    records.sort_by(|a, b| a.start_date.cmp(&b.start_date));
}
