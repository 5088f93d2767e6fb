//! DataService: внешний источник résumé records
//!
//! Fetch асинхронный: future хранится в pending-состоянии и poll'ится раз в frame
//! (frame loop не блокируется, пока fetch не завершился).

use std::future::Future;
use std::pin::Pin;
use std::task::Poll;

use bevy::tasks::{block_on, futures_lite::future};

use super::records::ExperienceRecord;

/// Ошибки fetch (non-2xx, network, неизвестный id, битый payload)
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("cannot decode payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Pending fetch
pub type FetchFuture<T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send + 'static>>;

/// Контракт источника данных
pub trait DataService: Send + Sync + 'static {
    /// Все записи (summary-форма), порядок: как у источника
    fn fetch_all(&self) -> FetchFuture<Vec<ExperienceRecord>>;

    /// Одна запись с вложенными exhibits
    fn fetch_one(&self, id: &str) -> FetchFuture<ExperienceRecord>;
}

/// Один poll pending fetch без блокировки: `None` пока не готово
pub fn poll_fetch<T>(fetch: &mut FetchFuture<T>) -> Option<Result<T, FetchError>> {
    block_on(future::poll_once(fetch))
}

/// In-memory DataService поверх JSON (headless runs, тесты)
///
/// `failing(status)` переключает все fetch в ошибку: для degraded paths.
/// `with_latency(polls)`: fetch остаётся pending первые `polls` опросов (имитация сети).
#[derive(Debug, Clone, Default)]
pub struct StaticDataService {
    records: Vec<ExperienceRecord>,
    fail_status: Option<u16>,
    latency_polls: usize,
}

impl StaticDataService {
    pub fn new(records: Vec<ExperienceRecord>) -> Self {
        Self {
            records,
            fail_status: None,
            latency_polls: 0,
        }
    }

    pub fn with_latency(mut self, polls: usize) -> Self {
        self.latency_polls = polls;
        self
    }

    /// JSON: массив records верхнего уровня
    pub fn from_json(json: &str) -> Result<Self, FetchError> {
        let records: Vec<ExperienceRecord> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    pub fn failing(status: u16) -> Self {
        Self {
            records: Vec::new(),
            fail_status: Some(status),
            latency_polls: 0,
        }
    }
}

impl DataService for StaticDataService {
    fn fetch_all(&self) -> FetchFuture<Vec<ExperienceRecord>> {
        let result = match self.fail_status {
            Some(status) => Err(FetchError::Status(status)),
            None => Ok(self.records.iter().map(ExperienceRecord::summary_only).collect()),
        };
        delayed(result, self.latency_polls)
    }

    fn fetch_one(&self, id: &str) -> FetchFuture<ExperienceRecord> {
        let result = match self.fail_status {
            Some(status) => Err(FetchError::Status(status)),
            None => self
                .records
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(id.to_string())),
        };
        delayed(result, self.latency_polls)
    }
}

/// Future, готовый на `polls + 1`-м опросе
fn delayed<T: Send + 'static>(result: Result<T, FetchError>, polls: usize) -> FetchFuture<T> {
    let mut remaining = polls;
    let mut result = Some(result);
    Box::pin(std::future::poll_fn(move |_| {
        if remaining > 0 {
            remaining -= 1;
            return Poll::Pending;
        }
        match result.take() {
            Some(result) => Poll::Ready(result),
            None => Poll::Pending,
        }
    }))
}
