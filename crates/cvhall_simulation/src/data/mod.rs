//! Data domain: résumé records и DataService контракт
//!
//! Содержит:
//! - ExperienceRecord / ExhibitRecord / Category (serde)
//! - DataService (fetch_all / fetch_one, async через FetchFuture)
//! - StaticDataService (JSON-backed реализация)

pub mod records;
pub mod service;

pub use records::*;
pub use service::*;
