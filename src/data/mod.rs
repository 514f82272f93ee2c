//! Data layer: chart record models and the JSON-file store that
//! persists them, partitioned by chart kind.

mod models;
mod storage;

pub use models::{ChartDraft, ChartKind, ChartRecord, DataPoint};
pub use storage::{ChartStore, StoreError};
