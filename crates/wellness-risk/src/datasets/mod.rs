//! Read-only inspection of the survey tables behind the trained models.

pub mod router;
pub mod store;

pub use router::dataset_router;
pub use store::{
    CsvTableStore, TableName, TableRow, TableStore, TableStoreError, DEFAULT_PEEK_LIMIT,
    MAX_PEEK_LIMIT,
};
