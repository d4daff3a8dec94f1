// Adapters layer: concrete implementations for external systems (files, CSV, result store).

pub mod catalog_csv;
pub mod result_store;
pub mod storage;
pub mod transcript_csv;

pub use catalog_csv::read_catalog_rows;
pub use result_store::InMemoryResultStore;
pub use storage::LocalStorage;
pub use transcript_csv::read_transcript;
