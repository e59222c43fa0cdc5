/// Treatment plan retrieval from the planning database.
///
/// ```text
///   PATIENT ──< TCASE ──< RTPLAN (label, part-10 blob)
/// ```

pub mod repository;

pub use repository::{save_blob, PlanQuery, PlanRecord, PlanRepository, DEFAULT_BLOB_FILE};
