//! Run statistics and per-issue results.

mod result;
mod run_statistics;

pub use result::MigratedIssue;
pub use run_statistics::RunStatistics;
