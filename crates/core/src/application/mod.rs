// Application Layer - Use cases

pub mod render;
pub mod runner;
pub mod summary;

pub use runner::ProbeRunner;
pub use summary::{ProbeKind, ProbeOutcome, ProbeRecord, RunSummary};
