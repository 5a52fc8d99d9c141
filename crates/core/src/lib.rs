// Flight Probe Core - Domain Logic & Ports
// NO infrastructure dependencies: the HTTP client lives in infra-http

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{ProbeKind, ProbeOutcome, ProbeRecord, ProbeRunner, RunSummary};
pub use config::ProbeConfig;
pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
