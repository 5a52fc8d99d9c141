// Port Layer - Interfaces for external dependencies

pub mod http_transport;
pub mod reporter;

// Re-exports
pub use http_transport::{HttpTransport, RawResponse, TransportError};
pub use reporter::{Reporter, Tone};
