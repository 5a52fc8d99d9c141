// Domain Layer - Requests, responses and ticketing payloads

pub mod error;
pub mod request;
pub mod response;
pub mod ticket;

// Re-exports
pub use error::DomainError;
pub use request::{HttpMethod, RequestDescriptor};
pub use response::{ResponseBody, ResponseEnvelope};
pub use ticket::{
    inspect_search_response, FlightId, OrderRequest, Passenger, SearchQuery, SearchVerdict,
    SUCCESS_CODE,
};
