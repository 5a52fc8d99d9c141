// Flight Probe Infrastructure - HTTP Adapter
// Implements: HttpTransport over reqwest

pub mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;
