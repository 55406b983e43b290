pub mod service;

pub use service::{GatewayTransport, Headers, HttpTransport, TransportRequest};
