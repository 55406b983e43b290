pub mod moneris;

pub use self::moneris::{Endpoint, EndpointFamily, OperationRoute};
