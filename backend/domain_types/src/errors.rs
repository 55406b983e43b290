pub type CustomResult<T, E> = Result<T, error_stack::Report<E>>;

#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum TransportError {
    #[error("Header map construction failed")]
    HeaderMapConstructionFailed,
    #[error("Client construction failed")]
    ClientConstructionFailed,
    #[error("Failed to send request to gateway: {0}")]
    RequestNotSent(String),
    #[error("Request to gateway timed out")]
    RequestTimedOut,
    #[error("Failed to decode response")]
    ResponseDecodingFailed,
    #[error("Server responded with unexpected status {0}")]
    UnexpectedStatus(u16),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestTimedOut)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum GatewayError {
    #[error("{field} is required")]
    MissingCredential { field: &'static str },
    #[error("Invalid country code {code}: CA and US are the only supported regions")]
    UnsupportedCountry { code: String },
    #[error("No {family} endpoint on {host}")]
    UnsupportedEndpoint { family: String, host: String },
    #[error("Invalid value for {field_name}")]
    InvalidDataFormat { field_name: &'static str },
    #[error("Failed to encode request body")]
    RequestEncodingFailed,
    #[error("Failed to send request to gateway")]
    RequestDispatchFailed,
    #[error("Failed to deserialize gateway response")]
    ResponseDeserializationFailed,
}
