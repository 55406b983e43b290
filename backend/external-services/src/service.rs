use std::time::Duration;

use async_trait::async_trait;
use domain_types::errors::{CustomResult, TransportError};
use error_stack::{report, ResultExt};
use reqwest::Client;

pub type Headers = std::collections::HashSet<(String, String)>;

/// One outbound exchange. The gateway protocol is POST-only; the body is the
/// serialized XML document and the timeout is enforced per request.
#[derive(Clone, Debug)]
pub struct TransportRequest {
    pub url: String,
    pub body: String,
    pub headers: Headers,
    pub timeout: Duration,
}

/// The transport seam. The production implementation is [`HttpTransport`];
/// tests substitute canned responses. A timeout must surface as
/// [`TransportError::RequestTimedOut`] so the caller can classify it instead
/// of failing the call.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> CustomResult<String, TransportError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct HttpTransport;

#[async_trait]
impl GatewayTransport for HttpTransport {
    async fn execute(&self, request: TransportRequest) -> CustomResult<String, TransportError> {
        let client = create_client()?;
        let headers = request.headers.construct_header_map()?;

        let response = client
            .post(request.url.as_str())
            .headers(headers)
            .timeout(request.timeout)
            .body(request.body)
            .send()
            .await
            .map_err(|error| {
                let api_error = if error.is_timeout() {
                    TransportError::RequestTimedOut
                } else {
                    TransportError::RequestNotSent(error.to_string())
                };
                tracing::info!(error = ?api_error, "Unable to send request to gateway");
                report!(api_error)
            })?;

        handle_response(response).await
    }
}

/// One exchange per call: a fresh client, no redirects, no pooling contract.
pub fn create_client() -> CustomResult<Client, TransportError> {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .change_context(TransportError::ClientConstructionFailed)
}

async fn handle_response(response: reqwest::Response) -> CustomResult<String, TransportError> {
    let status_code = response.status().as_u16();
    match status_code {
        200..=202 | 204 => response
            .text()
            .await
            .change_context(TransportError::ResponseDecodingFailed),
        _ => {
            tracing::info!(status_code, "Unexpected response from gateway");
            Err(report!(TransportError::UnexpectedStatus(status_code)))
        }
    }
}

pub(crate) trait HeaderExt {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, TransportError>;
}

impl HeaderExt for Headers {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, TransportError> {
        use std::str::FromStr;

        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        self.into_iter().try_fold(
            HeaderMap::new(),
            |mut header_map, (header_name, header_value)| {
                let header_name = HeaderName::from_str(&header_name)
                    .change_context(TransportError::HeaderMapConstructionFailed)?;
                let header_value = HeaderValue::from_str(&header_value)
                    .change_context(TransportError::HeaderMapConstructionFailed)?;
                header_map.append(header_name, header_value);
                Ok(header_map)
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_map_keeps_every_entry() {
        let headers: Headers = [
            ("Content-Type".to_owned(), "text/xml".to_owned()),
            ("User-Agent".to_owned(), "MpgApi Rust/0.1.0".to_owned()),
        ]
        .into_iter()
        .collect();

        let map = headers.construct_header_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("content-type").unwrap(), "text/xml");
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let headers: Headers = [("bad header\n".to_owned(), "x".to_owned())]
            .into_iter()
            .collect();

        let err = headers.construct_header_map().unwrap_err();
        assert_eq!(
            err.current_context(),
            &TransportError::HeaderMapConstructionFailed
        );
    }

    #[test]
    fn only_the_timeout_variant_classifies_as_timeout() {
        assert!(TransportError::RequestTimedOut.is_timeout());
        assert!(!TransportError::UnexpectedStatus(502).is_timeout());
        assert!(!TransportError::RequestNotSent("refused".to_owned()).is_timeout());
    }
}
