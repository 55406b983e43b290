use domain_types::errors::{CustomResult, GatewayError};
use error_stack::ResultExt;
use serde::{de::DeserializeOwned, Serialize};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Serializes `value` under `root`, prepending the declaration the gateway
/// expects. The root name is a per-call parameter: concurrent calls never
/// share serializer state.
pub fn to_xml<T: Serialize>(root: &str, value: &T) -> CustomResult<String, GatewayError> {
    let body = quick_xml::se::to_string_with_root(root, value)
        .change_context(GatewayError::RequestEncodingFailed)?;
    Ok(format!("{XML_DECLARATION}{body}"))
}

/// Decodes a gateway XML document, removing the XML declaration if present.
pub fn from_xml<T: DeserializeOwned>(document: &str) -> CustomResult<T, GatewayError> {
    let trimmed = document.trim();
    let body = if trimmed.starts_with("<?xml") {
        match trimmed.find("?>") {
            Some(pos) => trimmed.get(pos + 2..).unwrap_or_default().trim(),
            None => {
                tracing::warn!("XML declaration start found but no closing '?>' tag");
                trimmed
            }
        }
    } else {
        trimmed
    };

    quick_xml::de::from_str(body).map_err(|error| {
        tracing::error!(error = ?error, "Failed to parse gateway XML");
        error_stack::report!(GatewayError::ResponseDeserializationFailed)
    })
}
