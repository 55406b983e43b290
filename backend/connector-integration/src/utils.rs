use domain_types::errors::{CustomResult, GatewayError};
use error_stack::report;

pub mod xml_utils;
pub use xml_utils::{from_xml, to_xml};

/// Strips the characters the gateway rejects (`/ = * ! -`), optionally
/// removes spaces first, then trims and collapses any remaining whitespace
/// run to a single space. Used with `strip_spaces` for card numbers and
/// expiry digits, without for free-text messages.
pub fn cleanse(input: &str, strip_spaces: bool) -> String {
    let stripped: String = input
        .chars()
        .filter(|c| !matches!(c, '/' | '=' | '*' | '!' | '-'))
        .filter(|c| !(strip_spaces && *c == ' '))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rearranges a 4-digit `YYMM` expiry to `MMYY` when the configured format
/// asks for it. The format comparison is case-insensitive and ignores `/`
/// separators; any other format passes the expiry through untouched. A
/// malformed expiry under `mmyy` fails instead of being truncated.
pub fn normalize_expiry(format: Option<&str>, expiry: &str) -> CustomResult<String, GatewayError> {
    let wants_mmyy = format
        .map(|f| f.to_lowercase().replace('/', "") == "mmyy")
        .unwrap_or(false);
    if !wants_mmyy {
        return Ok(expiry.to_owned());
    }
    if expiry.len() != 4 || !expiry.chars().all(|c| c.is_ascii_digit()) {
        return Err(report!(GatewayError::InvalidDataFormat {
            field_name: "expdate"
        }));
    }
    let (yy, mm) = expiry.split_at(2);
    Ok(format!("{mm}{yy}"))
}
