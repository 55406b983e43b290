use error_stack::report;
use hyperswitch_masking::{PeekInterface, Secret};

use crate::errors::{CustomResult, GatewayError};

pub const DEFAULT_CRYPT_TYPE: &str = "7";
pub const DEFAULT_NAME: &str = "default";

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum Region {
    Ca,
    Us,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum Environment {
    Production,
    Test,
}

/// Caller-supplied configuration, resolved anew on every call.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct GatewayConfig {
    pub store_id: Secret<String>,
    pub api_token: Secret<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub test: Option<bool>,
    #[serde(default)]
    pub crypt_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub expiry_format: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub store_id: Secret<String>,
    pub api_token: Secret<String>,
    pub region: Region,
    pub environment: Environment,
    pub crypt_type: String,
    pub name: String,
    pub expiry_format: Option<String>,
}

impl GatewayConfig {
    pub fn new(store_id: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            store_id: Secret::new(store_id.into()),
            api_token: Secret::new(api_token.into()),
            country_code: None,
            test: None,
            crypt_type: None,
            name: None,
            expiry_format: None,
        }
    }

    /// Validates credentials and the country code, then layers defaults over
    /// the caller's values.
    pub fn resolve(&self) -> CustomResult<ResolvedConfig, GatewayError> {
        if self.store_id.peek().trim().is_empty() {
            return Err(report!(GatewayError::MissingCredential {
                field: "store_id"
            }));
        }
        if self.api_token.peek().trim().is_empty() {
            return Err(report!(GatewayError::MissingCredential {
                field: "api_token"
            }));
        }

        let region = match self.country_code.as_deref() {
            None => Region::Ca,
            Some(code) => code.trim().parse::<Region>().map_err(|_| {
                report!(GatewayError::UnsupportedCountry {
                    code: code.to_owned(),
                })
            })?,
        };

        let environment = if self.test.unwrap_or(false) {
            Environment::Test
        } else {
            Environment::Production
        };

        Ok(ResolvedConfig {
            store_id: self.store_id.clone(),
            api_token: self.api_token.clone(),
            region,
            environment,
            crypt_type: self
                .crypt_type
                .clone()
                .unwrap_or_else(|| DEFAULT_CRYPT_TYPE.to_owned()),
            name: self.name.clone().unwrap_or_else(|| DEFAULT_NAME.to_owned()),
            expiry_format: self.expiry_format.clone(),
        })
    }
}
