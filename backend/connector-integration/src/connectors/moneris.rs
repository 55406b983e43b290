pub mod transformers;


use std::time::Duration;

use domain_types::{
    connector_types::{GatewayResponse, Operation, OperationRequest},
    errors::{CustomResult, GatewayError},
    types::{Environment, GatewayConfig, Region, ResolvedConfig},
};
use error_stack::{report, ResultExt};
use external_services::{GatewayTransport, Headers, HttpTransport, TransportRequest};

use crate::utils;
use transformers as moneris;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const USER_AGENT: &str = "User-Agent";
}

pub(crate) const API_VERSION: &str = "MpgApi Rust/0.1.0";
const CLIENT_TIMEOUT_SECS: u64 = 35;

pub(crate) const ROOT_REQUEST: &str = "request";
pub(crate) const ROOT_MPI2_REQUEST: &str = "Mpi2Request";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum EndpointFamily {
    Gateway,
    Mpi,
    Mpi2,
}

/// One row of the static host table: a (region, environment) platform and
/// its per-family servlet paths.
#[derive(Clone, Copy, Debug)]
pub struct Endpoint {
    pub protocol: &'static str,
    pub host: &'static str,
    pub port: u16,
    pub gateway_path: &'static str,
    pub mpi_path: Option<&'static str>,
    pub mpi2_path: Option<&'static str>,
    pub api_version: &'static str,
    pub client_timeout_secs: u64,
}

const CA_PRODUCTION: Endpoint = Endpoint {
    protocol: "https",
    host: "www3.moneris.com",
    port: 443,
    gateway_path: "/gateway2/servlet/MpgRequest",
    mpi_path: Some("/mpi/servlet/MpiServlet"),
    mpi2_path: Some("/mpi2/servlet/Mpi2Servlet"),
    api_version: API_VERSION,
    client_timeout_secs: CLIENT_TIMEOUT_SECS,
};

const CA_TEST: Endpoint = Endpoint {
    protocol: "https",
    host: "esqa.moneris.com",
    port: 443,
    gateway_path: "/gateway2/servlet/MpgRequest",
    mpi_path: Some("/mpi/servlet/MpiServlet"),
    mpi2_path: Some("/mpi2/servlet/Mpi2Servlet"),
    api_version: API_VERSION,
    client_timeout_secs: CLIENT_TIMEOUT_SECS,
};

// The US platform has no MPI servlets; 3-D Secure flows are CA-only.
const US_PRODUCTION: Endpoint = Endpoint {
    protocol: "https",
    host: "esplus.moneris.com",
    port: 443,
    gateway_path: "/gateway_us/servlet/MpgRequest",
    mpi_path: None,
    mpi2_path: None,
    api_version: API_VERSION,
    client_timeout_secs: CLIENT_TIMEOUT_SECS,
};

const US_TEST: Endpoint = Endpoint {
    protocol: "https",
    host: "esplusqa.moneris.com",
    port: 443,
    gateway_path: "/gateway_us/servlet/MpgRequest",
    mpi_path: None,
    mpi2_path: None,
    api_version: API_VERSION,
    client_timeout_secs: CLIENT_TIMEOUT_SECS,
};

impl Endpoint {
    pub fn select(region: Region, environment: Environment) -> &'static Self {
        match (region, environment) {
            (Region::Ca, Environment::Production) => &CA_PRODUCTION,
            (Region::Ca, Environment::Test) => &CA_TEST,
            (Region::Us, Environment::Production) => &US_PRODUCTION,
            (Region::Us, Environment::Test) => &US_TEST,
        }
    }

    pub fn for_config(config: &ResolvedConfig) -> &'static Self {
        Self::select(config.region, config.environment)
    }

    pub fn url(&self, family: EndpointFamily) -> CustomResult<String, GatewayError> {
        let path = match family {
            EndpointFamily::Gateway => Some(self.gateway_path),
            EndpointFamily::Mpi => self.mpi_path,
            EndpointFamily::Mpi2 => self.mpi2_path,
        }
        .ok_or_else(|| {
            report!(GatewayError::UnsupportedEndpoint {
                family: family.to_string(),
                host: self.host.to_owned(),
            })
        })?;
        Ok(format!(
            "{}://{}:{}{}",
            self.protocol, self.host, self.port, path
        ))
    }
}

/// Routing metadata for one abstract operation. The whole table is static
/// and enumerable; no decision about endpoints, nesting, defaulting, or
/// redaction lives anywhere else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperationRoute {
    pub family: EndpointFamily,
    pub root_element: &'static str,
    pub risk_nested: bool,
    pub suppress_order_defaults: bool,
    pub exposes_masked_pan: bool,
}

pub const fn route(operation: Operation) -> OperationRoute {
    OperationRoute {
        family: match operation {
            Operation::CardLookup | Operation::ThreedsAuthentication | Operation::CavvLookup => {
                EndpointFamily::Mpi2
            }
            Operation::Acs | Operation::Txn => EndpointFamily::Mpi,
            _ => EndpointFamily::Gateway,
        },
        root_element: match operation {
            Operation::CardLookup | Operation::ThreedsAuthentication | Operation::CavvLookup => {
                ROOT_MPI2_REQUEST
            }
            _ => ROOT_REQUEST,
        },
        risk_nested: matches!(
            operation,
            Operation::AttributeQuery | Operation::SessionQuery
        ),
        suppress_order_defaults: matches!(
            operation,
            Operation::ResLookupMasked
                | Operation::ResDelete
                | Operation::Completion
                | Operation::ResUpdateCc
        ),
        exposes_masked_pan: matches!(operation, Operation::ResLookupMasked),
    }
}

fn transport_headers(endpoint: &Endpoint) -> Headers {
    [
        (headers::CONTENT_TYPE.to_owned(), "text/xml".to_owned()),
        (
            headers::USER_AGENT.to_owned(),
            endpoint.api_version.to_owned(),
        ),
    ]
    .into_iter()
    .collect()
}

/// One full exchange: resolve configuration, shape the payload, serialize,
/// send, normalize. Setup failures reject before any network I/O; a
/// transport timeout resolves to the TIMEOUT result instead of an error.
pub async fn execute_with_transport(
    operation: Operation,
    mut request: OperationRequest,
    configuration: &GatewayConfig,
    transport: &dyn GatewayTransport,
) -> CustomResult<GatewayResponse, GatewayError> {
    let config = configuration.resolve()?;
    let route = route(operation);

    moneris::prepare_payload(operation, &mut request, &config, &route)?;

    let endpoint = Endpoint::for_config(&config);
    let url = endpoint.url(route.family)?;

    let wire_request = moneris::MpgRequest::assemble(operation, request, &config);
    let body = utils::to_xml(route.root_element, &wire_request)?;

    tracing::info!(operation = %operation, family = %route.family, host = endpoint.host, "Dispatching gateway request");

    let raw = match transport
        .execute(TransportRequest {
            url,
            body,
            headers: transport_headers(endpoint),
            timeout: Duration::from_secs(endpoint.client_timeout_secs),
        })
        .await
    {
        Ok(raw) => raw,
        Err(error) if error.current_context().is_timeout() => {
            tracing::info!(operation = %operation, "Gateway request timed out");
            return Ok(GatewayResponse::timed_out());
        }
        Err(error) => return Err(error.change_context(GatewayError::RequestDispatchFailed)),
    };

    let response: moneris::MpgResponse = utils::from_xml(&raw)?;
    moneris::normalize_response(response, route.exposes_masked_pan)
}

pub async fn execute(
    operation: Operation,
    request: OperationRequest,
    configuration: &GatewayConfig,
) -> CustomResult<GatewayResponse, GatewayError> {
    execute_with_transport(operation, request, configuration, &HttpTransport).await
}

macro_rules! operation_fns {
    ($($(#[$doc:meta])* $name:ident => $operation:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub async fn $name(
                request: OperationRequest,
                configuration: &GatewayConfig,
            ) -> CustomResult<GatewayResponse, GatewayError> {
                execute(Operation::$operation, request, configuration).await
            }
        )*
    };
}

operation_fns! {
    purchase => Purchase,
    refund => Refund,
    preauth => Preauth,
    completion => Completion,
    apple_pay_preload => ApplepayPreload,
    /// Stores a card in the vault, returning a `data_key`.
    res_add_cc => ResAddCc,
    res_delete => ResDelete,
    res_update_cc => ResUpdateCc,
    res_purchase_cc => ResPurchaseCc,
    res_preauth_cc => ResPreauthCc,
    /// The only operation whose result may carry the masked PAN.
    res_lookup_masked => ResLookupMasked,
    independent_refund_with_vault => ResIndRefundCc,
    res_tokenize_cc => ResTokenizeCc,
    cavv_vault_purchase => ResCavvPurchaseCc,
    kount_inquire => KountInquiry,
    kount_update => KountUpdate,
    threeds_card_lookup => CardLookup,
    threeds_authentication => ThreedsAuthentication,
    cavv_purchase => CavvPurchase,
    cavv_lookup => CavvLookup,
    attribute_query => AttributeQuery,
    session_query => SessionQuery,
}
