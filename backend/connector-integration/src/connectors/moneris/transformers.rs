use std::collections::BTreeMap;

use domain_types::{
    connector_types::{
        GatewayResponse, Operation, OperationRequest, ReceiptData, FALLBACK_MESSAGE,
        TIMEOUT_MESSAGE,
    },
    errors::{CustomResult, GatewayError},
    types::ResolvedConfig,
};
use error_stack::report;
use hyperswitch_masking::{PeekInterface, Secret};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::OperationRoute;
use crate::utils::{cleanse, normalize_expiry};

pub(crate) const KOUNT_DEFAULT_EMAIL: &str = "noemail@kount.com";
pub(crate) const KOUNT_DEFAULT_ANID: &str = "0123456789";

/// `<cleansed name>-Transaction-<unix millis>-<random>`, the order id shape
/// the gateway deduplicates on.
pub(crate) fn generate_order_id(name: &str) -> String {
    let millis = time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix = rand::thread_rng().gen_range(1..=10_000);
    format!("{}-Transaction-{}-{}", cleanse(name, true), millis, suffix)
}

/// Rewrites the caller's payload into its wire shape: order-id/crypt-type
/// defaulting (unless the route suppresses it), PAN and expiry cleansing,
/// descriptor and token aliasing, and the kount-inquiry fallbacks.
pub(crate) fn prepare_payload(
    operation: Operation,
    request: &mut OperationRequest,
    config: &ResolvedConfig,
    route: &OperationRoute,
) -> CustomResult<(), GatewayError> {
    if !route.suppress_order_defaults {
        if request.crypt_type.is_none() {
            request.crypt_type = Some(config.crypt_type.clone());
        }
        if request.order_id.is_none() {
            request.order_id = Some(generate_order_id(&config.name));
        }
    }

    if let Some(pan) = request.pan.take() {
        request.pan = Some(Secret::new(cleanse(pan.peek(), true)));
    }

    if let Some(expdate) = request.expdate.take() {
        let cleansed = cleanse(expdate.peek(), true);
        let normalized = normalize_expiry(config.expiry_format.as_deref(), &cleansed)?;
        request.expdate = Some(Secret::new(normalized));
    }

    match request.description.take() {
        Some(description) => request.dynamic_descriptor = Some(description),
        None => {
            if request.dynamic_descriptor.is_none() {
                request.dynamic_descriptor = Some(operation.to_string());
            }
        }
    }

    if let Some(token) = request.token.take() {
        request.data_key = Some(token);
    }

    if operation == Operation::KountInquiry {
        if request.email.is_none() {
            request.email = Some(KOUNT_DEFAULT_EMAIL.to_owned());
        }
        if request.auto_number_id.is_none() {
            request.auto_number_id = Some(KOUNT_DEFAULT_ANID.to_owned());
        }
    }

    Ok(())
}

/// The document serialized under the routed root element: the two credential
/// elements followed by the operation element (risk queries one level
/// deeper, under `<risk>`).
#[derive(Debug, Serialize)]
pub struct MpgRequest {
    pub store_id: Secret<String>,
    pub api_token: Secret<String>,
    #[serde(rename = "$value")]
    pub operation: OperationBody,
}

impl MpgRequest {
    pub(crate) fn assemble(
        operation: Operation,
        request: OperationRequest,
        config: &ResolvedConfig,
    ) -> Self {
        Self {
            store_id: config.store_id.clone(),
            api_token: config.api_token.clone(),
            operation: OperationBody::wrap(operation, request),
        }
    }
}

#[derive(Debug, Serialize)]
pub enum OperationBody {
    #[serde(rename = "purchase")]
    Purchase(OperationRequest),
    #[serde(rename = "refund")]
    Refund(OperationRequest),
    #[serde(rename = "preauth")]
    Preauth(OperationRequest),
    #[serde(rename = "completion")]
    Completion(OperationRequest),
    #[serde(rename = "applepay_preload")]
    ApplepayPreload(OperationRequest),
    #[serde(rename = "res_add_cc")]
    ResAddCc(OperationRequest),
    #[serde(rename = "res_delete")]
    ResDelete(OperationRequest),
    #[serde(rename = "res_update_cc")]
    ResUpdateCc(OperationRequest),
    #[serde(rename = "res_purchase_cc")]
    ResPurchaseCc(OperationRequest),
    #[serde(rename = "res_preauth_cc")]
    ResPreauthCc(OperationRequest),
    #[serde(rename = "res_lookup_masked")]
    ResLookupMasked(OperationRequest),
    #[serde(rename = "res_ind_refund_cc")]
    ResIndRefundCc(OperationRequest),
    #[serde(rename = "res_tokenize_cc")]
    ResTokenizeCc(OperationRequest),
    #[serde(rename = "res_cavv_purchase_cc")]
    ResCavvPurchaseCc(OperationRequest),
    #[serde(rename = "kount_inquiry")]
    KountInquiry(OperationRequest),
    #[serde(rename = "kount_update")]
    KountUpdate(OperationRequest),
    #[serde(rename = "card_lookup")]
    CardLookup(OperationRequest),
    #[serde(rename = "threeds_authentication")]
    ThreedsAuthentication(OperationRequest),
    #[serde(rename = "cavv_purchase")]
    CavvPurchase(OperationRequest),
    #[serde(rename = "cavv_lookup")]
    CavvLookup(OperationRequest),
    #[serde(rename = "acs")]
    Acs(OperationRequest),
    #[serde(rename = "txn")]
    Txn(OperationRequest),
    #[serde(rename = "risk")]
    Risk(RiskBody),
}

#[derive(Debug, Serialize)]
pub struct RiskBody {
    #[serde(rename = "$value")]
    pub query: RiskQuery,
}

#[derive(Debug, Serialize)]
pub enum RiskQuery {
    #[serde(rename = "attribute_query")]
    AttributeQuery(OperationRequest),
    #[serde(rename = "session_query")]
    SessionQuery(OperationRequest),
}

impl OperationBody {
    fn wrap(operation: Operation, request: OperationRequest) -> Self {
        match operation {
            Operation::Purchase => Self::Purchase(request),
            Operation::Refund => Self::Refund(request),
            Operation::Preauth => Self::Preauth(request),
            Operation::Completion => Self::Completion(request),
            Operation::ApplepayPreload => Self::ApplepayPreload(request),
            Operation::ResAddCc => Self::ResAddCc(request),
            Operation::ResDelete => Self::ResDelete(request),
            Operation::ResUpdateCc => Self::ResUpdateCc(request),
            Operation::ResPurchaseCc => Self::ResPurchaseCc(request),
            Operation::ResPreauthCc => Self::ResPreauthCc(request),
            Operation::ResLookupMasked => Self::ResLookupMasked(request),
            Operation::ResIndRefundCc => Self::ResIndRefundCc(request),
            Operation::ResTokenizeCc => Self::ResTokenizeCc(request),
            Operation::ResCavvPurchaseCc => Self::ResCavvPurchaseCc(request),
            Operation::KountInquiry => Self::KountInquiry(request),
            Operation::KountUpdate => Self::KountUpdate(request),
            Operation::CardLookup => Self::CardLookup(request),
            Operation::ThreedsAuthentication => Self::ThreedsAuthentication(request),
            Operation::CavvPurchase => Self::CavvPurchase(request),
            Operation::CavvLookup => Self::CavvLookup(request),
            Operation::Acs => Self::Acs(request),
            Operation::Txn => Self::Txn(request),
            Operation::AttributeQuery => Self::Risk(RiskBody {
                query: RiskQuery::AttributeQuery(request),
            }),
            Operation::SessionQuery => Self::Risk(RiskBody {
                query: RiskQuery::SessionQuery(request),
            }),
        }
    }
}

/// Vendor convention: every receipt leaf arrives as a 0-or-1 element
/// sequence, repeated elements as a multi-element one. Decoding into a
/// `Vec<String>` keeps that explicit and isolates every call site from the
/// wrapping through [`first_value`]/[`flag`].
pub type WrappedField = Vec<String>;

#[derive(Debug, Default, Deserialize)]
pub struct MpgResponse {
    #[serde(default, rename = "receipt")]
    pub receipt: Vec<Receipt>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Receipt {
    #[serde(rename = "ReceiptId")]
    pub receipt_id: WrappedField,
    #[serde(rename = "ReferenceNum")]
    pub reference_num: WrappedField,
    #[serde(rename = "ResponseCode")]
    pub response_code: WrappedField,
    #[serde(rename = "ISO")]
    pub iso: WrappedField,
    #[serde(rename = "DataKey")]
    pub data_key: WrappedField,
    #[serde(rename = "AvsResultCode")]
    pub avs_result_code: WrappedField,
    #[serde(rename = "CvdResultCode")]
    pub cvd_result_code: WrappedField,
    #[serde(rename = "CavvResultCode")]
    pub cavv_result_code: WrappedField,
    #[serde(rename = "CardType")]
    pub card_type: WrappedField,
    #[serde(rename = "IsVisaDebit")]
    pub is_visa_debit: WrappedField,
    #[serde(rename = "AuthCode")]
    pub auth_code: WrappedField,
    #[serde(rename = "TransDate")]
    pub trans_date: WrappedField,
    #[serde(rename = "TransTime")]
    pub trans_time: WrappedField,
    #[serde(rename = "TransAmount")]
    pub trans_amount: WrappedField,
    #[serde(rename = "TransID")]
    pub trans_id: WrappedField,
    #[serde(rename = "TransType")]
    pub trans_type: WrappedField,
    #[serde(rename = "Complete")]
    pub complete: WrappedField,
    #[serde(rename = "PaymentType")]
    pub payment_type: WrappedField,
    #[serde(rename = "ResSuccess")]
    pub res_success: WrappedField,
    #[serde(rename = "RecurSuccess")]
    pub recur_success: WrappedField,
    #[serde(rename = "CorporateCard")]
    pub corporate_card: WrappedField,
    #[serde(rename = "Message")]
    pub message: WrappedField,
    #[serde(rename = "TimedOut")]
    pub timed_out: WrappedField,
    #[serde(rename = "ResolveData")]
    pub resolve_data: Vec<ResolveData>,
    #[serde(rename = "KountInfo")]
    pub kount_info: Vec<BTreeMap<String, String>>,
    #[serde(rename = "KountResult")]
    pub kount_result: WrappedField,
    #[serde(rename = "KountScore")]
    pub kount_score: WrappedField,
    #[serde(rename = "KountTransactionId")]
    pub kount_transaction_id: WrappedField,
    #[serde(rename = "PreloadTicket")]
    pub preload_ticket: WrappedField,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResolveData {
    pub masked_pan: WrappedField,
}

/// First element of an array-wrapped leaf, with absent/empty/literal
/// `"null"` all collapsing to `None`.
pub(crate) fn first_value(field: &[String]) -> Option<String> {
    field
        .first()
        .map(String::as_str)
        .filter(|value| !value.is_empty() && *value != "null")
        .map(ToOwned::to_owned)
}

/// Same extraction, asserted against a sentinel (`CardType == "V"`).
pub(crate) fn flag(field: &[String], sentinel: &str) -> Option<bool> {
    first_value(field).map(|value| value == sentinel)
}

pub(crate) fn normalize_response(
    response: MpgResponse,
    expose_masked_pan: bool,
) -> CustomResult<GatewayResponse, GatewayError> {
    let receipt = response
        .receipt
        .into_iter()
        .next()
        .ok_or_else(|| report!(GatewayError::ResponseDeserializationFailed))?;
    Ok(normalize_receipt(&receipt, expose_masked_pan))
}

/// Flattens the receipt into the public result shape and derives the
/// success verdict from the response/timeout codes.
pub(crate) fn normalize_receipt(receipt: &Receipt, expose_masked_pan: bool) -> GatewayResponse {
    let code = first_value(&receipt.response_code);
    let timed_out = flag(&receipt.timed_out, "true").unwrap_or(false);

    let is_success = !timed_out
        && code.as_deref().map_or(false, |code| {
            code == "00" || code.parse::<i64>().map_or(false, |value| value < 50)
        });

    let msg = if timed_out {
        TIMEOUT_MESSAGE.to_owned()
    } else {
        let cleansed = first_value(&receipt.message)
            .map(|message| cleanse(&message, false))
            .unwrap_or_default();
        if cleansed.is_empty() {
            FALLBACK_MESSAGE.to_owned()
        } else {
            cleansed
        }
    };

    let masked_pan = receipt
        .resolve_data
        .first()
        .and_then(|resolve| first_value(&resolve.masked_pan))
        .filter(|_| expose_masked_pan);

    // KountInfo carries repeated values per key; the decode map keeps the
    // last occurrence, matching the gateway's last-wins quirk.
    let kount_info = receipt
        .kount_info
        .first()
        .map(|info| {
            info.iter()
                .map(|(key, value)| (heck::AsLowerCamelCase(key).to_string(), value.clone()))
                .collect::<BTreeMap<_, _>>()
        })
        .filter(|info| !info.is_empty());

    let data = ReceiptData {
        reference: first_value(&receipt.reference_num),
        data_key: first_value(&receipt.data_key),
        iso: first_value(&receipt.iso),
        receipt: first_value(&receipt.receipt_id),
        avs_result_code: first_value(&receipt.avs_result_code),
        cvd_result_code: first_value(&receipt.cvd_result_code),
        cavv_result_code: first_value(&receipt.cavv_result_code),
        is_visa: flag(&receipt.card_type, "V"),
        is_master_card: flag(&receipt.card_type, "M"),
        is_visa_debit: flag(&receipt.is_visa_debit, "true"),
        auth_code: first_value(&receipt.auth_code),
        date: first_value(&receipt.trans_date),
        time: first_value(&receipt.trans_time),
        amount: first_value(&receipt.trans_amount),
        id: first_value(&receipt.trans_id),
        txn_type: first_value(&receipt.trans_type),
        is_complete: flag(&receipt.complete, "true"),
        payment: first_value(&receipt.payment_type),
        res_success: flag(&receipt.res_success, "true"),
        recur_success: flag(&receipt.recur_success, "true"),
        corporate_card: flag(&receipt.corporate_card, "true"),
        masked_pan,
        kount_info,
        kount_result: first_value(&receipt.kount_result),
        kount_score: first_value(&receipt.kount_score),
        kount_transaction_id: first_value(&receipt.kount_transaction_id),
        preload_ticket: first_value(&receipt.preload_ticket),
    };

    GatewayResponse {
        is_success,
        code,
        msg,
        data,
    }
}
