use std::collections::BTreeMap;

use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

pub const TIMEOUT_MESSAGE: &str = "TIMEOUT";
pub const FALLBACK_MESSAGE: &str = "ERROR";

/// Abstract operation vocabulary. `Display` yields the wire name of the
/// operation element (`res_add_cc`, `kount_inquiry`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Purchase,
    Refund,
    Preauth,
    Completion,
    ApplepayPreload,
    ResAddCc,
    ResDelete,
    ResUpdateCc,
    ResPurchaseCc,
    ResPreauthCc,
    ResLookupMasked,
    ResIndRefundCc,
    ResTokenizeCc,
    ResCavvPurchaseCc,
    KountInquiry,
    KountUpdate,
    CardLookup,
    ThreedsAuthentication,
    CavvPurchase,
    CavvLookup,
    AttributeQuery,
    SessionQuery,
    Acs,
    Txn,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AvsInfo {
    pub avs_street_number: Option<String>,
    pub avs_street_name: Option<String>,
    pub avs_zipcode: Option<String>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CvdInfo {
    pub cvd_indicator: Option<String>,
    pub cvd_value: Option<Secret<String>>,
}

/// One operation's payload. Covers the union of the fields the gateway
/// accepts across operations; unset fields never reach the wire. The request
/// pipeline rewrites this in place (order-id/crypt-type defaulting, PAN and
/// expiry cleansing, `token`/`description` aliasing) before serialization.
///
/// `token` and `description` are caller-side aliases only: the pipeline moves
/// them to `data_key`/`dynamic_descriptor` and clears them before
/// serialization.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OperationRequest {
    pub order_id: Option<String>,
    pub cust_id: Option<String>,
    pub amount: Option<String>,
    pub comp_amount: Option<String>,
    pub total_amount: Option<String>,
    pub currency: Option<String>,
    pub pan: Option<Secret<String>>,
    pub expdate: Option<Secret<String>>,
    pub crypt_type: Option<String>,
    pub description: Option<String>,
    pub dynamic_descriptor: Option<String>,
    pub token: Option<Secret<String>>,
    pub data_key: Option<Secret<String>>,
    pub txn_number: Option<String>,
    pub email: Option<String>,
    pub auto_number_id: Option<String>,
    pub session_id: Option<String>,
    pub website_id: Option<String>,
    pub kount_transaction_id: Option<String>,
    pub refund_status: Option<String>,
    pub cavv: Option<Secret<String>>,
    pub eci: Option<String>,
    pub xid: Option<String>,
    pub threeds_server_trans_id: Option<String>,
    pub avs_info: Option<AvsInfo>,
    pub cvd_info: Option<CvdInfo>,
}

/// Flattened, sanitized receipt. Keys follow the camel-cased public shape;
/// absent extractions stay `None` and never serialize.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptData {
    pub reference: Option<String>,
    pub data_key: Option<String>,
    pub iso: Option<String>,
    pub receipt: Option<String>,
    pub avs_result_code: Option<String>,
    pub cvd_result_code: Option<String>,
    pub cavv_result_code: Option<String>,
    pub is_visa: Option<bool>,
    pub is_master_card: Option<bool>,
    pub is_visa_debit: Option<bool>,
    pub auth_code: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub amount: Option<String>,
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub txn_type: Option<String>,
    pub is_complete: Option<bool>,
    pub payment: Option<String>,
    pub res_success: Option<bool>,
    pub recur_success: Option<bool>,
    pub corporate_card: Option<bool>,
    pub masked_pan: Option<String>,
    pub kount_info: Option<BTreeMap<String, String>>,
    pub kount_result: Option<String>,
    pub kount_score: Option<String>,
    pub kount_transaction_id: Option<String>,
    pub preload_ticket: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub is_success: bool,
    pub code: Option<String>,
    pub msg: String,
    pub data: ReceiptData,
}

impl GatewayResponse {
    /// The result shape a transport-level timeout resolves to. A timeout is
    /// not an error: the caller still receives a normally-shaped response.
    pub fn timed_out() -> Self {
        Self {
            is_success: false,
            code: None,
            msg: TIMEOUT_MESSAGE.to_owned(),
            data: ReceiptData::default(),
        }
    }
}
