pub mod connectors;
pub mod utils;

pub use connectors::moneris::{
    apple_pay_preload, attribute_query, cavv_lookup, cavv_purchase, cavv_vault_purchase,
    completion, execute, execute_with_transport, kount_inquire, kount_update, preauth, purchase,
    refund, res_add_cc, res_delete, res_lookup_masked, res_preauth_cc, res_purchase_cc,
    res_tokenize_cc, res_update_cc, independent_refund_with_vault, session_query,
    threeds_authentication, threeds_card_lookup,
};
