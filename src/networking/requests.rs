use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The envelope sent over the WebSocket connection. Command-specific
/// parameters are flattened beside the id and command name.
#[derive(Debug, Serialize)]
pub struct Request {
    pub id: u64,
    pub command: String,
    #[serde(flatten)]
    pub params: Value,
}

/// The envelope the server answers with. On `status == "error"` the
/// error code and message fields are populated instead of `result`.
#[derive(Debug, Deserialize)]
pub struct Response {
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub message_type: String,
    pub status: Option<String>,
    #[serde(default)]
    pub result: Value,
    pub error: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountData {
    #[serde(rename = "Account")]
    pub account: String,
    #[serde(rename = "Balance")]
    pub balance: String,
    #[serde(rename = "Sequence")]
    pub sequence: u32,
    #[serde(rename = "OwnerCount")]
    pub owner_count: u32,
    #[serde(rename = "Flags")]
    pub flags: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoResult {
    pub account_data: AccountData,
    pub ledger_current_index: Option<u32>,
    pub validated: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResult {
    pub engine_result: String,
    pub engine_result_code: i32,
    pub engine_result_message: String,
    pub tx_blob: String,
    pub tx_json: Value,
}

impl SubmitResult {
    /// Preliminary success: the transaction was queued or applied to
    /// the open ledger. Final standing still requires validation.
    pub fn is_provisionally_successful(&self) -> bool {
        self.engine_result == "tesSUCCESS" || self.engine_result == "terQUEUED"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerCurrentResult {
    pub ledger_current_index: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeeDrops {
    pub base_fee: String,
    pub median_fee: String,
    pub minimum_fee: String,
    pub open_ledger_fee: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeeResult {
    pub current_ledger_size: Option<String>,
    pub current_queue_size: Option<String>,
    pub drops: FeeDrops,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_envelope_flattens_params() {
        let request = Request {
            id: 3,
            command: "account_info".to_string(),
            params: json!({ "account": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh" }),
        };
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["id"], 3);
        assert_eq!(encoded["command"], "account_info");
        assert_eq!(encoded["account"], "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh");
    }

    #[test]
    fn error_response_parses() {
        let raw = json!({
            "id": 4,
            "type": "response",
            "status": "error",
            "error": "actNotFound",
            "error_message": "Account not found.",
            "request": { "command": "account_info" }
        });
        let response: Response = serde_json::from_value(raw).unwrap();
        assert_eq!(response.status.as_deref(), Some("error"));
        assert_eq!(response.error.as_deref(), Some("actNotFound"));
    }

    #[test]
    fn submit_result_classifies_engine_codes() {
        let success: SubmitResult = serde_json::from_value(json!({
            "engine_result": "tesSUCCESS",
            "engine_result_code": 0,
            "engine_result_message": "The transaction was applied.",
            "tx_blob": "DEADBEEF",
            "tx_json": {}
        }))
        .unwrap();
        assert!(success.is_provisionally_successful());

        let failure: SubmitResult = serde_json::from_value(json!({
            "engine_result": "tecUNFUNDED_PAYMENT",
            "engine_result_code": 104,
            "engine_result_message": "Insufficient XRP balance to send.",
            "tx_blob": "DEADBEEF",
            "tx_json": {}
        }))
        .unwrap();
        assert!(!failure.is_provisionally_successful());
    }

    #[test]
    fn fee_result_parses_drop_strings() {
        let result: FeeResult = serde_json::from_value(json!({
            "current_ledger_size": "14",
            "current_queue_size": "0",
            "drops": {
                "base_fee": "10",
                "median_fee": "5000",
                "minimum_fee": "10",
                "open_ledger_fee": "10"
            }
        }))
        .unwrap();
        assert_eq!(result.drops.base_fee, "10");
    }
}
