use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload for crediting or debiting a customer's cash balance.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceTransactionRequest {
    #[serde(rename = "customerid")]
    pub customer_id: u64,
    pub credit: u64,
    pub debit: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for redeeming reward points.
#[derive(Debug, Clone, Serialize)]
pub struct RewardTransactionRequest {
    #[serde(rename = "customerid")]
    pub customer_id: u64,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One movement on a customer's cash balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditTransaction {
    pub id: u64,
    pub amount: i64,
    pub description: Option<String>,
    #[serde(rename = "createdby")]
    pub created_by: Option<String>,
    #[serde(rename = "customerid")]
    pub customer_id: u64,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// One movement on a customer's reward-point balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointTransaction {
    pub id: u64,
    pub amount: i64,
    pub description: Option<String>,
    #[serde(rename = "createdby")]
    pub created_by: Option<String>,
    #[serde(rename = "customerid")]
    pub customer_id: u64,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Full account history as returned by `/customer/{id}/history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerHistory {
    #[serde(rename = "creditTransactions")]
    pub credit_transactions: Vec<CreditTransaction>,
    #[serde(rename = "rewardTransactions")]
    pub reward_transactions: Vec<PointTransaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_decodes_both_transaction_kinds() {
        let json = r#"{
            "creditTransactions": [
                {
                    "id": 1,
                    "amount": -500,
                    "description": "coffee",
                    "createdby": "jason",
                    "customerid": 12345,
                    "created_at": "2021-07-10T16:20:00.000+00:00"
                }
            ],
            "rewardTransactions": [
                {
                    "id": 2,
                    "amount": 50,
                    "description": null,
                    "createdby": null,
                    "customerid": 12345,
                    "created_at": "2021-07-10T16:20:00Z"
                }
            ]
        }"#;

        let history: CustomerHistory =
            serde_json::from_str(json).expect("history JSON should decode");
        assert_eq!(history.credit_transactions.len(), 1);
        assert_eq!(history.reward_transactions.len(), 1);

        let credit = &history.credit_transactions[0];
        let reward = &history.reward_transactions[0];
        assert_eq!(credit.amount, -500);
        assert_eq!(credit.created_by.as_deref(), Some("jason"));
        assert_eq!(reward.amount, 50);
        // Fractional and plain renderings of the same instant are equal.
        assert_eq!(credit.created_at, reward.created_at);
    }

    #[test]
    fn balance_request_omits_missing_description() {
        let request = BalanceTransactionRequest {
            customer_id: 9,
            credit: 500,
            debit: 0,
            description: None,
        };
        let value = serde_json::to_value(&request).expect("payload should serialize");
        assert_eq!(
            value,
            serde_json::json!({"customerid": 9, "credit": 500, "debit": 0})
        );
    }

    #[test]
    fn reward_request_encodes_wire_names() {
        let request = RewardTransactionRequest {
            customer_id: 9,
            amount: 700,
            description: Some("Blended Drink".to_string()),
        };
        let value = serde_json::to_value(&request).expect("payload should serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "customerid": 9,
                "amount": 700,
                "description": "Blended Drink"
            })
        );
    }
}
