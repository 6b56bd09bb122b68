use serde::{Deserialize, Serialize};

/// A customer record as returned by the search and transaction endpoints.
///
/// Balances are stored in the backend's smallest unit; formatting them for
/// display is the UI's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetail {
    pub id: u64,
    #[serde(rename = "phonenumber")]
    pub phone_number: Option<String>,
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    #[serde(rename = "cardnumber")]
    pub card_number: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "rewardbalance")]
    pub reward_balance: u64,
    #[serde(rename = "cashbalance")]
    pub cash_balance: u64,
}

impl CustomerDetail {
    /// "Last, First" as shown in search results
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// Payload for creating a customer record.
#[derive(Debug, Clone, Serialize)]
pub struct NewCustomer {
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    #[serde(rename = "phonenumber")]
    pub phone_number: String,
}

/// Payload for registering a loyalty card.
#[derive(Debug, Clone, Serialize)]
pub struct NewCard {
    #[serde(rename = "cardnumber")]
    pub card_number: String,
    pub amount: u64,
}

/// Account reference returned by the creation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerAccount {
    pub id: u64,
}
