use serde::{Deserialize, Serialize};

/// An ad account the client can pull spend for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdAccount {
    pub id: String,
    pub name: String,
    pub access_token: String,
    /// Platform label carried into each AdSpend row, e.g. "Facebook".
    pub platform: String,
}

/// One row of the platform's insights payload, as it arrives on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendRow {
    pub id: String,

    #[serde(alias = "date_start")]
    pub date: String,

    pub campaign_id: String,

    #[serde(default)]
    pub campaign_name: String,

    /// Platforms report spend as a decimal string.
    pub spend: String,

    #[serde(default)]
    pub purchases: u32,

    #[serde(default)]
    pub product_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpendPage {
    #[serde(default)]
    pub data: Vec<SpendRow>,

    #[serde(default)]
    pub next: Option<String>,
}
