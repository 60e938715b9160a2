use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[schemars(description = "Order received but not yet handed to a courier")]
    Pending,

    #[schemars(description = "Booked with a courier, awaiting pickup; not yet dispatched")]
    Booked,

    #[schemars(description = "In the courier network, outcome not yet known")]
    InTransit,

    #[schemars(description = "Delivered to the customer; COD collected by the courier")]
    Delivered,

    #[schemars(description = "Courier has started returning the parcel to the seller")]
    RtoInitiated,

    #[schemars(description = "Parcel returned to the seller (RTO completed)")]
    Returned,

    #[schemars(description = "Cancelled before dispatch; accrues no cost")]
    Cancelled,
}

impl OrderStatus {
    /// True once the parcel has physically left for the courier network.
    /// Dispatch and cost accrual share this single rule.
    pub fn is_dispatched(&self) -> bool {
        !matches!(
            self,
            OrderStatus::Pending | OrderStatus::Booked | OrderStatus::Cancelled
        )
    }

    /// Costs (courier fee, RTO penalty, packaging, overhead) accrue exactly
    /// when the order is dispatched.
    pub fn is_chargeable(&self) -> bool {
        self.is_dispatched()
    }

    pub fn is_rto(&self) -> bool {
        matches!(self, OrderStatus::Returned | OrderStatus::RtoInitiated)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "BOOKED" => Ok(OrderStatus::Booked),
            "IN_TRANSIT" => Ok(OrderStatus::InTransit),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "RTO_INITIATED" => Ok(OrderStatus::RtoInitiated),
            "RETURNED" => Ok(OrderStatus::Returned),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(AnalyticsError::UnknownOrderStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[schemars(description = "COD collected by the courier but not yet remitted to the seller")]
    Unpaid,

    #[schemars(description = "COD cash has been transferred to the seller")]
    Remitted,
}

impl PaymentStatus {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "UNPAID" => Ok(PaymentStatus::Unpaid),
            "REMITTED" => Ok(PaymentStatus::Remitted),
            other => Err(AnalyticsError::UnknownPaymentStatus(other.to_string())),
        }
    }
}

/// Closed set of carriers the business ships with. The courier aggregator
/// pre-seeds a zero row for every variant, so adding a carrier here is the
/// only change needed for it to appear in reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum Courier {
    Tcs,
    Leopards,
    PostEx,
    Trax,
    BlueEx,
    CallCourier,
}

impl Courier {
    pub const ALL: [Courier; 6] = [
        Courier::Tcs,
        Courier::Leopards,
        Courier::PostEx,
        Courier::Trax,
        Courier::BlueEx,
        Courier::CallCourier,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Courier::Tcs => "TCS",
            Courier::Leopards => "Leopards",
            Courier::PostEx => "PostEx",
            Courier::Trax => "Trax",
            Courier::BlueEx => "BlueEx",
            Courier::CallCourier => "CallCourier",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "tcs" => Ok(Courier::Tcs),
            "leopards" => Ok(Courier::Leopards),
            "postex" => Ok(Courier::PostEx),
            "trax" => Ok(Courier::Trax),
            "blueex" | "blue-ex" => Ok(Courier::BlueEx),
            "callcourier" | "call courier" => Ok(Courier::CallCourier),
            other => Err(AnalyticsError::UnknownCourier(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OrderItem {
    pub product_id: String,

    pub sku: String,

    #[schemars(
        description = "Composite identifier disambiguating product variants more precisely than SKU alone"
    )]
    pub variant_fingerprint: Option<String>,

    pub product_name: String,

    #[schemars(description = "Units of this line item; always at least 1")]
    pub quantity: u32,

    pub sale_price: f64,

    #[schemars(
        description = "Landed unit cost snapshotted when the order was placed; immutable once set"
    )]
    pub cogs_at_time_of_order: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub courier: Courier,

    #[schemars(description = "Cash the courier collects from the customer on delivery")]
    pub cod_amount: f64,

    pub courier_fee: f64,
    pub rto_penalty: f64,
    pub packaging_cost: f64,
    pub overhead_cost: f64,
    pub tax_amount: f64,

    pub created_at: NaiveDate,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn is_dispatched(&self) -> bool {
        self.status.is_dispatched()
    }

    pub fn is_chargeable(&self) -> bool {
        self.status.is_chargeable()
    }

    /// Courier fee plus RTO penalty plus packaging, the shipping-side spend
    /// that accrues once the order is dispatched.
    pub fn shipping_cost(&self) -> f64 {
        self.courier_fee + self.rto_penalty + self.packaging_cost
    }

    /// Snapshot cost of the full order contents: Σ cogs_at_time_of_order × quantity.
    pub fn item_cost(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.cogs_at_time_of_order * item.quantity as f64)
            .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AdSpend {
    pub id: String,
    pub date: NaiveDate,

    #[schemars(description = "Ad platform name, e.g. \"Facebook\" or \"TikTok\"")]
    pub platform: String,

    pub amount_spent: f64,
    pub campaign_id: String,
    pub campaign_name: String,

    #[schemars(description = "Purchase count the platform attributes to this spend")]
    pub purchases: u32,

    #[schemars(
        description = "Product this spend is directly attributed to, when the campaign maps to one"
    )]
    pub product_id: Option<String>,
}

/// One point-in-time cost record. Entries are immutable once written and need
/// not be contiguous.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct CostRecord {
    pub date: NaiveDate,
    pub cogs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub variant_fingerprint: Option<String>,
    pub title: String,

    pub group_id: Option<String>,
    pub group_name: Option<String>,

    pub current_cogs: f64,

    #[schemars(description = "Historical unit costs, used for point-in-time costing of old orders")]
    pub cost_history: Vec<CostRecord>,
}
