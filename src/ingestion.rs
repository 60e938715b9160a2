//! Boundary between upstream store exports / ad-platform dumps and the typed
//! model the aggregators consume. Raw records keep every monetary field
//! `#[serde(default)]` so an absent field lands as 0.0 rather than a parse
//! failure; statuses, couriers and dates arrive as strings and are parsed
//! into the closed enums here, with unknown values surfaced as distinct
//! errors rather than silently bucketed.

use crate::error::{AnalyticsError, Result};
use crate::schema::{
    AdSpend, CostRecord, Courier, Order, OrderItem, OrderStatus, PaymentStatus, Product,
};
use crate::utils::parse_iso_date;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RawOrderItem {
    pub product_id: String,

    #[serde(default)]
    pub sku: String,

    #[serde(default)]
    pub variant_fingerprint: Option<String>,

    #[serde(default)]
    pub product_name: String,

    #[schemars(description = "Units ordered; must be at least 1")]
    pub quantity: u32,

    #[serde(default)]
    pub sale_price: f64,

    #[serde(default)]
    pub cogs_at_time_of_order: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RawOrder {
    pub id: String,

    #[schemars(description = "One of PENDING, BOOKED, IN_TRANSIT, DELIVERED, RTO_INITIATED, RETURNED, CANCELLED")]
    pub status: String,

    #[serde(default = "default_payment_status")]
    pub payment_status: String,

    pub courier: String,

    #[serde(default)]
    pub cod_amount: f64,
    #[serde(default)]
    pub courier_fee: f64,
    #[serde(default)]
    pub rto_penalty: f64,
    #[serde(default)]
    pub packaging_cost: f64,
    #[serde(default)]
    pub overhead_cost: f64,
    #[serde(default)]
    pub tax_amount: f64,

    #[schemars(description = "Order creation date, YYYY-MM-DD")]
    pub created_at: String,

    #[serde(default)]
    pub items: Vec<RawOrderItem>,
}

fn default_payment_status() -> String {
    "UNPAID".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RawAdSpend {
    pub id: String,

    #[schemars(description = "Spend date, YYYY-MM-DD")]
    pub date: String,

    pub platform: String,

    #[serde(default)]
    pub amount_spent: f64,

    #[serde(default)]
    pub campaign_id: String,

    #[serde(default)]
    pub campaign_name: String,

    #[serde(default)]
    pub purchases: u32,

    #[serde(default)]
    pub product_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RawCostRecord {
    pub date: String,

    #[serde(default)]
    pub cogs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RawProduct {
    pub id: String,

    #[serde(default)]
    pub sku: String,

    #[serde(default)]
    pub variant_fingerprint: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub group_id: Option<String>,

    #[serde(default)]
    pub group_name: Option<String>,

    #[serde(default)]
    pub current_cogs: f64,

    #[serde(default)]
    pub cost_history: Vec<RawCostRecord>,
}

/// The full ingestion payload an upstream exporter hands over in one batch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RawBatch {
    #[serde(default)]
    pub orders: Vec<RawOrder>,

    #[serde(default)]
    pub products: Vec<RawProduct>,

    #[serde(default)]
    pub ad_spend: Vec<RawAdSpend>,
}

impl RawBatch {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RawBatch)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

pub fn parse_order(raw: &RawOrder) -> Result<Order> {
    Ok(Order {
        id: raw.id.clone(),
        status: OrderStatus::parse(&raw.status)?,
        payment_status: PaymentStatus::parse(&raw.payment_status)?,
        courier: Courier::parse(&raw.courier)?,
        cod_amount: raw.cod_amount,
        courier_fee: raw.courier_fee,
        rto_penalty: raw.rto_penalty,
        packaging_cost: raw.packaging_cost,
        overhead_cost: raw.overhead_cost,
        tax_amount: raw.tax_amount,
        created_at: parse_iso_date(&raw.created_at)?,
        items: raw
            .items
            .iter()
            .map(|item| OrderItem {
                product_id: item.product_id.clone(),
                sku: item.sku.clone(),
                variant_fingerprint: item.variant_fingerprint.clone(),
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                sale_price: item.sale_price,
                cogs_at_time_of_order: item.cogs_at_time_of_order,
            })
            .collect(),
    })
}

pub fn parse_ad_spend(raw: &RawAdSpend) -> Result<AdSpend> {
    Ok(AdSpend {
        id: raw.id.clone(),
        date: parse_iso_date(&raw.date)?,
        platform: raw.platform.clone(),
        amount_spent: raw.amount_spent,
        campaign_id: raw.campaign_id.clone(),
        campaign_name: raw.campaign_name.clone(),
        purchases: raw.purchases,
        product_id: raw.product_id.clone(),
    })
}

pub fn parse_product(raw: &RawProduct) -> Result<Product> {
    let cost_history = raw
        .cost_history
        .iter()
        .map(|record| {
            Ok(CostRecord {
                date: parse_iso_date(&record.date)?,
                cogs: record.cogs,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Product {
        id: raw.id.clone(),
        sku: raw.sku.clone(),
        variant_fingerprint: raw.variant_fingerprint.clone(),
        title: raw.title.clone(),
        group_id: raw.group_id.clone(),
        group_name: raw.group_name.clone(),
        current_cogs: raw.current_cogs,
        cost_history,
    })
}

/// Parses a whole batch into the typed model, in input order.
pub fn parse_batch(raw: &RawBatch) -> Result<(Vec<Order>, Vec<Product>, Vec<AdSpend>)> {
    let orders = raw
        .orders
        .iter()
        .map(parse_order)
        .collect::<Result<Vec<_>>>()?;
    let products = raw
        .products
        .iter()
        .map(parse_product)
        .collect::<Result<Vec<_>>>()?;
    let ad_spend = raw
        .ad_spend
        .iter()
        .map(parse_ad_spend)
        .collect::<Result<Vec<_>>>()?;
    Ok((orders, products, ad_spend))
}

/// Enforces the model invariants the aggregators assume: monetary fields
/// non-negative, item quantities at least 1.
pub fn validate_orders(orders: &[Order]) -> Result<()> {
    for order in orders {
        let fields: [(&'static str, f64); 6] = [
            ("cod_amount", order.cod_amount),
            ("courier_fee", order.courier_fee),
            ("rto_penalty", order.rto_penalty),
            ("packaging_cost", order.packaging_cost),
            ("overhead_cost", order.overhead_cost),
            ("tax_amount", order.tax_amount),
        ];
        for (field, value) in fields {
            if value < 0.0 {
                return Err(AnalyticsError::NegativeAmount {
                    order_id: order.id.clone(),
                    field,
                    value,
                });
            }
        }

        for item in &order.items {
            if item.quantity == 0 {
                return Err(AnalyticsError::ZeroQuantity {
                    order_id: order.id.clone(),
                });
            }
            if item.sale_price < 0.0 {
                return Err(AnalyticsError::NegativeAmount {
                    order_id: order.id.clone(),
                    field: "sale_price",
                    value: item.sale_price,
                });
            }
            if item.cogs_at_time_of_order < 0.0 {
                return Err(AnalyticsError::NegativeAmount {
                    order_id: order.id.clone(),
                    field: "cogs_at_time_of_order",
                    value: item.cogs_at_time_of_order,
                });
            }
        }
    }
    Ok(())
}
