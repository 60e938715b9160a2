use crate::costing::cost_at_date;
use crate::error::Result;
use crate::schema::{AdSpend, Order, OrderItem, OrderStatus, Product};
use crate::utils::{ratio_pct, validate_tax_rate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-product (or per-variant) P&L with allocated shared order costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPerformance {
    /// Variant fingerprint when the product has one, otherwise SKU. Ad-hoc
    /// records synthesized for unmatched order items fall back to whatever
    /// identifier the item itself carried.
    pub key: String,
    pub product_id: String,
    pub sku: String,
    pub variant_fingerprint: Option<String>,
    pub title: String,

    pub units_sold: u32,
    pub units_returned: u32,
    pub units_in_transit: u32,

    pub gross_revenue: f64,
    /// Realized cost of delivered units, at the historical price in force
    /// when each order was created.
    pub cogs_total: f64,
    pub shipping_cost_allocation: f64,
    pub overhead_allocation: f64,
    pub tax_allocation: f64,
    /// Directly-attributed ad spend, grossed up by the ads tax rate.
    pub ad_spend_allocation: f64,
    pub marketing_purchases: u32,

    /// Cost value of this product's units stuck in transit or coming back
    /// as RTO; capital to be recovered or written off.
    pub cash_in_stock: f64,

    pub expenses: f64,
    pub net_profit: f64,
    pub gross_profit: f64,
    pub rto_rate: f64,
}

impl ProductPerformance {
    fn for_product(product: &Product) -> Self {
        ProductPerformance {
            key: record_key(product),
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            variant_fingerprint: product.variant_fingerprint.clone(),
            title: product.title.clone(),
            units_sold: 0,
            units_returned: 0,
            units_in_transit: 0,
            gross_revenue: 0.0,
            cogs_total: 0.0,
            shipping_cost_allocation: 0.0,
            overhead_allocation: 0.0,
            tax_allocation: 0.0,
            ad_spend_allocation: 0.0,
            marketing_purchases: 0,
            cash_in_stock: 0.0,
            expenses: 0.0,
            net_profit: 0.0,
            gross_profit: 0.0,
            rto_rate: 0.0,
        }
    }

    /// Placeholder for an order item no catalog product matches. Zeroed,
    /// identified by the item's own keys, costed from the item's snapshot
    /// (no history to consult).
    fn ad_hoc(item: &OrderItem, key: String) -> Self {
        ProductPerformance {
            key,
            product_id: item.product_id.clone(),
            sku: item.sku.clone(),
            variant_fingerprint: item.variant_fingerprint.clone(),
            title: item.product_name.clone(),
            units_sold: 0,
            units_returned: 0,
            units_in_transit: 0,
            gross_revenue: 0.0,
            cogs_total: 0.0,
            shipping_cost_allocation: 0.0,
            overhead_allocation: 0.0,
            tax_allocation: 0.0,
            ad_spend_allocation: 0.0,
            marketing_purchases: 0,
            cash_in_stock: 0.0,
            expenses: 0.0,
            net_profit: 0.0,
            gross_profit: 0.0,
            rto_rate: 0.0,
        }
    }
}

fn record_key(product: &Product) -> String {
    product
        .variant_fingerprint
        .clone()
        .unwrap_or_else(|| product.sku.clone())
}

fn item_record_key(item: &OrderItem) -> String {
    if let Some(fp) = &item.variant_fingerprint {
        return fp.clone();
    }
    if !item.sku.is_empty() {
        return item.sku.clone();
    }
    item.product_id.clone()
}

/// Ordered-candidate product lookup: variant fingerprint first, then SKU,
/// then product id. Returning None is the signal to synthesize an ad-hoc
/// record; there is no default-insert path.
struct ProductIndex<'a> {
    by_fingerprint: HashMap<&'a str, &'a Product>,
    by_sku: HashMap<&'a str, &'a Product>,
    by_id: HashMap<&'a str, &'a Product>,
}

impl<'a> ProductIndex<'a> {
    fn new(products: &'a [Product]) -> Self {
        let mut by_fingerprint = HashMap::new();
        let mut by_sku = HashMap::new();
        let mut by_id = HashMap::new();
        for product in products {
            if let Some(fp) = &product.variant_fingerprint {
                by_fingerprint.insert(fp.as_str(), product);
            }
            by_sku.insert(product.sku.as_str(), product);
            by_id.insert(product.id.as_str(), product);
        }
        Self {
            by_fingerprint,
            by_sku,
            by_id,
        }
    }

    fn resolve(&self, item: &OrderItem) -> Option<&'a Product> {
        if let Some(fp) = &item.variant_fingerprint {
            if let Some(product) = self.by_fingerprint.get(fp.as_str()) {
                return Some(product);
            }
        }
        if let Some(product) = self.by_sku.get(item.sku.as_str()) {
            return Some(product);
        }
        self.by_id.get(item.product_id.as_str()).copied()
    }
}

/// One performance record per catalog product, plus one synthesized record
/// per order item that matches nothing in the catalog. Sorted by net profit
/// descending.
///
/// Shared order costs (shipping, overhead, courier tax) are split evenly per
/// line item and scaled by each item's quantity — an even per-unit
/// allocation, deliberately independent of item price or cost. Do not swap
/// in a revenue-weighted split without changing the documented contract.
pub fn aggregate_products(
    orders: &[Order],
    products: &[Product],
    ad_spend: &[AdSpend],
    ads_tax_rate: f64,
) -> Result<Vec<ProductPerformance>> {
    validate_tax_rate(ads_tax_rate)?;

    let index = ProductIndex::new(products);
    let mut records: HashMap<String, ProductPerformance> = HashMap::new();

    // Seed a record per catalog product with its directly-attributed ad
    // spend, so products with marketing cost but no orders still surface.
    for product in products {
        let mut record = ProductPerformance::for_product(product);
        for spend in ad_spend {
            if spend.product_id.as_deref() == Some(product.id.as_str()) {
                record.ad_spend_allocation += spend.amount_spent * (1.0 + ads_tax_rate / 100.0);
                record.marketing_purchases += spend.purchases;
            }
        }
        records.insert(record.key.clone(), record);
    }

    for order in orders {
        let item_count = order.items.len();
        if item_count == 0 {
            continue;
        }

        let chargeable = order.is_chargeable();
        let delivered = order.status == OrderStatus::Delivered;

        let shipping_per_item = if chargeable {
            order.shipping_cost() / item_count as f64
        } else {
            0.0
        };
        let overhead_per_item = if chargeable {
            order.overhead_cost / item_count as f64
        } else {
            0.0
        };
        let tax_per_item = if delivered {
            order.tax_amount / item_count as f64
        } else {
            0.0
        };

        for item in &order.items {
            let (key, unit_cost) = match index.resolve(item) {
                Some(product) => (record_key(product), cost_at_date(product, order.created_at)),
                None => {
                    let key = item_record_key(item);
                    if !records.contains_key(&key) {
                        debug!("No catalog match for order item {}; synthesizing record", key);
                        records.insert(key.clone(), ProductPerformance::ad_hoc(item, key.clone()));
                    }
                    (key, item.cogs_at_time_of_order)
                }
            };

            let record = records.get_mut(&key).expect("record seeded above");
            let qty = item.quantity as f64;

            record.shipping_cost_allocation += shipping_per_item * qty;
            record.overhead_allocation += overhead_per_item * qty;
            record.tax_allocation += tax_per_item * qty;

            match order.status {
                OrderStatus::Returned | OrderStatus::RtoInitiated => {
                    record.units_returned += item.quantity;
                    record.cash_in_stock += unit_cost * qty;
                }
                OrderStatus::Delivered => {
                    record.units_sold += item.quantity;
                    record.gross_revenue += item.sale_price * qty;
                    record.cogs_total += unit_cost * qty;
                }
                _ if chargeable => {
                    record.units_in_transit += item.quantity;
                    record.cash_in_stock += unit_cost * qty;
                }
                _ => {}
            }
        }
    }

    let mut rows: Vec<ProductPerformance> = records.into_values().collect();
    for row in &mut rows {
        row.expenses = row.cogs_total
            + row.shipping_cost_allocation
            + row.overhead_allocation
            + row.tax_allocation
            + row.ad_spend_allocation;
        row.net_profit = row.gross_revenue - row.expenses - row.cash_in_stock;
        row.gross_profit = row.net_profit + row.cash_in_stock;
        row.rto_rate = ratio_pct(
            row.units_returned as f64,
            (row.units_sold + row.units_returned) as f64,
        );
    }

    rows.sort_by(|a, b| {
        b.net_profit
            .partial_cmp(&a.net_profit)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(rows)
}
