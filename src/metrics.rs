use crate::error::Result;
use crate::schema::{AdSpend, Order, OrderStatus, PaymentStatus};
use crate::utils::{ratio_pct, validate_tax_rate};
use log::debug;
use serde::{Deserialize, Serialize};

/// Whole-portfolio cash-basis P&L snapshot. Computed fresh per call and
/// consumed by presentation code; nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// COD collected on delivered orders only. Revenue is recognized on
    /// delivery, never on booking or dispatch.
    pub gross_revenue: f64,
    pub total_cogs: f64,
    pub total_shipping_expense: f64,
    pub total_overhead_cost: f64,
    pub total_courier_tax: f64,

    /// COD collected by couriers but not yet remitted to the seller.
    pub pending_remittance: f64,

    /// Cost value of inventory dispatched but neither delivered nor returned.
    pub cash_in_transit_stock: f64,

    pub raw_ad_spend: f64,
    pub total_ads_tax: f64,
    pub total_ad_spend: f64,

    pub net_profit: f64,
    /// Net profit with cash-in-transit stock added back; what profit becomes
    /// if every parcel still in the network delivers.
    pub gross_profit: f64,

    pub total_investment: f64,
    pub roi: f64,

    pub total_orders: usize,
    pub dispatched_orders: usize,
    pub delivered_orders: usize,
    pub in_transit_orders: usize,
    pub booked_orders: usize,
    pub unbooked_orders: usize,
    pub rto_orders: usize,
    pub rto_rate: f64,
}

/// Aggregates the full order book plus ad spend into one snapshot.
///
/// `ads_tax_rate` is a percentage applied uniformly to all ad spend here.
/// The daily time series applies a platform-specific exemption instead; the
/// two deliberately disagree until the tax treatment is settled (see
/// `timeseries`).
pub fn aggregate_metrics(
    orders: &[Order],
    ad_spend: &[AdSpend],
    ads_tax_rate: f64,
) -> Result<DashboardMetrics> {
    validate_tax_rate(ads_tax_rate)?;

    let mut m = DashboardMetrics {
        total_orders: orders.len(),
        ..Default::default()
    };

    for order in orders {
        match order.status {
            OrderStatus::Delivered => m.delivered_orders += 1,
            OrderStatus::InTransit => m.in_transit_orders += 1,
            OrderStatus::Booked => m.booked_orders += 1,
            OrderStatus::Pending => m.unbooked_orders += 1,
            _ => {}
        }

        if order.status == OrderStatus::Delivered {
            m.gross_revenue += order.cod_amount;
            m.total_courier_tax += order.tax_amount;
            if order.payment_status == PaymentStatus::Unpaid {
                m.pending_remittance += order.cod_amount;
            }
        }

        if order.status.is_rto() {
            m.rto_orders += 1;
        }

        if order.is_dispatched() {
            m.dispatched_orders += 1;
            m.total_shipping_expense += order.shipping_cost();
            m.total_overhead_cost += order.overhead_cost;

            let item_cost = order.item_cost();
            m.total_cogs += item_cost;
            if order.status != OrderStatus::Delivered {
                m.cash_in_transit_stock += item_cost;
            }
        }
    }

    m.raw_ad_spend = ad_spend.iter().map(|s| s.amount_spent).sum();
    m.total_ads_tax = m.raw_ad_spend * ads_tax_rate / 100.0;
    m.total_ad_spend = m.raw_ad_spend + m.total_ads_tax;

    m.net_profit = m.gross_revenue
        - m.total_cogs
        - m.total_shipping_expense
        - m.total_overhead_cost
        - m.total_courier_tax
        - m.total_ad_spend;
    m.gross_profit = m.net_profit + m.cash_in_transit_stock;

    m.rto_rate = ratio_pct(
        m.rto_orders as f64,
        (m.delivered_orders + m.rto_orders) as f64,
    );

    m.total_investment =
        m.total_cogs + m.total_shipping_expense + m.total_overhead_cost + m.total_ad_spend;
    m.roi = ratio_pct(m.net_profit, m.total_investment);

    debug!(
        "Aggregated {} orders: revenue {:.2}, net profit {:.2}, RTO rate {:.1}%",
        m.total_orders, m.gross_revenue, m.net_profit, m.rto_rate
    );

    Ok(m)
}
