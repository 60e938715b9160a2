//! # COD Analytics
//!
//! Cash-basis profit and loss analytics for cash-on-delivery e-commerce
//! operations: order books, courier fees, RTO penalties, ad spend.
//!
//! ## Core Concepts
//!
//! - **Dispatched**: an order that has left for the courier network (not
//!   pending, booked or cancelled). Cost accrual shares this predicate.
//! - **Cash basis**: revenue is recognized only on delivery, when the
//!   courier actually collects COD.
//! - **Cash-in-transit stock**: cost value of dispatched-but-unfinalized
//!   inventory, capital temporarily tied up in the courier network.
//! - **Historical costing**: old orders cost out at the COGS price that was
//!   in force when they were created, not today's price.
//!
//! ## Example
//!
//! ```rust,ignore
//! use cod_analytics::*;
//! use chrono::NaiveDate;
//!
//! let report = build_dashboard_report(
//!     &orders,
//!     &products,
//!     &ad_spend,
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//!     16.0, // ads tax rate, percent
//! )?;
//!
//! println!("net profit: {:.2}", report.metrics.net_profit);
//! ```
//!
//! Every aggregator is a pure function of its input slices; identical input
//! yields identical output, so results may be cached by callers keyed on
//! (orders, ad spend, tax rate) if they wish.

pub mod costing;
pub mod couriers;
pub mod error;
pub mod ingestion;
pub mod metrics;
pub mod products;
pub mod schema;
pub mod timeseries;
pub mod utils;

#[cfg(feature = "ads-client")]
pub mod adplatform;

pub use costing::cost_at_date;
pub use couriers::{aggregate_couriers, CourierStats};
pub use error::{AnalyticsError, Result};
pub use ingestion::*;
pub use metrics::{aggregate_metrics, DashboardMetrics};
pub use products::{aggregate_products, ProductPerformance};
pub use schema::*;
pub use timeseries::{bucket_daily, DailyPoint};
pub use utils::*;

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Everything the dashboard needs for one render, computed in a single pass
/// over one consistent input set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub metrics: DashboardMetrics,
    pub products: Vec<ProductPerformance>,
    pub couriers: Vec<CourierStats>,
    pub daily_series: Vec<DailyPoint>,
}

pub struct DashboardBuilder;

impl DashboardBuilder {
    pub fn build(
        orders: &[Order],
        products: &[Product],
        ad_spend: &[AdSpend],
        start: NaiveDate,
        end: NaiveDate,
        ads_tax_rate: f64,
    ) -> Result<DashboardReport> {
        validate_orders(orders)?;
        validate_tax_rate(ads_tax_rate)?;

        info!(
            "Building dashboard report over {} orders, {} products, {} ad spend rows",
            orders.len(),
            products.len(),
            ad_spend.len()
        );
        debug!("Report range {} to {}, ads tax rate {}%", start, end, ads_tax_rate);

        Ok(DashboardReport {
            metrics: aggregate_metrics(orders, ad_spend, ads_tax_rate)?,
            products: aggregate_products(orders, products, ad_spend, ads_tax_rate)?,
            couriers: aggregate_couriers(orders),
            daily_series: bucket_daily(orders, ad_spend, start, end, ads_tax_rate)?,
        })
    }
}

pub fn build_dashboard_report(
    orders: &[Order],
    products: &[Product],
    ad_spend: &[AdSpend],
    start: NaiveDate,
    end: NaiveDate,
    ads_tax_rate: f64,
) -> Result<DashboardReport> {
    DashboardBuilder::build(orders, products, ad_spend, start, end, ads_tax_rate)
}
