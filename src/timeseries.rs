use crate::error::Result;
use crate::schema::{AdSpend, Order, OrderStatus};
use crate::utils::{day_label, days_in_range, validate_tax_rate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One chart point per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub label: String,
    pub revenue: f64,
    pub profit: f64,
    pub expense: f64,
}

impl DailyPoint {
    fn zeroed(date: NaiveDate) -> Self {
        DailyPoint {
            date,
            label: day_label(date),
            revenue: 0.0,
            profit: 0.0,
            expense: 0.0,
        }
    }
}

/// Daily revenue/profit/expense series over the inclusive [start, end]
/// range, pre-seeded at zero so charts have no gaps on inactive days. An
/// inverted range yields an empty series.
///
/// Orders bucket into the day they were *created*, not the day they
/// delivered; the chart answers "how did the orders taken that day work
/// out", not "what cash moved that day".
///
/// Ads tax here exempts TikTok, unlike the dashboard totals which tax every
/// platform uniformly. The two behaviors are intentionally kept separate
/// until the tax treatment is clarified; do not unify them here.
pub fn bucket_daily(
    orders: &[Order],
    ad_spend: &[AdSpend],
    start: NaiveDate,
    end: NaiveDate,
    ads_tax_rate: f64,
) -> Result<Vec<DailyPoint>> {
    validate_tax_rate(ads_tax_rate)?;

    let mut buckets: BTreeMap<NaiveDate, DailyPoint> = days_in_range(start, end)
        .into_iter()
        .map(|date| (date, DailyPoint::zeroed(date)))
        .collect();

    if buckets.is_empty() {
        return Ok(Vec::new());
    }

    for order in orders {
        let Some(point) = buckets.get_mut(&order.created_at) else {
            continue;
        };

        let delivered = order.status == OrderStatus::Delivered;
        if delivered {
            point.revenue += order.cod_amount;
        }

        if order.is_dispatched() {
            let order_expense =
                order.shipping_cost() + order.overhead_cost + order.item_cost() + order.tax_amount;
            point.expense += order_expense;
            if delivered {
                point.profit += order.cod_amount - order_expense;
            } else {
                point.profit -= order_expense;
            }
        }
    }

    for spend in ad_spend {
        let Some(point) = buckets.get_mut(&spend.date) else {
            continue;
        };

        let tax = if spend.platform.eq_ignore_ascii_case("tiktok") {
            0.0
        } else {
            spend.amount_spent * ads_tax_rate / 100.0
        };
        let amount_with_tax = spend.amount_spent + tax;

        point.expense += amount_with_tax;
        point.profit -= amount_with_tax;
    }

    Ok(buckets.into_values().collect())
}
