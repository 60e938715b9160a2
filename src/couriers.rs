use crate::schema::{Courier, Order, OrderStatus, PaymentStatus};
use crate::utils::ratio_pct;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-carrier delivery performance and cash position. Couriers with no
/// dispatched orders still appear, zeroed, so the report always lists the
/// full carrier roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierStats {
    pub courier: Courier,
    pub dispatched: usize,
    pub delivered: usize,
    pub rto: usize,
    pub in_transit: usize,

    /// Courier fees plus RTO penalties paid to this carrier.
    pub shipping_spend: f64,

    /// COD collected by this carrier and not yet remitted.
    pub cash_pending: f64,

    pub delivery_rate: f64,
}

impl CourierStats {
    fn zeroed(courier: Courier) -> Self {
        CourierStats {
            courier,
            dispatched: 0,
            delivered: 0,
            rto: 0,
            in_transit: 0,
            shipping_spend: 0.0,
            cash_pending: 0.0,
            delivery_rate: 0.0,
        }
    }
}

/// One stats row per enumerated carrier, sorted by delivery rate descending.
/// Only dispatched orders count; pending, booked and cancelled orders never
/// reached a courier.
pub fn aggregate_couriers(orders: &[Order]) -> Vec<CourierStats> {
    let mut by_courier: HashMap<Courier, CourierStats> = Courier::ALL
        .iter()
        .map(|&c| (c, CourierStats::zeroed(c)))
        .collect();

    for order in orders {
        if !order.is_dispatched() {
            continue;
        }

        let stats = by_courier
            .get_mut(&order.courier)
            .expect("all couriers pre-seeded");

        stats.dispatched += 1;
        stats.shipping_spend += order.courier_fee + order.rto_penalty;

        match order.status {
            OrderStatus::Delivered => {
                stats.delivered += 1;
                if order.payment_status == PaymentStatus::Unpaid {
                    stats.cash_pending += order.cod_amount;
                }
            }
            OrderStatus::Returned | OrderStatus::RtoInitiated => stats.rto += 1,
            OrderStatus::InTransit => stats.in_transit += 1,
            _ => {}
        }
    }

    let mut rows: Vec<CourierStats> = by_courier.into_values().collect();
    for row in &mut rows {
        row.delivery_rate = ratio_pct(row.delivered as f64, (row.delivered + row.rto) as f64);
    }

    rows.sort_by(|a, b| {
        b.delivery_rate
            .partial_cmp(&a.delivery_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}
