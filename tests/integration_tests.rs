use chrono::NaiveDate;
use cod_analytics::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn item(product_id: &str, sku: &str, qty: u32, price: f64, cogs: f64) -> OrderItem {
    OrderItem {
        product_id: product_id.to_string(),
        sku: sku.to_string(),
        variant_fingerprint: None,
        product_name: format!("Product {}", product_id),
        quantity: qty,
        sale_price: price,
        cogs_at_time_of_order: cogs,
    }
}

fn order(id: &str, status: OrderStatus, courier: Courier, items: Vec<OrderItem>) -> Order {
    let cod_amount = items
        .iter()
        .map(|i| i.sale_price * i.quantity as f64)
        .sum();
    Order {
        id: id.to_string(),
        status,
        payment_status: PaymentStatus::Unpaid,
        courier,
        cod_amount,
        courier_fee: 100.0,
        rto_penalty: 0.0,
        packaging_cost: 0.0,
        overhead_cost: 0.0,
        tax_amount: 0.0,
        created_at: date(2024, 1, 10),
        items,
    }
}

fn product(id: &str, sku: &str, current_cogs: f64) -> Product {
    Product {
        id: id.to_string(),
        sku: sku.to_string(),
        variant_fingerprint: None,
        title: format!("Product {}", id),
        group_id: None,
        group_name: None,
        current_cogs,
        cost_history: vec![],
    }
}

// Scenario A: one delivered order, COD 1000, fee 100, one item at cost 300.
#[test]
fn scenario_single_delivered_order() {
    let orders = vec![order(
        "ord-1",
        OrderStatus::Delivered,
        Courier::Tcs,
        vec![item("p1", "SKU-1", 1, 1000.0, 300.0)],
    )];

    let m = aggregate_metrics(&orders, &[], 0.0).unwrap();
    assert_eq!(m.gross_revenue, 1000.0);
    assert_eq!(m.total_cogs, 300.0);
    assert_eq!(m.total_shipping_expense, 100.0);
    assert_eq!(m.net_profit, 600.0);
}

// Scenario B: a cancelled order with non-zero fees moves nothing.
#[test]
fn scenario_cancelled_order_is_inert() {
    let mut cancelled = order(
        "ord-1",
        OrderStatus::Cancelled,
        Courier::Leopards,
        vec![item("p1", "SKU-1", 1, 1000.0, 300.0)],
    );
    cancelled.courier_fee = 250.0;
    cancelled.rto_penalty = 75.0;
    cancelled.overhead_cost = 40.0;
    cancelled.tax_amount = 20.0;

    let m = aggregate_metrics(&[cancelled], &[], 0.0).unwrap();
    assert_eq!(m.gross_revenue, 0.0);
    assert_eq!(m.total_cogs, 0.0);
    assert_eq!(m.total_shipping_expense, 0.0);
    assert_eq!(m.total_courier_tax, 0.0);
    assert_eq!(m.cash_in_transit_stock, 0.0);
}

// Scenario C: one delivered, one RTO-initiated, same period.
#[test]
fn scenario_rto_rate_is_half() {
    let orders = vec![
        order(
            "ord-1",
            OrderStatus::Delivered,
            Courier::Tcs,
            vec![item("p1", "SKU-1", 1, 1000.0, 300.0)],
        ),
        order(
            "ord-2",
            OrderStatus::RtoInitiated,
            Courier::Tcs,
            vec![item("p1", "SKU-1", 1, 1000.0, 300.0)],
        ),
    ];

    let m = aggregate_metrics(&orders, &[], 0.0).unwrap();
    assert_eq!(m.rto_rate, 50.0);
}

// Scenario D: in-transit item cost lands in cash_in_stock, not cogs/revenue.
#[test]
fn scenario_in_transit_stock_per_product() {
    let products = vec![product("p1", "SKU-1", 500.0)];
    let orders = vec![order(
        "ord-1",
        OrderStatus::InTransit,
        Courier::PostEx,
        vec![item("p1", "SKU-1", 1, 900.0, 500.0)],
    )];

    let rows = aggregate_products(&orders, &products, &[], 0.0).unwrap();
    let row = rows.iter().find(|r| r.key == "SKU-1").unwrap();
    assert_eq!(row.cash_in_stock, 500.0);
    assert_eq!(row.cogs_total, 0.0);
    assert_eq!(row.gross_revenue, 0.0);
}

// Scenario E: point-in-time costing picks the price in force at order time.
#[test]
fn scenario_historical_cost_lookup() {
    let mut p = product("p1", "SKU-1", 150.0);
    p.cost_history = vec![
        CostRecord {
            date: date(2024, 1, 1),
            cogs: 100.0,
        },
        CostRecord {
            date: date(2024, 3, 1),
            cogs: 150.0,
        },
    ];

    assert_eq!(cost_at_date(&p, date(2024, 2, 1)), 100.0);
}

#[test]
fn partition_invariant_holds() {
    let statuses = [
        OrderStatus::Pending,
        OrderStatus::Booked,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
        OrderStatus::RtoInitiated,
        OrderStatus::Returned,
        OrderStatus::Cancelled,
    ];
    let orders: Vec<Order> = statuses
        .iter()
        .enumerate()
        .map(|(i, &status)| {
            order(
                &format!("ord-{}", i),
                status,
                Courier::Tcs,
                vec![item("p1", "SKU-1", 1, 500.0, 200.0)],
            )
        })
        .collect();

    let m = aggregate_metrics(&orders, &[], 0.0).unwrap();
    let cancelled = 1;
    assert_eq!(
        m.dispatched_orders,
        m.total_orders - m.unbooked_orders - m.booked_orders - cancelled
    );
    assert_eq!(m.total_orders, 7);
    assert_eq!(m.dispatched_orders, 4);
}

#[test]
fn gross_net_identity_holds_across_mixed_books() {
    let orders = vec![
        order(
            "ord-1",
            OrderStatus::Delivered,
            Courier::Tcs,
            vec![item("p1", "SKU-1", 2, 700.0, 250.0)],
        ),
        order(
            "ord-2",
            OrderStatus::InTransit,
            Courier::Leopards,
            vec![item("p2", "SKU-2", 1, 1200.0, 400.0)],
        ),
        order(
            "ord-3",
            OrderStatus::Returned,
            Courier::Trax,
            vec![item("p1", "SKU-1", 1, 700.0, 250.0)],
        ),
        order(
            "ord-4",
            OrderStatus::Pending,
            Courier::Tcs,
            vec![item("p3", "SKU-3", 1, 300.0, 90.0)],
        ),
    ];

    let m = aggregate_metrics(&orders, &[], 5.0).unwrap();
    assert!((m.gross_profit - m.net_profit - m.cash_in_transit_stock).abs() < 1e-9);
    assert!((0.0..=100.0).contains(&m.rto_rate));
}

#[test]
fn ratio_bounds_respected() {
    let rows = aggregate_couriers(&[]);
    assert!(rows
        .iter()
        .all(|r| (0.0..=100.0).contains(&r.delivery_rate)));

    let m = aggregate_metrics(&[], &[], 0.0).unwrap();
    assert_eq!(m.rto_rate, 0.0);
    assert_eq!(m.roi, 0.0);
}

#[test]
fn aggregators_are_pure() {
    let orders = vec![
        order(
            "ord-1",
            OrderStatus::Delivered,
            Courier::Tcs,
            vec![item("p1", "SKU-1", 1, 1000.0, 300.0)],
        ),
        order(
            "ord-2",
            OrderStatus::InTransit,
            Courier::BlueEx,
            vec![item("p2", "SKU-2", 2, 600.0, 150.0)],
        ),
    ];
    let products = vec![product("p1", "SKU-1", 300.0), product("p2", "SKU-2", 150.0)];
    let spend = vec![AdSpend {
        id: "ad-1".to_string(),
        date: date(2024, 1, 10),
        platform: "Facebook".to_string(),
        amount_spent: 80.0,
        campaign_id: "c1".to_string(),
        campaign_name: "Always on".to_string(),
        purchases: 2,
        product_id: Some("p1".to_string()),
    }];

    let a = build_dashboard_report(
        &orders,
        &products,
        &spend,
        date(2024, 1, 1),
        date(2024, 1, 31),
        16.0,
    )
    .unwrap();
    let b = build_dashboard_report(
        &orders,
        &products,
        &spend,
        date(2024, 1, 1),
        date(2024, 1, 31),
        16.0,
    )
    .unwrap();
    assert_eq!(a, b);
}

#[test]
fn full_month_of_trading() -> anyhow::Result<()> {
    let products = vec![
        product("p1", "SKU-HOODIE", 850.0),
        product("p2", "SKU-CAP", 220.0),
    ];

    let mut orders = Vec::new();
    for day in 1..=20 {
        let status = match day % 5 {
            0 => OrderStatus::Returned,
            4 => OrderStatus::InTransit,
            _ => OrderStatus::Delivered,
        };
        let mut o = order(
            &format!("ord-{}", day),
            status,
            if day % 2 == 0 { Courier::Tcs } else { Courier::Leopards },
            vec![item("p1", "SKU-HOODIE", 1, 2500.0, 850.0)],
        );
        o.created_at = date(2024, 3, day);
        o.courier_fee = 180.0;
        o.packaging_cost = 30.0;
        if status == OrderStatus::Returned {
            o.rto_penalty = 90.0;
        }
        orders.push(o);
    }

    let spend: Vec<AdSpend> = (1..=20)
        .map(|day| AdSpend {
            id: format!("ad-{}", day),
            date: date(2024, 3, day),
            platform: if day % 3 == 0 { "TikTok" } else { "Facebook" }.to_string(),
            amount_spent: 50.0,
            campaign_id: "c1".to_string(),
            campaign_name: "March push".to_string(),
            purchases: 1,
            product_id: Some("p1".to_string()),
        })
        .collect();

    let report = build_dashboard_report(
        &orders,
        &products,
        &spend,
        date(2024, 3, 1),
        date(2024, 3, 31),
        16.0,
    )?;

    // 12 delivered, 4 returned, 4 in transit
    assert_eq!(report.metrics.delivered_orders, 12);
    assert_eq!(report.metrics.rto_orders, 4);
    assert_eq!(report.metrics.in_transit_orders, 4);
    assert_eq!(report.metrics.rto_rate, 25.0);
    assert_eq!(report.metrics.gross_revenue, 12.0 * 2500.0);
    // 8 unfinalized parcels hold stock value
    assert_eq!(report.metrics.cash_in_transit_stock, 8.0 * 850.0);
    assert!(
        (report.metrics.gross_profit - report.metrics.net_profit
            - report.metrics.cash_in_transit_stock)
            .abs()
            < 1e-9
    );

    // hoodie carries everything; the cap row exists but stays zeroed
    let hoodie = report
        .products
        .iter()
        .find(|r| r.key == "SKU-HOODIE")
        .unwrap();
    assert_eq!(hoodie.units_sold, 12);
    assert_eq!(hoodie.units_returned, 4);
    assert_eq!(hoodie.units_in_transit, 4);
    assert_eq!(hoodie.marketing_purchases, 20);
    let cap = report.products.iter().find(|r| r.key == "SKU-CAP").unwrap();
    assert_eq!(cap.units_sold, 0);
    assert_eq!(cap.expenses, 0.0);

    // every carrier listed, active ones first
    assert_eq!(report.couriers.len(), Courier::ALL.len());
    let tcs = report
        .couriers
        .iter()
        .find(|c| c.courier == Courier::Tcs)
        .unwrap();
    assert_eq!(tcs.dispatched, 10);

    // series covers all of March with no gaps
    assert_eq!(report.daily_series.len(), 31);
    let march_3 = report
        .daily_series
        .iter()
        .find(|p| p.date == date(2024, 3, 3))
        .unwrap();
    assert_eq!(march_3.revenue, 2500.0);
    let march_25 = report
        .daily_series
        .iter()
        .find(|p| p.date == date(2024, 3, 25))
        .unwrap();
    assert_eq!(march_25.revenue, 0.0);
    assert_eq!(march_25.expense, 0.0);

    Ok(())
}

#[test]
fn ingestion_to_report_round_trip() -> anyhow::Result<()> {
    let payload = r#"{
        "orders": [
            {
                "id": "ord-1",
                "status": "DELIVERED",
                "courier": "Leopards",
                "cod_amount": 1800,
                "courier_fee": 160,
                "created_at": "2024-06-03",
                "items": [
                    { "product_id": "p1", "sku": "SKU-1", "quantity": 1,
                      "sale_price": 1800, "cogs_at_time_of_order": 700 }
                ]
            }
        ],
        "products": [
            { "id": "p1", "sku": "SKU-1", "title": "Hoodie", "current_cogs": 700 }
        ],
        "ad_spend": [
            { "id": "ad-1", "date": "2024-06-03", "platform": "Facebook",
              "amount_spent": 90, "campaign_id": "c1", "purchases": 1,
              "product_id": "p1" }
        ]
    }"#;

    let raw: RawBatch = serde_json::from_str(payload)?;
    let (orders, products, ad_spend) = parse_batch(&raw)?;
    validate_orders(&orders)?;

    let report = build_dashboard_report(
        &orders,
        &products,
        &ad_spend,
        date(2024, 6, 1),
        date(2024, 6, 30),
        0.0,
    )?;

    assert_eq!(report.metrics.gross_revenue, 1800.0);
    assert_eq!(report.metrics.net_profit, 1800.0 - 700.0 - 160.0 - 90.0);
    let row = report.products.iter().find(|r| r.key == "SKU-1").unwrap();
    assert_eq!(row.ad_spend_allocation, 90.0);

    Ok(())
}
