use crate::schema::Product;
use chrono::NaiveDate;

/// Unit cost of `product` in force on `reference` date.
///
/// With no cost history the current cost is the only answer available. With
/// history, the applicable cost is the most recent entry dated at or before
/// the reference date. A reference date that predates all history clamps to
/// the earliest known price rather than failing, so very old orders still
/// cost out against the oldest record instead of today's price.
pub fn cost_at_date(product: &Product, reference: NaiveDate) -> f64 {
    if product.cost_history.is_empty() {
        return product.current_cogs;
    }

    let mut history = product.cost_history.clone();
    history.sort_by(|a, b| b.date.cmp(&a.date));

    for record in &history {
        if record.date <= reference {
            return record.cogs;
        }
    }

    // Reference predates all history: clamp to the oldest entry.
    history[history.len() - 1].cogs
}
