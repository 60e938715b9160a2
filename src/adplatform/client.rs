use crate::adplatform::types::{AdAccount, SpendPage, SpendRow};
use crate::error::{AnalyticsError, Result};
use crate::schema::AdSpend;
use crate::utils::parse_iso_date;
use chrono::NaiveDate;
use futures::future::join_all;
use log::{debug, warn};
use reqwest::{Client, StatusCode};

#[derive(Clone)]
pub struct AdPlatformClient {
    client: Client,
    base_url: String,
}

impl AdPlatformClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Spend rows for one account over the inclusive date range. Auth
    /// failures are classified so the caller can prompt re-login
    /// (`SessionExpired`) separately from a scope problem
    /// (`PermissionDenied`).
    pub async fn fetch_spend(
        &self,
        account: &AdAccount,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AdSpend>> {
        let mut url = format!(
            "{}/accounts/{}/insights?start={}&end={}",
            self.base_url,
            account.id,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
        );

        let mut rows: Vec<AdSpend> = Vec::new();
        loop {
            let res = self
                .client
                .get(&url)
                .bearer_auth(&account.access_token)
                .send()
                .await?;

            match res.status() {
                StatusCode::UNAUTHORIZED => {
                    return Err(AnalyticsError::SessionExpired {
                        account: account.id.clone(),
                    });
                }
                StatusCode::FORBIDDEN => {
                    return Err(AnalyticsError::PermissionDenied {
                        account: account.id.clone(),
                    });
                }
                status if !status.is_success() => {
                    let body = res.text().await.unwrap_or_default();
                    return Err(AnalyticsError::AdPlatform(format!(
                        "insights request for account {} failed (status {}): {}",
                        account.id, status, body
                    )));
                }
                _ => {}
            }

            let page: SpendPage = res.json().await?;
            for row in &page.data {
                rows.push(convert_row(row, &account.platform)?);
            }

            match page.next {
                Some(next) => url = next,
                None => break,
            }
        }

        debug!(
            "Fetched {} spend rows for account {} ({} to {})",
            rows.len(),
            account.id,
            start,
            end
        );
        Ok(rows)
    }

    /// Fetches all accounts in parallel, returning whatever succeeded. A
    /// failing account is logged and contributes nothing; the result is
    /// best-effort data, never authoritative — the aggregation core makes no
    /// attempt to compensate for under-reported spend.
    pub async fn fetch_spend_many(
        &self,
        accounts: &[AdAccount],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<AdSpend> {
        let fetches = accounts
            .iter()
            .map(|account| self.fetch_spend(account, start, end));
        let outcomes = join_all(fetches).await;

        let mut rows = Vec::new();
        for (account, outcome) in accounts.iter().zip(outcomes) {
            match outcome {
                Ok(mut account_rows) => rows.append(&mut account_rows),
                Err(e) => {
                    warn!(
                        "Skipping ad account {} ({}): {}",
                        account.id, account.name, e
                    );
                }
            }
        }
        rows
    }
}

fn convert_row(row: &SpendRow, platform: &str) -> Result<AdSpend> {
    let amount_spent: f64 = row.spend.trim().parse().map_err(|_| {
        AnalyticsError::AdPlatform(format!(
            "unparseable spend value '{}' on row {}",
            row.spend, row.id
        ))
    })?;

    Ok(AdSpend {
        id: row.id.clone(),
        date: parse_iso_date(&row.date)?,
        platform: platform.to_string(),
        amount_spent,
        campaign_id: row.campaign_id.clone(),
        campaign_name: row.campaign_name.clone(),
        purchases: row.purchases,
        product_id: row.product_id.clone(),
    })
}
