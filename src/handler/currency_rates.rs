use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::CurrencyRate,
};

/// Currencies the app tracks; rates outside this list are ignored.
const SUPPORTED_CURRENCIES: &[(&str, &str)] = &[
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("JPY", "Japanese Yen"),
    ("CAD", "Canadian Dollar"),
    ("AUD", "Australian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Yuan"),
    ("INR", "Indian Rupee"),
    ("SEK", "Swedish Krona"),
    ("NOK", "Norwegian Krone"),
    ("DKK", "Danish Krone"),
    ("PLN", "Polish Zloty"),
    ("BRL", "Brazilian Real"),
    ("MXN", "Mexican Peso"),
    ("TRY", "Turkish Lira"),
];

/// Returns all stored currency rates, refreshing them first when the stored
/// set is older than the configured window. A refresh failure is logged and
/// the stored rows are served as-is.
pub async fn get_all_currencies(
    app_state: &AppState<State>,
) -> Result<Vec<CurrencyRate>, Error> {
    if let Err(e) = refresh_if_stale(app_state).await {
        warn!("Exchange-rate refresh failed, serving stored rates: {}", e);
    }

    let rates = app_state.database.currency.get_all().await?;
    Ok(rates)
}

async fn refresh_if_stale(app_state: &AppState<State>) -> Result<(), Error> {
    let last_updated = app_state.database.currency.last_updated().await?;

    if let Some(ts) = last_updated {
        let max_age = Duration::hours(app_state.config.rates_refresh_hours);
        if Utc::now() - ts < max_age {
            return Ok(());
        }
    }

    let response = app_state.http.get_exchange_rates().await?;
    let now = Utc::now();
    let mut rows = Vec::new();

    for (code, name) in SUPPORTED_CURRENCIES {
        let Some(rate) = response.rates.get(*code) else {
            continue;
        };

        rows.push(CurrencyRate {
            code: String::from(*code),
            name: String::from(*name),
            rate_to_usd: BigDecimal::from_str(&rate.to_string())?,
            last_updated: now,
        });
    }

    info!("Refreshed {} exchange rates (base {})", rows.len(), response.base);
    app_state.database.currency.upsert_many(&rows).await?;

    Ok(())
}
