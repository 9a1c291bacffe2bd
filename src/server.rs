//! HTTP surface: a rates page at `/` and a JSON endpoint at `/api/rates`.
//! Both always answer 200; missing data shows up as placeholders or nulls,
//! never as an error status.

use crate::rates::{RateMap, RateSnapshot};
use crate::resolver::RateResolver;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<RateResolver>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/rates", get(api_rates))
        .with_state(state)
}

/// Payload for `GET /api/rates`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesResponse {
    pub rates: Option<RateMap>,
    pub updated_at: Option<String>,
}

impl From<Option<RateSnapshot>> for RatesResponse {
    fn from(snapshot: Option<RateSnapshot>) -> Self {
        match snapshot {
            Some(snapshot) => RatesResponse {
                rates: Some(snapshot.rates),
                updated_at: Some(snapshot.updated_at),
            },
            None => RatesResponse {
                rates: None,
                updated_at: None,
            },
        }
    }
}

async fn api_rates(State(state): State<AppState>) -> Json<RatesResponse> {
    Json(state.resolver.resolve().await.into())
}

/// Prices projected for the page. A currency the upstream did not report
/// renders as a placeholder.
#[derive(Debug, Default, PartialEq)]
struct PriceView {
    brl: Option<f64>,
    usd: Option<f64>,
    eur: Option<f64>,
}

impl PriceView {
    fn from_rates(rates: &RateMap) -> Self {
        let value = |code: &str| rates.get(code).map(|record| record.value);
        PriceView {
            brl: value("brl"),
            usd: value("usd"),
            eur: value("eur"),
        }
    }
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.resolver.resolve().await;
    let prices = snapshot
        .as_ref()
        .map(|snapshot| PriceView::from_rates(&snapshot.rates))
        .unwrap_or_default();
    let updated_at = snapshot.as_ref().map(|snapshot| snapshot.updated_at.as_str());
    Html(render_page(&prices, updated_at))
}

fn format_price(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => "unavailable".to_string(),
    }
}

fn render_page(prices: &PriceView, updated_at: Option<&str>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Bitcoin Rates</title>
</head>
<body>
  <h1>Bitcoin</h1>
  <ul>
    <li>BRL: {brl}</li>
    <li>USD: {usd}</li>
    <li>EUR: {eur}</li>
  </ul>
  <p>Updated at: {updated_at}</p>
</body>
</html>
"#,
        brl = format_price(prices.brl),
        usd = format_price(prices.usd),
        eur = format_price(prices.eur),
        updated_at = updated_at.unwrap_or("never"),
    )
}
