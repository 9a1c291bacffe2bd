use crate::rates::{FetchError, RateMap, RateProvider};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// CoinGeckoProvider implementation for RateProvider
pub struct CoinGeckoProvider {
    base_url: String,
    client: reqwest::Client,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent("coinboard/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(CoinGeckoProvider {
            base_url: base_url.to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeRatesResponse {
    rates: RateMap,
}

#[async_trait]
impl RateProvider for CoinGeckoProvider {
    #[instrument(name = "CoinGeckoFetch", skip(self))]
    async fn fetch_rates(&self) -> Result<RateMap, FetchError> {
        let url = format!("{}/api/v3/exchange_rates", self.base_url);
        debug!("Requesting exchange rates from {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let text = response.text().await?;
        let data: ExchangeRatesResponse = serde_json::from_str(&text)?;
        Ok(data.rates)
    }
}
