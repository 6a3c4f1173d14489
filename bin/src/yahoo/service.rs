use anyhow::Context;
use chrono::NaiveDate;
use tracing::{debug, info};
use forecast_lib;
use crate::yahoo::utils;

pub struct YahooPriceService {
    host : String,
    client : reqwest::blocking::Client
}

impl YahooPriceService {
    pub fn create(api_host : &str, timeout : std::time::Duration) -> anyhow::Result<YahooPriceService> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        info!("Using price history from {}", api_host);
        Ok(YahooPriceService { host : String::from(api_host), client })
    }
}

impl forecast_lib::PriceHistoryService for YahooPriceService {
    fn get_price_history(&mut self, symbol : &str, from_date : &NaiveDate, to_date : &NaiveDate) -> anyhow::Result<forecast_lib::Series> {
        let http_params = vec!(
            ("period1", utils::date_to_timestamp(from_date)?.to_string()),
            ("period2", utils::date_to_timestamp(to_date)?.to_string()),
            ("interval", String::from("1d")),
            ("events", String::from("history")));
        debug!("Requesting {} closes for {} .. {}", symbol, from_date, to_date);
        let json_root = utils::http_get_json(&self.client, &self.host, &["v8", "finance", "chart", symbol], &http_params)
            .with_context(|| format!("Failed to retrieve price history of {}", symbol))?;

        utils::parse_chart_response(&json_root)
            .with_context(|| format!("Unexpected price history of {}", symbol))
    }

    fn max_days_per_call(&mut self) -> anyhow::Result<u32> {
        Ok(3650)
    }
}
