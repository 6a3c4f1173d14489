use chrono::{NaiveDate, Duration, Utc};
use getset::{Setters};
use anyhow::Context;
use tracing::info;

use crate::price_service::*;
use crate::storage::*;
use crate::presenter::*;
use crate::forecaster::{self, ForecastResult};
use crate::error::ForecastError;
use crate::utils;
use crate::commands::fetch_price_history::fetch_series;

#[derive(Debug, Clone, Setters)]
#[getset(set = "pub")]
pub struct ForecastOptions {
    pub symbol : String,
    pub from_date : NaiveDate,
    pub to_date : NaiveDate,
    pub horizon : u32
}

impl Default for ForecastOptions {
    fn default() -> Self {
        let to_date = Utc::now().naive_utc().date();
        ForecastOptions { symbol : String::from("AAPL"), from_date : to_date - Duration::days(365), to_date,
            horizon : 30 }
    }
}

/// Fetches `options.symbol` over `[from_date, to_date)` and forecasts it.
pub fn forecast_prices(service : &mut impl PriceHistoryService,
                       presenters : &mut [Box<dyn ForecastPresenter>],
                       options : &ForecastOptions) -> anyhow::Result<ForecastResult> {
    check_horizon(options.horizon)?;

    let series = fetch_series(service, &options.symbol, &options.from_date, &options.to_date)
        .with_context(|| format!("Failed to fetch price history of {}", options.symbol))?;

    present_forecast(&options.symbol, series, options.horizon, presenters)
}

/// Forecasts a series saved earlier by `fetch_price_history`.
pub fn forecast_stored_prices(storage : &mut impl Storage,
                              presenters : &mut [Box<dyn ForecastPresenter>],
                              input_name : &str,
                              horizon : u32) -> anyhow::Result<ForecastResult> {
    check_horizon(horizon)?;

    let (series, metadata) = storage.load_price_history(input_name)
        .with_context(|| format!("Failed to load stored history '{}'", input_name))?;

    present_forecast(&metadata.symbol, series, horizon, presenters)
}

fn check_horizon(horizon : u32) -> anyhow::Result<()> {
    if horizon < 1 {
        return Err(ForecastError::InvalidHorizon { horizon }.into());
    }
    Ok(())
}

fn present_forecast(symbol : &str,
                    series : Series,
                    horizon : u32,
                    presenters : &mut [Box<dyn ForecastPresenter>]) -> anyhow::Result<ForecastResult> {
    let series = utils::normalize_series(series);
    info!("Forecasting {} days of {} from {} observations", horizon, symbol, series.len());

    let result = forecaster::forecast(&series, horizon)?;

    for presenter in presenters.iter_mut() {
        presenter.render(symbol, &series, &result)
            .with_context(|| format!("Failed to present forecast of {}", symbol))?;
    }

    Ok(result)
}
